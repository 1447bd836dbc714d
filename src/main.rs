use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use order_engage::utils::logging;
use order_engage::{Config, Kiosk, LlmService, OrderBook};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（会先读取 .env）
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    config.validate()?;

    let orders = OrderBook::load_or_sample(Path::new(&config.orders_file)).await?;
    let llm = Arc::new(LlmService::new(&config));

    logging::log_startup(llm.model_name(), orders.len());

    Kiosk::new(&config, llm, orders).run().await?;

    Ok(())
}
