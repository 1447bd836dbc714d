use crate::error::{AppError, AppResult, FileError};
use crate::models::order::Order;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// 订单 TOML 文件结构
///
/// ```toml
/// [[orders]]
/// order_id = "38"
/// items = "2x Burger, 1x Coke"
/// status = "Preparing"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdersFile {
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// 从 TOML 文件加载订单列表
pub async fn load_orders_from_toml(toml_file_path: &Path) -> AppResult<Vec<Order>> {
    let path_display = toml_file_path.display().to_string();

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_display, e))?;

    let file: OrdersFile = toml::from_str(&content).map_err(|e| {
        AppError::File(FileError::TomlParseFailed {
            path: path_display.clone(),
            source: Box::new(e),
        })
    })?;

    tracing::info!("从 {} 加载了 {} 个订单", path_display, file.orders.len());

    Ok(file.orders)
}
