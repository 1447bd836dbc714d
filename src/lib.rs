//! # Order Engage
//!
//! 顾客等餐时使用的终端互动程序：查订单、看趣闻、答测验、玩小游戏
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 订单、原始题目、规范化题目
//! - `models/loaders` - 从 TOML 加载订单
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `LlmService` - 调用 LLM 生成文本（`TextGenerator` 的实现）
//! - `QuizService` - 生成测验题目（解析 → 校验 → 打乱 → 兜底）
//! - `FactService` - 生成商品趣闻
//! - `OrderBook` - 订单查询
//! - `DiagnosticsWriter` - 写诊断记录
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 终端状态机和测验会话
//! - `KioskState` - 唯一的活动状态及其子状态
//! - `QuizSession` - 作答、计分、翻页
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/kiosk` - 读命令、切换状态、渲染页面
//! - `orchestrator/cache` - 测验和趣闻的结果缓存
//!
//! 小游戏（`games/`）是纯逻辑，不依赖 LLM。
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod games;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{NormalizedQuestion, OptionLetter, Order, RawQuestion};
pub use orchestrator::Kiosk;
pub use services::{
    FactService, LlmService, OrderBook, QuizBatch, QuizService, QuizSource, TextGenerator,
};
pub use workflow::{KioskState, QuizSession};
