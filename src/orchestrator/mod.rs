//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责和顾客交互，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `kiosk` - 终端互动程序
//! - 读取命令、驱动 `KioskState` 切换
//! - 调用测验 / 趣闻服务
//! - 渲染当前页面
//!
//! ### `cache` - 带有效期的结果缓存
//! - 测验按 (主题, 题目数) 缓存
//! - 趣闻按商品缓存
//!
//! ## 层次关系
//!
//! ```text
//! kiosk (处理顾客命令)
//!     ↓
//! workflow::KioskState / QuizSession (状态和会话)
//!     ↓
//! services (能力层：quiz / fact / order / llm)
//! ```

pub mod cache;
pub mod kiosk;

pub use cache::TtlCache;
pub use kiosk::Kiosk;
