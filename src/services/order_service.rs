//! 订单查询服务 - 业务能力层
//!
//! 只负责"按订单号查订单"能力

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use crate::error::AppResult;
use crate::models::loaders::load_orders_from_toml;
use crate::models::order::Order;

/// 内存中的订单表
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: BTreeMap<String, Order>,
}

impl OrderBook {
    pub fn new(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            orders: orders
                .into_iter()
                .map(|order| (order.order_id.clone(), order))
                .collect(),
        }
    }

    /// 内置的示例订单
    pub fn sample() -> Self {
        Self::new([
            Order::new("38", "2x Burger, 1x Coke", "Preparing"),
            Order::new("39", "1x Wings, 1x Fries", "Ready"),
            Order::new("40", "3x Chicken Nuggets, 2x Soda", "Pending"),
            Order::new("41", "1x Hamburger, 1x Water", "Preparing"),
        ])
    }

    /// 从 TOML 文件加载订单
    pub async fn load(path: &Path) -> AppResult<Self> {
        let orders = load_orders_from_toml(path).await?;
        Ok(Self::new(orders))
    }

    /// 文件不存在时退回到示例订单，其它错误照常返回
    pub async fn load_or_sample(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            warn!("订单文件 {} 不存在，使用示例订单", path.display());
            return Ok(Self::sample());
        }
        let book = Self::load(path).await?;
        info!("✓ 订单表已加载: {} 个订单", book.len());
        Ok(book)
    }

    /// 按订单号查询（忽略首尾空白）
    pub fn get_order_details(&self, order_id: &str) -> Option<&Order> {
        self.orders.get(order_id.trim())
    }

    /// 所有订单号，按字典序
    pub fn known_ids(&self) -> Vec<&str> {
        self.orders.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lookup_trims_id() {
        let book = OrderBook::sample();
        let order = book.get_order_details(" 39 ").unwrap();
        assert_eq!(order.items, "1x Wings, 1x Fries");
        assert_eq!(order.status, "Ready");
        assert!(book.get_order_details("99").is_none());
        assert!(book.get_order_details("").is_none());
    }

    #[test]
    fn test_known_ids() {
        assert_eq!(OrderBook::sample().known_ids(), vec!["38", "39", "40", "41"]);
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_sample() {
        let temp_dir = TempDir::new().unwrap();
        let book = OrderBook::load_or_sample(&temp_dir.path().join("orders.toml"))
            .await
            .unwrap();
        assert_eq!(book.len(), 4);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("orders.toml");
        std::fs::write(
            &path,
            "[[orders]]\norder_id = \"7\"\nitems = \"1x Whopper\"\nstatus = \"Ready\"\n",
        )
        .unwrap();

        let book = OrderBook::load_or_sample(&path).await.unwrap();
        assert_eq!(book.known_ids(), vec!["7"]);
        assert_eq!(book.get_order_details("7").unwrap().quiz_topic(), "Burger King Whopper");
    }
}
