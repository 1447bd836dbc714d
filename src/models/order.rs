use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// 订单记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    /// 商品描述，例如 `"2x Burger, 1x Coke"`
    pub items: String,
    pub status: String,
}

/// 订单中的单个商品
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub quantity: u32,
    pub name: String,
}

/// 订单商品关键词 → 测验主题，按顺序取第一个命中的
const QUIZ_TOPICS: &[(&[&str], &str)] = &[
    (&["whopper"], "Burger King Whopper"),
    (&["chicken nuggets"], "Chicken Nuggets"),
    (&["fries"], "French Fries"),
    (&["coke", "soda"], "Coca-Cola"),
    (&["veggie burger"], "Veggie Burgers"),
    (&["burger"], "Burger King Burgers"),
    (&["water"], "Drinks and Beverages"),
];

const DEFAULT_QUIZ_TOPIC: &str = "Fast Food";

/// `2x Burger`、`2 x Burger`、`1 XL Fries` 三种数量前缀
const QUANTITY_PATTERN: &str = r"(?i)^(\d+)(?:\s*x)?\s+(.+)$";

fn quantity_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(QUANTITY_PATTERN).ok()).as_ref()
}

impl OrderItem {
    /// 解析 `"2x Burger"` 这样的片段，没有数量前缀时数量为 1
    pub fn parse(part: &str) -> Option<Self> {
        let part = part.trim();
        if part.is_empty() {
            return None;
        }
        if let Some(caps) = quantity_re().and_then(|re| re.captures(part)) {
            let quantity = caps[1].parse().unwrap_or(1);
            return Some(Self {
                quantity,
                name: caps[2].trim().to_string(),
            });
        }
        Some(Self {
            quantity: 1,
            name: part.to_string(),
        })
    }
}

impl Order {
    pub fn new(
        order_id: impl Into<String>,
        items: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            items: items.into(),
            status: status.into(),
        }
    }

    /// 拆分商品列表
    pub fn parsed_items(&self) -> Vec<OrderItem> {
        self.items.split(',').filter_map(OrderItem::parse).collect()
    }

    /// 订单中的第一个商品（用于生成趣闻）
    pub fn first_item(&self) -> Option<OrderItem> {
        self.parsed_items().into_iter().next()
    }

    /// 根据订单内容选择测验主题
    pub fn quiz_topic(&self) -> &'static str {
        let items = self.items.to_lowercase();
        QUIZ_TOPICS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| items.contains(k)))
            .map(|(_, topic)| *topic)
            .unwrap_or(DEFAULT_QUIZ_TOPIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_items() {
        let order = Order::new("40", "3x Chicken Nuggets, 2X Soda, Ketchup", "Pending");
        let items = order.parsed_items();
        assert_eq!(
            items,
            vec![
                OrderItem { quantity: 3, name: "Chicken Nuggets".into() },
                OrderItem { quantity: 2, name: "Soda".into() },
                OrderItem { quantity: 1, name: "Ketchup".into() },
            ]
        );
        assert_eq!(order.first_item().map(|i| i.name), Some("Chicken Nuggets".to_string()));
        assert_eq!(Order::new("1", " , ", "Ready").first_item(), None);
    }

    #[test]
    fn test_quantity_pattern_compiles() {
        assert!(Regex::new(QUANTITY_PATTERN).is_ok());
    }

    #[test]
    fn test_names_starting_with_x_keep_their_first_letter() {
        assert_eq!(
            OrderItem::parse("1 XL Fries"),
            Some(OrderItem { quantity: 1, name: "XL Fries".into() })
        );
        assert_eq!(
            OrderItem::parse("2 Xtra Crispy Wings"),
            Some(OrderItem { quantity: 2, name: "Xtra Crispy Wings".into() })
        );
        assert_eq!(
            OrderItem::parse("2 x Fries"),
            Some(OrderItem { quantity: 2, name: "Fries".into() })
        );
        assert_eq!(
            OrderItem::parse("10xFries"),
            Some(OrderItem { quantity: 1, name: "10xFries".into() })
        );
    }

    #[test]
    fn test_quiz_topic_priority() {
        let topic = |items: &str| Order::new("1", items, "Ready").quiz_topic();
        assert_eq!(topic("1x Whopper, 1x Fries"), "Burger King Whopper");
        assert_eq!(topic("3x Chicken Nuggets, 2x Soda"), "Chicken Nuggets");
        assert_eq!(topic("1x Wings, 1x Fries"), "French Fries");
        assert_eq!(topic("2x Burger, 1x Coke"), "Coca-Cola");
        assert_eq!(topic("1x Veggie Burger"), "Veggie Burgers");
        assert_eq!(topic("1x Hamburger, 1x Water"), "Burger King Burgers");
        assert_eq!(topic("1x Water"), "Drinks and Beverages");
        assert_eq!(topic("1x Salad"), "Fast Food");
    }
}
