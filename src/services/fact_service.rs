//! 趣闻服务 - 业务能力层
//!
//! 为订单里的商品生成一句简短的趣闻；LLM 失败或拒答时随机返回一条预置趣闻

use phf::phf_map;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::order::OrderItem;
use crate::services::llm_service::TextGenerator;

/// 商品名为空时返回的趣闻
pub const EMPTY_ITEM_FACT: &str = "Did you know: Enjoying your meal is the most fun fact!";

const GENERAL_FACTS: &[&str] = &["Did you know: Food tastes better when you're having fun!"];

const BURGER_FACTS: &[&str] =
    &["Did you know: The hamburger's origin is debated, but many believe it came from Hamburg, Germany!"];
const COKE_FACTS: &[&str] = &["Did you know: Coca-Cola was originally invented as a patent medicine!"];
const WHOPPER_FACTS: &[&str] = &["Did you know: The Whopper was introduced by Burger King in 1957!"];
const FRIES_FACTS: &[&str] =
    &["Did you know: French fries might actually originate from Belgium, not France!"];
const NUGGETS_FACTS: &[&str] = &[
    "Did you know: Chicken nuggets were invented in the 1950s by Robert C. Baker at Cornell University!",
];

static FALLBACK_FACTS: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "burger" => BURGER_FACTS,
    "coke" => COKE_FACTS,
    "whopper" => WHOPPER_FACTS,
    "fries" => FRIES_FACTS,
    "chicken nuggets" => NUGGETS_FACTS,
};

const REFUSAL_MARKERS: &[&str] = &["i cannot fulfill this request", "not appropriate"];

/// 去掉数量前缀并转为小写，例如 `"3x Chicken Nuggets"` → `"chicken nuggets"`
pub fn clean_item_name(item_name: &str) -> String {
    OrderItem::parse(item_name)
        .map(|item| item.name.to_lowercase())
        .unwrap_or_default()
}

/// 某个商品可用的预置趣闻：先按完整名称查，再按最后一个单词查，最后用通用趣闻
pub fn fallback_facts_for(clean_item: &str) -> &'static [&'static str] {
    FALLBACK_FACTS
        .get(clean_item)
        .or_else(|| {
            clean_item
                .split_whitespace()
                .last()
                .and_then(|word| FALLBACK_FACTS.get(word))
        })
        .copied()
        .unwrap_or(GENERAL_FACTS)
}

pub fn build_fact_prompt(clean_item: &str) -> String {
    format!(
        "Give me one very short, engaging, and fun fact about {} relevant to fast food. \
         Make it sound like a quick trivia tidbit. Do not include intros like \
         'Here's a fun fact' or 'Did you know', just the fact itself.",
        clean_item
    )
}

fn is_refusal(text: &str) -> bool {
    let lower = text.to_lowercase();
    REFUSAL_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// 趣闻服务
pub struct FactService<G> {
    generator: Arc<G>,
}

impl<G: TextGenerator> FactService<G> {
    pub fn new(generator: Arc<G>) -> Self {
        Self { generator }
    }

    /// 生成趣闻，总是返回一句可展示的文本
    pub async fn generate_fun_fact(&self, item_name: &str) -> String {
        let clean_item = clean_item_name(item_name);
        if clean_item.is_empty() {
            return EMPTY_ITEM_FACT.to_string();
        }

        info!("💡 正在生成趣闻: {}", clean_item);

        let generated = match self.generator.generate(&build_fact_prompt(&clean_item)).await {
            Ok(fact) if fact.trim().is_empty() => {
                warn!("LLM 没有返回趣闻，使用预置趣闻");
                None
            }
            Ok(fact) if is_refusal(&fact) => {
                warn!("LLM 拒绝生成趣闻，使用预置趣闻");
                None
            }
            Ok(fact) => Some(fact.trim().to_string()),
            Err(e) => {
                warn!("生成趣闻失败: {:#}，使用预置趣闻", e);
                None
            }
        };

        generated.unwrap_or_else(|| pick_fallback(&clean_item))
    }
}

fn pick_fallback(clean_item: &str) -> String {
    let facts = fallback_facts_for(clean_item);
    facts
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(EMPTY_ITEM_FACT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct FixedGenerator(Option<&'static str>);

    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| anyhow!("service unavailable"))
        }
    }

    fn service(response: Option<&'static str>) -> FactService<FixedGenerator> {
        FactService::new(Arc::new(FixedGenerator(response)))
    }

    #[test]
    fn test_clean_item_name() {
        assert_eq!(clean_item_name("3x Chicken Nuggets"), "chicken nuggets");
        assert_eq!(clean_item_name(" 1x Fries "), "fries");
        assert_eq!(clean_item_name("Whopper"), "whopper");
        assert_eq!(clean_item_name("1 XL Fries"), "xl fries");
        assert_eq!(clean_item_name("  "), "");
    }

    #[test]
    fn test_fallback_lookup() {
        assert!(fallback_facts_for("chicken nuggets")[0].contains("Robert C. Baker"));
        assert!(fallback_facts_for("cheese burger")[0].contains("Hamburg"));
        assert_eq!(fallback_facts_for("wings"), GENERAL_FACTS);
    }

    #[tokio::test]
    async fn test_generated_fact_is_returned_trimmed() {
        let fact = service(Some("  Fries were first sold in paper cones.\n"))
            .generate_fun_fact("1x Fries")
            .await;
        assert_eq!(fact, "Fries were first sold in paper cones.");
    }

    #[tokio::test]
    async fn test_failure_uses_item_fallback() {
        let fact = service(None).generate_fun_fact("1x Coke").await;
        assert_eq!(fact, COKE_FACTS[0]);
    }

    #[tokio::test]
    async fn test_refusal_uses_fallback() {
        let fact = service(Some("Sorry, I cannot fulfill this request."))
            .generate_fun_fact("2x Burger")
            .await;
        assert_eq!(fact, BURGER_FACTS[0]);
    }

    #[tokio::test]
    async fn test_empty_item() {
        let fact = service(Some("unused")).generate_fun_fact("").await;
        assert_eq!(fact, EMPTY_ITEM_FACT);
    }
}
