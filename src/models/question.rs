//! 测验题目模型
//!
//! - `RawQuestion`：LLM 返回的原始题目（选项未打乱）
//! - `NormalizedQuestion`：打乱选项后、可以直接展示的题目

use serde::{Deserialize, Serialize};
use std::fmt;

/// 选项字母 A / B / C / D
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 4] = [
        OptionLetter::A,
        OptionLetter::B,
        OptionLetter::C,
        OptionLetter::D,
    ];

    /// 在选项列表中的下标（A=0 … D=3）
    pub fn index(self) -> usize {
        self as usize
    }

    /// 从下标构造字母
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// 解析字母（忽略大小写和首尾空白）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Some(OptionLetter::A),
            "B" => Some(OptionLetter::B),
            "C" => Some(OptionLetter::C),
            "D" => Some(OptionLetter::D),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        (b'A' + self as u8) as char
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// LLM 返回的原始题目
///
/// 字段名与 prompt 中要求的 JSON key 一致。LLM 偶尔会把选项写成数字
/// （例如 `"option_b": 4`），所以每个字段都接受字符串、数字或 null。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub question_text: String,
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub option_a: String,
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub option_b: String,
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub option_c: String,
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub option_d: String,
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub correct_option: String,
}

// 把字符串 / 整数 / 浮点数 / null 统一读成字符串
fn deserialize_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;

    struct ScalarVisitor;

    impl<'de> Visitor<'de> for ScalarVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(ScalarVisitor)
}

impl RawQuestion {
    /// 五个文本字段是否都非空
    pub fn has_all_text(&self) -> bool {
        [
            &self.question_text,
            &self.option_a,
            &self.option_b,
            &self.option_c,
            &self.option_d,
        ]
        .iter()
        .all(|s| !s.trim().is_empty())
    }

    /// 按 A、B、C、D 原始顺序返回选项
    pub fn options(&self) -> [String; 4] {
        [
            self.option_a.clone(),
            self.option_b.clone(),
            self.option_c.clone(),
            self.option_d.clone(),
        ]
    }

    pub fn option(&self, letter: OptionLetter) -> &str {
        match letter {
            OptionLetter::A => &self.option_a,
            OptionLetter::B => &self.option_b,
            OptionLetter::C => &self.option_c,
            OptionLetter::D => &self.option_d,
        }
    }
}

/// 打乱选项后的题目，供界面直接渲染
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedQuestion {
    pub question_text: String,
    pub shuffled_options: Vec<String>,
    /// 正确答案在 `shuffled_options` 中的位置
    pub correct_option: OptionLetter,
}

impl NormalizedQuestion {
    pub fn new(
        question_text: impl Into<String>,
        shuffled_options: Vec<String>,
        correct_option: OptionLetter,
    ) -> Self {
        Self {
            question_text: question_text.into(),
            shuffled_options,
            correct_option,
        }
    }

    /// 正确答案的文本
    pub fn correct_text(&self) -> &str {
        self.shuffled_options
            .get(self.correct_option.index())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_option.index()
    }
}

/// 单道题目的修复 / 丢弃记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizWarning {
    /// `correct_option` 不是 A-D，按 A 处理
    InvalidCorrectOption { index: usize, value: String },
    /// 打乱后找不到正确答案文本，按 A 处理
    CorrectOptionNotFound { index: usize },
    /// 条目不是对象或缺少文本，已丢弃
    DroppedEntry { index: usize, reason: String },
}

impl fmt::Display for QuizWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizWarning::InvalidCorrectOption { index, value } => {
                write!(f, "第 {} 题的 correct_option '{}' 无效，默认为 A", index + 1, value)
            }
            QuizWarning::CorrectOptionNotFound { index } => {
                write!(f, "第 {} 题打乱后找不到正确答案，默认为 A", index + 1)
            }
            QuizWarning::DroppedEntry { index, reason } => {
                write!(f, "第 {} 题已丢弃: {}", index + 1, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_letter_parse_is_case_insensitive() {
        assert_eq!(OptionLetter::parse("b"), Some(OptionLetter::B));
        assert_eq!(OptionLetter::parse(" D "), Some(OptionLetter::D));
        assert_eq!(OptionLetter::parse("Z"), None);
        assert_eq!(OptionLetter::parse(""), None);
        assert_eq!(OptionLetter::parse("AB"), None);
    }

    #[test]
    fn test_option_letter_index_roundtrip() {
        for (i, letter) in OptionLetter::ALL.iter().enumerate() {
            assert_eq!(letter.index(), i);
            assert_eq!(OptionLetter::from_index(i), Some(*letter));
        }
        assert_eq!(OptionLetter::from_index(4), None);
        assert_eq!(OptionLetter::C.to_string(), "C");
    }

    #[test]
    fn test_raw_question_missing_fields_default_to_empty() {
        let raw: RawQuestion =
            serde_json::from_str(r#"{"question_text": "Q?", "option_a": "x"}"#).unwrap();
        assert_eq!(raw.option_b, "");
        assert!(!raw.has_all_text());
    }

    #[test]
    fn test_raw_question_accepts_numeric_options() {
        let raw: RawQuestion = serde_json::from_str(
            r#"{"question_text": "What is 2 + 2?", "option_a": 3, "option_b": 4,
                "option_c": 5.5, "option_d": null, "correct_option": "b"}"#,
        )
        .unwrap();
        assert_eq!(raw.option_a, "3");
        assert_eq!(raw.option_b, "4");
        assert_eq!(raw.option_c, "5.5");
        assert_eq!(raw.option_d, "");
        assert_eq!(raw.option(OptionLetter::B), "4");
    }

    #[test]
    fn test_raw_question_rejects_nested_values() {
        let result = serde_json::from_str::<RawQuestion>(
            r#"{"question_text": ["nested"], "option_a": "x"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_correct_text_follows_letter() {
        let q = NormalizedQuestion::new(
            "What is 2 + 2?",
            vec!["3".into(), "4".into(), "5".into(), "6".into()],
            OptionLetter::B,
        );
        assert_eq!(q.correct_text(), "4");
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }
}
