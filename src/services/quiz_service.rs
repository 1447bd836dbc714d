//! 测验生成服务 - 业务能力层
//!
//! 给定主题和题目数量，产出一组可以直接展示的四选一题目：
//!
//! ```text
//! 构建 prompt → 调用 LLM → 去掉代码块围栏 → 解析 JSON 数组
//!     → 逐题打乱选项并重新定位正确答案 → （失败时）兜底题目
//! ```
//!
//! 任何失败都不会传给调用方：LLM 不可用、返回内容不是 JSON、
//! 解析后没有可用题目，都会换成固定的兜底题目。

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::QuizError;
use crate::models::question::{NormalizedQuestion, OptionLetter, RawQuestion};
pub use crate::models::question::QuizWarning;
use crate::services::diagnostics_writer::DiagnosticsWriter;
use crate::services::llm_service::TextGenerator;
use crate::utils::logging::truncate_text;

/// 默认题目数量
pub const DEFAULT_QUESTION_COUNT: usize = 5;

const DEFAULT_TOPIC: &str = "Fast Food";

/// 题目来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizSource {
    /// LLM 生成
    Generated,
    /// 兜底题目，附带原因
    Fallback(FallbackReason),
}

/// 使用兜底题目的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    CollaboratorUnavailable,
    MalformedResponse,
    EmptyResult,
}

impl From<&QuizError> for FallbackReason {
    fn from(err: &QuizError) -> Self {
        match err {
            QuizError::CollaboratorUnavailable { .. } => FallbackReason::CollaboratorUnavailable,
            QuizError::MalformedResponse { .. } => FallbackReason::MalformedResponse,
            QuizError::EmptyResult { .. } => FallbackReason::EmptyResult,
        }
    }
}

/// 一次测验生成的完整结果
#[derive(Debug, Clone)]
pub struct QuizBatch {
    pub questions: Vec<NormalizedQuestion>,
    pub source: QuizSource,
    pub warnings: Vec<QuizWarning>,
}

impl QuizBatch {
    fn fallback(reason: FallbackReason, warnings: Vec<QuizWarning>) -> Self {
        Self {
            questions: fallback_questions(),
            source: QuizSource::Fallback(reason),
            warnings,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, QuizSource::Fallback(_))
    }

    /// 给顾客看的非阻塞提示
    pub fn notice(&self) -> Option<&'static str> {
        match self.source {
            QuizSource::Generated if !self.warnings.is_empty() => {
                Some("Some questions were tidied up before showing them to you.")
            }
            QuizSource::Generated => None,
            QuizSource::Fallback(_) => {
                Some("Our quiz master is busy right now, so here are some house trivia questions!")
            }
        }
    }
}

/// 固定的兜底题目（不打乱）
pub fn fallback_questions() -> Vec<NormalizedQuestion> {
    let question = |text: &str, options: [&str; 4], correct: OptionLetter| {
        NormalizedQuestion::new(
            text,
            options.iter().map(|o| o.to_string()).collect(),
            correct,
        )
    };

    vec![
        question(
            "What is the capital of France?",
            ["Paris", "London", "Rome", "Berlin"],
            OptionLetter::A,
        ),
        question(
            "Which animal lays eggs?",
            ["Dog", "Chicken", "Cow", "Cat"],
            OptionLetter::B,
        ),
        question("What is 2 + 2?", ["3", "4", "5", "6"], OptionLetter::B),
    ]
}

/// 主题里没有 "trivia" / "quiz" 时补上 " Trivia Quiz"
pub fn effective_topic(topic: &str) -> String {
    let topic = topic.trim();
    let topic = if topic.is_empty() { DEFAULT_TOPIC } else { topic };
    let lower = topic.to_lowercase();
    if lower.contains("trivia") || lower.contains("quiz") {
        topic.to_string()
    } else {
        format!("{} Trivia Quiz", topic)
    }
}

/// 构建测验 prompt
pub fn build_quiz_prompt(effective_topic: &str, count: usize) -> String {
    format!(
        r#"Generate {count} multiple-choice quiz questions about {effective_topic}.
Each question should have 4 options (A, B, C, D) and specify the correct option.
Return the output as a JSON array of objects. Each object should have the following keys:
"question_text": The question itself.
"option_a": Text for option A.
"option_b": Text for option B.
"option_c": Text for option C.
"option_d": Text for option D.
"correct_option": The letter of the correct option (A, B, C, or D).

Example JSON structure for one question:
{{
  "question_text": "What is the capital of France?",
  "option_a": "Paris",
  "option_b": "London",
  "option_c": "Rome",
  "option_d": "Berlin",
  "correct_option": "A"
}}
"#
    )
}

/// 去掉一层 markdown 代码块围栏
///
/// 开头只去掉一个 ```` ```json ````（标签不区分大小写）或裸 ```` ``` ````，
/// 结尾只去掉一个 ```` ``` ````
pub fn strip_code_fence(raw: &str) -> &str {
    const JSON_FENCE: &str = "```json";
    const FENCE: &str = "```";

    let mut text = raw.trim();

    if text
        .get(..JSON_FENCE.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(JSON_FENCE))
    {
        text = text[JSON_FENCE.len()..].trim();
    } else if let Some(rest) = text.strip_prefix(FENCE) {
        text = rest.trim();
    }

    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest.trim();
    }

    text
}

/// 打乱单道题的选项，并重新计算正确答案的位置
pub fn normalize_question<R: Rng + ?Sized>(
    raw: &RawQuestion,
    index: usize,
    rng: &mut R,
    warnings: &mut Vec<QuizWarning>,
) -> NormalizedQuestion {
    let letter = match OptionLetter::parse(&raw.correct_option) {
        Some(letter) => letter,
        None => {
            warn!(
                "第 {} 题的 correct_option '{}' 无效，默认为 A",
                index + 1,
                raw.correct_option
            );
            warnings.push(QuizWarning::InvalidCorrectOption {
                index,
                value: raw.correct_option.clone(),
            });
            OptionLetter::A
        }
    };

    let correct_text = raw.option(letter).to_string();

    let mut options = raw.options().to_vec();
    options.shuffle(rng);

    let new_letter = options
        .iter()
        .position(|option| *option == correct_text)
        .and_then(OptionLetter::from_index)
        .unwrap_or_else(|| {
            warn!("第 {} 题打乱后找不到正确答案，默认为 A", index + 1);
            warnings.push(QuizWarning::CorrectOptionNotFound { index });
            OptionLetter::A
        });

    NormalizedQuestion::new(raw.question_text.clone(), options, new_letter)
}

/// 解析 LLM 原始响应并逐题规范化
///
/// 返回的题目数量不超过 `count`；一道可用题目都没有时返回 `QuizError::EmptyResult`
pub fn normalize_response<R: Rng + ?Sized>(
    raw: &str,
    count: usize,
    rng: &mut R,
) -> Result<(Vec<NormalizedQuestion>, Vec<QuizWarning>), QuizError> {
    let text = strip_code_fence(raw);

    let entries: Vec<JsonValue> =
        serde_json::from_str(text).map_err(|e| QuizError::MalformedResponse {
            message: e.to_string(),
            raw: raw.to_string(),
        })?;

    debug!("LLM 返回 {} 个条目", entries.len());

    let mut questions = Vec::with_capacity(count.min(entries.len()));
    let mut warnings = Vec::new();

    for (index, entry) in entries.into_iter().enumerate() {
        if questions.len() >= count {
            debug!("已达到 {} 题上限，忽略剩余条目", count);
            break;
        }

        let raw_question: RawQuestion = match serde_json::from_value(entry) {
            Ok(q) => q,
            Err(e) => {
                warn!("第 {} 个条目无法解析，已丢弃: {}", index + 1, e);
                warnings.push(QuizWarning::DroppedEntry {
                    index,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if !raw_question.has_all_text() {
            warn!("第 {} 个条目缺少题干或选项，已丢弃", index + 1);
            warnings.push(QuizWarning::DroppedEntry {
                index,
                reason: "缺少题干或选项文本".to_string(),
            });
            continue;
        }

        questions.push(normalize_question(&raw_question, index, rng, &mut warnings));
    }

    if questions.is_empty() {
        return Err(QuizError::EmptyResult { warnings });
    }

    Ok((questions, warnings))
}

/// 测验生成服务
pub struct QuizService<G> {
    generator: Arc<G>,
    diagnostics: Option<DiagnosticsWriter>,
}

impl<G: TextGenerator> QuizService<G> {
    pub fn new(generator: Arc<G>) -> Self {
        Self {
            generator,
            diagnostics: None,
        }
    }

    /// 无法解析的原始响应额外写入诊断文件
    pub fn with_diagnostics(mut self, writer: DiagnosticsWriter) -> Self {
        self.diagnostics = Some(writer);
        self
    }

    /// 生成测验题目，总是返回非空列表
    pub async fn generate_quiz(&self, topic: &str, count: usize) -> Vec<NormalizedQuestion> {
        self.generate_quiz_report(topic, count).await.questions
    }

    /// 生成测验题目，并附带来源和修复记录
    pub async fn generate_quiz_report(&self, topic: &str, count: usize) -> QuizBatch {
        let topic = effective_topic(topic);
        let count = count.max(1);

        let outcome = match self.request_raw(&topic, count).await {
            Ok(raw) => {
                let mut rng = rand::thread_rng();
                normalize_response(&raw, count, &mut rng)
            }
            Err(e) => Err(e),
        };

        self.finish(&topic, outcome).await
    }

    /// 与 `generate_quiz_report` 相同，但使用调用方提供的随机数源
    pub async fn generate_quiz_with_rng<R: Rng + ?Sized>(
        &self,
        topic: &str,
        count: usize,
        rng: &mut R,
    ) -> QuizBatch {
        let topic = effective_topic(topic);
        let count = count.max(1);

        let outcome = match self.request_raw(&topic, count).await {
            Ok(raw) => normalize_response(&raw, count, rng),
            Err(e) => Err(e),
        };

        self.finish(&topic, outcome).await
    }

    async fn request_raw(&self, topic: &str, count: usize) -> Result<String, QuizError> {
        info!("🧠 正在生成测验: {} ({} 题)", topic, count);

        let prompt = build_quiz_prompt(topic, count);

        match self.generator.generate(&prompt).await {
            Ok(text) if text.trim().is_empty() => Err(QuizError::CollaboratorUnavailable {
                reason: "LLM 返回内容为空".to_string(),
            }),
            Ok(text) => Ok(text),
            Err(e) => Err(QuizError::CollaboratorUnavailable {
                reason: format!("{:#}", e),
            }),
        }
    }

    async fn finish(
        &self,
        topic: &str,
        outcome: Result<(Vec<NormalizedQuestion>, Vec<QuizWarning>), QuizError>,
    ) -> QuizBatch {
        match outcome {
            Ok((questions, warnings)) => {
                info!("✓ 测验生成完成: {} 题, {} 条修复记录", questions.len(), warnings.len());
                QuizBatch {
                    questions,
                    source: QuizSource::Generated,
                    warnings,
                }
            }
            Err(e) => {
                let reason = FallbackReason::from(&e);
                let warnings = match e {
                    QuizError::CollaboratorUnavailable { reason } => {
                        error!("生成测验失败: {}，使用兜底题目", reason);
                        Vec::new()
                    }
                    QuizError::MalformedResponse { message, raw } => {
                        error!(
                            "解析测验响应失败 (JSON 无效): {}，原始响应: {}，使用兜底题目",
                            message,
                            truncate_text(&raw, 200)
                        );
                        self.record_diagnostics(topic, &message, &raw).await;
                        Vec::new()
                    }
                    QuizError::EmptyResult { warnings } => {
                        warn!("LLM 没有返回可用题目，使用兜底题目");
                        warnings
                    }
                };
                QuizBatch::fallback(reason, warnings)
            }
        }
    }

    async fn record_diagnostics(&self, topic: &str, message: &str, raw: &str) {
        if let Some(writer) = &self.diagnostics {
            if let Err(e) = writer.write(topic, message, raw).await {
                warn!("写入诊断文件失败: {:#}", e);
            }
        }
    }
}
