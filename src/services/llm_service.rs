//! LLM 服务 - 业务能力层
//!
//! 只负责"把一段 prompt 变成一段文本"的能力，不关心测验或趣闻的格式
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Gemini 的 OpenAI 兼容端点）

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, LlmError};

/// 文本生成能力
///
/// 输入一段 prompt，返回自由文本或失败。测验和趣闻服务只依赖这个 trait，
/// 任何满足该约定的实现都可以替换（测试里用脚本化的假实现）。
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// LLM 服务
///
/// 职责：
/// - 调用兼容 OpenAI 的 Chat Completion API
/// - 给每次调用加上超时
/// - 不解析返回内容
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    timeout: Duration,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            timeout: Duration::from_secs(config.llm_timeout_secs),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已去掉首尾空白）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.7)
            .max_tokens(2048u32)
            .build()?;

        let response = match tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("LLM API 调用失败: {}", e);
                return Err(AppError::llm_api_failed(&self.model_name, e).into());
            }
            Err(_) => {
                warn!("LLM API 调用超时 ({} 秒)", self.timeout.as_secs());
                return Err(AppError::from(LlmError::Timeout {
                    model: self.model_name.clone(),
                    secs: self.timeout.as_secs(),
                })
                .into());
            }
        };

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                AppError::from(LlmError::EmptyContent {
                    model: self.model_name.clone(),
                })
            })?;

        Ok(content.trim().to_string())
    }
}

impl TextGenerator for LlmService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.send_to_llm(prompt, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quiz_service::{fallback_questions, FallbackReason, QuizService, QuizSource};
    use std::sync::Arc;

    fn create_test_service() -> LlmService {
        let config = Config {
            llm_api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            llm_timeout_secs: 30,
            ..Default::default()
        };
        LlmService::new(&config)
    }

    #[test]
    fn test_service_uses_configured_model() {
        let config = Config {
            llm_model_name: "test-model".to_string(),
            ..Default::default()
        };
        let service = LlmService::new(&config);
        assert_eq!(service.model_name(), "test-model");
        assert_eq!(service.timeout, Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let config = Config {
            llm_api_key: "test-key".to_string(),
            llm_api_base_url: "http://127.0.0.1:9/v1".to_string(),
            llm_timeout_secs: 5,
            ..Default::default()
        };
        let service = LlmService::new(&config);
        assert!(service.generate("hello").await.is_err());
    }

    #[tokio::test]
    async fn test_silent_endpoint_times_out() {
        // 只接受连接、从不回复的服务端
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = Config {
            llm_api_key: "test-key".to_string(),
            llm_api_base_url: format!("http://{}/v1", addr),
            llm_timeout_secs: 1,
            ..Default::default()
        };
        let service = Arc::new(LlmService::new(&config));

        let err = service.generate("hello").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::Llm(LlmError::Timeout { secs: 1, .. }))
        ));

        let batch = QuizService::new(service).generate_quiz_report("Fries", 3).await;
        assert_eq!(
            batch.source,
            QuizSource::Fallback(FallbackReason::CollaboratorUnavailable)
        );
        assert_eq!(batch.questions, fallback_questions());

        server.abort();
    }

    /// 测试真实 LLM 调用
    ///
    /// 运行方式：
    /// ```bash
    /// GEMINI_API_KEY=... cargo test test_send_to_llm_simple -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_send_to_llm_simple() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = create_test_service();
        let response = service
            .send_to_llm("Say hello in one word.", Some("Answer briefly."))
            .await
            .expect("LLM 调用失败");

        println!("LLM 响应: {}", response);
        assert!(!response.is_empty());
    }
}
