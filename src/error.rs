use thiserror::Error;

use crate::models::question::QuizWarning;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 调用超时
    #[error("LLM API调用超时 (模型: {model}, {secs}秒)")]
    Timeout { model: String, secs: u64 },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 测验流水线错误
///
/// 这些错误都在流水线内部被吸收，调用方最终拿到的是兜底题目
#[derive(Debug, Error)]
pub enum QuizError {
    /// 生成服务不可用（网络 / 鉴权 / 配额 / 超时 / 空响应）
    #[error("生成服务不可用: {reason}")]
    CollaboratorUnavailable { reason: String },
    /// 响应无法解析为预期的 JSON 数组
    #[error("响应不是合法的题目 JSON: {message}")]
    MalformedResponse { message: String, raw: String },
    /// 解析成功但没有可用题目，附带被丢弃条目的记录
    #[error("没有可用的题目 (丢弃 {} 个条目)", .warnings.len())]
    EmptyResult { warnings: Vec<QuizWarning> },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts_to_app_error() {
        let err: AppError = ConfigError::EnvVarNotFound {
            var_name: "GEMINI_API_KEY".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "配置错误: 环境变量 GEMINI_API_KEY 不存在");
    }

    #[test]
    fn test_empty_result_counts_dropped_entries() {
        let err = QuizError::EmptyResult {
            warnings: vec![QuizWarning::DroppedEntry {
                index: 0,
                reason: "缺少题干或选项文本".to_string(),
            }],
        };
        assert_eq!(err.to_string(), "没有可用的题目 (丢弃 1 个条目)");
    }

    #[test]
    fn test_file_read_failed_keeps_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = AppError::file_read_failed("orders.toml", io);
        assert!(matches!(&err, AppError::File(FileError::ReadFailed { path, .. }) if path == "orders.toml"));
    }
}
