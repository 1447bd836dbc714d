use crate::error::{AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 单次 LLM 调用的超时时间（秒），超时按调用失败处理
    pub llm_timeout_secs: u64,
    // --- 数据文件 ---
    /// 订单数据 TOML 文件
    pub orders_file: String,
    /// 无法解析的 LLM 原始响应写入的诊断文件
    pub diagnostics_file: String,
    // --- 测验 / 趣闻 ---
    /// 每次测验请求的题目数量
    pub quiz_question_count: usize,
    /// 测验缓存有效期（秒）
    pub quiz_cache_ttl_secs: u64,
    /// 趣闻缓存有效期（秒）
    pub fact_cache_ttl_secs: u64,
    /// 测验 / 趣闻缓存各自最多保留的条目数
    pub cache_capacity: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-1.5-flash-latest".to_string(),
            llm_timeout_secs: 20,
            orders_file: "orders.toml".to_string(),
            diagnostics_file: "quiz_diagnostics.txt".to_string(),
            quiz_question_count: 5,
            quiz_cache_ttl_secs: 300,
            fact_cache_ttl_secs: 3600,
            cache_capacity: 64,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置的字段使用默认值
    ///
    /// 会先尝试读取当前目录下的 `.env` 文件
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        let default = Self::default();
        Self {
            llm_api_key: std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("LLM_API_KEY"))
                .unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_timeout_secs),
            orders_file: std::env::var("ORDERS_FILE").unwrap_or(default.orders_file),
            diagnostics_file: std::env::var("DIAGNOSTICS_FILE").unwrap_or(default.diagnostics_file),
            quiz_question_count: std::env::var("QUIZ_QUESTION_COUNT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.quiz_question_count),
            quiz_cache_ttl_secs: std::env::var("QUIZ_CACHE_TTL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.quiz_cache_ttl_secs),
            fact_cache_ttl_secs: std::env::var("FACT_CACHE_TTL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.fact_cache_ttl_secs),
            cache_capacity: std::env::var("CACHE_CAPACITY").ok().and_then(|v| v.parse().ok()).unwrap_or(default.cache_capacity),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 检查启动所必需的配置项
    pub fn validate(&self) -> AppResult<()> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::EnvVarNotFound {
                var_name: "GEMINI_API_KEY".to_string(),
            }
            .into());
        }
        if self.quiz_question_count == 0 {
            return Err(ConfigError::EnvVarParseFailed {
                var_name: "QUIZ_QUESTION_COUNT".to_string(),
                value: "0".to_string(),
                expected_type: "正整数".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_default_config_is_rejected_without_api_key() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(AppError::Config(ConfigError::EnvVarNotFound { .. }))
        ));
    }

    #[test]
    fn test_config_with_api_key_is_valid() {
        let config = Config {
            llm_api_key: "test-key".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.quiz_question_count, 5);
        assert_eq!(config.quiz_cache_ttl_secs, 300);
        assert_eq!(config.cache_capacity, 64);
    }

    #[test]
    fn test_zero_question_count_is_rejected() {
        let config = Config {
            llm_api_key: "test-key".to_string(),
            quiz_question_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AppError::Config(ConfigError::EnvVarParseFailed { .. }))
        ));
    }
}
