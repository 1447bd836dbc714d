//! 诊断写入服务 - 业务能力层
//!
//! 只负责"把无法解析的 LLM 原始响应追加到诊断文件"能力，不关心流程

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 诊断写入服务
///
/// 每条记录包含时间、主题、错误信息和完整原文，便于事后排查
/// LLM 为什么没有按格式返回
pub struct DiagnosticsWriter {
    file_path: PathBuf,
}

impl DiagnosticsWriter {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.file_path
    }

    /// 追加一条诊断记录
    pub async fn write(&self, topic: &str, message: &str, raw: &str) -> Result<()> {
        debug!(
            "写入诊断: 主题 {} | 原文长度: {}",
            topic,
            raw.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .await
            .with_context(|| format!("无法打开诊断文件: {}", self.file_path.display()))?;

        let record = format!(
            "[{}] 主题: {} | 错误: {}\n{}\n{}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            topic,
            message,
            raw,
            "-".repeat(60)
        );

        file.write_all(record.as_bytes())
            .await
            .with_context(|| format!("写入诊断文件失败: {}", self.file_path.display()))?;

        Ok(())
    }
}
