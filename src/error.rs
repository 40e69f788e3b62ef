//! 定义了整个 `podcast-radar` 库的错误类型 `RadarError`。

use std::io;
use thiserror::Error;

/// `podcast-radar` 库的通用错误枚举。
#[derive(Error, Debug)]
pub enum RadarError {
    /// 网络请求失败或超时 (源自 `reqwest::Error`)
    #[error("上游网络请求失败: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// 数据库错误 (源自 `sqlx::Error`)
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O 错误 (源自 `io::Error`)
    #[error("I/O 错误: {0}")]
    Io(#[from] io::Error),

    /// 请求参数缺失或格式错误
    #[error("{0}")]
    Validation(String),

    /// 可以解析但实际不存在的实体，例如未知的节目标题或频道
    #[error("{0}")]
    NotFound(String),

    /// 上游服务返回了非 2xx 状态码或格式异常的数据
    #[error("{0}")]
    Upstream(String),

    /// 凭据交换失败
    #[error("凭据交换失败: {0}")]
    UpstreamAuth(String),

    /// 配置缺失或无法解析
    #[error("配置错误: {0}")]
    Config(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

/// `RadarError` 的 `Result` 类型别名，方便在函数签名中使用。
pub type Result<T> = std::result::Result<T, RadarError>;

impl RadarError {
    /// 该错误是否来自上游依赖（包括网络失败、超时与凭据交换失败）。
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Reqwest(_) | Self::Upstream(_) | Self::UpstreamAuth(_)
        )
    }

    /// 创建 Validation 错误
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// 创建 NotFound 错误
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// 创建 Upstream 错误
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }
}
