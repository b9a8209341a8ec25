//! 错误定义模块

use thiserror::Error;

/// 患者病历系统统一错误类型
#[derive(Error, Debug)]
pub enum PatientorError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("网络错误: {0}")]
    Network(String),

    #[error("HTTP错误 {status}: {message}")]
    Http { status: u16, message: String },

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("不支持的操作: {0}")]
    Unsupported(String),

    #[error("无效状态转换: 从 {from} 到 {event}")]
    InvalidStateTransition { from: String, event: String },
}

/// 患者病历系统统一结果类型
pub type Result<T> = std::result::Result<T, PatientorError>;
