//! 客户端错误类型定义

use protocol::ChessError;
use thiserror::Error;

/// 客户端错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// 局面字符串或走法格式错误
    #[error("Format error: {0}")]
    Format(#[from] ChessError),

    /// 引擎拒绝了调用（非法走法、未知策略等）
    #[error("Engine rejected {call}: {detail}")]
    EngineRejected { call: &'static str, detail: String },

    /// 引擎写满了缓冲区，结果可能被截断
    #[error("Engine answer for {call} truncated: used {used} of {capacity} bytes")]
    Truncated {
        call: &'static str,
        used: usize,
        capacity: usize,
    },

    /// 会话数据无法读取
    #[error("Stored session is corrupt: {reason}")]
    StorageCorrupt { reason: String },

    /// 引擎模块加载或初始化失败
    #[error("Engine bridge unavailable: {reason}")]
    BridgeUnavailable { reason: String },
}

impl ClientError {
    /// 创建引擎拒绝错误
    pub fn rejected(call: &'static str, detail: impl Into<String>) -> Self {
        ClientError::EngineRejected {
            call,
            detail: detail.into(),
        }
    }
}

/// 客户端操作结果类型
pub type Result<T> = std::result::Result<T, ClientError>;
