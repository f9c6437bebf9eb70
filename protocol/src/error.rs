//! 错误类型定义

use thiserror::Error;

/// 棋局数据格式错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChessError {
    /// 无效的格子
    #[error("Invalid square: {0:?}")]
    InvalidSquare(String),

    /// 无效的 UCI 走法
    #[error("Invalid move notation: {notation:?} ({reason})")]
    InvalidMove { notation: String, reason: String },

    /// 无效的 FEN 字符串
    #[error("Invalid FEN string: {reason}")]
    InvalidFen { reason: String },
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ChessError>;
