//! 引擎局面状态码

use std::fmt;

use serde::{Deserialize, Serialize};

/// 局面状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// 进行中
    Ongoing,
    /// 将军
    Check,
    /// 将死
    Checkmate,
    /// 逼和
    Stalemate,
    /// 引擎返回了未定义的状态码
    Unknown(i32),
}

impl GameStatus {
    /// 从引擎状态码解析 (0-3)
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => GameStatus::Ongoing,
            1 => GameStatus::Check,
            2 => GameStatus::Checkmate,
            3 => GameStatus::Stalemate,
            other => GameStatus::Unknown(other),
        }
    }

    /// 显示文本
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::Ongoing => "Ongoing",
            GameStatus::Check => "Check",
            GameStatus::Checkmate => "Checkmate",
            GameStatus::Stalemate => "Stalemate",
            GameStatus::Unknown(_) => "Unknown",
        }
    }

    /// 对局是否已结束
    pub fn is_game_over(&self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GameStatus::from_code(0), GameStatus::Ongoing);
        assert_eq!(GameStatus::from_code(1), GameStatus::Check);
        assert_eq!(GameStatus::from_code(2), GameStatus::Checkmate);
        assert_eq!(GameStatus::from_code(3), GameStatus::Stalemate);
    }

    #[test]
    fn test_unknown_status_code() {
        assert_eq!(GameStatus::from_code(4), GameStatus::Unknown(4));
        assert_eq!(GameStatus::from_code(-1).label(), "Unknown");
        assert_eq!(GameStatus::from_code(99).to_string(), "Unknown");
    }

    #[test]
    fn test_game_over() {
        assert!(GameStatus::Checkmate.is_game_over());
        assert!(GameStatus::Stalemate.is_game_over());
        assert!(!GameStatus::Check.is_game_over());
        assert!(!GameStatus::Unknown(7).is_game_over());
    }
}
