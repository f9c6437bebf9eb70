//! UCI 走法表示
//!
//! 4 或 5 个 ASCII 字符：起点列、起点行、终点列、终点行、可选升变字母 (q/r/b/n)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{UCI_MOVE_LEN, UCI_PROMOTION_MOVE_LEN};
use crate::error::ChessError;
use crate::piece::{PieceKind, Square};

/// 升变目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromotionPiece {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotionPiece {
    /// 所有选项，按对话框显示顺序
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Queen,
        PromotionPiece::Rook,
        PromotionPiece::Bishop,
        PromotionPiece::Knight,
    ];

    /// UCI 升变字母
    pub fn letter(&self) -> char {
        match self {
            PromotionPiece::Queen => 'q',
            PromotionPiece::Rook => 'r',
            PromotionPiece::Bishop => 'b',
            PromotionPiece::Knight => 'n',
        }
    }

    /// 从字母解析（不区分大小写）
    pub fn from_letter(c: char) -> Option<PromotionPiece> {
        match c.to_ascii_lowercase() {
            'q' => Some(PromotionPiece::Queen),
            'r' => Some(PromotionPiece::Rook),
            'b' => Some(PromotionPiece::Bishop),
            'n' => Some(PromotionPiece::Knight),
            _ => None,
        }
    }

    /// 对应的棋子类型
    pub fn kind(&self) -> PieceKind {
        match self {
            PromotionPiece::Queen => PieceKind::Queen,
            PromotionPiece::Rook => PieceKind::Rook,
            PromotionPiece::Bishop => PieceKind::Bishop,
            PromotionPiece::Knight => PieceKind::Knight,
        }
    }
}

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起始格
    pub from: Square,
    /// 目标格
    pub to: Square,
    /// 升变字母（如果有）
    pub promotion: Option<PromotionPiece>,
}

impl Move {
    /// 创建普通走法
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// 附加升变字母
    pub fn with_promotion(self, promotion: PromotionPiece) -> Self {
        Self {
            promotion: Some(promotion),
            ..self
        }
    }

    /// 去掉升变字母
    pub fn without_promotion(self) -> Self {
        Self {
            promotion: None,
            ..self
        }
    }

    /// 是否为 4 字符的普通走法
    pub fn is_plain(&self) -> bool {
        self.promotion.is_none()
    }

    /// UCI 字符串
    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Move {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ChessError::InvalidMove {
            notation: s.to_string(),
            reason: reason.to_string(),
        };

        if !s.is_ascii() {
            return Err(invalid("non-ASCII characters"));
        }
        if s.len() != UCI_MOVE_LEN && s.len() != UCI_PROMOTION_MOVE_LEN {
            return Err(invalid("expected 4 or 5 characters"));
        }

        let from: Square = s[0..2].parse().map_err(|_| invalid("bad origin square"))?;
        let to: Square = s[2..4].parse().map_err(|_| invalid("bad target square"))?;

        let promotion = match s[4..].chars().next() {
            None => None,
            // 引擎只接受小写升变字母
            Some(c) if c.is_ascii_lowercase() => {
                Some(PromotionPiece::from_letter(c).ok_or_else(|| invalid("bad promotion letter"))?)
            }
            Some(_) => return Err(invalid("bad promotion letter")),
        };

        Ok(Move { from, to, promotion })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.letter())?;
        }
        Ok(())
    }
}
