//! 被吃棋子记录
//!
//! 通过比较前后两个局面的棋子清单推导出新被吃的棋子。比较的是
//! 多重集合（按棋子字母计数），不是按格子比较：只移动了位置的棋子
//! 在两边都存在，不会被计入。
//!
//! 兵升变时旧的兵字母消失、新的棋子字母出现，按这个规则兵会被记为
//! "被吃"。这是有意保留的近似。

use std::collections::HashMap;

use protocol::{Colour, Piece, Position};

/// 双方被吃棋子序列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedPieceTracker {
    /// 被吃掉的白方棋子（大写字母）
    captured_white: Vec<Piece>,
    /// 被吃掉的黑方棋子（小写字母）
    captured_black: Vec<Piece>,
}

impl CapturedPieceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从会话恢复
    pub fn restore(captured_white: Vec<Piece>, captured_black: Vec<Piece>) -> Self {
        Self {
            captured_white,
            captured_black,
        }
    }

    /// 比较前后局面，把 `previous` 中有而 `current` 中没有的棋子追加到对应序列
    ///
    /// 返回本次新增的棋子，顺序与 `previous` 的 FEN 顺序一致。
    pub fn update(&mut self, previous: &Position, current: &Position) -> Vec<Piece> {
        let mut remaining: HashMap<Piece, usize> = HashMap::new();
        for piece in current.board.inventory() {
            *remaining.entry(piece).or_insert(0) += 1;
        }

        let mut newly_captured = Vec::new();
        for piece in previous.board.inventory() {
            match remaining.get_mut(&piece) {
                Some(count) if *count > 0 => *count -= 1,
                _ => newly_captured.push(piece),
            }
        }

        for piece in &newly_captured {
            match piece.colour {
                Colour::White => self.captured_white.push(*piece),
                Colour::Black => self.captured_black.push(*piece),
            }
        }

        if !newly_captured.is_empty() {
            tracing::debug!(
                "新被吃棋子: {}",
                newly_captured.iter().map(|p| p.to_fen_char()).collect::<String>()
            );
        }
        newly_captured
    }

    /// 新对局时清空
    pub fn reset(&mut self) {
        self.captured_white.clear();
        self.captured_black.clear();
    }

    /// 被吃掉的白方棋子
    pub fn captured_white(&self) -> &[Piece] {
        &self.captured_white
    }

    /// 被吃掉的黑方棋子
    pub fn captured_black(&self) -> &[Piece] {
        &self.captured_black
    }

    /// 子力差（白方视角）：白方吃掉的黑子价值减去黑方吃掉的白子价值
    pub fn material_balance(&self) -> i32 {
        let white_gain: i32 = self.captured_black.iter().map(|p| p.value()).sum();
        let black_gain: i32 = self.captured_white.iter().map(|p| p.value()).sum();
        white_gain - black_gain
    }
}
