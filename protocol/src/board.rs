//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::piece::{Colour, Piece, Square};

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// 8x8 棋盘，索引为 rank * 8 + file，使用 Vec 以支持 serde
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; BOARD_WIDTH * BOARD_HEIGHT],
        }
    }

    /// 获取指定格子的棋子
    pub fn get(&self, square: Square) -> Option<Piece> {
        if square.is_valid() {
            self.squares[square.to_index()]
        } else {
            None
        }
    }

    /// 设置指定格子的棋子
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        if square.is_valid() {
            self.squares[square.to_index()] = piece;
        }
    }

    /// 按 FEN 顺序（第 8 行到第 1 行，每行 a 到 h）返回所有格子
    pub fn rank_major(&self) -> Vec<Vec<Option<Piece>>> {
        (0..BOARD_HEIGHT)
            .rev()
            .map(|rank| {
                (0..BOARD_WIDTH)
                    .map(|file| self.get(Square::new_unchecked(file as u8, rank as u8)))
                    .collect()
            })
            .collect()
    }

    /// 所有棋子，按 FEN 顺序
    pub fn occupied(&self) -> Vec<(Square, Piece)> {
        let mut result = Vec::new();
        for rank in (0..BOARD_HEIGHT).rev() {
            for file in 0..BOARD_WIDTH {
                let square = Square::new_unchecked(file as u8, rank as u8);
                if let Some(piece) = self.get(square) {
                    result.push((square, piece));
                }
            }
        }
        result
    }

    /// 棋子清单（按 FEN 顺序，可重复）
    pub fn inventory(&self) -> Vec<Piece> {
        self.occupied().into_iter().map(|(_, piece)| piece).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

/// 完整局面（棋盘、走子方以及其余 FEN 字段）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// 棋盘
    pub board: Board,
    /// 当前走子方
    pub side_to_move: Colour,
    /// 走子方之后的字段（易位权、吃过路兵格、步数），原样保留
    pub extra_fields: Vec<String>,
}

impl Position {
    /// 从棋盘创建局面
    pub fn from_board(board: Board, side_to_move: Colour) -> Self {
        Self {
            board,
            side_to_move,
            extra_fields: Vec::new(),
        }
    }

    /// 获取指定格子的棋子
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.get(square)
    }
}
