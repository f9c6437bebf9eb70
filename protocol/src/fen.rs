//! FEN 格式解析和生成
//!
//! 国际象棋 FEN 格式：
//! `<棋盘> <走子方> [<易位权> <吃过路兵格> <半回合数> <回合数>]`
//!
//! 引擎只输出前两个字段，例如：
//! `rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b`

use crate::board::{Board, Position};
use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::error::ChessError;
use crate::piece::{Colour, Piece, Square};

/// 初始局面 FEN
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN 格式处理
pub struct Fen;

impl Fen {
    /// 解析 FEN 字符串为局面
    pub fn parse(fen: &str) -> Result<Position, ChessError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(ChessError::InvalidFen {
                reason: format!("Expected at least 2 fields, got {}", parts.len()),
            });
        }

        let board = Self::parse_board(&Self::ranks(fen))?;
        let side_to_move = Self::parse_side(parts[1])?;

        Ok(Position {
            board,
            side_to_move,
            extra_fields: parts[2..].iter().map(|s| s.to_string()).collect(),
        })
    }

    /// 解析走子方字段，必须恰好是 "w" 或 "b"
    fn parse_side(field: &str) -> Result<Colour, ChessError> {
        Colour::from_fen_field(field).ok_or_else(|| ChessError::InvalidFen {
            reason: format!("Invalid active colour: {:?}", field),
        })
    }

    /// 解析棋盘部分
    fn parse_board(rows: &[&str]) -> Result<Board, ChessError> {
        let mut board = Board::empty();

        if rows.len() != BOARD_HEIGHT {
            return Err(ChessError::InvalidFen {
                reason: format!("Expected {} ranks, got {}", BOARD_HEIGHT, rows.len()),
            });
        }

        // FEN 从上到下是第 8 行到第 1 行
        for (row_idx, row) in rows.iter().enumerate() {
            let rank = (BOARD_HEIGHT - 1 - row_idx) as u8;
            let mut file = 0usize;

            for c in row.chars() {
                if file >= BOARD_WIDTH {
                    return Err(ChessError::InvalidFen {
                        reason: format!("Rank {} has too many files", row_idx),
                    });
                }

                if let Some(empty_count) = c.to_digit(10) {
                    file += empty_count as usize;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    board.set(Square::new_unchecked(file as u8, rank), Some(piece));
                    file += 1;
                } else {
                    return Err(ChessError::InvalidFen {
                        reason: format!("Invalid piece character: {}", c),
                    });
                }
            }

            if file != BOARD_WIDTH {
                return Err(ChessError::InvalidFen {
                    reason: format!("Rank {} has {} files, expected {}", row_idx, file, BOARD_WIDTH),
                });
            }
        }

        Ok(board)
    }

    /// 将局面转换为 FEN 字符串
    pub fn to_string(position: &Position) -> String {
        let mut fields = vec![
            Self::board_to_string(&position.board),
            position.side_to_move.to_fen_char().to_string(),
        ];
        fields.extend(position.extra_fields.iter().cloned());
        fields.join(" ")
    }

    /// 将棋盘转换为 FEN 棋盘部分
    pub fn board_to_string(board: &Board) -> String {
        board
            .rank_major()
            .iter()
            .map(|row| {
                let mut out = String::new();
                let mut empty_count = 0;

                for cell in row {
                    if let Some(piece) = cell {
                        if empty_count > 0 {
                            out.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        out.push(piece.to_fen_char());
                    } else {
                        empty_count += 1;
                    }
                }

                if empty_count > 0 {
                    out.push_str(&empty_count.to_string());
                }
                out
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// 读取走子方，不解析棋盘
    pub fn active_colour(fen: &str) -> Result<Colour, ChessError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(ChessError::InvalidFen {
                reason: "Missing active colour".to_string(),
            });
        }
        Self::parse_side(parts[1])
    }

    /// 棋盘部分（第一个字段）
    pub fn board_part(fen: &str) -> &str {
        fen.split_whitespace().next().unwrap_or("")
    }

    /// 棋盘部分按 '/' 切分的各行
    pub fn ranks(fen: &str) -> Vec<&str> {
        Self::board_part(fen).split('/').collect()
    }

    /// 是否为标准初始局面（只比较棋盘和走子方）
    pub fn is_starting_position(fen: &str) -> bool {
        Self::board_part(fen) == Self::board_part(INITIAL_FEN)
            && matches!(Self::active_colour(fen), Ok(Colour::White))
    }

    /// 解析初始局面
    pub fn initial() -> Position {
        Self::parse(INITIAL_FEN).expect("Initial FEN should be valid")
    }
}
