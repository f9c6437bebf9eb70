//! 国际象棋客户端共享协议库
//!
//! 包含:
//! - 棋子、格子、棋盘等核心数据结构
//! - 局面字符串 (FEN) 编解码
//! - UCI 走法表示
//! - 引擎状态码

mod board;
mod constants;
mod error;
mod fen;
mod moves;
mod piece;
mod status;

pub use board::{Board, Position};
pub use constants::*;
pub use error::{ChessError, Result};
pub use fen::{Fen, INITIAL_FEN};
pub use moves::{Move, PromotionPiece};
pub use piece::{Colour, Piece, PieceKind, Square};
pub use status::GameStatus;
