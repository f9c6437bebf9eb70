//! 棋子与格子定义

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::error::ChessError;

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// 兵
    Pawn,
    /// 马
    Knight,
    /// 象
    Bishop,
    /// 车
    Rook,
    /// 后
    Queen,
    /// 王
    King,
}

impl PieceKind {
    /// 子力价值（兵 = 1），王不计
    pub fn value(&self) -> i32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 3,
            PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }

    /// 获取 FEN 字符（白方大写，黑方小写）
    pub fn to_fen_char(&self, colour: Colour) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match colour {
            Colour::White => c.to_ascii_uppercase(),
            Colour::Black => c,
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<(PieceKind, Colour)> {
        let colour = if c.is_ascii_uppercase() {
            Colour::White
        } else {
            Colour::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, colour))
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Colour {
    /// 白方（先手）
    White,
    /// 黑方
    Black,
}

impl Colour {
    /// 获取对方阵营
    pub fn opponent(&self) -> Colour {
        match self {
            Colour::White => Colour::Black,
            Colour::Black => Colour::White,
        }
    }

    /// 获取 FEN 走子方字段
    pub fn to_fen_char(&self) -> char {
        match self {
            Colour::White => 'w',
            Colour::Black => 'b',
        }
    }

    /// 从 FEN 走子方字段解析，只接受 "w" 或 "b"
    pub fn from_fen_field(field: &str) -> Option<Colour> {
        match field {
            "w" => Some(Colour::White),
            "b" => Some(Colour::Black),
            _ => None,
        }
    }

    /// 该方兵的升变行 (0-7)
    pub fn promotion_rank(&self) -> u8 {
        match self {
            Colour::White => 7,
            Colour::Black => 0,
        }
    }

    /// 显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Colour::White => "White",
            Colour::Black => "Black",
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub colour: Colour,
}

impl Piece {
    /// 创建新棋子
    pub fn new(kind: PieceKind, colour: Colour) -> Self {
        Self { kind, colour }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        self.kind.to_fen_char(self.colour)
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Piece> {
        PieceKind::from_fen_char(c).map(|(kind, colour)| Piece { kind, colour })
    }

    /// 棋子的 Unicode 符号
    pub fn glyph(&self) -> char {
        match (self.kind, self.colour) {
            (PieceKind::King, Colour::White) => '♔',
            (PieceKind::Queen, Colour::White) => '♕',
            (PieceKind::Rook, Colour::White) => '♖',
            (PieceKind::Bishop, Colour::White) => '♗',
            (PieceKind::Knight, Colour::White) => '♘',
            (PieceKind::Pawn, Colour::White) => '♙',
            (PieceKind::King, Colour::Black) => '♚',
            (PieceKind::Queen, Colour::Black) => '♛',
            (PieceKind::Rook, Colour::Black) => '♜',
            (PieceKind::Bishop, Colour::Black) => '♝',
            (PieceKind::Knight, Colour::Black) => '♞',
            (PieceKind::Pawn, Colour::Black) => '♟',
        }
    }

    /// 获取棋子分值
    pub fn value(&self) -> i32 {
        self.kind.value()
    }

    /// 是否是兵
    pub fn is_pawn(&self) -> bool {
        self.kind == PieceKind::Pawn
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_char())
    }
}

/// 棋盘格子
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Square {
    /// 列 (0-7，对应 a-h)
    pub file: u8,
    /// 行 (0-7，对应 1-8)
    pub rank: u8,
}

impl Square {
    /// 创建新格子
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if (file as usize) < BOARD_WIDTH && (rank as usize) < BOARD_HEIGHT {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// 创建新格子（不检查边界，内部使用）
    pub const fn new_unchecked(file: u8, rank: u8) -> Self {
        Self { file, rank }
    }

    /// 检查格子是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.file as usize) < BOARD_WIDTH && (self.rank as usize) < BOARD_HEIGHT
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> usize {
        self.rank as usize * BOARD_WIDTH + self.file as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_WIDTH * BOARD_HEIGHT {
            Some(Square {
                file: (index % BOARD_WIDTH) as u8,
                rank: (index / BOARD_WIDTH) as u8,
            })
        } else {
            None
        }
    }

    /// 代数记号，例如 "e4"
    pub fn to_algebraic(&self) -> String {
        format!("{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Square::new(file, rank).ok_or_else(|| ChessError::InvalidSquare(s.to_string()))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_fen_char() {
        let white_king = Piece::new(PieceKind::King, Colour::White);
        assert_eq!(white_king.to_fen_char(), 'K');

        let black_knight = Piece::new(PieceKind::Knight, Colour::Black);
        assert_eq!(black_knight.to_fen_char(), 'n');

        assert_eq!(
            Piece::from_fen_char('R'),
            Some(Piece::new(PieceKind::Rook, Colour::White))
        );
        assert_eq!(
            Piece::from_fen_char('q'),
            Some(Piece::new(PieceKind::Queen, Colour::Black))
        );
        assert_eq!(Piece::from_fen_char('x'), None);
    }

    #[test]
    fn test_piece_glyph() {
        assert_eq!(Piece::new(PieceKind::Queen, Colour::White).glyph(), '♕');
        assert_eq!(Piece::new(PieceKind::Pawn, Colour::Black).glyph(), '♟');
    }

    #[test]
    fn test_square_algebraic() {
        let e4: Square = "e4".parse().unwrap();
        assert_eq!(e4, Square::new_unchecked(4, 3));
        assert_eq!(e4.to_string(), "e4");

        let h8: Square = "h8".parse().unwrap();
        assert_eq!(h8.to_index(), 63);
        assert_eq!(Square::from_index(63), Some(h8));
    }

    #[test]
    fn test_square_invalid() {
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a0".parse::<Square>().is_err());
        assert!("e".parse::<Square>().is_err());
        assert!("e44".parse::<Square>().is_err());
        assert!(Square::new(8, 0).is_none());
        assert!(Square::new(0, 8).is_none());
    }

    #[test]
    fn test_colour() {
        assert_eq!(Colour::White.opponent(), Colour::Black);
        assert_eq!(Colour::from_fen_field("w"), Some(Colour::White));
        assert_eq!(Colour::from_fen_field("b"), Some(Colour::Black));
        assert_eq!(Colour::from_fen_field("W"), None);
        assert_eq!(Colour::from_fen_field("white"), None);
        assert_eq!(Colour::White.promotion_rank(), 7);
        assert_eq!(Colour::Black.promotion_rank(), 0);
    }
}
