//! 棋盘结构状态
//!
//! 负责屏幕坐标与格子的换算、棋子布局和高亮标记。具体绘制由外部视图层完成。

mod overlay;
mod view;

pub use overlay::{Ghost, Highlight, HighlightType, Overlay, RejectionCue};
pub use view::BoardView;

use protocol::{Square, BOARD_HEIGHT, BOARD_WIDTH};

/// 屏幕坐标（像素，y 向下）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 到另一点的距离
    pub fn distance(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// 棋盘布局配置
#[derive(Clone, Debug, PartialEq)]
pub struct BoardLayout {
    /// 棋盘左上角位置 (屏幕坐标)
    pub origin: Point,
    /// 格子边长
    pub square_size: f32,
    /// 黑方在下
    pub flipped: bool,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            origin: Point::new(0.0, 0.0),
            square_size: 64.0,
            flipped: false,
        }
    }
}

impl BoardLayout {
    /// 棋盘边长
    pub fn board_size(&self) -> f32 {
        self.square_size * BOARD_WIDTH as f32
    }

    /// 格子左上角的屏幕坐标
    pub fn square_origin(&self, square: Square) -> Point {
        let (column, row) = if self.flipped {
            (BOARD_WIDTH - 1 - square.file as usize, square.rank as usize)
        } else {
            (square.file as usize, BOARD_HEIGHT - 1 - square.rank as usize)
        };
        Point::new(
            self.origin.x + column as f32 * self.square_size,
            self.origin.y + row as f32 * self.square_size,
        )
    }

    /// 格子中心的屏幕坐标
    pub fn square_center(&self, square: Square) -> Point {
        let corner = self.square_origin(square);
        Point::new(
            corner.x + self.square_size / 2.0,
            corner.y + self.square_size / 2.0,
        )
    }

    /// 将屏幕坐标转换为格子，棋盘外返回 `None`
    pub fn square_at(&self, point: Point) -> Option<Square> {
        let column = ((point.x - self.origin.x) / self.square_size).floor();
        let row = ((point.y - self.origin.y) / self.square_size).floor();

        // NaN 转成 usize 会变成 0
        if !column.is_finite() || !row.is_finite() || column < 0.0 || row < 0.0 {
            return None;
        }
        let (column, row) = (column as usize, row as usize);
        if column >= BOARD_WIDTH || row >= BOARD_HEIGHT {
            return None;
        }

        let (file, rank) = if self.flipped {
            (BOARD_WIDTH - 1 - column, row)
        } else {
            (column, BOARD_HEIGHT - 1 - row)
        };
        Square::new(file as u8, rank as u8)
    }
}
