//! 棋盘高亮层
//!
//! 选中格、落点标记、拖动中的棋子和拒绝提示。

use protocol::{Piece, Square};

use super::Point;

/// 高亮类型
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightType {
    /// 空格落点（圆点）
    Dot,
    /// 吃子落点（四角框）
    CaptureBracket,
}

/// 单个落点标记
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Highlight {
    pub square: Square,
    pub kind: HighlightType,
}

/// 跟随指针的棋子
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ghost {
    pub piece: Piece,
    pub position: Point,
}

/// 拒绝提示（闪烁）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RejectionCue {
    pub square: Square,
    /// 递增的闪烁序号，视图层据此重新播放动画
    pub flash: u64,
}

/// 高亮层状态
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overlay {
    highlights: Vec<Highlight>,
    selected: Option<Square>,
    ghost: Option<Ghost>,
    rejection: Option<RejectionCue>,
    flash_count: u64,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// 标记选中格及其落点
    pub fn show_destinations(&mut self, from: Square, highlights: Vec<Highlight>) {
        self.selected = Some(from);
        self.highlights = highlights;
    }

    /// 清除选中和落点标记（重复调用无副作用）
    pub fn clear_highlights(&mut self) {
        self.selected = None;
        self.highlights.clear();
    }

    /// 当前确认选中的格子
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// 格子上的落点标记
    pub fn marker_at(&self, square: Square) -> Option<HighlightType> {
        self.highlights
            .iter()
            .find(|h| h.square == square)
            .map(|h| h.kind)
    }

    pub fn set_ghost(&mut self, piece: Piece, position: Point) {
        self.ghost = Some(Ghost { piece, position });
    }

    /// 拖动时更新位置
    pub fn move_ghost(&mut self, position: Point) {
        if let Some(ghost) = self.ghost.as_mut() {
            ghost.position = position;
        }
    }

    pub fn drop_ghost(&mut self) {
        self.ghost = None;
    }

    pub fn ghost(&self) -> Option<&Ghost> {
        self.ghost.as_ref()
    }

    /// 在格子上闪烁拒绝提示
    pub fn flash_rejection(&mut self, square: Square) {
        self.flash_count += 1;
        self.rejection = Some(RejectionCue {
            square,
            flash: self.flash_count,
        });
    }

    /// 最近一次拒绝提示
    pub fn rejection(&self) -> Option<RejectionCue> {
        self.rejection
    }

    /// 拒绝提示总次数
    pub fn flash_count(&self) -> u64 {
        self.flash_count
    }
}
