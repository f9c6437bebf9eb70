//! 输入处理
//!
//! 把指针手势翻译成选中、拖动和走子。控制器只维护交互状态和高亮层，
//! 棋子信息、合法落点和走子都通过 [`BoardActions`] 交给调用方。

use protocol::{Colour, Move, Piece, Square};

use super::promotion::{requires_promotion, PendingPromotion, PromotionInput, PromotionResolution};
use crate::board::{BoardLayout, Highlight, HighlightType, Overlay, Point};

/// 控制器需要的棋盘操作
pub trait BoardActions {
    /// 最近一次渲染的局面中该格的棋子
    fn piece_at(&self, square: Square) -> Option<Piece>;

    /// 最近一次渲染的局面中的走子方
    fn side_to_move(&self) -> Colour;

    /// 从该格出发的候选走法（仅用于高亮）
    fn legal_destinations(&mut self, from: Square) -> Vec<Move>;

    /// 提交走法，返回是否被接受
    fn submit_move(&mut self, mv: &Move) -> bool;
}

/// 交互状态
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionState {
    Idle,
    /// 按下了己方棋子，尚未移动超过阈值
    ArmedForDrag {
        from: Square,
        piece: Piece,
        origin: Point,
    },
    Dragging {
        from: Square,
        piece: Piece,
    },
    /// 已点击选中，落点已标记
    SelectedAwaitingTarget {
        from: Square,
    },
    /// 等待选择升变棋子
    Promoting(PendingPromotion),
}

/// 一次输入的结果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// 没有可见变化
    Nothing,
    /// 按下己方棋子
    Armed,
    DragStarted,
    /// 选中并标记了落点
    Selected(Square),
    /// 取消了选中
    Deselected,
    /// 拿起了不属于走子方的棋子
    WrongSide(Square),
    MoveApplied(Move),
    MoveRejected(Move),
    /// 打开了升变弹窗
    PromotionRequested(Move),
    PromotionCancelled,
}

/// 棋盘交互控制器
#[derive(Clone, Debug)]
pub struct BoardInteractionController {
    layout: BoardLayout,
    drag_threshold: f32,
    state: InteractionState,
    overlay: Overlay,
}

impl Default for BoardInteractionController {
    fn default() -> Self {
        Self::new(BoardLayout::default(), 4.0)
    }
}

impl BoardInteractionController {
    pub fn new(layout: BoardLayout, drag_threshold: f32) -> Self {
        Self {
            layout,
            drag_threshold,
            state: InteractionState::Idle,
            overlay: Overlay::new(),
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    /// 修改布局（窗口尺寸变化、翻转棋盘）
    pub fn set_layout(&mut self, layout: BoardLayout) {
        self.layout = layout;
    }

    /// 是否正在等待升变选择
    pub fn is_promoting(&self) -> bool {
        matches!(self.state, InteractionState::Promoting(_))
    }

    /// 放弃进行中的交互，回到初始状态
    pub fn reset(&mut self) {
        self.clear_to_idle();
    }

    /// 指针按下
    pub fn pointer_down(
        &mut self,
        point: Point,
        actions: &mut impl BoardActions,
    ) -> InteractionOutcome {
        // 弹窗打开时按下视为点击弹窗外
        if self.is_promoting() {
            return self.promotion_input(PromotionInput::PointerOutside, actions);
        }

        let Some(square) = self.layout.square_at(point) else {
            return self.clear_to_idle();
        };

        // 点击已标记的落点直接走子
        if let InteractionState::SelectedAwaitingTarget { from } = self.state {
            if self.overlay.marker_at(square).is_some() {
                if let Some(piece) = actions.piece_at(from) {
                    return self.attempt_move(from, square, piece, actions);
                }
            }
        }

        let Some(piece) = actions.piece_at(square) else {
            return self.clear_to_idle();
        };

        if piece.colour != actions.side_to_move() {
            tracing::debug!("{} 不是走子方的棋子", square);
            self.overlay.flash_rejection(square);
            self.clear_to_idle();
            return InteractionOutcome::WrongSide(square);
        }

        // 丢失抬起事件时上一次拖动的棋子影像还在
        self.overlay.drop_ghost();
        self.state = InteractionState::ArmedForDrag {
            from: square,
            piece,
            origin: point,
        };
        InteractionOutcome::Armed
    }

    /// 指针移动
    pub fn pointer_move(&mut self, point: Point) -> InteractionOutcome {
        match self.state {
            InteractionState::ArmedForDrag {
                from,
                piece,
                origin,
            } => {
                if origin.distance(point) <= self.drag_threshold {
                    return InteractionOutcome::Nothing;
                }
                self.overlay.clear_highlights();
                self.overlay.set_ghost(piece, point);
                self.state = InteractionState::Dragging { from, piece };
                InteractionOutcome::DragStarted
            }
            InteractionState::Dragging { .. } => {
                self.overlay.move_ghost(point);
                InteractionOutcome::Nothing
            }
            _ => InteractionOutcome::Nothing,
        }
    }

    /// 指针抬起
    pub fn pointer_up(
        &mut self,
        point: Point,
        actions: &mut impl BoardActions,
    ) -> InteractionOutcome {
        let target = self.layout.square_at(point);

        match self.state {
            InteractionState::ArmedForDrag { from, piece, .. } => match target {
                Some(square) if square == from => self.toggle_selection(from, actions),
                Some(square) => self.attempt_move(from, square, piece, actions),
                None => self.clear_to_idle(),
            },
            InteractionState::Dragging { from, piece } => {
                self.overlay.drop_ghost();
                match target {
                    Some(square) if square != from => self.attempt_move(from, square, piece, actions),
                    _ => {
                        self.state = InteractionState::Idle;
                        InteractionOutcome::Nothing
                    }
                }
            }
            _ => InteractionOutcome::Nothing,
        }
    }

    /// 升变弹窗输入
    pub fn promotion_input(
        &mut self,
        input: PromotionInput,
        actions: &mut impl BoardActions,
    ) -> InteractionOutcome {
        let InteractionState::Promoting(pending) = self.state else {
            return InteractionOutcome::Nothing;
        };

        match pending.resolve(input) {
            PromotionResolution::Chosen(mv) => {
                self.state = InteractionState::Idle;
                self.submit(mv, actions)
            }
            PromotionResolution::Cancelled => {
                tracing::debug!("取消升变: {}", pending.pending_move());
                self.state = InteractionState::Idle;
                InteractionOutcome::PromotionCancelled
            }
            PromotionResolution::Open => InteractionOutcome::Nothing,
        }
    }

    /// 点击同一格：已选中则取消，否则标记落点
    fn toggle_selection(
        &mut self,
        from: Square,
        actions: &mut impl BoardActions,
    ) -> InteractionOutcome {
        if self.overlay.selected() == Some(from) {
            self.overlay.clear_highlights();
            self.state = InteractionState::Idle;
            return InteractionOutcome::Deselected;
        }

        let highlights = actions
            .legal_destinations(from)
            .into_iter()
            .map(|mv| Highlight {
                square: mv.to,
                kind: if actions.piece_at(mv.to).is_some() {
                    HighlightType::CaptureBracket
                } else {
                    HighlightType::Dot
                },
            })
            .collect();
        self.overlay.show_destinations(from, highlights);
        self.state = InteractionState::SelectedAwaitingTarget { from };
        InteractionOutcome::Selected(from)
    }

    fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        piece: Piece,
        actions: &mut impl BoardActions,
    ) -> InteractionOutcome {
        self.overlay.clear_highlights();
        let mv = Move::new(from, to);

        if requires_promotion(piece, &mv) {
            tracing::debug!("等待升变选择: {}", mv);
            self.state = InteractionState::Promoting(PendingPromotion::new(mv, piece.colour));
            return InteractionOutcome::PromotionRequested(mv);
        }

        self.submit(mv, actions)
    }

    fn submit(&mut self, mv: Move, actions: &mut impl BoardActions) -> InteractionOutcome {
        self.state = InteractionState::Idle;
        if actions.submit_move(&mv) {
            InteractionOutcome::MoveApplied(mv)
        } else {
            self.overlay.flash_rejection(mv.to);
            InteractionOutcome::MoveRejected(mv)
        }
    }

    fn clear_to_idle(&mut self) -> InteractionOutcome {
        self.overlay.clear_highlights();
        self.overlay.drop_ghost();
        self.state = InteractionState::Idle;
        InteractionOutcome::Nothing
    }
}
