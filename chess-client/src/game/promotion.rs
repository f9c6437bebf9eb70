//! 兵升变选择
//!
//! 兵走到底线且走法还没有升变字母时，走法先挂起，等待玩家在弹窗中
//! 选择升变棋子。弹窗打开期间棋盘不接收手势。

use protocol::{Colour, Move, Piece, PromotionPiece};

/// 弹窗输入
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromotionInput {
    /// 点击了某个选项
    Choose(PromotionPiece),
    /// 键盘按键
    Key(char),
    /// Escape 键
    Escape,
    /// 在弹窗外点击
    PointerOutside,
}

/// 输入处理结果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromotionResolution {
    /// 已选定，附带完整走法
    Chosen(Move),
    /// 放弃这步棋
    Cancelled,
    /// 弹窗保持打开
    Open,
}

/// 该走法是否需要先选择升变棋子
pub fn requires_promotion(piece: Piece, mv: &Move) -> bool {
    piece.is_pawn() && mv.to.rank == piece.colour.promotion_rank() && mv.is_plain()
}

/// 等待选择的升变走法
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingPromotion {
    mv: Move,
    colour: Colour,
}

impl PendingPromotion {
    pub fn new(mv: Move, colour: Colour) -> Self {
        Self { mv, colour }
    }

    /// 挂起的走法（不含升变字母）
    pub fn pending_move(&self) -> Move {
        self.mv
    }

    /// 弹窗中的选项，按后、车、象、马排列
    pub fn choices(&self) -> Vec<(PromotionPiece, Piece)> {
        PromotionPiece::ALL
            .iter()
            .map(|p| (*p, Piece::new(p.kind(), self.colour)))
            .collect()
    }

    /// 处理一次输入
    pub fn resolve(&self, input: PromotionInput) -> PromotionResolution {
        match input {
            PromotionInput::Choose(piece) => {
                PromotionResolution::Chosen(self.mv.with_promotion(piece))
            }
            PromotionInput::Key(key) => match PromotionPiece::from_letter(key) {
                Some(piece) => PromotionResolution::Chosen(self.mv.with_promotion(piece)),
                None => PromotionResolution::Open,
            },
            PromotionInput::Escape | PromotionInput::PointerOutside => {
                PromotionResolution::Cancelled
            }
        }
    }
}
