//! 棋盘视图状态
//!
//! 保存最近一次从引擎取得的局面，以及由此得到的显示文本。

use protocol::{Colour, Fen, GameStatus, Move, Piece, Position, Square};

/// 棋盘视图
#[derive(Clone, Debug, PartialEq)]
pub struct BoardView {
    position: Position,
    status: GameStatus,
    last_move: Option<Move>,
    captured_white: String,
    captured_black: String,
}

impl Default for BoardView {
    fn default() -> Self {
        Self::new(Fen::initial())
    }
}

impl BoardView {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            status: GameStatus::Ongoing,
            last_move: None,
            captured_white: captured_text(&[]),
            captured_black: captured_text(&[]),
        }
    }

    /// 用新局面重绘
    pub fn render(&mut self, position: Position, status: GameStatus) {
        tracing::trace!("render: {}", Fen::to_string(&position));
        self.position = position;
        self.status = status;
    }

    /// 更新被吃棋子显示
    pub fn set_captured(&mut self, captured_white: &[Piece], captured_black: &[Piece]) {
        self.captured_white = captured_text(captured_white);
        self.captured_black = captured_text(captured_black);
    }

    pub fn set_last_move(&mut self, last_move: Option<Move>) {
        self.last_move = last_move;
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position.piece_at(square)
    }

    pub fn side_to_move(&self) -> Colour {
        self.position.side_to_move
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// 回合提示，如 "White to play"
    pub fn turn_indicator(&self) -> String {
        format!("{} to play", self.side_to_move().display_name())
    }

    /// 状态栏文本，如 "Status: Check"
    pub fn status_text(&self) -> String {
        format!("Status: {}", self.status.label())
    }

    /// 被吃掉的白方棋子
    pub fn captured_white_text(&self) -> &str {
        &self.captured_white
    }

    /// 被吃掉的黑方棋子
    pub fn captured_black_text(&self) -> &str {
        &self.captured_black
    }
}

fn captured_text(pieces: &[Piece]) -> String {
    if pieces.is_empty() {
        return "-".to_string();
    }
    pieces
        .iter()
        .map(|p| p.glyph().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::PieceKind;

    #[test]
    fn test_turn_and_status_text() {
        let mut view = BoardView::default();
        assert_eq!(view.turn_indicator(), "White to play");
        assert_eq!(view.status_text(), "Status: Ongoing");

        let position = Fen::parse("4k3/8/8/8/8/8/8/4KR2 b").unwrap();
        view.render(position, GameStatus::Check);
        assert_eq!(view.turn_indicator(), "Black to play");
        assert_eq!(view.status_text(), "Status: Check");

        view.render(Fen::initial(), GameStatus::Unknown(7));
        assert_eq!(view.status_text(), "Status: Unknown");
    }

    #[test]
    fn test_captured_text() {
        let mut view = BoardView::default();
        assert_eq!(view.captured_white_text(), "-");

        view.set_captured(
            &[],
            &[
                Piece::new(PieceKind::Pawn, Colour::Black),
                Piece::new(PieceKind::Queen, Colour::Black),
            ],
        );
        assert_eq!(view.captured_black_text(), "♟ ♛");
        assert_eq!(view.captured_white_text(), "-");
    }

    #[test]
    fn test_piece_at() {
        let view = BoardView::default();
        assert_eq!(
            view.piece_at("e1".parse().unwrap()),
            Some(Piece::new(PieceKind::King, Colour::White))
        );
        assert_eq!(view.piece_at("e4".parse().unwrap()), None);
    }
}
