//! 游戏逻辑模块
//!
//! 管理对局状态和棋盘交互

mod input;
mod promotion;
mod state;

pub use input::*;
pub use promotion::*;
pub use state::*;

use crate::board::{BoardLayout, Point};
use crate::bridge::{EngineBridge, EngineModule};
use crate::error::Result;
use crate::settings::ClientSettings;
use crate::storage::SessionStore;

/// 游戏事件
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// 指针按下
    PointerDown(Point),
    /// 指针移动
    PointerMove(Point),
    /// 指针抬起
    PointerUp(Point),
    /// 升变弹窗输入
    Promotion(PromotionInput),
    /// 新对局
    NewGame,
    /// 切换走法生成策略
    SelectStrategy(String),
    /// 让引擎走一步
    EngineMove,
    /// 窗口尺寸变化或翻转棋盘
    LayoutChanged(BoardLayout),
}

/// 客户端游戏：交互控制器加对局会话
pub struct ClientGame<M: EngineModule, S: SessionStore> {
    controller: BoardInteractionController,
    session: GameSession<M, S>,
}

impl<M: EngineModule, S: SessionStore> ClientGame<M, S> {
    /// 启动会话并按设置创建控制器
    pub fn start(
        bridge: EngineBridge<M>,
        store: S,
        layout: BoardLayout,
        settings: &ClientSettings,
    ) -> Result<Self> {
        let session = GameSession::start(bridge, store)?;
        let controller = BoardInteractionController::new(layout, settings.drag_threshold_px);
        Ok(Self {
            controller,
            session,
        })
    }

    /// 处理游戏事件
    pub fn handle_event(&mut self, event: GameEvent) -> InteractionOutcome {
        match event {
            GameEvent::PointerDown(point) => self.controller.pointer_down(point, &mut self.session),
            GameEvent::PointerMove(point) => self.controller.pointer_move(point),
            GameEvent::PointerUp(point) => self.controller.pointer_up(point, &mut self.session),
            GameEvent::Promotion(input) => self.controller.promotion_input(input, &mut self.session),
            GameEvent::NewGame => {
                self.controller.reset();
                if let Err(e) = self.session.new_game() {
                    tracing::error!("无法开始新对局: {}", e);
                }
                InteractionOutcome::Nothing
            }
            GameEvent::SelectStrategy(name) => {
                if let Err(e) = self.session.select_strategy(&name) {
                    tracing::warn!("切换策略失败: {}", e);
                }
                InteractionOutcome::Nothing
            }
            GameEvent::EngineMove => self.engine_move(),
            GameEvent::LayoutChanged(layout) => {
                self.controller.set_layout(layout);
                InteractionOutcome::Nothing
            }
        }
    }

    fn engine_move(&mut self) -> InteractionOutcome {
        if self.controller.is_promoting() {
            tracing::debug!("升变选择中，忽略引擎走子");
            return InteractionOutcome::Nothing;
        }
        self.controller.reset();

        match self.session.play_engine_move() {
            Ok(Some(mv)) => InteractionOutcome::MoveApplied(mv),
            Ok(None) => InteractionOutcome::Nothing,
            Err(e) => {
                tracing::warn!("引擎走子失败: {}", e);
                InteractionOutcome::Nothing
            }
        }
    }

    pub fn controller(&self) -> &BoardInteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut BoardInteractionController {
        &mut self.controller
    }

    pub fn session(&self) -> &GameSession<M, S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession<M, S> {
        &mut self.session
    }
}
