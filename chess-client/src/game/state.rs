//! 客户端对局状态
//!
//! 把引擎桥、被吃棋子记录、走法记录、视图和会话存储串起来：
//! 每次局面变化后从引擎取回局面、更新被吃棋子、保存会话。

use protocol::{Colour, Fen, Move, Piece, Position, Square, INITIAL_FEN};

use super::input::BoardActions;
use crate::board::BoardView;
use crate::bridge::{EngineBridge, EngineModule};
use crate::captured::CapturedPieceTracker;
use crate::error::{ClientError, Result};
use crate::move_log::MoveLog;
use crate::storage::{SessionSnapshot, SessionStore};

/// 对局会话
pub struct GameSession<M: EngineModule, S: SessionStore> {
    bridge: EngineBridge<M>,
    store: S,
    tracker: CapturedPieceTracker,
    move_log: MoveLog,
    view: BoardView,
    /// 最近一次从引擎取得的局面
    fen: String,
    /// 上次计算被吃棋子时的局面
    previous_fen: String,
    strategies: Vec<String>,
    /// 当前走法生成策略
    strategy: String,
}

impl<M: EngineModule, S: SessionStore> GameSession<M, S> {
    /// 启动：恢复已保存的会话，没有会话时从初始局面开始
    pub fn start(mut bridge: EngineBridge<M>, store: S) -> Result<Self> {
        let strategies = bridge.list_strategies().unwrap_or_else(|e| {
            tracing::warn!("无法获取策略列表: {}", e);
            Vec::new()
        });
        tracing::info!("可用策略: {:?}", strategies);

        let snapshot = store.load().filter(|snapshot| match Fen::parse(&snapshot.fen) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("会话中的局面无效，忽略会话: {}", e);
                false
            }
        });

        let first_strategy = strategies.first().cloned().unwrap_or_default();

        let mut session = match snapshot {
            Some(snapshot) => {
                tracing::info!("恢复会话: {} 步", snapshot.move_history.len());
                bridge.set_position(&snapshot.fen)?;

                let previous_fen = if Fen::parse(&snapshot.previous_fen).is_ok() {
                    snapshot.previous_fen.clone()
                } else {
                    snapshot.fen.clone()
                };
                let strategy = if strategies.contains(&snapshot.move_gen) {
                    snapshot.move_gen.clone()
                } else {
                    if !snapshot.move_gen.is_empty() {
                        tracing::warn!(
                            "已保存的策略 {:?} 不可用，改用 {:?}",
                            snapshot.move_gen,
                            first_strategy
                        );
                    }
                    first_strategy
                };

                Self {
                    tracker: CapturedPieceTracker::restore(
                        snapshot.captured_white_pieces(),
                        snapshot.captured_black_pieces(),
                    ),
                    move_log: MoveLog::restore(snapshot.move_history, Colour::White),
                    view: BoardView::default(),
                    fen: snapshot.fen,
                    previous_fen,
                    strategies,
                    strategy,
                    bridge,
                    store,
                }
            }
            None => {
                bridge.set_position(INITIAL_FEN)?;
                Self {
                    tracker: CapturedPieceTracker::new(),
                    move_log: MoveLog::default(),
                    view: BoardView::default(),
                    fen: INITIAL_FEN.to_string(),
                    previous_fen: INITIAL_FEN.to_string(),
                    strategies,
                    strategy: first_strategy,
                    bridge,
                    store,
                }
            }
        };

        session.apply_strategy();
        session.refresh()?;
        Ok(session)
    }

    /// 从引擎取回局面并更新显示，然后保存会话
    pub fn refresh(&mut self) -> Result<()> {
        let fen = self.bridge.get_position()?;
        let position = Fen::parse(&fen)?;

        let previous = match Fen::parse(&self.previous_fen) {
            Ok(previous) => previous,
            Err(e) => {
                tracing::warn!("上次局面无效，跳过被吃棋子计算: {}", e);
                position.clone()
            }
        };

        let status = self.bridge.status();
        self.view.render(position.clone(), status);
        self.tracker.update(&previous, &position);
        self.view
            .set_captured(self.tracker.captured_white(), self.tracker.captured_black());

        self.fen = fen.clone();
        self.previous_fen = fen;
        self.save();

        tracing::debug!("{} | {}", self.view.turn_indicator(), self.view.status_text());
        Ok(())
    }

    /// 执行走法；引擎拒绝时局面、走法记录和被吃棋子都不变
    pub fn apply_move(&mut self, mv: &Move) -> Result<()> {
        if !self.bridge.apply_move(mv) {
            tracing::info!("非法走法: {}", mv);
            return Err(ClientError::rejected("apply_move_uci", mv.to_uci()));
        }

        let line = self.move_log.push(mv.to_uci());
        tracing::info!("走子: {}", line);
        self.view.set_last_move(Some(*mv));
        self.refresh()
    }

    /// 新对局
    pub fn new_game(&mut self) -> Result<()> {
        self.bridge.reset(INITIAL_FEN)?;
        self.move_log.clear();
        self.tracker.reset();
        self.previous_fen = INITIAL_FEN.to_string();
        self.view.set_last_move(None);
        self.apply_strategy();

        tracing::info!("新对局");
        self.refresh()
    }

    /// 切换走法生成策略（下次保存时写入会话）
    pub fn select_strategy(&mut self, name: &str) -> Result<()> {
        self.bridge.select_strategy(name)?;
        self.strategy = name.to_string();
        Ok(())
    }

    /// 让引擎按当前策略走一步
    pub fn play_engine_move(&mut self) -> Result<Option<Move>> {
        if self.view.status().is_game_over() {
            tracing::info!("对局已结束 ({})，引擎不再走子", self.view.status());
            return Ok(None);
        }
        let Some(mv) = self.bridge.suggest_move()? else {
            tracing::info!("引擎没有可走的棋");
            return Ok(None);
        };
        self.apply_move(&mv)?;
        Ok(Some(mv))
    }

    /// 当前状态的会话快照
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(
            self.fen.clone(),
            self.move_log.moves().to_vec(),
            self.tracker.captured_white(),
            self.tracker.captured_black(),
            self.previous_fen.clone(),
            self.strategy.clone(),
        )
    }

    fn save(&mut self) {
        let snapshot = self.snapshot();
        if let Err(e) = self.store.save(&snapshot) {
            tracing::warn!("保存会话失败: {:#}", e);
        }
    }

    fn apply_strategy(&mut self) {
        if self.strategy.is_empty() {
            return;
        }
        if let Err(e) = self.bridge.select_strategy(&self.strategy) {
            tracing::warn!("无法应用策略 {:?}: {}", self.strategy, e);
        }
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    pub fn position(&self) -> &Position {
        self.view.position()
    }

    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn previous_fen(&self) -> &str {
        &self.previous_fen
    }

    pub fn move_log(&self) -> &MoveLog {
        &self.move_log
    }

    pub fn captured(&self) -> &CapturedPieceTracker {
        &self.tracker
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn strategies(&self) -> &[String] {
        &self.strategies
    }

    pub fn bridge(&self) -> &EngineBridge<M> {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut EngineBridge<M> {
        &mut self.bridge
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<M: EngineModule, S: SessionStore> BoardActions for GameSession<M, S> {
    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.view.piece_at(square)
    }

    fn side_to_move(&self) -> Colour {
        self.view.side_to_move()
    }

    fn legal_destinations(&mut self, from: Square) -> Vec<Move> {
        self.bridge.legal_destinations_from(from).unwrap_or_else(|e| {
            tracing::warn!("无法获取 {} 的落点: {}", from, e);
            Vec::new()
        })
    }

    fn submit_move(&mut self, mv: &Move) -> bool {
        match self.apply_move(mv) {
            Ok(()) => true,
            Err(ClientError::EngineRejected { .. }) => false,
            Err(e) => {
                // 引擎已接受走法，只是刷新失败
                tracing::error!("走子后刷新失败: {}", e);
                true
            }
        }
    }
}
