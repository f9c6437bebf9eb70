//! 集成测试公共部分：按脚本应答的引擎和便捷操作

#![allow(dead_code)]

use std::collections::HashMap;

use chess_client::game::InteractionOutcome;
use chess_client::{
    BoardLayout, BridgeCapacities, ClientGame, ClientSettings, EngineBridge, EngineModule,
    GameEvent, MemorySessionStore, Point, SessionStore,
};

/// 引擎初始局面（引擎只输出棋盘和走子方两个字段）
pub const ENGINE_INITIAL: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w";

/// 按脚本应答的引擎：走法 → 走后局面
#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    pub fen: String,
    pub transitions: HashMap<String, String>,
    pub destinations: HashMap<String, String>,
    pub status: i32,
    pub strategies: Vec<String>,
    pub strategy: String,
    pub best_move: String,
    /// 所有 apply_move_uci 调用（包括被拒绝的）
    pub applied: Vec<String>,
    pub set_fen_calls: Vec<String>,
    pub init_calls: usize,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new(&["random", "fav_colour"])
    }
}

impl ScriptedEngine {
    pub fn new(strategies: &[&str]) -> Self {
        let strategies: Vec<String> = strategies.iter().map(|s| s.to_string()).collect();
        Self {
            fen: ENGINE_INITIAL.to_string(),
            transitions: HashMap::new(),
            destinations: HashMap::new(),
            status: 0,
            strategy: strategies.first().cloned().unwrap_or_default(),
            strategies,
            best_move: String::new(),
            applied: Vec::new(),
            set_fen_calls: Vec::new(),
            init_calls: 0,
        }
    }

    /// 接受 `uci` 并进入 `fen`
    pub fn on_move(mut self, uci: &str, fen: &str) -> Self {
        self.transitions.insert(uci.to_string(), fen.to_string());
        self
    }

    pub fn with_destinations(mut self, square: &str, list: &str) -> Self {
        self.destinations.insert(square.to_string(), list.to_string());
        self
    }

    pub fn with_best_move(mut self, uci: &str) -> Self {
        self.best_move = uci.to_string();
        self
    }
}

fn write(out: &mut [u8], text: &str) -> usize {
    let n = text.len().min(out.len());
    out[..n].copy_from_slice(&text.as_bytes()[..n]);
    if n < out.len() {
        out[n] = 0;
    }
    text.len()
}

impl EngineModule for ScriptedEngine {
    fn init_game(&mut self, _width: u32, _height: u32) {
        self.init_calls += 1;
        self.fen = ENGINE_INITIAL.to_string();
        self.strategy = self.strategies.first().cloned().unwrap_or_default();
    }

    fn set_fen(&mut self, fen: &str) {
        self.set_fen_calls.push(fen.to_string());
        self.fen = fen.split_whitespace().take(2).collect::<Vec<_>>().join(" ");
    }

    fn get_fen(&mut self, out: &mut [u8]) -> usize {
        write(out, &self.fen.clone())
    }

    fn apply_move_uci(&mut self, uci: &str) -> bool {
        self.applied.push(uci.to_string());
        match self.transitions.get(uci) {
            Some(fen) => {
                self.fen = fen.clone();
                true
            }
            None => false,
        }
    }

    fn get_status(&mut self) -> i32 {
        self.status
    }

    fn get_available_moves_uci(&mut self, square: &str, out: &mut [u8]) -> usize {
        let list = self.destinations.get(square).cloned().unwrap_or_default();
        write(out, &list)
    }

    fn get_movegen_list(&mut self, out: &mut [u8], list_len: usize, row_len: usize) -> usize {
        let count = self.strategies.len().min(list_len);
        for (i, name) in self.strategies.iter().take(count).enumerate() {
            write(&mut out[i * row_len..(i + 1) * row_len], name);
        }
        count
    }

    fn set_movegen(&mut self, name: &str) -> bool {
        if self.strategies.iter().any(|s| s == name) {
            self.strategy = name.to_string();
            true
        } else {
            false
        }
    }

    fn get_movegen_name(&mut self, out: &mut [u8]) -> usize {
        write(out, &self.strategy.clone())
    }

    fn get_best_move(&mut self, out: &mut [u8]) -> usize {
        write(out, &self.best_move.clone())
    }
}

pub type TestGame<S = MemorySessionStore> = ClientGame<ScriptedEngine, S>;

/// 用默认布局和设置启动
pub fn start<S: SessionStore>(engine: ScriptedEngine, store: S) -> TestGame<S> {
    let bridge = EngineBridge::initialize(|| Ok(engine), BridgeCapacities::default()).unwrap();
    ClientGame::start(bridge, store, BoardLayout::default(), &ClientSettings::default()).unwrap()
}

/// 以一条会话记录启动
pub fn start_with_record(engine: ScriptedEngine, record: &str) -> TestGame {
    start(engine, MemorySessionStore::with_record(record))
}

pub fn engine<S: SessionStore>(game: &TestGame<S>) -> &ScriptedEngine {
    game.session().bridge().module()
}

pub fn at<S: SessionStore>(game: &TestGame<S>, square: &str) -> Point {
    game.controller()
        .layout()
        .square_center(square.parse().unwrap())
}

/// 在同一格按下再抬起
pub fn click<S: SessionStore>(game: &mut TestGame<S>, square: &str) -> InteractionOutcome {
    let point = at(game, square);
    let down = game.handle_event(GameEvent::PointerDown(point));
    let up = game.handle_event(GameEvent::PointerUp(point));
    if down == InteractionOutcome::Armed {
        up
    } else {
        down
    }
}

/// 从一格拖到另一格
pub fn drag<S: SessionStore>(game: &mut TestGame<S>, from: &str, to: &str) -> InteractionOutcome {
    let (from, to) = (at(game, from), at(game, to));
    game.handle_event(GameEvent::PointerDown(from));
    game.handle_event(GameEvent::PointerMove(to));
    game.handle_event(GameEvent::PointerUp(to))
}
