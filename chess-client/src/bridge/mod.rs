//! 引擎桥接层
//!
//! 把 [`EngineModule`] 的缓冲区式调用约定包装成类型化的接口：
//! 局面字符串、走法、状态、策略。所有调用都是同步的，
//! `&mut self` 保证同一时刻只有一个引擎调用在进行。

mod module;
mod scratch;

pub use module::EngineModule;
pub use scratch::{ScratchArena, ScratchBuffer};

use protocol::{
    Fen, GameStatus, Move, Position, Square, BOARD_HEIGHT, BOARD_WIDTH,
    DESTINATIONS_BUFFER_CAPACITY, FEN_BUFFER_CAPACITY, MOVE_BUFFER_CAPACITY, STRATEGY_LIST_LEN,
    STRATEGY_NAME_LEN,
};

use crate::error::{ClientError, Result};
use crate::settings::ClientSettings;

/// 各类调用使用的缓冲区容量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeCapacities {
    /// 局面字符串
    pub fen: usize,
    /// 推荐走法
    pub best_move: usize,
    /// 合法落点列表
    pub destinations: usize,
    /// 策略列表行数
    pub strategy_list_len: usize,
    /// 策略名称行宽
    pub strategy_name_len: usize,
}

impl Default for BridgeCapacities {
    fn default() -> Self {
        Self {
            fen: FEN_BUFFER_CAPACITY,
            best_move: MOVE_BUFFER_CAPACITY,
            destinations: DESTINATIONS_BUFFER_CAPACITY,
            strategy_list_len: STRATEGY_LIST_LEN,
            strategy_name_len: STRATEGY_NAME_LEN,
        }
    }
}

impl From<&ClientSettings> for BridgeCapacities {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            fen: settings.fen_buffer_capacity,
            best_move: settings.move_buffer_capacity,
            destinations: settings.destinations_buffer_capacity,
            strategy_list_len: settings.strategy_list_len,
            strategy_name_len: settings.strategy_name_len,
        }
    }
}

/// 引擎桥
pub struct EngineBridge<M: EngineModule> {
    module: M,
    arena: ScratchArena,
    capacities: BridgeCapacities,
}

impl<M: EngineModule> EngineBridge<M> {
    /// 加载并启动引擎模块
    ///
    /// 只有初始化成功才会得到桥对象，因此其余调用不可能发生在初始化之前。
    pub fn initialize<F>(load: F, capacities: BridgeCapacities) -> Result<Self>
    where
        F: FnOnce() -> anyhow::Result<M>,
    {
        let mut module = load().map_err(|e| {
            tracing::error!("引擎模块加载失败: {:#}", e);
            ClientError::BridgeUnavailable {
                reason: format!("{:#}", e),
            }
        })?;

        module.init_game(BOARD_WIDTH as u32, BOARD_HEIGHT as u32);
        tracing::info!("引擎已初始化 ({}x{})", BOARD_WIDTH, BOARD_HEIGHT);

        Ok(Self {
            module,
            arena: ScratchArena::new(),
            capacities,
        })
    }

    /// 当前局面字符串
    pub fn get_position(&mut self) -> Result<String> {
        let mut buffer = self.arena.alloc("get_fen", self.capacities.fen);
        let used = self.module.get_fen(buffer.as_mut_slice());
        let fen = buffer.read(used)?;
        tracing::debug!("getting fen: {:?}", fen);
        Ok(fen)
    }

    /// 当前局面（已解析）
    pub fn position(&mut self) -> Result<Position> {
        let fen = self.get_position()?;
        Ok(Fen::parse(&fen)?)
    }

    /// 替换引擎局面
    pub fn set_position(&mut self, fen: &str) -> Result<()> {
        Fen::parse(fen)?;
        tracing::debug!("setting fen: {:?}", fen);
        self.module.set_fen(fen);
        Ok(())
    }

    /// 重新初始化引擎后设置局面
    pub fn reset(&mut self, fen: &str) -> Result<()> {
        Fen::parse(fen)?;
        self.module.init_game(BOARD_WIDTH as u32, BOARD_HEIGHT as u32);
        self.module.set_fen(fen);
        tracing::info!("引擎已重置: {}", fen);
        Ok(())
    }

    /// 执行走法，返回引擎是否接受
    pub fn apply_move(&mut self, mv: &Move) -> bool {
        let uci = mv.to_uci();
        let accepted = self.module.apply_move_uci(&uci);
        tracing::debug!("move uci: {} -> {}", uci, accepted);
        accepted
    }

    /// 局面状态
    pub fn status(&mut self) -> GameStatus {
        let code = self.module.get_status();
        let status = GameStatus::from_code(code);
        if let GameStatus::Unknown(code) = status {
            tracing::warn!("引擎返回未知状态码: {}", code);
        }
        status
    }

    /// 可用的走法生成策略
    pub fn list_strategies(&mut self) -> Result<Vec<String>> {
        let list_len = self.capacities.strategy_list_len;
        let row_len = self.capacities.strategy_name_len;
        let Some(size) = list_len.checked_mul(row_len) else {
            return Err(ClientError::rejected(
                "get_movegen_list",
                format!("strategy buffer {} x {} is too large", list_len, row_len),
            ));
        };
        let mut buffer = self.arena.alloc("get_movegen_list", size);
        let count = self
            .module
            .get_movegen_list(buffer.as_mut_slice(), list_len, row_len);

        if count > list_len {
            return Err(ClientError::Truncated {
                call: "get_movegen_list",
                used: count,
                capacity: list_len,
            });
        }

        Ok((0..count)
            .map(|i| buffer.row(i, row_len))
            .filter(|name| !name.is_empty())
            .collect())
    }

    /// 切换策略，名称未知时返回 `EngineRejected`
    pub fn select_strategy(&mut self, name: &str) -> Result<()> {
        if self.module.set_movegen(name) {
            tracing::info!("走法生成策略已切换: {}", name);
            Ok(())
        } else {
            Err(ClientError::rejected("set_movegen", format!("unknown strategy {:?}", name)))
        }
    }

    /// 当前策略名称
    pub fn active_strategy(&mut self) -> Result<String> {
        let mut buffer = self
            .arena
            .alloc("get_movegen_name", self.capacities.strategy_name_len);
        let used = self.module.get_movegen_name(buffer.as_mut_slice());
        buffer.read(used)
    }

    /// 从 `square` 出发的候选走法（仅用于高亮，不作为合法性判断）
    ///
    /// 升变后缀被去掉，重复项合并。
    pub fn legal_destinations_from(&mut self, square: Square) -> Result<Vec<Move>> {
        let mut buffer = self
            .arena
            .alloc("get_available_moves_uci", self.capacities.destinations);
        let used = self
            .module
            .get_available_moves_uci(&square.to_algebraic(), buffer.as_mut_slice());
        let list = buffer.read(used)?;

        let mut moves: Vec<Move> = Vec::new();
        for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match item.parse::<Move>() {
                Ok(mv) if mv.from == square => {
                    let mv = mv.without_promotion();
                    if !moves.contains(&mv) {
                        moves.push(mv);
                    }
                }
                Ok(mv) => {
                    tracing::warn!("引擎返回了其他格子的走法: {} (查询 {})", mv, square);
                }
                Err(e) => {
                    tracing::warn!("跳过无法解析的走法 {:?}: {}", item, e);
                }
            }
        }
        Ok(moves)
    }

    /// 引擎推荐的走法，引擎无走法时返回 `None`
    pub fn suggest_move(&mut self) -> Result<Option<Move>> {
        let mut buffer = self.arena.alloc("get_best_move", self.capacities.best_move);
        let used = self.module.get_best_move(buffer.as_mut_slice());
        let uci = buffer.read(used)?;
        tracing::debug!("getting best move: {:?}", uci);

        if uci.is_empty() {
            return Ok(None);
        }
        Ok(Some(uci.parse()?))
    }

    /// 缓冲区分配器
    pub fn scratch(&self) -> &ScratchArena {
        &self.arena
    }

    /// 底层模块
    pub fn module(&self) -> &M {
        &self.module
    }

    /// 底层模块（可变）
    pub fn module_mut(&mut self) -> &mut M {
        &mut self.module
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 按固定答案应答的引擎
    #[derive(Default)]
    struct FixedModule {
        fen: String,
        destinations: String,
        best_move: String,
        status: i32,
        strategies: Vec<String>,
        strategy: String,
        init_calls: usize,
        applied: Vec<String>,
    }

    fn write(out: &mut [u8], text: &str) -> usize {
        let n = text.len().min(out.len());
        out[..n].copy_from_slice(&text.as_bytes()[..n]);
        if n < out.len() {
            out[n] = 0;
        }
        text.len()
    }

    impl EngineModule for FixedModule {
        fn init_game(&mut self, _width: u32, _height: u32) {
            self.init_calls += 1;
        }

        fn set_fen(&mut self, fen: &str) {
            self.fen = fen.to_string();
        }

        fn get_fen(&mut self, out: &mut [u8]) -> usize {
            let fen = self.fen.clone();
            write(out, &fen)
        }

        fn apply_move_uci(&mut self, uci: &str) -> bool {
            self.applied.push(uci.to_string());
            uci == "e2e4"
        }

        fn get_status(&mut self) -> i32 {
            self.status
        }

        fn get_available_moves_uci(&mut self, _square: &str, out: &mut [u8]) -> usize {
            let list = self.destinations.clone();
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
            let name = self.strategy.clone();
            write(out, &name)
        }

        fn get_best_move(&mut self, out: &mut [u8]) -> usize {
            let mv = self.best_move.clone();
            write(out, &mv)
        }
    }

    fn bridge(module: FixedModule) -> EngineBridge<FixedModule> {
        EngineBridge::initialize(|| Ok(module), BridgeCapacities::default()).unwrap()
    }

    #[test]
    fn test_initialize_calls_init_game() {
        let bridge = bridge(FixedModule::default());
        assert_eq!(bridge.module().init_calls, 1);
    }

    #[test]
    fn test_initialize_failure_is_bridge_unavailable() {
        let result = EngineBridge::<FixedModule>::initialize(
            || Err(anyhow::anyhow!("chess.wasm not found")),
            BridgeCapacities::default(),
        );
        assert!(matches!(result, Err(ClientError::BridgeUnavailable { .. })));
    }

    #[test]
    fn test_get_position() {
        let mut bridge = bridge(FixedModule::default());
        bridge.set_position(protocol::INITIAL_FEN).unwrap();

        assert_eq!(bridge.get_position().unwrap(), protocol::INITIAL_FEN);
        assert_eq!(bridge.position().unwrap(), Fen::initial());
        assert_eq!(bridge.scratch().live(), 0);
    }

    #[test]
    fn test_get_position_truncated() {
        let capacities = BridgeCapacities {
            fen: 16,
            ..BridgeCapacities::default()
        };
        let mut bridge =
            EngineBridge::initialize(|| Ok(FixedModule::default()), capacities).unwrap();
        bridge.set_position(protocol::INITIAL_FEN).unwrap();

        assert!(matches!(
            bridge.get_position(),
            Err(ClientError::Truncated { call: "get_fen", .. })
        ));
        assert_eq!(bridge.scratch().live(), 0);
    }

    #[test]
    fn test_set_position_rejects_malformed_fen() {
        let mut bridge = bridge(FixedModule::default());
        assert!(matches!(
            bridge.set_position("8/8/8/8/8/8/8/8"),
            Err(ClientError::Format(_))
        ));
        assert!(bridge.module().fen.is_empty());
    }

    #[test]
    fn test_reset_reinitializes() {
        let mut bridge = bridge(FixedModule::default());
        bridge.reset(protocol::INITIAL_FEN).unwrap();
        assert_eq!(bridge.module().init_calls, 2);
        assert_eq!(bridge.module().fen, protocol::INITIAL_FEN);
    }

    #[test]
    fn test_apply_move() {
        let mut bridge = bridge(FixedModule::default());
        assert!(bridge.apply_move(&"e2e4".parse().unwrap()));
        assert!(!bridge.apply_move(&"e2e5".parse().unwrap()));
        assert_eq!(bridge.module().applied, vec!["e2e4", "e2e5"]);
    }

    #[test]
    fn test_status() {
        let mut bridge = bridge(FixedModule {
            status: 2,
            ..FixedModule::default()
        });
        assert_eq!(bridge.status(), GameStatus::Checkmate);

        bridge.module_mut().status = 9;
        assert_eq!(bridge.status(), GameStatus::Unknown(9));
    }

    #[test]
    fn test_strategies() {
        let mut bridge = bridge(FixedModule {
            strategies: vec!["random".to_string(), "fav_colour".to_string()],
            strategy: "random".to_string(),
            ..FixedModule::default()
        });

        assert_eq!(bridge.list_strategies().unwrap(), vec!["random", "fav_colour"]);
        assert_eq!(bridge.active_strategy().unwrap(), "random");

        bridge.select_strategy("fav_colour").unwrap();
        assert_eq!(bridge.active_strategy().unwrap(), "fav_colour");

        assert!(matches!(
            bridge.select_strategy("minimax"),
            Err(ClientError::EngineRejected { .. })
        ));
        assert_eq!(bridge.active_strategy().unwrap(), "fav_colour");
        assert_eq!(bridge.scratch().live(), 0);
    }

    #[test]
    fn test_strategy_buffer_overflow() {
        let capacities = BridgeCapacities {
            strategy_list_len: usize::MAX,
            strategy_name_len: 2,
            ..BridgeCapacities::default()
        };
        let mut bridge =
            EngineBridge::initialize(|| Ok(FixedModule::default()), capacities).unwrap();

        assert!(matches!(
            bridge.list_strategies(),
            Err(ClientError::EngineRejected { call: "get_movegen_list", .. })
        ));
        assert_eq!(bridge.scratch().live(), 0);
    }

    #[test]
    fn test_legal_destinations() {
        let mut bridge = bridge(FixedModule {
            destinations: "g7g8q,g7g8r,g7g8b,g7g8n,g7h8q,g7h8r,g7h8b,g7h8n".to_string(),
            ..FixedModule::default()
        });

        let moves = bridge
            .legal_destinations_from("g7".parse().unwrap())
            .unwrap();
        let uci: Vec<String> = moves.iter().map(|m| m.to_uci()).collect();
        assert_eq!(uci, vec!["g7g8", "g7h8"]);
    }

    #[test]
    fn test_legal_destinations_empty_and_garbage() {
        let mut bridge = bridge(FixedModule::default());
        assert!(bridge
            .legal_destinations_from("e4".parse().unwrap())
            .unwrap()
            .is_empty());

        bridge.module_mut().destinations = "a2a3,??,b1c3,a2a4".to_string();
        let moves = bridge
            .legal_destinations_from("a2".parse().unwrap())
            .unwrap();
        let uci: Vec<String> = moves.iter().map(|m| m.to_uci()).collect();
        assert_eq!(uci, vec!["a2a3", "a2a4"]);
    }

    #[test]
    fn test_suggest_move() {
        let mut bridge = bridge(FixedModule {
            best_move: "b1c3".to_string(),
            ..FixedModule::default()
        });
        assert_eq!(
            bridge.suggest_move().unwrap().map(|m| m.to_uci()),
            Some("b1c3".to_string())
        );

        bridge.module_mut().best_move = String::new();
        assert_eq!(bridge.suggest_move().unwrap(), None);

        // 8 字节缓冲区装不下这个答案
        bridge.module_mut().best_move = "a7a8q and more".to_string();
        assert!(bridge.suggest_move().is_err());
        assert_eq!(bridge.scratch().live(), 0);
    }
}
