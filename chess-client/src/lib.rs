//! 国际象棋客户端核心
//!
//! 棋盘交互状态机、引擎桥接、被吃棋子记录、走法记录与会话存储。
//! 规则判断和搜索由外部引擎模块完成，这里只负责请求和显示结果。

pub mod board;
pub mod bridge;
pub mod captured;
pub mod error;
pub mod game;
pub mod move_log;
pub mod settings;
pub mod storage;

pub use board::{BoardLayout, BoardView, Overlay, Point};
pub use bridge::{BridgeCapacities, EngineBridge, EngineModule};
pub use captured::CapturedPieceTracker;
pub use error::{ClientError, Result};
pub use game::{BoardInteractionController, ClientGame, GameEvent, GameSession};
pub use move_log::MoveLog;
pub use settings::{ClientSettings, LogLevel};
pub use storage::{FileSessionStore, MemorySessionStore, SessionSnapshot, SessionStore};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化日志
///
/// `RUST_LOG` 中的指令优先，其余按配置的级别输出本 crate 和 protocol 的日志。
pub fn init_logging(level: LogLevel) -> anyhow::Result<()> {
    let directive = level.as_directive();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("chess_client={}", directive).parse()?)
                .add_directive(format!("protocol={}", directive).parse()?),
        )
        .try_init()?;
    Ok(())
}
