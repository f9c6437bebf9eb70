//! 会话查看工具
//!
//! 读取已保存的会话并打印回合、走法记录和被吃棋子。
//! 用法: `chess-client [session.json]`

use anyhow::{Context, Result};
use chess_client::{BoardView, ClientSettings, FileSessionStore, MoveLog, SessionStore};
use protocol::{Colour, Fen};
use tracing::info;

fn main() -> Result<()> {
    let settings = ClientSettings::load();
    chess_client::init_logging(settings.log_level)?;

    let path = match std::env::args().nth(1) {
        Some(path) => path.into(),
        None => settings
            .resolve_session_path()
            .context("无法确定会话文件位置")?,
    };
    info!("读取会话: {:?}", path);

    let store = FileSessionStore::new(&path)?;
    let Some(snapshot) = store.load() else {
        println!("No saved session at {}", path.display());
        return Ok(());
    };

    let position = Fen::parse(&snapshot.fen).context("会话中的局面无效")?;
    let mut view = BoardView::new(position);
    view.set_captured(
        &snapshot.captured_white_pieces(),
        &snapshot.captured_black_pieces(),
    );

    if Fen::is_starting_position(&snapshot.fen) {
        println!("Position: {} (starting position)", snapshot.fen);
    } else {
        println!("Position: {}", snapshot.fen);
    }
    println!("{}", view.turn_indicator());
    println!(
        "Strategy: {}",
        if snapshot.move_gen.is_empty() {
            "-"
        } else {
            snapshot.move_gen.as_str()
        }
    );

    let log = MoveLog::restore(snapshot.move_history.clone(), Colour::White);
    println!("Moves ({}):", log.len());
    for line in log.render() {
        println!("  {}", line);
    }

    println!("Captured white: {}", view.captured_white_text());
    println!("Captured black: {}", view.captured_black_text());
    Ok(())
}
