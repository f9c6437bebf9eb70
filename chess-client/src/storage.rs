//! 会话存储
//!
//! 保存和恢复可继续的对局：局面、走法记录、双方被吃棋子、上次看到的局面、
//! 当前策略。存储是尽力而为的：写入失败只记录日志，读取时数据缺失或
//! 损坏都视为"没有会话"。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use protocol::{Piece, INITIAL_FEN};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

fn initial_fen() -> String {
    INITIAL_FEN.to_string()
}

/// 字段为 null 或类型不符时取默认值
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_fen<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string).unwrap_or_else(initial_fen))
}

/// 时间戳也接受浮点数（网页版写入的是 JS 数字）
fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().map(|millis| millis as i64))
        .unwrap_or(0))
}

/// 会话快照（存储记录的字段名与网页版一致）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// 当前局面
    #[serde(default = "initial_fen")]
    pub fen: String,
    /// 走法记录
    #[serde(default, rename = "moveHistory", deserialize_with = "lenient")]
    pub move_history: Vec<String>,
    /// 被吃掉的白方棋子（FEN 字母）
    #[serde(default, rename = "capturedWhite", deserialize_with = "lenient")]
    pub captured_white: Vec<String>,
    /// 被吃掉的黑方棋子（FEN 字母）
    #[serde(default, rename = "capturedBlack", deserialize_with = "lenient")]
    pub captured_black: Vec<String>,
    /// 上次计算被吃棋子时的局面
    #[serde(
        default = "initial_fen",
        rename = "previousFEN",
        deserialize_with = "lenient_fen"
    )]
    pub previous_fen: String,
    /// 走法生成策略名称
    #[serde(default, rename = "moveGen", deserialize_with = "lenient")]
    pub move_gen: String,
    /// 保存时间（Unix 毫秒）
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: i64,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            fen: initial_fen(),
            move_history: Vec::new(),
            captured_white: Vec::new(),
            captured_black: Vec::new(),
            previous_fen: initial_fen(),
            move_gen: String::new(),
            timestamp: 0,
        }
    }
}

impl SessionSnapshot {
    /// 以当前时间戳创建快照
    pub fn new(
        fen: String,
        move_history: Vec<String>,
        captured_white: &[Piece],
        captured_black: &[Piece],
        previous_fen: String,
        move_gen: String,
    ) -> Self {
        Self {
            fen,
            move_history,
            captured_white: pieces_to_letters(captured_white),
            captured_black: pieces_to_letters(captured_black),
            previous_fen,
            move_gen,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// 序列化为 JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// 从 JSON 解析。缺失、为 null 或类型不符的字段取默认值，
    /// 只有 JSON 无法读取或 `fen` 不是字符串时才报错
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        serde_json::from_str(json).map_err(|e| ClientError::StorageCorrupt {
            reason: e.to_string(),
        })
    }

    /// 被吃掉的白方棋子（忽略无法识别的字母）
    pub fn captured_white_pieces(&self) -> Vec<Piece> {
        letters_to_pieces(&self.captured_white)
    }

    /// 被吃掉的黑方棋子（忽略无法识别的字母）
    pub fn captured_black_pieces(&self) -> Vec<Piece> {
        letters_to_pieces(&self.captured_black)
    }
}

fn pieces_to_letters(pieces: &[Piece]) -> Vec<String> {
    pieces.iter().map(|p| p.to_fen_char().to_string()).collect()
}

fn letters_to_pieces(letters: &[String]) -> Vec<Piece> {
    letters
        .iter()
        .filter_map(|s| {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Piece::from_fen_char(c),
                _ => None,
            }
        })
        .collect()
}

/// 会话存储
pub trait SessionStore {
    /// 写入快照
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<()>;

    /// 读取快照，缺失或损坏时返回 `None`
    fn load(&self) -> Option<SessionSnapshot>;

    /// 删除存储的会话
    fn clear(&mut self) -> Result<()>;
}

/// 把原始记录解析为快照，损坏时记录日志并返回 `None`
fn parse_record(raw: &str) -> Option<SessionSnapshot> {
    match SessionSnapshot::from_json(raw) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!("忽略损坏的会话记录: {}", e);
            None
        }
    }
}

/// 基于 JSON 文件的会话存储
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// 使用指定文件
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("无法创建存储目录: {:?}", parent))?;
            }
        }
        Ok(Self { path })
    }

    /// 存储文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        let json = snapshot.to_json().context("序列化会话失败")?;
        fs::write(&self.path, json).with_context(|| format!("写入文件失败: {:?}", self.path))?;
        tracing::debug!("会话已保存: {:?}", self.path);
        Ok(())
    }

    fn load(&self) -> Option<SessionSnapshot> {
        if !self.path.exists() {
            tracing::info!("没有已保存的会话");
            return None;
        }
        match fs::read_to_string(&self.path) {
            Ok(content) => parse_record(&content),
            Err(e) => {
                tracing::warn!("无法读取会话文件 {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn clear(&mut self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("删除文件失败: {:?}", self.path))?;
            tracing::info!("会话已删除: {:?}", self.path);
        }
        Ok(())
    }
}

/// 内存中的会话存储，保存一条原始 JSON 记录
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    record: Option<String>,
    writes: usize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以一条原始记录创建（可以是任意内容，包括损坏的数据）
    pub fn with_record(raw: impl Into<String>) -> Self {
        Self {
            record: Some(raw.into()),
            writes: 0,
        }
    }

    /// 当前原始记录
    pub fn raw(&self) -> Option<&str> {
        self.record.as_deref()
    }

    /// 写入次数
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        self.record = Some(snapshot.to_json().context("序列化会话失败")?);
        self.writes += 1;
        Ok(())
    }

    fn load(&self) -> Option<SessionSnapshot> {
        self.record.as_deref().and_then(parse_record)
    }

    fn clear(&mut self) -> Result<()> {
        self.record = None;
        Ok(())
    }
}
