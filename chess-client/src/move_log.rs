//! 走法记录显示
//!
//! 只追加的走法列表。第 `i` 步（从 0 开始）的回合数为 `i / 2 + 1`，
//! 偶数步由先手方走出。

use std::fmt;

use protocol::Colour;

/// 单条走法记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveLogEntry {
    /// 半回合序号（从 0 开始）
    pub ply: usize,
    /// 走法文本
    pub text: String,
    first_mover: Colour,
}

impl MoveLogEntry {
    /// 回合数（从 1 开始）
    pub fn move_number(&self) -> usize {
        self.ply / 2 + 1
    }

    /// 走这一步的一方
    pub fn mover(&self) -> Colour {
        if self.ply % 2 == 0 {
            self.first_mover
        } else {
            self.first_mover.opponent()
        }
    }
}

impl fmt::Display for MoveLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ply % 2 == 0 {
            write!(f, "{}. {}", self.move_number(), self.text)
        } else {
            write!(f, "... {}", self.text)
        }
    }
}

/// 走法记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveLog {
    entries: Vec<String>,
    first_mover: Colour,
}

impl Default for MoveLog {
    fn default() -> Self {
        Self::new(Colour::White)
    }
}

impl MoveLog {
    /// 创建空记录，`first_mover` 是对局开始时的走子方
    pub fn new(first_mover: Colour) -> Self {
        Self {
            entries: Vec::new(),
            first_mover,
        }
    }

    /// 从会话恢复
    pub fn restore(entries: Vec<String>, first_mover: Colour) -> Self {
        Self {
            entries,
            first_mover,
        }
    }

    /// 追加一步，返回其显示文本
    pub fn push(&mut self, text: impl Into<String>) -> String {
        self.entries.push(text.into());
        let line = self.entry(self.entries.len() - 1).map(|e| e.to_string());
        line.unwrap_or_default()
    }

    /// 第 `ply` 步
    pub fn entry(&self, ply: usize) -> Option<MoveLogEntry> {
        self.entries.get(ply).map(|text| MoveLogEntry {
            ply,
            text: text.clone(),
            first_mover: self.first_mover,
        })
    }

    /// 所有记录
    pub fn entries(&self) -> impl Iterator<Item = MoveLogEntry> + '_ {
        (0..self.entries.len()).filter_map(move |ply| self.entry(ply))
    }

    /// 原始走法文本（用于持久化）
    pub fn moves(&self) -> &[String] {
        &self.entries
    }

    /// 全部显示行
    pub fn render(&self) -> Vec<String> {
        self.entries().map(|e| e.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 新对局时清空
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
