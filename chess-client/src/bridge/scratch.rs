//! 跨边界调用的临时缓冲区
//!
//! 每次调用从 [`ScratchArena`] 申请一块定长缓冲区交给引擎写入，
//! 引擎返回实际写入的字节数，调用方只读取这部分。缓冲区在 drop 时归还，
//! 因此无论调用成功、失败还是提前返回都会释放。

use std::cell::Cell;

use crate::error::{ClientError, Result};

/// 缓冲区分配器，记录当前未释放的缓冲区数量
#[derive(Debug, Default)]
pub struct ScratchArena {
    live: Cell<usize>,
    allocated: Cell<usize>,
}

impl ScratchArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// 申请一块指定容量的缓冲区（内容初始化为 0）
    pub fn alloc(&self, call: &'static str, capacity: usize) -> ScratchBuffer<'_> {
        self.live.set(self.live.get() + 1);
        self.allocated.set(self.allocated.get() + 1);
        tracing::trace!("scratch alloc for {}: {} bytes", call, capacity);
        ScratchBuffer {
            call,
            bytes: vec![0; capacity],
            arena: self,
        }
    }

    /// 尚未释放的缓冲区数量
    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// 累计分配次数
    pub fn allocated(&self) -> usize {
        self.allocated.get()
    }
}

/// 单次调用使用的缓冲区
pub struct ScratchBuffer<'a> {
    call: &'static str,
    bytes: Vec<u8>,
    arena: &'a ScratchArena,
}

impl ScratchBuffer<'_> {
    /// 缓冲区容量
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// 交给引擎写入的可变切片
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// 读取引擎写入的前 `used` 个字节
    ///
    /// `used` 达到或超过容量时视为截断。
    pub fn read(&self, used: usize) -> Result<String> {
        if used >= self.capacity() {
            return Err(ClientError::Truncated {
                call: self.call,
                used,
                capacity: self.capacity(),
            });
        }
        let text = String::from_utf8_lossy(&self.bytes[..used]);
        Ok(text.trim_end_matches('\0').to_string())
    }

    /// 按定长行读取第 `index` 行，遇到 NUL 截止
    pub fn row(&self, index: usize, row_len: usize) -> String {
        let start = index * row_len;
        let end = (start + row_len).min(self.bytes.len());
        if start >= end {
            return String::new();
        }
        let row = &self.bytes[start..end];
        let len = row.iter().position(|&b| b == 0).unwrap_or(row.len());
        String::from_utf8_lossy(&row[..len]).to_string()
    }
}

impl Drop for ScratchBuffer<'_> {
    fn drop(&mut self) {
        self.arena.live.set(self.arena.live.get().saturating_sub(1));
        tracing::trace!("scratch release for {}", self.call);
    }
}
