//! 外部规则引擎模块的调用约定
//!
//! 每个方法对应编译后模块导出的一个函数。参数只有数字和短字符串，
//! 变长结果写入调用方提供的定长缓冲区，返回实际写入的字节数。
//! 调用方绝不能读取超过返回长度的内容。

/// 外部规则/搜索引擎
///
/// 引擎持有唯一的可变局面，没有事务隔离，所有方法都取 `&mut self`。
pub trait EngineModule {
    /// 初始化（或重新初始化）引擎内部状态
    fn init_game(&mut self, width: u32, height: u32);

    /// 设置局面
    fn set_fen(&mut self, fen: &str);

    /// 写出当前局面，返回写入字节数
    fn get_fen(&mut self, out: &mut [u8]) -> usize;

    /// 执行 UCI 走法，成功时引擎局面前进
    fn apply_move_uci(&mut self, uci: &str) -> bool;

    /// 局面状态码 (0-3)
    fn get_status(&mut self) -> i32;

    /// 写出从 `square` 出发的所有合法走法（逗号分隔的 UCI 列表），返回写入字节数
    fn get_available_moves_uci(&mut self, square: &str, out: &mut [u8]) -> usize;

    /// 写出策略名称列表：最多 `list_len` 行，每行 `row_len` 字节、NUL 填充。
    /// 返回行数
    fn get_movegen_list(&mut self, out: &mut [u8], list_len: usize, row_len: usize) -> usize;

    /// 切换策略，名称未知时返回 false 且不改变任何状态
    fn set_movegen(&mut self, name: &str) -> bool;

    /// 写出当前策略名称，返回写入字节数
    fn get_movegen_name(&mut self, out: &mut [u8]) -> usize;

    /// 写出当前策略认为最好的走法，返回写入字节数（无走法时为 0）
    fn get_best_move(&mut self, out: &mut [u8]) -> usize;
}

impl<M: EngineModule + ?Sized> EngineModule for Box<M> {
    fn init_game(&mut self, width: u32, height: u32) {
        (**self).init_game(width, height)
    }

    fn set_fen(&mut self, fen: &str) {
        (**self).set_fen(fen)
    }

    fn get_fen(&mut self, out: &mut [u8]) -> usize {
        (**self).get_fen(out)
    }

    fn apply_move_uci(&mut self, uci: &str) -> bool {
        (**self).apply_move_uci(uci)
    }

    fn get_status(&mut self) -> i32 {
        (**self).get_status()
    }

    fn get_available_moves_uci(&mut self, square: &str, out: &mut [u8]) -> usize {
        (**self).get_available_moves_uci(square, out)
    }

    fn get_movegen_list(&mut self, out: &mut [u8], list_len: usize, row_len: usize) -> usize {
        (**self).get_movegen_list(out, list_len, row_len)
    }

    fn set_movegen(&mut self, name: &str) -> bool {
        (**self).set_movegen(name)
    }

    fn get_movegen_name(&mut self, out: &mut [u8]) -> usize {
        (**self).get_movegen_name(out)
    }

    fn get_best_move(&mut self, out: &mut [u8]) -> usize {
        (**self).get_best_move(out)
    }
}
