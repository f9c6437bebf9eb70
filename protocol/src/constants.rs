//! 协议常量定义

/// 棋盘宽度（列数）
pub const BOARD_WIDTH: usize = 8;

/// 棋盘高度（行数）
pub const BOARD_HEIGHT: usize = 8;

/// 局面字符串缓冲区默认容量（字节）
///
/// 引擎生成的最长局面字符串远小于该值
pub const FEN_BUFFER_CAPACITY: usize = 128;

/// 引擎推荐走法缓冲区默认容量（字节）
pub const MOVE_BUFFER_CAPACITY: usize = 8;

/// 合法落点列表缓冲区默认容量（字节）
///
/// 逗号分隔的 UCI 列表，中心后最多 27 个落点，兵升变时每个落点 4 项
pub const DESTINATIONS_BUFFER_CAPACITY: usize = 512;

/// 走法生成策略列表最大条数
pub const STRATEGY_LIST_LEN: usize = 16;

/// 单个策略名称的行宽（字节，含结尾 NUL）
pub const STRATEGY_NAME_LEN: usize = 128;

/// UCI 走法最短长度
pub const UCI_MOVE_LEN: usize = 4;

/// 带升变字母的 UCI 走法长度
pub const UCI_PROMOTION_MOVE_LEN: usize = 5;
