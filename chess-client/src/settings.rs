//! 客户端设置模块
//!
//! 提供设置数据结构和 JSON 持久化

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use protocol::{
    DESTINATIONS_BUFFER_CAPACITY, FEN_BUFFER_CAPACITY, MOVE_BUFFER_CAPACITY, STRATEGY_LIST_LEN,
    STRATEGY_NAME_LEN,
};
use serde::{Deserialize, Serialize};

/// 应用目录名
pub const APP_DIR_NAME: &str = "webchess";

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// `EnvFilter` 指令中使用的级别名
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// 客户端设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    // === 交互设置 ===
    /// 指针移动超过该距离（像素）才开始拖动
    pub drag_threshold_px: f32,

    // === 引擎缓冲区 ===
    /// 局面字符串缓冲区容量
    pub fen_buffer_capacity: usize,
    /// 推荐走法缓冲区容量
    pub move_buffer_capacity: usize,
    /// 合法落点列表缓冲区容量
    pub destinations_buffer_capacity: usize,
    /// 策略列表行数
    pub strategy_list_len: usize,
    /// 策略名称行宽
    pub strategy_name_len: usize,

    // === 存储设置 ===
    /// 会话文件路径（为空时使用平台数据目录）
    pub session_path: Option<PathBuf>,

    // === 高级设置 ===
    /// 日志级别
    pub log_level: LogLevel,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            drag_threshold_px: 4.0,

            fen_buffer_capacity: FEN_BUFFER_CAPACITY,
            move_buffer_capacity: MOVE_BUFFER_CAPACITY,
            destinations_buffer_capacity: DESTINATIONS_BUFFER_CAPACITY,
            strategy_list_len: STRATEGY_LIST_LEN,
            strategy_name_len: STRATEGY_NAME_LEN,

            session_path: None,

            log_level: LogLevel::default(),
        }
    }
}

impl ClientSettings {
    /// 获取设置文件路径
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push(APP_DIR_NAME);
            path.push("settings.json");
            path
        })
    }

    /// 从默认位置加载设置
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            tracing::warn!("无法获取配置目录，使用默认设置");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// 从指定文件加载设置，文件缺失或格式无效时使用默认设置
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("设置文件不存在，使用默认设置");
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("已加载设置: {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("设置文件格式无效: {}，使用默认设置", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("无法读取设置文件: {}，使用默认设置", e);
                Self::default()
            }
        }
    }

    /// 保存设置到默认位置
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path().context("无法获取配置目录")?;
        self.save_to(&path)
    }

    /// 保存设置到指定文件
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self).context("序列化设置失败")?;
        std::fs::write(path, content).with_context(|| format!("写入设置文件失败: {:?}", path))?;

        tracing::info!("设置已保存: {:?}", path);
        Ok(())
    }

    /// 会话文件路径
    pub fn resolve_session_path(&self) -> Option<PathBuf> {
        self.session_path.clone().or_else(|| {
            dirs::data_dir().map(|mut path| {
                path.push(APP_DIR_NAME);
                path.push("session.json");
                path
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = ClientSettings::default();
        assert_eq!(settings.fen_buffer_capacity, 128);
        assert_eq!(settings.move_buffer_capacity, 8);
        assert_eq!(settings.log_level, LogLevel::Info);
        assert!(settings.drag_threshold_px > 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("settings.json");

        let settings = ClientSettings {
            drag_threshold_px: 8.0,
            log_level: LogLevel::Debug,
            session_path: Some(temp_dir.path().join("session.json")),
            ..ClientSettings::default()
        };
        settings.save_to(&path).unwrap();

        assert_eq!(ClientSettings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{"drag_threshold_px": 10.0}"#).unwrap();

        let settings = ClientSettings::load_from(&path);
        assert_eq!(settings.drag_threshold_px, 10.0);
        assert_eq!(settings.fen_buffer_capacity, FEN_BUFFER_CAPACITY);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        assert_eq!(ClientSettings::load_from(&path), ClientSettings::default());
        assert_eq!(
            ClientSettings::load_from(&temp_dir.path().join("missing.json")),
            ClientSettings::default()
        );
    }

    #[test]
    fn test_log_level_directive() {
        assert_eq!(LogLevel::Debug.as_directive(), "debug");
        assert_eq!(LogLevel::Warn.display_name(), "Warn");
    }
}
