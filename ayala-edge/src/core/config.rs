use std::path::PathBuf;

use chrono_tz::Tz;

/// 设备配置 - 前台设备的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (缓存、日志、打印输出) |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | production 时为 true | JSON 日志格式 |
/// | REMOTE_URL | (未设置) | 实时数据库地址；未设置时使用内存存储 |
/// | REMOTE_AUTH_TOKEN | (未设置) | 实时数据库 auth 参数 |
/// | REMOTE_ROOT | (空) | 集合路径前缀 |
/// | REMOTE_TIMEOUT_SECS | 30 | 请求超时(秒) |
/// | TIMEZONE | Asia/Jerusalem | 票据时间的时区 |
/// | RECEIPT_TITLE | איילה פשוט טעים | 账单抬头 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/ayala REMOTE_URL=https://example.firebaseio.com cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储缓存、日志、打印文件
    pub work_dir: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 是否输出 JSON 日志
    pub log_json: bool,

    // === 远程存储 ===
    /// 实时数据库 URL (None = 内存存储，单机模式)
    pub remote_url: Option<String>,
    /// 实时数据库 token
    pub remote_auth_token: Option<String>,
    /// 集合路径前缀 (e.g. "ayala" → "ayala/tables")
    pub remote_root: String,
    /// 请求超时时间 (秒)
    pub remote_timeout_secs: u64,

    // === 打印 ===
    /// 票据时区
    pub timezone: Tz,
    /// 账单抬头
    pub receipt_title: String,
}

/// Default bill header
pub const DEFAULT_RECEIPT_TITLE: &str = "איילה פשוט טעים";

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let log_json = std::env::var("LOG_JSON")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(environment == "production");

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json,
            environment,
            remote_url: std::env::var("REMOTE_URL").ok().filter(|u| !u.trim().is_empty()),
            remote_auth_token: std::env::var("REMOTE_AUTH_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            remote_root: std::env::var("REMOTE_ROOT").unwrap_or_default(),
            remote_timeout_secs: std::env::var("REMOTE_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(chrono_tz::Asia::Jerusalem),
            receipt_title: std::env::var("RECEIPT_TITLE")
                .unwrap_or_else(|_| DEFAULT_RECEIPT_TITLE.into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景: 指定工作目录，强制内存存储
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.remote_url = None;
        config.remote_auth_token = None;
        config.remote_root = String::new();
        config.timezone = chrono_tz::Asia::Jerusalem;
        config.receipt_title = DEFAULT_RECEIPT_TITLE.into();
        config
    }

    /// 本地快照目录
    pub fn cache_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("cache")
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 打印输出目录
    pub fn print_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("prints")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
