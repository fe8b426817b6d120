//! 核心模块 - 配置、状态和错误定义
//!
//! - [`Config`] - 设备配置
//! - [`EdgeState`] - 三个同步集合与各服务
//! - [`FloorError`] - 引擎错误

pub mod config;
pub mod error;
pub mod state;

pub use config::Config;
pub use error::{FloorError, FloorResult};
pub use state::EdgeState;
