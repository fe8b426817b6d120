use ayala_printer::PrintError;
use ayala_sync::SyncError;
use thiserror::Error;

use crate::menus::MenuError;
use crate::orders::CompositionError;
use crate::staff::AuthError;
use crate::tables::LifecycleError;

/// 设备引擎错误
///
/// Store failures never show up here: remote writes are fire-and-forget and
/// only logged. `Sync` covers setup (building the HTTP remote).
#[derive(Error, Debug)]
pub enum FloorError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error(transparent)]
    Menu(#[from] MenuError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("打印失败: {0}")]
    Print(#[from] PrintError),

    #[error("同步层错误: {0}")]
    Sync(#[from] SyncError),
}

impl FloorError {
    /// Operator can retry (e.g. re-allow popups and confirm again)
    pub fn is_retryable(&self) -> bool {
        matches!(self, FloorError::Print(e) if e.is_retryable())
    }
}

pub type FloorResult<T> = Result<T, FloorError>;
