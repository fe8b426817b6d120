//! Tables - lifecycle rules and the floor service that applies them

pub mod lifecycle;
mod service;

pub use lifecycle::{CloseOutcome, LifecycleError, LifecycleResult};
pub use service::FloorService;
