//! Ayala Sync - optimistic local state bridged to a hosted key-path store
//!
//! Every screen reads a [`SyncedStore`] and writes through it. A write lands in
//! local state synchronously and is then pushed to the remote path in the
//! background; remote notifications replace local state wholesale
//! (last write to arrive wins, no merge).
//!
//! ```text
//!   set()/update() ──▶ local watch ──▶ subscribers (zero latency)
//!          │
//!          └──▶ writer task ──▶ RemoteStore::write(path, sanitize(value))
//!
//!   RemoteStore::watch(path) ──▶ listener task ──▶ revive() ──▶ local watch
//! ```
//!
//! Remote failures are logged and swallowed; local state is never rolled back.

pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod remote;
pub mod store;

pub use cache::LocalCache;
pub use config::RemoteConfig;
pub use error::{SyncError, SyncResult};
pub use remote::{HttpRemote, MemoryRemote, RemoteStore, RemoteWatch};
pub use store::SyncedStore;
