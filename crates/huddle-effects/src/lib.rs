//! Huddle Effects - Storage handlers
//!
//! Implementations of `huddle_core::StorageEffects`:
//!
//! - [`FilesystemStorageHandler`] — one file per bucket under a base
//!   directory, for real sessions
//! - [`MemoryStorageHandler`] — a HashMap behind an async lock, for tests
//!   and ephemeral sessions
//!
//! Handlers are stateless beyond their configuration and safe to share via
//! `Arc` across every store in a session.

pub mod storage;

pub use storage::filesystem::FilesystemStorageHandler;
pub use storage::memory::MemoryStorageHandler;
