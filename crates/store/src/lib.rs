//! bind-store: Registry and save-file persistence for bindings.
//!
//! This crate provides the two collaborators that drive a binding through
//! its lifecycle:
//! - `BindingRegistry`: the insertion-ordered owner of all bindings, keyed
//!   by id, responsible for the two-phase serialization snapshot and for
//!   replaying applied bindings after a load
//! - `SaveStore`: the JSON save file on disk, written atomically

pub mod error;
pub mod registry;
pub mod save;

pub use error::StoreError;
pub use registry::BindingRegistry;
pub use save::{BindingRecord, SAVE_DATA_VERSION, SaveData, SaveStore};

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
