//! Error types for bind-store

use std::io;

use thiserror::Error;

use bind_core::{BindingId, CoreError};

/// Errors that can occur in registry and save-file operations.
#[derive(Debug, Error)]
pub enum StoreError {
  /// A binding with this id is already registered.
  #[error("binding '{0}' is already registered")]
  DuplicateBinding(BindingId),

  /// Failed to read the save file.
  #[error("failed to read save data: {0}")]
  Read(#[source] io::Error),

  /// Failed to write the save file.
  #[error("failed to write save data: {0}")]
  Write(#[source] io::Error),

  /// Failed to create the save directory.
  #[error("failed to create save directory: {0}")]
  CreateDir(#[source] io::Error),

  /// Failed to parse the save file JSON.
  #[error("failed to parse save data: {0}")]
  Parse(#[source] serde_json::Error),

  /// Failed to serialize save data.
  #[error("failed to serialize save data: {0}")]
  Serialize(#[source] serde_json::Error),

  /// Save file written by an incompatible version.
  #[error("unsupported save data version: {0}")]
  UnsupportedVersion(u32),

  /// Reapplying a recorded binding failed during load.
  #[error("failed to reapply binding from save data")]
  Replay(#[source] CoreError),
}
