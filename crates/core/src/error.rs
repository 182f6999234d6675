//! Error types for bind-core

use thiserror::Error;

use crate::id::BindingId;

/// Errors that can occur during binding construction and transitions.
#[derive(Debug, Error)]
pub enum CoreError {
  /// Binding constructed without a display name.
  #[error("binding requires a non-empty display name")]
  MissingDisplayName,

  /// `apply` or `restore` was re-entered from one of its own listeners.
  #[error("reentrant transition on binding '{id}'")]
  ReentrantTransition { id: BindingId },

  /// A kind effect hook failed. The state flag has already been flipped
  /// when the hook runs; no listeners are notified.
  #[error("effect hook failed for binding '{id}'")]
  Effect {
    id: BindingId,
    #[source]
    source: anyhow::Error,
  },
}
