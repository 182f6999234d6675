//! Advisory gating for binding transitions.
//!
//! Gate checks answer "may the user toggle this right now" with a boolean
//! plus a message suitable for end-user display. They are a UI hint only:
//! `apply`/`restore` never consult them, and a denied gate does not prevent
//! the registry from forcing a transition programmatically.

/// Deny message for the default apply gate.
pub const APPLY_REQUIRES_BENCH: &str = "Must be near a bench to apply this binding.";

/// Deny message for the default restore gate.
pub const RESTORE_REQUIRES_BENCH: &str = "Must be near a bench to restore this binding.";

/// Outcome of a gate check.
///
/// Always definite: an allowed decision carries an empty message, a denied
/// one carries the reason to show the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
  pub allowed: bool,
  pub message: String,
}

impl GateDecision {
  pub fn allow() -> Self {
    Self {
      allowed: true,
      message: String::new(),
    }
  }

  pub fn deny(message: impl Into<String>) -> Self {
    Self {
      allowed: false,
      message: message.into(),
    }
  }
}

/// Read-only signal from the host environment.
///
/// The default gate predicates for both transition directions ask whether
/// the player is currently at a bench.
pub trait EnvironmentProbe {
  fn at_bench(&self) -> bool;
}
