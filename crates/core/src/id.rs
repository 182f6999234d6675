//! Binding identity.

use serde::{Deserialize, Serialize};

/// Stable identity of a binding kind, formatted `module::Type`.
///
/// Derived once at construction from the concrete kind's type path and never
/// changed afterwards. Every instance of the same concrete kind produces the
/// same id, so persisted records stay valid across sessions; distinct kinds
/// never collide because the type path is part of the id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BindingId(pub String);

impl BindingId {
  /// Derive the id for a concrete kind type.
  ///
  /// Keeps the last two segments of the type path, so
  /// `mymod::binds::nail::NailBinding` becomes `nail::NailBinding`.
  pub fn of<K: ?Sized + 'static>() -> Self {
    let full = std::any::type_name::<K>();
    let mut segments: Vec<&str> = full.rsplit("::").take(2).collect();
    segments.reverse();
    Self(segments.join("::"))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Display for BindingId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}
