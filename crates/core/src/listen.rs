//! Listener registration and notification for binding transitions.
//!
//! Each binding carries two independent listener sets, one per transition
//! direction. Listeners are invoked synchronously in registration order and
//! a failing listener never suppresses the ones registered after it; its
//! error is logged and iteration continues.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::binding::Binding;
use crate::id::BindingId;

/// Transition direction carried by a [`TransitionEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Applied,
  Restored,
}

/// Payload handed to listeners after a successful transition.
///
/// The effect hook has already run when listeners see this, so the binding
/// passed alongside is observed with its effect active (or fully restored).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEvent {
  pub id: BindingId,
  pub display_name: String,
  pub direction: Direction,
}

/// Handle identifying a registered listener, returned by `subscribe` and
/// accepted by `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(u64);

impl ListenerToken {
  fn next() -> Self {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    Self(NEXT.fetch_add(1, Ordering::Relaxed))
  }
}

type Callback = Box<dyn FnMut(&mut Binding, &TransitionEvent) -> anyhow::Result<()>>;

/// Ordered set of listeners for one transition direction.
#[derive(Default)]
pub struct ListenerSet {
  entries: Vec<(ListenerToken, Callback)>,
}

impl ListenerSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a callback, returning its token. Callbacks fire in
  /// registration order.
  pub fn subscribe<F>(&mut self, callback: F) -> ListenerToken
  where
    F: FnMut(&mut Binding, &TransitionEvent) -> anyhow::Result<()> + 'static,
  {
    let token = ListenerToken::next();
    self.entries.push((token, Box::new(callback)));
    token
  }

  /// Remove a previously registered callback. Returns false if the token is
  /// unknown.
  pub fn unsubscribe(&mut self, token: ListenerToken) -> bool {
    let before = self.entries.len();
    self.entries.retain(|(t, _)| *t != token);
    self.entries.len() != before
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Invoke every listener in registration order. A listener error is
  /// logged and does not stop the remaining listeners.
  pub(crate) fn notify(&mut self, binding: &mut Binding, event: &TransitionEvent) {
    for (token, callback) in &mut self.entries {
      if let Err(err) = callback(binding, event) {
        warn!(
          listener = token.0,
          binding = %event.id,
          error = %err,
          "listener failed during notification"
        );
      }
    }
  }

  /// Append the entries of another set, preserving order. Used to fold
  /// subscriptions made during a notification pass back into the live set.
  pub(crate) fn absorb(&mut self, other: ListenerSet) {
    self.entries.extend(other.entries);
  }
}

impl std::fmt::Debug for ListenerSet {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ListenerSet").field("len", &self.entries.len()).finish()
  }
}
