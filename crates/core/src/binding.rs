//! The binding lifecycle state machine.
//!
//! A `Binding` is in exactly one of two logical states, applied or restored.
//! Transitions are idempotent: applying an already-applied binding (or
//! restoring a never-applied one) is a no-op that fires no hooks and no
//! notifications. Within a successful transition the ordering is fixed:
//!
//! 1. the state flag flips,
//! 2. the kind effect hook runs,
//! 3. listeners for that direction are notified in registration order.
//!
//! Transitions are not reentrant: a listener that calls `apply`/`restore`
//! on the binding it was notified about gets
//! [`CoreError::ReentrantTransition`] instead of recursing.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;
use crate::gate::{EnvironmentProbe, GateDecision};
use crate::id::BindingId;
use crate::kind::{BindingKind, SnapshotView};
use crate::listen::{Direction, ListenerSet, ListenerToken, TransitionEvent};
use crate::predefined;

/// Outcome of a transition call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
  /// The state flipped; the effect hook ran and listeners were notified.
  Changed,
  /// The binding was already in the requested state; nothing happened.
  AlreadyInState,
}

/// A toggleable binding owning its lifecycle state and listeners.
pub struct Binding {
  id: BindingId,
  display_name: String,
  applied: bool,
  predefined: bool,
  was_applied_snapshot: bool,
  in_transition: bool,
  kind: Box<dyn BindingKind>,
  applied_listeners: ListenerSet,
  restored_listeners: ListenerSet,
}

impl Binding {
  /// Construct a binding for the concrete kind `K`.
  ///
  /// The id is derived from `K`'s type path (`module::Type`) and the
  /// predefined classification is looked up once in the static table.
  /// Fails fast on an empty display name; no partially constructed binding
  /// is ever produced.
  pub fn new<K>(display_name: impl Into<String>, kind: K) -> Result<Self, CoreError>
  where
    K: BindingKind + 'static,
  {
    let display_name = display_name.into();
    if display_name.trim().is_empty() {
      return Err(CoreError::MissingDisplayName);
    }

    let id = BindingId::of::<K>();
    let predefined = predefined::is_predefined(&id);
    debug!(%id, predefined, "constructed binding");

    Ok(Self {
      id,
      display_name,
      applied: false,
      predefined,
      was_applied_snapshot: false,
      in_transition: false,
      kind: Box::new(kind),
      applied_listeners: ListenerSet::new(),
      restored_listeners: ListenerSet::new(),
    })
  }

  pub fn id(&self) -> &BindingId {
    &self.id
  }

  pub fn display_name(&self) -> &str {
    &self.display_name
  }

  pub fn is_applied(&self) -> bool {
    self.applied
  }

  /// Whether this binding is one of the vanilla kinds.
  pub fn is_predefined(&self) -> bool {
    self.predefined
  }

  /// Advisory gate for the apply direction. A denied decision is a UI hint,
  /// not enforcement; `apply` does not consult it.
  pub fn can_be_applied(&self, env: &dyn EnvironmentProbe) -> GateDecision {
    self.kind.can_be_applied(env)
  }

  /// Advisory gate for the restore direction.
  pub fn can_be_restored(&self, env: &dyn EnvironmentProbe) -> GateDecision {
    self.kind.can_be_restored(env)
  }

  /// Register a listener on the "applied" channel.
  pub fn subscribe_applied<F>(&mut self, callback: F) -> ListenerToken
  where
    F: FnMut(&mut Binding, &TransitionEvent) -> anyhow::Result<()> + 'static,
  {
    self.applied_listeners.subscribe(callback)
  }

  /// Register a listener on the "restored" channel.
  pub fn subscribe_restored<F>(&mut self, callback: F) -> ListenerToken
  where
    F: FnMut(&mut Binding, &TransitionEvent) -> anyhow::Result<()> + 'static,
  {
    self.restored_listeners.subscribe(callback)
  }

  /// Remove a listener from the "applied" channel.
  pub fn unsubscribe_applied(&mut self, token: ListenerToken) -> bool {
    self.applied_listeners.unsubscribe(token)
  }

  /// Remove a listener from the "restored" channel.
  pub fn unsubscribe_restored(&mut self, token: ListenerToken) -> bool {
    self.restored_listeners.unsubscribe(token)
  }

  /// Apply the binding.
  ///
  /// No-op if already applied. Otherwise flips the state flag, runs the
  /// kind's `on_applied` hook, then notifies "applied" listeners. A hook
  /// error propagates with the flag left set and no listeners notified.
  pub fn apply(&mut self) -> Result<Transition, CoreError> {
    if self.in_transition {
      return Err(CoreError::ReentrantTransition { id: self.id.clone() });
    }
    if self.applied {
      return Ok(Transition::AlreadyInState);
    }

    self.in_transition = true;
    let result = self.transition(Direction::Applied);
    self.in_transition = false;
    result
  }

  /// Restore the binding.
  ///
  /// No-op if not applied. Otherwise flips the state flag, runs the kind's
  /// `on_restored` hook (which must leave the kind in its freshly
  /// constructed state), then notifies "restored" listeners.
  pub fn restore(&mut self) -> Result<Transition, CoreError> {
    if self.in_transition {
      return Err(CoreError::ReentrantTransition { id: self.id.clone() });
    }
    if !self.applied {
      return Ok(Transition::AlreadyInState);
    }

    self.in_transition = true;
    let result = self.transition(Direction::Restored);
    self.in_transition = false;
    result
  }

  fn transition(&mut self, direction: Direction) -> Result<Transition, CoreError> {
    let hook_result = match direction {
      Direction::Applied => {
        self.applied = true;
        self.kind.on_applied()
      }
      Direction::Restored => {
        self.applied = false;
        self.kind.on_restored()
      }
    };
    hook_result.map_err(|source| CoreError::Effect {
      id: self.id.clone(),
      source,
    })?;

    debug!(id = %self.id, ?direction, "binding transitioned");

    let event = TransitionEvent {
      id: self.id.clone(),
      display_name: self.display_name.clone(),
      direction,
    };

    // The listener set is moved out while callbacks run so they can receive
    // `&mut Binding`; subscriptions made during the pass land in the fresh
    // set and are folded back in afterwards.
    match direction {
      Direction::Applied => {
        let mut listeners = std::mem::take(&mut self.applied_listeners);
        listeners.notify(self, &event);
        listeners.absorb(std::mem::take(&mut self.applied_listeners));
        self.applied_listeners = listeners;
      }
      Direction::Restored => {
        let mut listeners = std::mem::take(&mut self.restored_listeners);
        listeners.notify(self, &event);
        listeners.absorb(std::mem::take(&mut self.restored_listeners));
        self.restored_listeners = listeners;
      }
    }

    Ok(Transition::Changed)
  }

  /// Pre-serialize hook: mirror the live applied flag into the snapshot
  /// field for the persistence pass to read.
  pub fn begin_save(&mut self) {
    self.was_applied_snapshot = self.applied;
  }

  /// Post-serialize hook: clear the snapshot field so it never lingers as
  /// live state.
  pub fn finish_save(&mut self) {
    self.was_applied_snapshot = false;
  }

  /// The snapshot flag. Only meaningful between `begin_save` and
  /// `finish_save`; outside that window it is always false.
  pub fn was_applied_snapshot(&self) -> bool {
    self.was_applied_snapshot
  }

  /// The kind's opt-in persisted fields, evaluated against the current
  /// snapshot window.
  pub fn save_fields(&self) -> BTreeMap<String, Value> {
    let view = SnapshotView::new(self.was_applied_snapshot);
    self.kind.save_fields(&view)
  }

  /// Feed loaded opt-in fields to the kind. Absent fields keep their
  /// construction defaults.
  pub fn load_fields(&mut self, fields: &BTreeMap<String, Value>) {
    self.kind.load_fields(fields);
  }
}

impl std::fmt::Debug for Binding {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Binding")
      .field("id", &self.id)
      .field("display_name", &self.display_name)
      .field("applied", &self.applied)
      .field("predefined", &self.predefined)
      .finish()
  }
}
