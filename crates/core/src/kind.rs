//! The capability trait concrete binding kinds implement.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::gate::{APPLY_REQUIRES_BENCH, EnvironmentProbe, GateDecision, RESTORE_REQUIRES_BENCH};

/// View over a binding's serialization snapshot, handed to
/// [`BindingKind::save_fields`].
///
/// This is the only window in which the snapshot flag is meaningful: it is
/// set just before the persistence pass reads it and cleared immediately
/// after, so kinds must not stash it for later.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotView {
  was_applied: bool,
}

impl SnapshotView {
  pub(crate) fn new(was_applied: bool) -> Self {
    Self { was_applied }
  }

  /// Whether the binding was applied at the moment the save pass began.
  pub fn was_applied(&self) -> bool {
    self.was_applied
  }
}

/// Effect behavior of a concrete binding kind.
///
/// # Lifecycle
///
/// - `on_applied()` - Activate the kind's effect
/// - `on_restored()` - Deactivate the effect and return to the fresh state
///
/// # Freshness contract
///
/// `on_restored` must leave the kind in the same state as immediately after
/// construction. Repeated apply/restore cycles, including cycles that span a
/// save reload, must behave identically to a first-time application.
/// Violating this is a correctness bug in the concrete kind, not in the
/// lifecycle.
pub trait BindingKind {
  /// Activate this kind's effect. Runs strictly before "applied" listeners
  /// are notified.
  fn on_applied(&mut self) -> anyhow::Result<()>;

  /// Deactivate the effect, leaving the kind in its freshly constructed
  /// state. Runs strictly before "restored" listeners are notified.
  fn on_restored(&mut self) -> anyhow::Result<()>;

  /// Advisory gate for the apply direction. Kinds may override with
  /// stricter or different preconditions, keeping the bool-plus-message
  /// contract.
  fn can_be_applied(&self, env: &dyn EnvironmentProbe) -> GateDecision {
    if env.at_bench() {
      GateDecision::allow()
    } else {
      GateDecision::deny(APPLY_REQUIRES_BENCH)
    }
  }

  /// Advisory gate for the restore direction.
  fn can_be_restored(&self, env: &dyn EnvironmentProbe) -> GateDecision {
    if env.at_bench() {
      GateDecision::allow()
    } else {
      GateDecision::deny(RESTORE_REQUIRES_BENCH)
    }
  }

  /// Opt-in persisted fields. Anything not returned here is excluded from
  /// save data and resets to construction defaults on load.
  fn save_fields(&self, _snapshot: &SnapshotView) -> BTreeMap<String, Value> {
    BTreeMap::new()
  }

  /// Restore opt-in fields from loaded save data. Fields absent from the
  /// map keep their construction defaults.
  fn load_fields(&mut self, _fields: &BTreeMap<String, Value>) {}
}
