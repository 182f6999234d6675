//! The owning registry of all bindings.
//!
//! The registry holds bindings in insertion order, keyed by id, and is the
//! external driver of the lifecycle: it decides when transitions run and it
//! performs the two-phase serialization snapshot. On load it replays
//! recorded `was_applied` flags through `apply()`, so effects re-run from a
//! fresh state instead of being deserialized.

use tracing::{debug, warn};

use bind_core::{Binding, BindingId};

use crate::error::StoreError;
use crate::save::{BindingRecord, SaveData};

/// Insertion-ordered collection of bindings, keyed by id.
#[derive(Debug, Default)]
pub struct BindingRegistry {
  bindings: Vec<Binding>,
}

impl BindingRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a binding. Ids are unique; a second binding of the same kind
  /// is rejected.
  pub fn register(&mut self, binding: Binding) -> Result<(), StoreError> {
    if self.get(binding.id()).is_some() {
      return Err(StoreError::DuplicateBinding(binding.id().clone()));
    }
    debug!(id = %binding.id(), "registered binding");
    self.bindings.push(binding);
    Ok(())
  }

  pub fn get(&self, id: &BindingId) -> Option<&Binding> {
    self.bindings.iter().find(|b| b.id() == id)
  }

  pub fn get_mut(&mut self, id: &BindingId) -> Option<&mut Binding> {
    self.bindings.iter_mut().find(|b| b.id() == id)
  }

  /// Iterate bindings in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = &Binding> {
    self.bindings.iter()
  }

  pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Binding> {
    self.bindings.iter_mut()
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }

  /// Capture save data with the two-phase snapshot protocol.
  ///
  /// For each binding: `begin_save` mirrors the live applied flag into the
  /// snapshot field, the record is built from that snapshot (including the
  /// kind's opt-in fields), then `finish_save` clears the snapshot so it
  /// never lingers as live state. After this pass every binding's snapshot
  /// flag reads false again, whatever its live state.
  pub fn to_save_data(&mut self) -> SaveData {
    let mut data = SaveData::new();
    for binding in &mut self.bindings {
      binding.begin_save();
      let record = BindingRecord {
        id: binding.id().clone(),
        was_applied: binding.was_applied_snapshot(),
        fields: binding.save_fields(),
      };
      binding.finish_save();
      data.bindings.push(record);
    }
    debug!(bindings = data.bindings.len(), "captured save data");
    data
  }

  /// Replay loaded save data onto the registered bindings.
  ///
  /// Opt-in fields are fed to each kind first, then bindings recorded as
  /// applied are applied again so their effects re-run. Records for unknown
  /// ids are skipped with a warning; registered bindings without a record
  /// keep their construction defaults.
  pub fn apply_save_data(&mut self, data: &SaveData) -> Result<(), StoreError> {
    for record in &data.bindings {
      let Some(binding) = self.get_mut(&record.id) else {
        warn!(id = %record.id, "save data references unknown binding, skipping");
        continue;
      };

      if !record.fields.is_empty() {
        binding.load_fields(&record.fields);
      }
      if record.was_applied {
        binding.apply().map_err(StoreError::Replay)?;
      }
    }
    Ok(())
  }
}
