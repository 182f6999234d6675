//! End-to-end save/load flow: register, apply, persist to disk, reload into
//! a fresh registry, and replay.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;
use tempfile::TempDir;

use bind_core::{Binding, BindingKind, SnapshotView};
use bind_store::{BindingRegistry, SaveStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct NailState {
  damage_capped: bool,
  applies: u32,
}

struct NailBinding {
  state: Rc<RefCell<NailState>>,
}

impl BindingKind for NailBinding {
  fn on_applied(&mut self) -> anyhow::Result<()> {
    let mut state = self.state.borrow_mut();
    state.damage_capped = true;
    state.applies += 1;
    Ok(())
  }

  fn on_restored(&mut self) -> anyhow::Result<()> {
    self.state.borrow_mut().damage_capped = false;
    Ok(())
  }
}

struct LanternBinding {
  fuel: Rc<RefCell<u32>>,
}

impl BindingKind for LanternBinding {
  fn on_applied(&mut self) -> anyhow::Result<()> {
    *self.fuel.borrow_mut() -= 10;
    Ok(())
  }

  fn on_restored(&mut self) -> anyhow::Result<()> {
    *self.fuel.borrow_mut() = 100;
    Ok(())
  }

  fn save_fields(&self, _snapshot: &SnapshotView) -> BTreeMap<String, Value> {
    BTreeMap::from([("fuel".to_string(), Value::from(*self.fuel.borrow()))])
  }

  fn load_fields(&mut self, fields: &BTreeMap<String, Value>) {
    if let Some(fuel) = fields.get("fuel").and_then(Value::as_u64) {
      *self.fuel.borrow_mut() = fuel as u32;
    }
  }
}

struct Session {
  registry: BindingRegistry,
  nail_state: Rc<RefCell<NailState>>,
  fuel: Rc<RefCell<u32>>,
}

/// A fresh game session: new kinds, construction-default state.
fn session() -> Session {
  let nail_state = Rc::new(RefCell::new(NailState::default()));
  let fuel = Rc::new(RefCell::new(100u32));

  let mut registry = BindingRegistry::new();
  registry
    .register(Binding::new("Nail", NailBinding { state: Rc::clone(&nail_state) }).unwrap())
    .unwrap();
  registry
    .register(Binding::new("Lantern", LanternBinding { fuel: Rc::clone(&fuel) }).unwrap())
    .unwrap();

  Session {
    registry,
    nail_state,
    fuel,
  }
}

#[test]
fn save_reload_replays_applied_bindings() {
  let temp = TempDir::new().unwrap();
  let store = SaveStore::new(temp.path().join("bindings.json"));

  // First session: apply both bindings, then save.
  let mut first = session();
  let nail_id = first.registry.iter().next().unwrap().id().clone();
  let lantern_id = first.registry.iter().nth(1).unwrap().id().clone();

  first.registry.get_mut(&nail_id).unwrap().apply().unwrap();
  first.registry.get_mut(&lantern_id).unwrap().apply().unwrap();
  assert_eq!(*first.fuel.borrow(), 90);

  let data = first.registry.to_save_data();
  store.save(&data).unwrap();

  // The snapshot pass left the live objects untouched.
  assert!(first.registry.get(&nail_id).unwrap().is_applied());
  assert!(!first.registry.get(&nail_id).unwrap().was_applied_snapshot());

  // Second session: fresh state, then load and replay.
  let mut second = session();
  assert!(!second.nail_state.borrow().damage_capped);

  let loaded = store.load().unwrap().expect("save file should exist");
  second.registry.apply_save_data(&loaded).unwrap();

  // Effects re-ran from fresh state rather than being deserialized.
  assert!(second.registry.get(&nail_id).unwrap().is_applied());
  assert!(second.nail_state.borrow().damage_capped);
  assert_eq!(second.nail_state.borrow().applies, 1);

  // The lantern's opt-in field was loaded first, then the effect re-ran.
  assert!(second.registry.get(&lantern_id).unwrap().is_applied());
  assert_eq!(*second.fuel.borrow(), 80);
}

#[test]
fn restore_before_save_round_trips_as_not_applied() {
  let temp = TempDir::new().unwrap();
  let store = SaveStore::new(temp.path().join("bindings.json"));

  let mut first = session();
  let nail_id = first.registry.iter().next().unwrap().id().clone();

  first.registry.get_mut(&nail_id).unwrap().apply().unwrap();
  first.registry.get_mut(&nail_id).unwrap().restore().unwrap();
  store.save(&first.registry.to_save_data()).unwrap();

  let mut second = session();
  let loaded = store.load().unwrap().unwrap();
  second.registry.apply_save_data(&loaded).unwrap();

  assert!(!second.registry.get(&nail_id).unwrap().is_applied());
  assert_eq!(second.nail_state.borrow().applies, 0);
}
