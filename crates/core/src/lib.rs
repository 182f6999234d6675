//! bind-core: Toggle lifecycle for challenge bindings.
//!
//! A binding is an entity that is in exactly one of two logical states,
//! applied or restored, with guarded idempotent transitions. This crate
//! provides:
//! - `Binding`: the lifecycle state machine (transitions, listeners,
//!   serialization snapshot hooks)
//! - `BindingKind`: the capability trait concrete kinds implement
//! - `GateDecision` / `EnvironmentProbe`: advisory transition gating
//! - `predefined`: the static table of vanilla binding kinds
//!
//! The owning registry and save-file store live in the `bind-store` crate.

pub mod binding;
pub mod error;
pub mod gate;
pub mod id;
pub mod kind;
pub mod listen;
pub mod predefined;

pub use binding::{Binding, Transition};
pub use error::CoreError;
pub use gate::{EnvironmentProbe, GateDecision};
pub use id::BindingId;
pub use kind::{BindingKind, SnapshotView};
pub use listen::{Direction, ListenerSet, ListenerToken, TransitionEvent};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
