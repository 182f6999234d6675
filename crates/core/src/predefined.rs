//! Static table of the vanilla binding kinds.
//!
//! Whether a binding is one of the kinds shipping with the base game is a
//! one-time classification made at construction. The table is an explicit
//! list of kind ids rather than a type-level marker, so host mods can read
//! it and tests can pin the exact entries.

use crate::id::BindingId;

/// Ids of the vanilla binding kinds.
const PREDEFINED_KIND_IDS: &[&str] = &[
  "nail::NailBinding",
  "shell::ShellBinding",
  "charms::CharmsBinding",
  "soul::SoulBinding",
];

/// Whether the given kind id belongs to a vanilla binding.
pub fn is_predefined(id: &BindingId) -> bool {
  PREDEFINED_KIND_IDS.contains(&id.as_str())
}
