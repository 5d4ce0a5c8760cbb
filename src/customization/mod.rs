//! Customization model: per-part colors, tagged variants, accessory, persistence.

/// Part keys, tagged color variants and accessories.
pub mod palette;
/// The persisted customization state and its invariants.
pub mod state;
/// Key-value store collaborator and built-in stores.
pub mod store;
