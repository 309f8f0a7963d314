//! Quality rules for code hygiene

pub mod no_unused_bindings;

pub use no_unused_bindings::NoUnusedBindings;
