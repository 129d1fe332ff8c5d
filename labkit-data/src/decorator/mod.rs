//! Repository and entity decorators.
//!
//! Each decorator wraps exactly one inner target and adds one cross-cutting
//! behavior; everything not intercepted delegates unchanged. Composition
//! replaces inheritance: the chain is assembled when a collection is
//! registered, innermost physical storage first.

pub mod computed;
pub mod listener;
pub mod locale;
