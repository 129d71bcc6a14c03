//! The process-wide declaration registry.

use crate::declaration::Registry;
use once_cell::sync::Lazy;

// Declarations live for the whole process, alongside the types they describe.
// The registry is created on first access in a thread-safe manner.
static REGISTRY: Lazy<Registry> = Lazy::new(Registry::default);

/// Provides a reference to the global declaration registry.
///
/// # Examples
///
/// ```
/// use fibre_inject::{registry, Arguments, Result, Store, StoreType};
///
/// struct Clock;
/// impl Store for Clock {
///   fn construct(_: &Arguments) -> Result<Self> { Ok(Clock) }
/// }
///
/// // Forbid `Clock` from being injected anywhere.
/// registry().deny(StoreType::of::<Clock>());
/// assert!(registry().is_denied(StoreType::of::<Clock>()));
/// ```
pub fn registry() -> &'static Registry {
  &REGISTRY
}
