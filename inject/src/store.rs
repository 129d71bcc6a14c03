//! The `Store` capability and the arguments handed to its constructor.

use crate::core::{short_name, Instance};
use crate::error::{InjectError, Result};
use std::any::Any;
use std::sync::Arc;

/// A singleton unit of application state that the container can construct.
///
/// Implementing `Store` is what makes a type constructible: the container
/// calls `construct` exactly once, passing every dependency declared for the
/// type already resolved.
///
/// ```
/// use fibre_inject::{declare, Arguments, Result, Store, StoresMap};
/// use std::sync::Arc;
///
/// struct Settings {
///   title: String,
/// }
///
/// impl Store for Settings {
///   fn construct(_: &Arguments) -> Result<Self> {
///     Ok(Settings { title: "ISUHAR".to_string() })
///   }
/// }
///
/// struct Header {
///   settings: Arc<Settings>,
/// }
///
/// impl Store for Header {
///   fn construct(args: &Arguments) -> Result<Self> {
///     Ok(Header { settings: args.get(0)? })
///   }
/// }
///
/// declare::<Header>().inject::<Settings>(0).unwrap();
///
/// let stores = StoresMap::default();
/// let header = stores.get::<Header>().unwrap();
/// assert_eq!(header.settings.title, "ISUHAR");
/// ```
pub trait Store: Any + Send + Sync + Sized {
  /// Builds the store from its resolved dependencies.
  fn construct(args: &Arguments) -> Result<Self>;
}

/// Resolved dependencies for one constructor call, in ascending parameter order.
///
/// Only declared parameter indices are present.
pub struct Arguments {
  store: &'static str,
  entries: Vec<(usize, Instance)>,
}

impl Arguments {
  pub(crate) fn new(store: &'static str, capacity: usize) -> Self {
    Self {
      store,
      entries: Vec::with_capacity(capacity),
    }
  }

  pub(crate) fn push(&mut self, index: usize, instance: Instance) {
    self.entries.push((index, instance));
  }

  /// Returns the dependency injected at parameter `index`.
  pub fn get<D: Any + Send + Sync>(&self, index: usize) -> Result<Arc<D>> {
    let instance = self
      .entries
      .iter()
      .find(|(declared, _)| *declared == index)
      .map(|(_, instance)| instance.clone())
      .ok_or(InjectError::MissingArgument {
        store: self.store,
        index,
      })?;

    instance
      .downcast::<D>()
      .map_err(|_| InjectError::TypeMismatch {
        store: self.store,
        expected: short_name(std::any::type_name::<D>()),
      })
  }

  /// The declared parameter indices, ascending.
  pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
    self.entries.iter().map(|(index, _)| *index)
  }

  /// The resolved instances, in parameter order.
  pub fn instances(&self) -> impl Iterator<Item = &Instance> + '_ {
    self.entries.iter().map(|(_, instance)| instance)
  }

  /// The name of the store these arguments are for.
  pub fn store(&self) -> &'static str {
    self.store
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
