//! Late-bound injection for consumers the container does not construct.

use crate::container::StoresMap;
use crate::core::{short_name, StoreType};
use crate::error::{InjectError, InvalidReason, MisuseReason, Result};
use crate::global::registry;
use crate::store::Store;
use std::marker::PhantomData;
use std::sync::Arc;

/// The host capability required for property injection.
///
/// Whatever builds components (a UI layer, a request handler) is responsible
/// for handing them a container; the component only exposes it here.
pub trait Component {
  fn stores(&self) -> Option<&StoresMap>;
}

/// A read-only accessor for a `T` held by a component's container.
///
/// ```
/// use fibre_inject::{Arguments, Component, Injected, Result, Store, StoresMap};
///
/// struct Counter;
/// impl Store for Counter {
///   fn construct(_: &Arguments) -> Result<Self> { Ok(Counter) }
/// }
///
/// struct Screen {
///   stores: Option<StoresMap>,
///   counter: Injected<Counter>,
/// }
///
/// impl Component for Screen {
///   fn stores(&self) -> Option<&StoresMap> { self.stores.as_ref() }
/// }
///
/// let screen = Screen {
///   stores: Some(StoresMap::default()),
///   counter: Injected::declare("counter").unwrap(),
/// };
/// assert!(screen.counter.get(&screen).is_ok());
/// ```
pub struct Injected<T: Store> {
  property: &'static str,
  _store: PhantomData<fn() -> T>,
}

impl<T: Store> Injected<T> {
  /// Declares `property` as injected with the container's `T`.
  pub fn declare(property: &'static str) -> Result<Self> {
    let store = StoreType::of::<T>();
    if property.is_empty() {
      return Err(InjectError::misused(store.name(), MisuseReason::EmptyProperty));
    }
    registry().check_valid_dependency(property, store)?;
    Ok(Self {
      property,
      _store: PhantomData,
    })
  }

  /// Reads the store from the component's container.
  ///
  /// Fails with `InvalidDependency` if the component has no container yet.
  pub fn get<C: Component + ?Sized>(&self, component: &C) -> Result<Arc<T>> {
    let stores = component.stores().ok_or_else(|| {
      InjectError::invalid(
        short_name(std::any::type_name::<C>()),
        InvalidReason::NoContainer {
          property: self.property,
        },
      )
    })?;
    stores.get::<T>()
  }

  /// Resolves the store ahead of the first read, when the component mounts.
  pub fn mount<C: Component + ?Sized>(&self, component: &C) -> Result<()> {
    self.get(component).map(|_| ())
  }

  pub fn property(&self) -> &'static str {
    self.property
  }
}
