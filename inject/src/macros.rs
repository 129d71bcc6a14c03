//! Public macros for ergonomic declaration and resolution.

/// Resolves a store from a container, panicking if resolution fails.
///
/// Meant for start-up code where a missing or cyclic store is fatal. For a
/// non-panicking version, call `stores.get::<T>()` directly.
///
/// # Panics
///
/// Panics with the resolution error, e.g. on a circular dependency.
///
/// # Examples
///
/// ```
/// use fibre_inject::{resolve, Arguments, Result, Store, StoresMap};
///
/// struct Theme;
/// impl Store for Theme {
///   fn construct(_: &Arguments) -> Result<Self> { Ok(Theme) }
/// }
///
/// let stores = StoresMap::default();
/// let _theme = resolve!(stores, Theme);
/// ```
#[macro_export]
macro_rules! resolve {
  ($stores:expr, $type:ty) => {
    $stores.get::<$type>().unwrap_or_else(|err| {
      panic!(
        "Failed to resolve required store {}: {}",
        std::any::type_name::<$type>(),
        err
      )
    })
  };
}

/// Declares the injected constructor parameters of a store in one go.
///
/// Evaluates to `fibre_inject::Result<()>`; the first rejected parameter
/// stops the declaration.
///
/// # Examples
///
/// ```
/// use fibre_inject::{declare, Arguments, Result, Store};
///
/// struct Api;
/// impl Store for Api {
///   fn construct(_: &Arguments) -> Result<Self> { Ok(Api) }
/// }
/// struct Cache;
/// impl Store for Cache {
///   fn construct(_: &Arguments) -> Result<Self> { Ok(Cache) }
/// }
/// struct Feed;
/// impl Store for Feed {
///   fn construct(_: &Arguments) -> Result<Self> { Ok(Feed) }
/// }
///
/// declare!(Feed { 0 => Api, 1 => Cache }).unwrap();
/// ```
#[macro_export]
macro_rules! declare {
  ($owner:ty { $($index:literal => $dependency:ty),* $(,)? }) => {
    (|| -> $crate::Result<()> {
      let declarer = $crate::declare::<$owner>();
      $( let declarer = declarer.inject::<$dependency>($index)?; )*
      let _ = declarer;
      Ok(())
    })()
  };
}
