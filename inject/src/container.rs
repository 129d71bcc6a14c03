//! The `StoresMap` container and its builder.

use crate::core::{ChainGuard, CycleReport, Instance, StoreType};
use crate::error::{InjectError, InvalidReason, MisuseReason, Result};
use crate::global::registry;
use crate::store::{Arguments, Store};
use dashmap::DashMap;
use parking_lot::ReentrantMutex;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// A pre-built store handed to the container at creation time.
pub struct Seed {
  store: StoreType,
  instance: Instance,
}

impl Seed {
  pub fn new<T: Store>(store: T) -> Self {
    Self::from_arc(Arc::new(store))
  }

  pub fn from_arc<T: Store>(store: Arc<T>) -> Self {
    Self {
      store: StoreType::of::<T>(),
      instance: store,
    }
  }

  pub fn store_type(&self) -> StoreType {
    self.store
  }
}

struct Shared {
  instances: DashMap<StoreType, Instance>,
  // Held around check-cache / plan / construct / insert so that two threads
  // never construct the same store. Re-entrant because constructors may call
  // back into the container they were injected with.
  resolution: ReentrantMutex<()>,
  cycle_report: CycleReport,
}

/// The container owning one instance per store type.
///
/// Instances are constructed on first request, with every declared dependency
/// resolved first, and are never replaced afterwards. `StoresMap` is a cheap
/// handle: clones share the same instances.
///
/// The container registers itself under `StoreType::of::<StoresMap>()`, so a
/// store may declare the container as one of its dependencies.
///
/// The stores being resolved are tracked per thread, not per container. A
/// constructor that asks a *different* container, on the same thread, for a
/// store type still in progress here gets `CircularDependency` even though
/// the two containers share no instances.
#[derive(Clone)]
pub struct StoresMap {
  shared: Arc<Shared>,
}

impl fmt::Debug for StoresMap {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StoresMap")
      .field("len", &self.len())
      .field("cycle_report", &self.shared.cycle_report)
      .finish_non_exhaustive()
  }
}

impl Default for StoresMap {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl StoresMap {
  /// Creates a container seeded with pre-built stores.
  pub fn new(seeds: impl IntoIterator<Item = Seed>) -> Self {
    Self::builder().seeds(seeds).build()
  }

  pub fn builder() -> StoresMapBuilder {
    StoresMapBuilder::default()
  }

  /// Returns the `T` instance, constructing it and its dependencies on first use.
  ///
  /// `get::<StoresMap>()` returns a new `Arc` around a handle to this
  /// container on every call, so two such results are not `Arc::ptr_eq`.
  /// Compare them with [`StoresMap::ptr_eq`].
  pub fn get<T: Store>(&self) -> Result<Arc<T>> {
    let store = StoreType::of::<T>();
    self
      .get_type(store)?
      .downcast::<T>()
      .map_err(|_| InjectError::TypeMismatch {
        store: store.name(),
        expected: store.name(),
      })
  }

  /// Returns the instance for `store`, constructing it on first use.
  ///
  /// The container entry is a fresh `Arc` per call, as with [`get`](Self::get).
  pub fn get_type(&self, store: StoreType) -> Result<Instance> {
    if let Some(instance) = self.cached(store) {
      tracing::trace!(store = store.name(), "store cache hit");
      return Ok(instance);
    }

    let _resolution = self.shared.resolution.lock();
    // Another thread may have finished it while we waited.
    if let Some(instance) = self.cached(store) {
      return Ok(instance);
    }

    let mut plan = Vec::new();
    if let Err(err) = self.plan(store, &mut plan) {
      tracing::warn!(store = store.name(), error = %err, "store resolution failed");
      return Err(err);
    }
    tracing::debug!(
      store = store.name(),
      dependencies = plan.len(),
      "resolving store"
    );

    for (dependency, requester) in plan {
      self.construct(dependency, requester)?;
    }
    self.construct(store, CONTAINER)
  }

  pub fn has<T: Store>(&self) -> bool {
    self.has_type(StoreType::of::<T>())
  }

  /// Whether `store` is already cached. Never constructs anything.
  pub fn has_type(&self, store: StoreType) -> bool {
    is_container(store) || self.shared.instances.contains_key(&store)
  }

  /// The number of cached stores, the container's own entry included.
  pub fn len(&self) -> usize {
    self.shared.instances.len() + 1
  }

  pub fn is_empty(&self) -> bool {
    false
  }

  /// Whether both handles refer to the same container.
  pub fn ptr_eq(&self, other: &StoresMap) -> bool {
    Arc::ptr_eq(&self.shared, &other.shared)
  }

  pub fn cycle_report(&self) -> CycleReport {
    self.shared.cycle_report
  }

  fn cached(&self, store: StoreType) -> Option<Instance> {
    if is_container(store) {
      return Some(Arc::new(self.clone()));
    }
    self
      .shared
      .instances
      .get(&store)
      .map(|entry| entry.value().clone())
  }

  // Walks the uncached dependencies of `store` depth-first and appends them
  // to `plan` in construction order, each with the store that requires it.
  // `store` itself is not appended.
  fn plan(&self, store: StoreType, plan: &mut Vec<(StoreType, &'static str)>) -> Result<()> {
    let _guard = ChainGuard::enter(store, self.shared.cycle_report)?;

    for (_, dependency) in registry().seal(store) {
      if self.has_type(dependency) || plan.iter().any(|(planned, _)| *planned == dependency) {
        continue;
      }
      registry().check_valid_dependency(store.name(), dependency)?;
      self.plan(dependency, plan)?;
      plan.push((dependency, store.name()));
    }
    Ok(())
  }

  fn construct(&self, store: StoreType, requester: &'static str) -> Result<Instance> {
    // A constructor earlier in the plan may have resolved it through the container.
    if let Some(instance) = self.cached(store) {
      tracing::trace!(store = store.name(), "store already constructed");
      return Ok(instance);
    }
    // Stays on the chain while its constructor runs.
    let _guard = ChainGuard::enter(store, self.shared.cycle_report)?;

    let dependencies = registry().seal(store);
    let mut arguments = Arguments::new(store.name(), dependencies.len());
    for (index, dependency) in dependencies {
      let instance = self.cached(dependency).ok_or_else(|| {
        InjectError::invalid(
          store.name(),
          InvalidReason::NotResolved {
            dependency: dependency.name(),
          },
        )
      })?;
      arguments.push(index, instance);
    }

    let instance = store.construct(requester, &arguments)?;
    self.shared.instances.insert(store, instance.clone());
    tracing::debug!(store = store.name(), "store constructed");
    Ok(instance)
  }
}

const CONTAINER: &str = "StoresMap";

fn is_container(store: StoreType) -> bool {
  store.type_id() == TypeId::of::<StoresMap>()
}

impl Store for StoresMap {
  fn construct(_: &Arguments) -> Result<Self> {
    Err(InjectError::misused(
      CONTAINER,
      MisuseReason::ReservedContainer,
    ))
  }
}

/// A builder for creating `StoresMap` instances.
#[derive(Default)]
pub struct StoresMapBuilder {
  seeds: Vec<Seed>,
  cycle_report: CycleReport,
}

impl fmt::Debug for StoresMapBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StoresMapBuilder")
      .field("seeds", &self.seeds.len())
      .field("cycle_report", &self.cycle_report)
      .finish()
  }
}

impl StoresMapBuilder {
  /// Seeds a pre-built store. It is served as-is and never constructed.
  pub fn seed<T: Store>(mut self, store: T) -> Self {
    self.seeds.push(Seed::new(store));
    self
  }

  pub fn seeds(mut self, seeds: impl IntoIterator<Item = Seed>) -> Self {
    self.seeds.extend(seeds);
    self
  }

  /// Sets how much of the chain a cycle error reports.
  pub fn cycle_report(mut self, report: CycleReport) -> Self {
    self.cycle_report = report;
    self
  }

  pub fn build(self) -> StoresMap {
    let instances = DashMap::with_capacity(self.seeds.len());
    for seed in self.seeds {
      if is_container(seed.store) {
        tracing::warn!("ignoring a seed for the reserved container entry");
        continue;
      }
      tracing::trace!(store = seed.store.name(), "store seeded");
      instances.insert(seed.store, seed.instance);
    }

    StoresMap {
      shared: Arc::new(Shared {
        instances,
        resolution: ReentrantMutex::new(()),
        cycle_report: self.cycle_report,
      }),
    }
  }
}
