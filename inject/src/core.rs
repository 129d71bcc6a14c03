//! Core data structures: store keys, erased instances and the dependency chain.

use crate::error::{DependencyChain, InjectError, InvalidReason, Result};
use crate::store::{Arguments, Store};
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A constructed store with its concrete type erased.
pub type Instance = Arc<dyn Any + Send + Sync>;

pub(crate) type Constructor = fn(&Arguments) -> Result<Instance>;

thread_local! {
  // The stores currently being planned or constructed on this thread, in the
  // order they were entered. A store that shows up twice is a cycle.
  static DEPENDENCY_CHAIN: RefCell<Vec<StoreType>> = RefCell::new(Vec::new());
}

/// How much of the dependency chain a `CircularDependency` error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleReport {
  /// Every store on the chain at the moment the cycle was found.
  #[default]
  FullPath,
  /// Only the stores from the first occurrence of the repeated store onward.
  MinimalCycle,
}

/// Identifies a store type.
///
/// Equality and hashing use the `TypeId` only, so two tokens for the same
/// type are interchangeable map keys. Tokens created with [`StoreType::of`]
/// also carry the type's constructor.
#[derive(Clone, Copy)]
pub struct StoreType {
  id: TypeId,
  name: &'static str,
  constructor: Option<Constructor>,
}

impl StoreType {
  /// The token for a constructible store type.
  pub fn of<T: Store>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: short_name(std::any::type_name::<T>()),
      constructor: Some(construct_erased::<T>),
    }
  }

  /// A token for any type, without a constructor.
  ///
  /// Useful for describing constructor parameters whose type the container
  /// cannot build. Declaring such a token as a dependency is rejected.
  pub fn opaque<T: ?Sized + Any>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: short_name(std::any::type_name::<T>()),
      constructor: None,
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn type_id(&self) -> TypeId {
    self.id
  }

  pub fn is_constructible(&self) -> bool {
    self.constructor.is_some()
  }

  /// Runs the constructor. `requester` is the store or container that asked
  /// for this one and is named if there is no constructor.
  pub(crate) fn construct(
    &self,
    requester: &'static str,
    arguments: &Arguments,
  ) -> Result<Instance> {
    match self.constructor {
      Some(constructor) => constructor(arguments),
      None => Err(InjectError::invalid(
        requester,
        InvalidReason::NotConstructible {
          dependency: self.name,
        },
      )),
    }
  }
}

fn construct_erased<T: Store>(arguments: &Arguments) -> Result<Instance> {
  T::construct(arguments).map(|store| Arc::new(store) as Instance)
}

impl PartialEq for StoreType {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for StoreType {}

impl Hash for StoreType {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Debug for StoreType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "StoreType({})", self.name)
  }
}

impl fmt::Display for StoreType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

/// Strips the module path from a type name, keeping generic arguments intact.
pub(crate) fn short_name(full: &'static str) -> &'static str {
  let generic_start = full.find('<').unwrap_or(full.len());
  match full[..generic_start].rfind("::") {
    Some(pos) => &full[pos + 2..],
    None => full,
  }
}

/// An RAII guard marking a store as in progress on this thread.
///
/// Entering a store that is already on the chain fails with
/// `CircularDependency`. Dropping the guard takes the store back off, so the
/// same store can be reached again through an unrelated branch.
pub(crate) struct ChainGuard {
  store: StoreType,
}

impl ChainGuard {
  pub(crate) fn enter(store: StoreType, report: CycleReport) -> Result<Self> {
    DEPENDENCY_CHAIN.with(|chain| {
      let mut chain = chain.borrow_mut();
      if let Some(pos) = chain.iter().position(|entered| *entered == store) {
        let start = match report {
          CycleReport::FullPath => 0,
          CycleReport::MinimalCycle => pos,
        };
        let names = chain[start..]
          .iter()
          .map(StoreType::name)
          .chain(std::iter::once(store.name))
          .collect();
        return Err(InjectError::CircularDependency {
          chain: DependencyChain::new(names),
        });
      }
      chain.push(store);
      Ok(Self { store })
    })
  }
}

impl Drop for ChainGuard {
  fn drop(&mut self) {
    DEPENDENCY_CHAIN.with(|chain| {
      let mut chain = chain.borrow_mut();
      if let Some(pos) = chain.iter().rposition(|entered| *entered == self.store) {
        chain.remove(pos);
      }
    });
  }
}
