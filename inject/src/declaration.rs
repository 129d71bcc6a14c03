//! The declaration layer: which constructor parameters of a store are injected,
//! and with which store type.

use crate::core::StoreType;
use crate::error::{InjectError, InvalidReason, MisuseReason, Result};
use crate::global::registry;
use crate::store::Store;
use dashmap::{DashMap, DashSet};
use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

/// Constructor parameter indices at or above this bound are refused.
pub const MAX_PARAMETERS: usize = 256;

#[derive(Default)]
struct Declaration {
  // Declared parameter types, by constructor parameter index.
  parameters: BTreeMap<usize, StoreType>,
  // Injected indices in declaration order; sorted when read.
  injected: Vec<usize>,
  sealed: bool,
}

impl Declaration {
  fn dependencies(&self) -> Vec<(usize, StoreType)> {
    let mut dependencies: Vec<(usize, StoreType)> = self
      .injected
      .iter()
      .filter_map(|&index| {
        self
          .parameters
          .get(&index)
          .map(|&dependency| (index, dependency))
      })
      .collect();
    dependencies.sort_by_key(|(index, _)| *index);
    dependencies
  }

  // An injected index keeps the type it was validated with.
  fn check_retype(&self, owner: StoreType, index: usize, ty: StoreType) -> Result<()> {
    if self.injected.contains(&index) && self.parameters.get(&index) != Some(&ty) {
      return Err(InjectError::misused(
        owner.name(),
        MisuseReason::InjectedParameterRetyped { index },
      ));
    }
    Ok(())
  }
}

fn check_index(owner: StoreType, index: usize) -> Result<()> {
  if index >= MAX_PARAMETERS {
    return Err(InjectError::misused(
      owner.name(),
      MisuseReason::ParameterOutOfRange { index },
    ));
  }
  Ok(())
}

/// The process-wide table of store declarations.
///
/// Declarations are appended while the application sets itself up and are
/// frozen for an owner the first time a container resolves it. Access the
/// shared instance through [`registry()`].
pub struct Registry {
  declarations: DashMap<StoreType, Declaration>,
  denied: DashSet<TypeId>,
}

impl Default for Registry {
  fn default() -> Self {
    let registry = Self {
      declarations: DashMap::new(),
      denied: DashSet::new(),
    };
    for native in default_denied() {
      registry.deny(native);
    }
    registry
  }
}

impl Registry {
  /// Records the constructor parameter types of `owner`, by index.
  ///
  /// This is the table `declare_dependency` reads the dependency type from.
  /// It replaces any earlier table, but an index already declared as injected
  /// must keep its type. At most [`MAX_PARAMETERS`] types are accepted.
  pub fn declare_parameters(
    &self,
    owner: StoreType,
    types: impl IntoIterator<Item = StoreType>,
  ) -> Result<()> {
    let mut declaration = self.declarations.entry(owner).or_default();
    if declaration.sealed {
      return Err(InjectError::misused(owner.name(), MisuseReason::Sealed));
    }
    let mut parameters = BTreeMap::new();
    for (index, ty) in types.into_iter().enumerate() {
      check_index(owner, index)?;
      declaration.check_retype(owner, index, ty)?;
      parameters.insert(index, ty);
    }
    if let Some(&index) = declaration
      .injected
      .iter()
      .find(|&&index| !parameters.contains_key(&index))
    {
      return Err(InjectError::misused(
        owner.name(),
        MisuseReason::InjectedParameterRetyped { index },
      ));
    }
    declaration.parameters = parameters;
    Ok(())
  }

  /// Records the type of a single constructor parameter of `owner`.
  pub fn declare_parameter(&self, owner: StoreType, index: usize, ty: StoreType) -> Result<()> {
    let mut declaration = self.declarations.entry(owner).or_default();
    if declaration.sealed {
      return Err(InjectError::misused(owner.name(), MisuseReason::Sealed));
    }
    check_index(owner, index)?;
    declaration.check_retype(owner, index, ty)?;
    declaration.parameters.insert(index, ty);
    Ok(())
  }

  /// Declares that parameter `index` of `owner` is injected from the container.
  ///
  /// The dependency type is the parameter type previously declared at that
  /// index. It is validated here, so an unusable dependency is reported
  /// before anything is resolved.
  pub fn declare_dependency(&self, owner: StoreType, index: usize) -> Result<()> {
    check_index(owner, index)?;
    let mut declaration = self.declarations.entry(owner).or_default();
    let dependency = match declaration.parameters.get(&index).copied() {
      Some(dependency) => dependency,
      None => {
        tracing::warn!(store = owner.name(), index, "dependency type is not declared");
        return Err(InjectError::invalid(
          owner.name(),
          InvalidReason::Missing { index },
        ));
      }
    };
    self.append_dependency(owner, &mut declaration, index, dependency)
  }

  /// Records the parameter type and the injection in one step.
  pub(crate) fn declare_injected(
    &self,
    owner: StoreType,
    index: usize,
    dependency: StoreType,
  ) -> Result<()> {
    let mut declaration = self.declarations.entry(owner).or_default();
    self.append_dependency(owner, &mut declaration, index, dependency)?;
    declaration.parameters.insert(index, dependency);
    Ok(())
  }

  fn append_dependency(
    &self,
    owner: StoreType,
    declaration: &mut Declaration,
    index: usize,
    dependency: StoreType,
  ) -> Result<()> {
    if declaration.sealed {
      return Err(InjectError::misused(owner.name(), MisuseReason::Sealed));
    }
    check_index(owner, index)?;
    if declaration.injected.contains(&index) {
      return Err(InjectError::misused(
        owner.name(),
        MisuseReason::DuplicateParameter { index },
      ));
    }
    self.check_valid_dependency(owner.name(), dependency)?;

    declaration.injected.push(index);
    tracing::trace!(
      store = owner.name(),
      index,
      dependency = dependency.name(),
      "dependency declared"
    );
    Ok(())
  }

  /// Rejects dependency types the container may not construct.
  ///
  /// Denied types (the built-in ones, plus anything passed to [`deny`](Self::deny))
  /// and types without a constructor both fail with `InvalidDependency`.
  pub fn check_valid_dependency(&self, target: &'static str, dependency: StoreType) -> Result<()> {
    if self.is_denied(dependency) {
      tracing::warn!(
        store = target,
        dependency = dependency.name(),
        "native dependency rejected"
      );
      return Err(InjectError::invalid(
        target,
        InvalidReason::Native {
          dependency: dependency.name(),
        },
      ));
    }
    if !dependency.is_constructible() {
      tracing::warn!(
        store = target,
        dependency = dependency.name(),
        "dependency without constructor rejected"
      );
      return Err(InjectError::invalid(
        target,
        InvalidReason::NotConstructible {
          dependency: dependency.name(),
        },
      ));
    }
    Ok(())
  }

  /// Adds `ty` to the deny-list. Declaring it as a dependency fails afterwards.
  pub fn deny(&self, ty: StoreType) {
    self.denied.insert(ty.type_id());
  }

  pub fn is_denied(&self, ty: StoreType) -> bool {
    self.denied.contains(&ty.type_id())
  }

  /// The injected dependencies of `owner`, sorted by parameter index.
  pub fn dependencies(&self, owner: StoreType) -> Vec<(usize, StoreType)> {
    self
      .declarations
      .get(&owner)
      .map(|declaration| declaration.dependencies())
      .unwrap_or_default()
  }

  pub fn is_sealed(&self, owner: StoreType) -> bool {
    self
      .declarations
      .get(&owner)
      .map(|declaration| declaration.sealed)
      .unwrap_or(false)
  }

  /// Freezes the declarations of `owner` and returns its sorted dependencies.
  pub(crate) fn seal(&self, owner: StoreType) -> Vec<(usize, StoreType)> {
    let mut declaration = self.declarations.entry(owner).or_default();
    declaration.sealed = true;
    declaration.dependencies()
  }
}

fn default_denied() -> Vec<StoreType> {
  vec![
    StoreType::opaque::<()>(),
    StoreType::opaque::<bool>(),
    StoreType::opaque::<char>(),
    StoreType::opaque::<i8>(),
    StoreType::opaque::<i16>(),
    StoreType::opaque::<i32>(),
    StoreType::opaque::<i64>(),
    StoreType::opaque::<i128>(),
    StoreType::opaque::<isize>(),
    StoreType::opaque::<u8>(),
    StoreType::opaque::<u16>(),
    StoreType::opaque::<u32>(),
    StoreType::opaque::<u64>(),
    StoreType::opaque::<u128>(),
    StoreType::opaque::<usize>(),
    StoreType::opaque::<f32>(),
    StoreType::opaque::<f64>(),
    StoreType::opaque::<str>(),
    StoreType::opaque::<String>(),
    StoreType::opaque::<OsString>(),
    StoreType::opaque::<PathBuf>(),
    StoreType::opaque::<Duration>(),
    StoreType::opaque::<Instant>(),
    StoreType::opaque::<SystemTime>(),
    StoreType::opaque::<Vec<u8>>(),
    StoreType::opaque::<Vec<String>>(),
    StoreType::opaque::<VecDeque<u8>>(),
    StoreType::opaque::<HashMap<String, String>>(),
    StoreType::opaque::<HashSet<String>>(),
    StoreType::opaque::<BTreeMap<String, String>>(),
    StoreType::opaque::<BTreeSet<String>>(),
  ]
}

/// Starts declaring the injected constructor parameters of `T`.
///
/// ```
/// use fibre_inject::{declare, Arguments, Result, Store};
///
/// struct Api;
/// impl Store for Api {
///   fn construct(_: &Arguments) -> Result<Self> { Ok(Api) }
/// }
///
/// struct Session;
/// impl Store for Session {
///   fn construct(args: &Arguments) -> Result<Self> {
///     let _api = args.get::<Api>(0)?;
///     Ok(Session)
///   }
/// }
///
/// declare::<Session>().inject::<Api>(0).unwrap();
/// ```
pub fn declare<T: Store>() -> Declarer {
  Declarer {
    owner: StoreType::of::<T>(),
    registry: registry(),
  }
}

/// Records parameter injections for one owner in the global registry.
pub struct Declarer {
  owner: StoreType,
  registry: &'static Registry,
}

impl Declarer {
  /// Declares parameter `index` as an injected `D`.
  pub fn inject<D: Store>(self, index: usize) -> Result<Self> {
    self.inject_type(index, StoreType::of::<D>())
  }

  /// Declares parameter `index` as an injected `dependency`.
  pub fn inject_type(self, index: usize, dependency: StoreType) -> Result<Self> {
    self.registry.declare_injected(self.owner, index, dependency)?;
    Ok(self)
  }

  pub fn owner(&self) -> StoreType {
    self.owner
  }
}
