use std::fmt;

use thiserror::Error;

/// The ordered list of store names that were mid-resolution when a cycle
/// was found. The last name is the store that closed the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyChain {
  names: Vec<&'static str>,
}

impl DependencyChain {
  pub(crate) fn new(names: Vec<&'static str>) -> Self {
    Self { names }
  }

  /// The store names, in the order they were entered.
  pub fn names(&self) -> &[&'static str] {
    &self.names
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

impl fmt::Display for DependencyChain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.names.join(" -> "))
  }
}

/// Why a dependency type was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
  /// No parameter type was declared at this index.
  Missing { index: usize },
  /// The type has no constructor the container can call.
  NotConstructible { dependency: &'static str },
  /// The type is a built-in (or explicitly denied) type.
  Native { dependency: &'static str },
  /// A property was read from a component that carries no container.
  NoContainer { property: &'static str },
  /// A planned dependency was absent from the cache at construction time.
  NotResolved { dependency: &'static str },
}

impl fmt::Display for InvalidReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      InvalidReason::Missing { index } => {
        write!(f, "Dependency type of parameter {} is unknown", index)
      }
      InvalidReason::NotConstructible { dependency } => {
        write!(f, "Dependency {} must have a constructor", dependency)
      }
      InvalidReason::Native { dependency } => {
        write!(f, "Dependency {} may not be native implementation", dependency)
      }
      InvalidReason::NoContainer { property } => {
        write!(f, "No store container is available for property '{}'", property)
      }
      InvalidReason::NotResolved { dependency } => {
        write!(f, "Dependency {} was not resolved before construction", dependency)
      }
    }
  }
}

/// How the declaration API was misused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MisuseReason {
  /// The owner has already been resolved; its declarations are frozen.
  Sealed,
  /// The same constructor parameter was declared as injected twice.
  DuplicateParameter { index: usize },
  /// The parameter index is not below `MAX_PARAMETERS`.
  ParameterOutOfRange { index: usize },
  /// The type of an injected parameter was changed or dropped after it was validated.
  InjectedParameterRetyped { index: usize },
  /// A property injection was declared without a property name.
  EmptyProperty,
  /// The container type itself was asked to be constructed.
  ReservedContainer,
}

impl fmt::Display for MisuseReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MisuseReason::Sealed => {
        f.write_str("Declarations are immutable once the store has been resolved")
      }
      MisuseReason::DuplicateParameter { index } => {
        write!(f, "Parameter {} is already declared as injected", index)
      }
      MisuseReason::ParameterOutOfRange { index } => {
        write!(f, "Parameter index {} is out of range", index)
      }
      MisuseReason::InjectedParameterRetyped { index } => {
        write!(f, "Parameter {} is injected and its type cannot be changed", index)
      }
      MisuseReason::EmptyProperty => f.write_str(
        "Injection is to be applied to a named property, or to a constructor parameter",
      ),
      MisuseReason::ReservedContainer => {
        f.write_str("The container is registered by itself and cannot be constructed")
      }
    }
  }
}

/// The error type for every declaration and resolution failure.
///
/// None of these are recoverable by the container: a failed `get` aborts as
/// a whole and leaves the failed stores uncached.
#[derive(Debug, Error)]
pub enum InjectError {
  #[error("{reason}. Error occurred in {store}")]
  InvalidDependency {
    store: &'static str,
    reason: InvalidReason,
  },

  #[error("Cyclic dependencies are found in the following chain \"{chain}\"")]
  CircularDependency { chain: DependencyChain },

  #[error("{reason}. Error occurred in {target}")]
  MisusedDeclaration {
    target: &'static str,
    reason: MisuseReason,
  },

  #[error("No argument is injected at parameter {index}. Error occurred in {store}")]
  MissingArgument { store: &'static str, index: usize },

  #[error("Injected instance is not a {expected}. Error occurred in {store}")]
  TypeMismatch {
    store: &'static str,
    expected: &'static str,
  },

  #[error("Store construction failed: {source}. Error occurred in {store}")]
  Construction {
    store: &'static str,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl InjectError {
  pub(crate) fn invalid(store: &'static str, reason: InvalidReason) -> Self {
    InjectError::InvalidDependency { store, reason }
  }

  pub(crate) fn misused(target: &'static str, reason: MisuseReason) -> Self {
    InjectError::MisusedDeclaration { target, reason }
  }

  /// Wraps a store's own failure so it can be returned from `Store::construct`.
  pub fn construction(
    store: &'static str,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    InjectError::Construction {
      store,
      source: source.into(),
    }
  }
}

/// A specialized `Result` type for `fibre_inject` operations.
pub type Result<T, E = InjectError> = std::result::Result<T, E>;
