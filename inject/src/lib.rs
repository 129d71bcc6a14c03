//! # Fibre Inject
//!
//! A construct-once dependency injection runtime for singleton stores.
//!
//! Each store type declares which of its constructor parameters are other
//! stores. A [`StoresMap`] then builds any store on request: it resolves the
//! declared dependencies first (recursively, in ascending parameter order),
//! constructs the store exactly once and caches it for the lifetime of the
//! container.
//!
//! ## Core Concepts
//!
//! - **Store**: a type implementing [`Store`], constructible from its resolved
//!   dependencies.
//! - **Declaration**: the process-wide record of which parameters of a store
//!   are injected, made with [`declare()`] or the [`declare!`] macro. Native
//!   types (primitives, strings, ...) are refused at declaration time.
//! - **Container**: [`StoresMap`], optionally seeded with pre-built stores,
//!   which are then never constructed.
//! - **Cycles**: a store that depends on itself, directly or through others,
//!   fails with [`InjectError::CircularDependency`] naming the chain, before
//!   any constructor runs.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_inject::{declare, Arguments, Result, Seed, Store, StoresMap};
//! use std::sync::Arc;
//!
//! struct MainStore {
//!   title: String,
//! }
//!
//! impl Store for MainStore {
//!   fn construct(_: &Arguments) -> Result<Self> {
//!     Ok(MainStore { title: "default".to_string() })
//!   }
//! }
//!
//! struct TitleBar {
//!   main: Arc<MainStore>,
//! }
//!
//! impl Store for TitleBar {
//!   fn construct(args: &Arguments) -> Result<Self> {
//!     Ok(TitleBar { main: args.get(0)? })
//!   }
//! }
//!
//! fn main() {
//!   declare::<TitleBar>().inject::<MainStore>(0).unwrap();
//!
//!   // `MainStore` was restored elsewhere before the container existed.
//!   let hydrated = MainStore { title: "ISUHAR".to_string() };
//!   let stores = StoresMap::new([Seed::new(hydrated)]);
//!
//!   let bar = stores.get::<TitleBar>().unwrap();
//!   assert_eq!(bar.main.title, "ISUHAR");
//!   assert!(Arc::ptr_eq(&bar.main, &stores.get::<MainStore>().unwrap()));
//! }
//! ```

mod container;
mod core;
mod declaration;
mod error;
mod global;
mod macros;
mod property;
mod store;

pub use crate::core::{CycleReport, Instance, StoreType};
pub use container::{Seed, StoresMap, StoresMapBuilder};
pub use declaration::{declare, Declarer, Registry, MAX_PARAMETERS};
pub use error::{DependencyChain, InjectError, InvalidReason, MisuseReason, Result};
pub use global::registry;
pub use property::{Component, Injected};
pub use store::{Arguments, Store};
