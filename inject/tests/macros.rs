use fibre_inject::{declare, registry, resolve, Arguments, Result, Store, StoreType, StoresMap};
use std::sync::Arc;

// --- Test Fixtures ---

struct Settings {
  locale: &'static str,
}

impl Store for Settings {
  fn construct(_: &Arguments) -> Result<Self> {
    Ok(Settings { locale: "en" })
  }
}

struct Translator {
  settings: Arc<Settings>,
}

impl Store for Translator {
  fn construct(args: &Arguments) -> Result<Self> {
    Ok(Translator {
      settings: args.get(0)?,
    })
  }
}

struct Catalog {
  translator: Arc<Translator>,
  settings: Arc<Settings>,
}

impl Store for Catalog {
  fn construct(args: &Arguments) -> Result<Self> {
    Ok(Catalog {
      translator: args.get(0)?,
      settings: args.get(1)?,
    })
  }
}

// --- Macro Tests ---

#[test]
fn test_declare_and_resolve_macros() {
  declare!(Translator { 0 => Settings }).unwrap();
  declare!(Catalog { 0 => Translator, 1 => Settings }).unwrap();

  let stores = StoresMap::default();
  let catalog = resolve!(stores, Catalog);

  assert_eq!(catalog.settings.locale, "en");
  assert!(Arc::ptr_eq(&catalog.settings, &catalog.translator.settings));
  assert_eq!(
    registry().dependencies(StoreType::of::<Catalog>()).len(),
    2
  );
}

#[test]
fn test_declare_macro_without_dependencies() {
  struct Standalone;
  impl Store for Standalone {
    fn construct(_: &Arguments) -> Result<Self> {
      Ok(Standalone)
    }
  }

  declare!(Standalone {}).unwrap();
  assert!(registry().dependencies(StoreType::of::<Standalone>()).is_empty());
}

#[test]
fn test_declare_macro_stops_at_first_rejection() {
  struct Blocked;
  impl Store for Blocked {
    fn construct(_: &Arguments) -> Result<Self> {
      Ok(Blocked)
    }
  }
  struct Allowed;
  impl Store for Allowed {
    fn construct(_: &Arguments) -> Result<Self> {
      Ok(Allowed)
    }
  }
  struct Mixed;
  impl Store for Mixed {
    fn construct(_: &Arguments) -> Result<Self> {
      Ok(Mixed)
    }
  }

  registry().deny(StoreType::of::<Blocked>());

  assert!(declare!(Mixed { 0 => Blocked, 1 => Allowed }).is_err());
  assert!(registry().dependencies(StoreType::of::<Mixed>()).is_empty());
}

#[test]
#[should_panic(expected = "Cyclic dependencies are found")]
fn test_resolve_panics_on_cycle() {
  struct Chicken;
  impl Store for Chicken {
    fn construct(_: &Arguments) -> Result<Self> {
      Ok(Chicken)
    }
  }
  struct Egg;
  impl Store for Egg {
    fn construct(_: &Arguments) -> Result<Self> {
      Ok(Egg)
    }
  }

  declare!(Chicken { 0 => Egg }).unwrap();
  declare!(Egg { 0 => Chicken }).unwrap();

  let stores = StoresMap::default();
  resolve!(stores, Chicken);
}
