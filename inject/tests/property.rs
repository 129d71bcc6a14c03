use fibre_inject::{
  registry, Arguments, Component, InjectError, Injected, InvalidReason, MisuseReason, Result,
  Store, StoreType, StoresMap,
};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// --- Test Fixtures ---

#[derive(Debug)]
struct ProfileStore {
  name: String,
}

impl Store for ProfileStore {
  fn construct(_: &Arguments) -> Result<Self> {
    Ok(ProfileStore {
      name: "guest".to_string(),
    })
  }
}

struct ProfileScreen {
  stores: Option<StoresMap>,
  profile: Injected<ProfileStore>,
}

impl ProfileScreen {
  fn new(stores: Option<StoresMap>) -> Self {
    Self {
      stores,
      profile: Injected::declare("profile").unwrap(),
    }
  }
}

impl Component for ProfileScreen {
  fn stores(&self) -> Option<&StoresMap> {
    self.stores.as_ref()
  }
}

// --- Property Tests ---

#[test]
fn test_property_reads_from_component_container() {
  let stores = StoresMap::default();
  let screen = ProfileScreen::new(Some(stores.clone()));

  let profile = screen.profile.get(&screen).unwrap();

  assert_eq!(profile.name, "guest");
  assert_eq!(screen.profile.property(), "profile");
  assert!(Arc::ptr_eq(&profile, &stores.get::<ProfileStore>().unwrap()));
}

#[test]
fn test_property_without_container_fails() {
  let screen = ProfileScreen::new(None);

  let err = screen.profile.get(&screen).unwrap_err();

  assert!(matches!(
    err,
    InjectError::InvalidDependency {
      store: "ProfileScreen",
      reason: InvalidReason::NoContainer {
        property: "profile"
      },
    }
  ));
  assert_eq!(
    err.to_string(),
    "No store container is available for property 'profile'. Error occurred in ProfileScreen"
  );
}

#[test]
fn test_mount_resolves_eagerly() {
  static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

  struct BadgeStore;
  impl Store for BadgeStore {
    fn construct(_: &Arguments) -> Result<Self> {
      CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
      Ok(BadgeStore)
    }
  }

  struct Badge {
    stores: StoresMap,
    store: Injected<BadgeStore>,
  }
  impl Component for Badge {
    fn stores(&self) -> Option<&StoresMap> {
      Some(&self.stores)
    }
  }

  let badge = Badge {
    stores: StoresMap::default(),
    store: Injected::declare("store").unwrap(),
  };
  assert!(!badge.stores.has::<BadgeStore>());

  badge.store.mount(&badge).unwrap();
  assert!(badge.stores.has::<BadgeStore>());

  // Later reads hit the cache.
  badge.store.get(&badge).unwrap();
  assert_eq!(CONSTRUCTIONS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unnamed_property_is_misuse() {
  let result = Injected::<ProfileStore>::declare("");
  assert!(matches!(
    result,
    Err(InjectError::MisusedDeclaration {
      reason: MisuseReason::EmptyProperty,
      ..
    })
  ));
}

#[test]
fn test_denied_property_type_is_rejected() {
  struct SecretStore;
  impl Store for SecretStore {
    fn construct(_: &Arguments) -> Result<Self> {
      Ok(SecretStore)
    }
  }

  registry().deny(StoreType::of::<SecretStore>());

  assert!(matches!(
    Injected::<SecretStore>::declare("secret"),
    Err(InjectError::InvalidDependency {
      store: "secret",
      reason: InvalidReason::Native { .. },
    })
  ));
}

#[test]
fn test_property_works_through_trait_object() {
  let stores = StoresMap::default();
  let screen = ProfileScreen::new(Some(stores));
  let component: &dyn Component = &screen;

  assert!(screen.profile.get(component).is_ok());
}
