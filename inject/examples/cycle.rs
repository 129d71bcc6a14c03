use fibre_inject::{declare, Arguments, CycleReport, InjectError, Result, Store, StoresMap};

struct AuthStore;
impl Store for AuthStore {
  fn construct(_: &Arguments) -> Result<Self> {
    Ok(AuthStore)
  }
}

struct ProfileStore;
impl Store for ProfileStore {
  fn construct(_: &Arguments) -> Result<Self> {
    Ok(ProfileStore)
  }
}

struct SettingsStore;
impl Store for SettingsStore {
  fn construct(_: &Arguments) -> Result<Self> {
    Ok(SettingsStore)
  }
}

fn main() {
  // SettingsStore -> AuthStore -> ProfileStore -> AuthStore
  declare::<SettingsStore>().inject::<AuthStore>(0).unwrap();
  declare::<AuthStore>().inject::<ProfileStore>(0).unwrap();
  declare::<ProfileStore>().inject::<AuthStore>(0).unwrap();

  let stores = StoresMap::default();
  match stores.get::<SettingsStore>() {
    Err(InjectError::CircularDependency { chain }) => {
      println!("Full path:     {}", chain);
    }
    other => panic!("expected a cycle, got {:?}", other.map(|_| ())),
  }

  let stores = StoresMap::builder()
    .cycle_report(CycleReport::MinimalCycle)
    .build();
  match stores.get::<SettingsStore>() {
    Err(err) => println!("Minimal cycle: {}", err),
    Ok(_) => panic!("expected a cycle"),
  }

  assert!(!stores.has::<AuthStore>(), "nothing was constructed");
}
