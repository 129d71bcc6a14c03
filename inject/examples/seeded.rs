use fibre_inject::{declare, Arguments, Result, Seed, Store, StoresMap};
use std::sync::Arc;

// A store whose state is restored from device storage before the app starts.
struct MainStore {
  title: String,
}

impl Store for MainStore {
  fn construct(_: &Arguments) -> Result<Self> {
    Ok(MainStore {
      title: "ISUHAR".to_string(),
    })
  }
}

// A store that is built on demand from the hydrated one.
struct HeaderStore {
  main: Arc<MainStore>,
}

impl Store for HeaderStore {
  fn construct(args: &Arguments) -> Result<Self> {
    println!("Constructing HeaderStore...");
    Ok(HeaderStore { main: args.get(0)? })
  }
}

fn main() {
  declare::<HeaderStore>().inject::<MainStore>(0).unwrap();

  // Pretend this came back from persisted state.
  let hydrated = MainStore {
    title: "Restored title".to_string(),
  };
  let stores = StoresMap::new([Seed::new(hydrated)]);

  println!("Seeded MainStore present: {}", stores.has::<MainStore>());
  println!("HeaderStore present: {}", stores.has::<HeaderStore>());

  let header = stores.get::<HeaderStore>().unwrap();
  println!("Header shows: {}", header.main.title);
  assert_eq!(header.main.title, "Restored title");

  let again = stores.get::<HeaderStore>().unwrap();
  assert!(Arc::ptr_eq(&header, &again), "stores are constructed once");
  println!("Second lookup returned the cached HeaderStore.");
}
