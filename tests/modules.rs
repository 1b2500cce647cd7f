/// Tests for provider modules
///
/// Modules register their bindings first; boot phases run once every
/// installed module has registered.

use hemlock_di::{Container, DiError, DiResult, FactoryArgs, Resolver, ServiceModule};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

// ===== Test Services =====

#[derive(Debug)]
struct App {
    name: String,
}

#[derive(Debug, Clone)]
struct Config {
    name: String,
    value: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "test-config".to_string(),
            value: 42,
        }
    }
}

#[derive(Debug)]
struct DatabaseService {
    connection_id: String,
}

#[derive(Debug)]
struct CacheService {
    cache_size: usize,
}

// ===== Modules =====

struct ConfigModule;

impl ServiceModule for ConfigModule {
    fn register(&self, container: &mut Container) -> DiResult<()> {
        container.instance(Config::default());
        Ok(())
    }
}

struct DatabaseModule;

impl ServiceModule for DatabaseModule {
    fn register(&self, container: &mut Container) -> DiResult<()> {
        container.try_singleton(|app: Arc<App>| {
            Ok::<_, Infallible>(DatabaseService {
                connection_id: format!("{}-conn", app.name),
            })
        })?;
        Ok(())
    }

    fn boot(&self, container: &Container) -> DiResult<()> {
        // Config comes from a module installed later
        let config = container.make::<Config>()?;
        assert_eq!(config.value, 42);
        Ok(())
    }
}

struct CacheModule {
    cache_size: usize,
}

impl ServiceModule for CacheModule {
    fn register(&self, container: &mut Container) -> DiResult<()> {
        container.instance(CacheService {
            cache_size: self.cache_size,
        });
        Ok(())
    }
}

struct RecordingModule {
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl ServiceModule for RecordingModule {
    fn register(&self, _container: &mut Container) -> DiResult<()> {
        self.log.lock().unwrap().push(format!("register {}", self.label));
        Ok(())
    }

    fn boot(&self, _container: &Container) -> DiResult<()> {
        self.log.lock().unwrap().push(format!("boot {}", self.label));
        Ok(())
    }
}

fn app_container() -> Container {
    Container::with_args(FactoryArgs::new().with(Arc::new(App {
        name: "shop".to_string(),
    })))
}

// ===== Tests =====

#[test]
fn test_modules_register_then_boot() {
    let mut container = app_container();
    container
        .install(&[&DatabaseModule, &ConfigModule, &CacheModule { cache_size: 200 }])
        .unwrap();

    assert_eq!(container.make_required::<DatabaseService>().connection_id, "shop-conn");
    assert_eq!(container.make_required::<CacheService>().cache_size, 200);
    assert_eq!(container.make_required::<Config>().name, "test-config");
}

#[test]
fn test_phase_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let first = RecordingModule {
        label: "first",
        log: log.clone(),
    };
    let second = RecordingModule {
        label: "second",
        log: log.clone(),
    };

    let mut container = Container::new();
    container.install(&[&first, &second]).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["register first", "register second", "boot first", "boot second"]
    );
}

#[test]
fn test_boot_failure_stops_install() {
    let mut container = app_container();

    // No ConfigModule, so DatabaseModule's boot cannot find Config
    let err = container.install(&[&DatabaseModule]).unwrap_err();
    assert!(matches!(err, DiError::NotFound { .. }));

    // Registrations made before the failure remain
    assert_eq!(container.len(), 1);
}

#[test]
fn test_register_failure_skips_boot() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let recorder = RecordingModule {
        label: "recorder",
        log: log.clone(),
    };

    // The baseline leads with Config, so DatabaseModule's factory is malformed
    let mut container =
        Container::with_args(FactoryArgs::new().with(Arc::new(Config::default())));
    let err = container.install(&[&recorder, &DatabaseModule]).unwrap_err();

    assert!(matches!(err, DiError::MalformedBinding { .. }));
    assert_eq!(*log.lock().unwrap(), vec!["register recorder"]);
}

#[test]
fn test_module_name_defaults_to_type_name() {
    assert!(ConfigModule.name().ends_with("ConfigModule"));
}
