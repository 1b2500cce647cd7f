use hemlock_di::{Container, DiError, FactoryArgs, FactoryError, Lifetime, Resolver};
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[test]
fn test_instance_identity() {
    let mut container = Container::new();
    container.instance(42usize);
    container.instance("hello".to_string());

    let num1 = container.make_required::<usize>();
    let num2 = container.make_required::<usize>();
    let str1 = container.make_required::<String>();
    let str2 = container.make_required::<String>();

    assert_eq!(*num1, 42);
    assert_eq!(*str1, "hello");
    assert!(Arc::ptr_eq(&num1, &num2)); // Same instance
    assert!(Arc::ptr_eq(&str1, &str2)); // Same instance
}

#[test]
fn test_instance_arc_keeps_caller_allocation() {
    let shared = Arc::new(Mutex::new(vec![1, 2, 3]));
    let mut container = Container::new();
    container.instance_arc(shared.clone());

    let resolved = container.make_required::<Mutex<Vec<i32>>>();
    assert!(Arc::ptr_eq(&shared, &resolved));

    resolved.lock().unwrap().push(4);
    assert_eq!(shared.lock().unwrap().len(), 4);
}

#[test]
fn test_singleton_factory_runs_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let mut container = Container::new();
    container.singleton(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<_, Infallible>("singleton".to_string())
    });

    let a = container.make_required::<String>();
    let b = container.make_required::<String>();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_transient_creates_new_instances() {
    let counter = Arc::new(Mutex::new(0));
    let counter_clone = counter.clone();

    let mut container = Container::new();
    container.bind(move || {
        let mut c = counter_clone.lock().unwrap();
        *c += 1;
        Ok::<_, Infallible>(format!("instance-{}", *c))
    });

    let a = container.make_required::<String>();
    let b = container.make_required::<String>();
    let c = container.make_required::<String>();

    assert_eq!(*a, "instance-1");
    assert_eq!(*b, "instance-2");
    assert_eq!(*c, "instance-3");

    // All different instances
    assert!(!Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&b, &c));
    assert!(!Arc::ptr_eq(&a, &c));
}

#[test]
fn test_transient_values_are_distinct_even_when_equal() {
    #[derive(PartialEq, Debug)]
    struct Point {
        x: i32,
    }

    let mut container = Container::new();
    container.bind(|| Ok::<_, Infallible>(Point { x: 1 }));

    let a = container.make_required::<Point>();
    let b = container.make_required::<Point>();
    assert_eq!(a, b);
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn test_factory_receives_baseline_args() {
    struct App {
        name: &'static str,
    }
    struct Env(&'static str);
    struct Banner(String);

    let args = FactoryArgs::new()
        .with(Arc::new(App { name: "blog" }))
        .with(Arc::new(Env("dev")));
    let mut container = Container::with_args(args);
    container.bind(|app: Arc<App>, env: Arc<Env>| {
        Ok::<_, Infallible>(Banner(format!("{} ({})", app.name, env.0)))
    });

    assert_eq!(container.make_required::<Banner>().0, "blog (dev)");
}

#[test]
fn test_malformed_binding_names_both_sides() {
    struct App;
    struct Other;

    let mut container = Container::with_args(FactoryArgs::new().with(Arc::new(App)));

    match container.try_bind(|_: Arc<Other>| Ok::<_, Infallible>(1u8)) {
        Err(DiError::MalformedBinding { expected, found, .. }) => {
            assert_eq!(expected.len(), 1);
            assert!(expected[0].ends_with("App"));
            assert!(found[0].ends_with("Other"));
        }
        other => panic!("expected malformed binding, got {:?}", other.map(|_| ())),
    }

    // Too few parameters is malformed too
    assert!(container.try_singleton(|| Ok::<_, Infallible>(1u8)).is_err());

    // Nothing was registered
    assert!(container.is_empty());
}

#[test]
#[should_panic(expected = "Malformed binding")]
fn test_bind_panics_on_malformed_binding() {
    struct App;
    let mut container = Container::with_args(FactoryArgs::new().with(Arc::new(App)));
    container.bind(|| Ok::<_, Infallible>(1u8));
}

#[test]
fn test_factory_failure_propagates_and_caches_nothing() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let seen = attempts.clone();

    let mut container = Container::new();
    container.singleton(move || {
        if seen.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(FactoryError::from("database unavailable"))
        } else {
            Ok(7u64)
        }
    });

    match container.make::<u64>() {
        Err(DiError::FactoryFailed { service, cause }) => {
            assert_eq!(service, "u64");
            assert_eq!(cause, "database unavailable");
        }
        other => panic!("expected factory failure, got {:?}", other),
    }
    assert!(!container.descriptors()[0].cached);

    assert_eq!(*container.make_required::<u64>(), 7);
    assert!(container.descriptors()[0].cached);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_custom_error_types_convert() {
    #[derive(Debug)]
    struct ConnectError;

    impl std::fmt::Display for ConnectError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "connection refused")
        }
    }

    impl std::error::Error for ConnectError {}

    #[derive(Debug)]
    struct Pool;

    let mut container = Container::new();
    container.bind(|| Err::<Pool, _>(ConnectError));

    let err = container.make::<Pool>().unwrap_err();
    assert!(err.to_string().ends_with("connection refused"));
}

#[test]
fn test_not_found_lists_registered_types() {
    struct Missing;

    let mut container = Container::new();
    container.instance(1u8).instance(true);

    match container.make::<Missing>() {
        Err(DiError::NotFound { requested, registered }) => {
            assert!(requested.ends_with("Missing"));
            assert_eq!(registered, vec!["u8", "bool"]);
        }
        other => panic!("expected not found, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_first_registration_wins_for_concrete_requests() {
    let mut container = Container::new();
    container.instance("first".to_string());
    container.instance("second".to_string());

    assert_eq!(*container.make_required::<String>(), "first");
    assert_eq!(container.len(), 2);
}

#[test]
fn test_descriptors_follow_registration_order() {
    let mut container = Container::new();
    container
        .instance(1u8)
        .bind(|| Ok::<_, Infallible>(2u16))
        .singleton(|| Ok::<_, Infallible>(3u32));

    let lifetimes: Vec<Lifetime> = container.descriptors().iter().map(|d| d.lifetime).collect();
    assert_eq!(
        lifetimes,
        vec![Lifetime::Instance, Lifetime::Transient, Lifetime::Singleton]
    );

    let names: Vec<&str> = container.descriptors().iter().map(|d| d.type_name()).collect();
    assert_eq!(names, vec!["u8", "u16", "u32"]);
}

#[test]
fn test_make_value_clones_out() {
    let mut container = Container::new();
    container.instance(vec!["a".to_string(), "b".to_string()]);

    let mut value = container.make_value::<Vec<String>>().unwrap();
    value.push("c".to_string());

    assert_eq!(container.make_required::<Vec<String>>().len(), 2);
}

#[test]
fn test_singleton_built_from_singleton() {
    struct Database {
        url: &'static str,
    }
    struct Repo {
        db: Arc<Database>,
    }

    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();
    let mut container = Container::new();
    container
        .singleton(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>(Database { url: "sqlite::memory:" })
        })
        .singleton(|db: Arc<Database>| Ok::<_, Infallible>(Repo { db }));

    let repo = container.make_required::<Repo>();
    let db = container.make_required::<Database>();

    assert_eq!(repo.db.url, "sqlite::memory:");
    assert!(Arc::ptr_eq(&repo.db, &db));
    assert!(Arc::ptr_eq(&repo, &container.make_required::<Repo>()));
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[test]
fn test_baseline_then_resolved_parameters() {
    struct App {
        name: &'static str,
    }
    struct Port(u16);
    struct Address(String);

    let mut container = Container::with_args(FactoryArgs::new().with(Arc::new(App { name: "blog" })));
    container
        .instance(Port(8080))
        .bind(|app: Arc<App>, port: Arc<Port>| {
            Ok::<_, Infallible>(Address(format!("{}:{}", app.name, port.0)))
        });

    assert_eq!(container.make_required::<Address>().0, "blog:8080");
}

#[test]
fn test_missing_transitive_dependency_fails_lazily() {
    struct Database;
    struct Repo {
        _db: Arc<Database>,
    }

    let mut container = Container::new();
    // Registration succeeds even though nothing provides Database yet
    container
        .try_singleton(|db: Arc<Database>| Ok::<_, Infallible>(Repo { _db: db }))
        .unwrap();

    match container.make::<Repo>() {
        Err(DiError::NotFound { requested, registered }) => {
            assert!(requested.ends_with("Database"));
            assert_eq!(registered.len(), 1);
        }
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
    assert!(!container.descriptors()[0].cached);

    // A clone that adds the dependency can build it
    let mut scope = container.scope();
    scope.instance(Database);
    assert!(scope.make::<Repo>().is_ok());
}
