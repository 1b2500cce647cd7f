#![no_main]

use hemlock_di::{Container, FactoryError, Lifetime, Resolver};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Debug)]
struct TestService {
    value: i32,
}

// Each byte is one ledger operation; the ledger and its snapshots must stay
// consistent with a plain model of what was registered.
fuzz_target!(|data: &[u8]| {
    let mut container = Container::new();
    let mut model: Vec<(Lifetime, i32)> = Vec::new();
    let mut snapshots: Vec<(Container, usize)> = Vec::new();

    for (i, byte) in data.iter().enumerate().take(64) {
        let value = i as i32;
        match byte % 6 {
            0 => {
                container.instance(TestService { value });
                model.push((Lifetime::Instance, value));
            }
            1 => {
                container.bind(move || Ok::<_, FactoryError>(TestService { value }));
                model.push((Lifetime::Transient, value));
            }
            2 => {
                container.singleton(move || Ok::<_, FactoryError>(TestService { value }));
                model.push((Lifetime::Singleton, value));
            }
            3 => {
                // Failing factories must never cache
                container.singleton(move || Err::<TestService, _>(FactoryError::from("refused")));
                model.push((Lifetime::Singleton, -1));
            }
            4 => snapshots.push((container.scope(), model.len())),
            _ => {
                let _ = container.make::<TestService>();
            }
        }
    }

    assert_eq!(container.len(), model.len());
    let descriptors = container.descriptors();
    for (descriptor, (lifetime, value)) in descriptors.iter().zip(&model) {
        assert_eq!(descriptor.lifetime, *lifetime);
        if *lifetime == Lifetime::Transient || *value == -1 {
            assert!(!descriptor.cached);
        }
    }

    match model.first() {
        None => assert!(container.make::<TestService>().is_err()),
        Some((_, -1)) => assert!(container.make::<TestService>().is_err()),
        Some((lifetime, value)) => {
            let a = container.make_required::<TestService>();
            let b = container.make_required::<TestService>();
            assert_eq!(a.value, *value);
            assert_eq!(Arc::ptr_eq(&a, &b), lifetime.is_cached());
        }
    }

    // Snapshots never see later registrations
    for (snapshot, len) in &snapshots {
        assert_eq!(snapshot.len(), *len);
    }
});
