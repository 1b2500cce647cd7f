#![no_main]

use hemlock_di::{
    capability, AmbiguityPolicy, Container, ContainerConfig, DiError, FactoryArgs, Resolver,
};
use libfuzzer_sys::fuzz_target;

trait One: Send + Sync {
    fn id(&self) -> u8;
}

trait Two: Send + Sync {
    fn id(&self) -> u8;
    fn second(&self) -> u8;
}

trait Three: Send + Sync {
    fn id(&self) -> u8;
    fn second(&self) -> u8;
    fn third(&self) -> u8;
}

capability!(dyn One => [id]);
capability!(dyn Two => [id, second]);
capability!(dyn Three => [id, second, third]);

struct Small(u8);
struct Medium(u8);
struct Large(u8);

impl One for Small {
    fn id(&self) -> u8 {
        self.0
    }
}

impl One for Medium {
    fn id(&self) -> u8 {
        self.0
    }
}

impl Two for Medium {
    fn id(&self) -> u8 {
        self.0
    }
    fn second(&self) -> u8 {
        2
    }
}

impl One for Large {
    fn id(&self) -> u8 {
        self.0
    }
}

impl Three for Large {
    fn id(&self) -> u8 {
        self.0
    }
    fn second(&self) -> u8 {
        2
    }
    fn third(&self) -> u8 {
        3
    }
}

// Registers a random mix of producers and checks the capability request
// against the narrowest-then-latest rule.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let reject = data[0] & 1 == 1;
    let policy = if reject {
        AmbiguityPolicy::Reject
    } else {
        AmbiguityPolicy::Narrowest
    };
    let mut container =
        Container::with_config(FactoryArgs::new(), ContainerConfig::default().ambiguity(policy));

    // (operation count, id) of every registration, in order
    let mut model: Vec<(usize, u8)> = Vec::new();
    for (i, byte) in data[1..].iter().enumerate().take(32) {
        let id = i as u8;
        match byte % 3 {
            0 => {
                container.instance(Small(id));
                model.push((1, id));
            }
            1 => {
                container.instance(Medium(id));
                model.push((2, id));
            }
            _ => {
                container.instance(Large(id));
                model.push((3, id));
            }
        }
    }
    container
        .implements::<Small, dyn One, _>(|s| s)
        .implements::<Medium, dyn One, _>(|m| m)
        .implements::<Medium, dyn Two, _>(|m| m)
        .implements::<Large, dyn One, _>(|l| l)
        .implements::<Large, dyn Three, _>(|l| l);

    let narrowest = model.iter().map(|(ops, _)| *ops).min();
    let result = container.make_capability::<dyn One>();

    match narrowest {
        None => assert!(matches!(result, Err(DiError::NotFound { .. }))),
        Some(ops) => {
            let tied: Vec<u8> = model
                .iter()
                .filter(|(o, _)| *o == ops)
                .map(|(_, id)| *id)
                .collect();
            if reject && tied.len() > 1 {
                assert!(matches!(result, Err(DiError::Ambiguous { .. })));
            } else {
                let expected = tied.last().copied();
                assert_eq!(result.ok().map(|one| one.id()), expected);
            }
        }
    }
});
