//! Capability interfaces and type descriptor matching.
//!
//! A capability interface is a trait object type (`dyn Honker`) that lists the
//! operations it requires. Rust has no runtime view of which types implement
//! which traits, so every container keeps a [`CapabilityTable`] recording, per
//! produced type, the capabilities it implements and how to upcast a value of
//! that type into each of them. Every matching decision the container makes is
//! answered by this table.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::key::{key_of_capability, key_of_type, Key};
use crate::registration::AnyArc;

/// A capability interface: a named set of required operations.
///
/// Implement it for trait object types with the [`capability!`](crate::capability)
/// macro. The operation list drives the narrowest-type tie-break used when
/// several registrations satisfy the same interface.
///
/// # Examples
///
/// ```rust
/// use hemlock_di::{capability, Capability};
///
/// trait Honker: Send + Sync {
///     fn honk(&self) -> String;
/// }
///
/// trait Vehicle: Send + Sync {
///     fn wheels(&self) -> u8;
///     fn honk_twice(&self) -> String;
/// }
///
/// capability!(dyn Honker => [honk]);
/// capability!(dyn Vehicle => [wheels, honk_twice]);
///
/// assert_eq!(<dyn Honker as Capability>::OPERATIONS, &["honk"]);
/// assert_eq!(<dyn Vehicle as Capability>::OPERATIONS.len(), 2);
/// ```
pub trait Capability: Send + Sync + 'static {
    /// Names of the operations the interface requires.
    const OPERATIONS: &'static [&'static str];
}

/// Declares a trait object type as a capability interface.
///
/// ```rust
/// use hemlock_di::capability;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self, name: &str) -> String;
/// }
///
/// capability!(dyn Greeter => [greet]);
/// ```
#[macro_export]
macro_rules! capability {
    ($iface:ty => [$($op:ident),* $(,)?]) => {
        impl $crate::Capability for $iface {
            const OPERATIONS: &'static [&'static str] = &[$(stringify!($op)),*];
        }
    };
}

type CastFn = Arc<dyn Fn(&AnyArc) -> Option<AnyArc> + Send + Sync>;

/// How one produced type is viewed through one capability interface.
#[derive(Clone)]
pub(crate) struct CapabilityView {
    pub(crate) capability: Key,
    pub(crate) operations: &'static [&'static str],
    /// Maps an erased `Arc<T>` to an erased `Arc<Arc<dyn I>>`.
    cast: CastFn,
}

impl CapabilityView {
    /// Upcasts a value produced by the owning type into this capability.
    pub(crate) fn cast(&self, value: &AnyArc) -> Option<AnyArc> {
        (self.cast)(value)
    }
}

/// Per-container table of "type T implements capability I" declarations.
#[derive(Clone, Default)]
pub struct CapabilityTable {
    views: HashMap<TypeId, Vec<CapabilityView>>,
}

impl CapabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `T` implements `I`. Declaring the same pair again replaces
    /// the earlier upcast.
    pub fn declare<T, I, F>(&mut self, upcast: F)
    where
        T: Send + Sync + 'static,
        I: ?Sized + Capability,
        F: Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
    {
        let capability = key_of_capability::<I>();
        let cast: CastFn = Arc::new(move |value: &AnyArc| {
            value
                .clone()
                .downcast::<T>()
                .ok()
                .map(|concrete| Arc::new(upcast(concrete)) as AnyArc)
        });
        let view = CapabilityView {
            capability,
            operations: I::OPERATIONS,
            cast,
        };

        let views = self.views.entry(TypeId::of::<T>()).or_default();
        match views.iter_mut().find(|v| v.capability == capability) {
            Some(existing) => *existing = view,
            None => views.push(view),
        }
    }

    /// The view of `produced` through `capability`, if it was declared.
    pub(crate) fn view(&self, produced: &Key, capability: &Key) -> Option<&CapabilityView> {
        if !produced.is_type() {
            return None;
        }
        self.views
            .get(&produced.type_id())?
            .iter()
            .find(|v| &v.capability == capability)
    }

    /// Whether a value of `produced` satisfies `requested`.
    ///
    /// Concrete requests are satisfied only by the identical type; capability
    /// requests by any type declared to implement the capability.
    pub fn satisfies(&self, produced: &Key, requested: &Key) -> bool {
        match requested {
            Key::Type(..) => produced == requested,
            Key::Capability(..) => self.view(produced, requested).is_some(),
        }
    }

    /// Total number of distinct operations declared for `produced` across all
    /// of its capabilities.
    pub fn operation_count(&self, produced: &Key) -> usize {
        let Some(views) = self.views.get(&produced.type_id()) else {
            return 0;
        };
        let mut seen: Vec<&'static str> = Vec::new();
        for op in views.iter().flat_map(|v| v.operations.iter().copied()) {
            if !seen.contains(&op) {
                seen.push(op);
            }
        }
        seen.len()
    }

    /// Capabilities declared for `T`.
    pub fn capabilities_of<T: 'static>(&self) -> Vec<Key> {
        let produced = key_of_type::<T>();
        self.views
            .get(&produced.type_id())
            .map(|views| views.iter().map(|v| v.capability).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
