//! Service descriptors for introspection and diagnostics.

use crate::key::Key;
use crate::lifetime::Lifetime;

/// Snapshot of one registration record.
///
/// Descriptors come back in registration order, the same order concrete
/// requests are matched in.
///
/// # Examples
///
/// ```rust
/// use hemlock_di::{capability, Container, Lifetime, Resolver};
/// use std::convert::Infallible;
///
/// trait Honker: Send + Sync {
///     fn honk(&self) -> String;
/// }
/// capability!(dyn Honker => [honk]);
///
/// struct Car;
/// impl Honker for Car {
///     fn honk(&self) -> String { "Honk!".to_string() }
/// }
///
/// let mut container = Container::new();
/// container.instance("config".to_string());
/// container.singleton(|| Ok::<_, Infallible>(Car));
/// container.implements::<Car, dyn Honker, _>(|car| car);
///
/// let descriptors = container.descriptors();
/// assert_eq!(descriptors.len(), 2);
///
/// let car = descriptors.iter().find(|d| d.type_name().ends_with("Car")).unwrap();
/// assert_eq!(car.lifetime, Lifetime::Singleton);
/// assert_eq!(car.operations, 1);
/// assert!(!car.cached);
///
/// let _ = container.make_capability::<dyn Honker>();
/// assert!(container.descriptors()[1].cached);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Produced type
    pub key: Key,
    pub lifetime: Lifetime,
    /// Distinct capability operations declared for the produced type
    pub operations: usize,
    /// Whether a value is currently cached in the record
    pub cached: bool,
}

impl ServiceDescriptor {
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }
}

impl std::fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}, {} ops{}]",
            self.type_name(),
            self.lifetime,
            self.operations,
            if self.cached { ", cached" } else { "" }
        )
    }
}
