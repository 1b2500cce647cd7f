//! Binding lifetime definitions.

/// Lifetime of a registration record, controlling whether the produced value
/// is cached.
///
/// # Examples
///
/// ```rust
/// use hemlock_di::{Container, Lifetime, Resolver};
/// use std::convert::Infallible;
/// use std::sync::Arc;
///
/// struct Config { name: String }
/// struct Session { id: u32 }
///
/// let mut container = Container::new();
/// container.instance(Config { name: "app".to_string() });
/// container.bind(|| Ok::<_, Infallible>(Session { id: 7 }));
///
/// let lifetimes: Vec<Lifetime> = container.descriptors().iter().map(|d| d.lifetime).collect();
/// assert_eq!(lifetimes, vec![Lifetime::Instance, Lifetime::Transient]);
///
/// // Transient: always a fresh value
/// let a = container.make_required::<Session>();
/// let b = container.make_required::<Session>();
/// assert!(!Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// New value per resolution, never cached
    Transient,
    /// Produced on first successful resolution, then cached for the record's lifetime
    Singleton,
    /// Value supplied at registration time; no factory
    Instance,
}

impl Lifetime {
    /// Whether values of this lifetime are reused between resolutions.
    pub fn is_cached(self) -> bool {
        !matches!(self, Lifetime::Transient)
    }
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifetime::Transient => f.write_str("transient"),
            Lifetime::Singleton => f.write_str("singleton"),
            Lifetime::Instance => f.write_str("instance"),
        }
    }
}
