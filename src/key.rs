//! Type identity keys for the dependency injection container.

use std::any::TypeId;

/// Identity of a produced or requested type.
///
/// Every registration record carries exactly one `Key::Type` describing what
/// it produces. Requests are either for a concrete type (`Key::Type`) or for a
/// capability interface (`Key::Capability`), which in Rust is a trait object
/// type such as `dyn Honker`.
///
/// # Examples
///
/// ```rust
/// use hemlock_di::{Key, key_of_type, key_of_capability, capability};
///
/// trait Honker: Send + Sync {
///     fn honk(&self) -> String;
/// }
/// capability!(dyn Honker => [honk]);
///
/// let string_key = key_of_type::<String>();
/// let honker_key = key_of_capability::<dyn Honker>();
///
/// assert!(string_key.is_type());
/// assert!(honker_key.is_capability());
/// assert_ne!(string_key, honker_key);
/// assert_eq!(string_key, key_of_type::<String>());
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Key {
    /// Concrete type key with TypeId and name for diagnostics
    Type(TypeId, &'static str),
    /// Capability interface key (a `dyn Trait` type) with TypeId and name
    Capability(TypeId, &'static str),
}

impl Key {
    /// Get the type or capability name for display
    ///
    /// ```rust
    /// use hemlock_di::Key;
    /// use std::any::TypeId;
    ///
    /// let key = Key::Type(TypeId::of::<String>(), "alloc::string::String");
    /// assert_eq!(key.display_name(), "alloc::string::String");
    /// ```
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::Capability(_, name) => name,
        }
    }

    /// The underlying `TypeId`.
    pub fn type_id(&self) -> TypeId {
        match self {
            Key::Type(id, _) | Key::Capability(id, _) => *id,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Key::Type(..))
    }

    pub fn is_capability(&self) -> bool {
        matches!(self, Key::Capability(..))
    }
}

// TypeId-only comparison; the name is diagnostic
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Capability(a, _), Key::Capability(b, _)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Capability(id, _) => {
                1u8.hash(state);
                id.hash(state);
            }
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[inline(always)]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

#[inline(always)]
pub fn key_of_capability<I: ?Sized + 'static>() -> Key {
    Key::Capability(TypeId::of::<I>(), std::any::type_name::<I>())
}
