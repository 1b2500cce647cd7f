//! Error types for the dependency injection container.

use std::fmt;

/// Failure indicator returned by a factory (the second half of its
/// `(value, failure)` output shape).
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

/// Dependency injection errors
///
/// Two classes of failure exist. Binding-shape errors (`MalformedBinding`,
/// `Arity`, `TypeMismatch`) are raised at the offending call. Resolution
/// errors (`NotFound`, `Ambiguous`, `FactoryFailed`) are raised lazily when a
/// request cannot be satisfied.
///
/// # Examples
///
/// ```rust
/// use hemlock_di::{Container, DiError, Resolver};
///
/// struct Missing;
///
/// let mut container = Container::new();
/// container.instance(42u32);
///
/// match container.make::<Missing>() {
///     Err(DiError::NotFound { requested, registered }) => {
///         assert!(requested.ends_with("Missing"));
///         assert_eq!(registered, vec!["u32"]);
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// No registration satisfies the request
    NotFound {
        requested: &'static str,
        registered: Vec<&'static str>,
    },
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Factory parameters do not line up with the container's baseline args
    MalformedBinding {
        factory: &'static str,
        expected: Vec<&'static str>,
        found: Vec<&'static str>,
    },
    /// Factory returned a failure indicator
    FactoryFailed {
        service: &'static str,
        cause: String,
    },
    /// Several equally narrow candidates under `AmbiguityPolicy::Reject`
    Ambiguous {
        capability: &'static str,
        candidates: Vec<&'static str>,
    },
    /// More trailing arguments than the handler has parameters
    Arity {
        handler: &'static str,
        parameters: usize,
        extras: usize,
    },
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound { requested, registered } => write!(
                f,
                "Service not found: {} (registered: [{}])",
                requested,
                registered.join(", ")
            ),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::MalformedBinding { factory, expected, found } => write!(
                f,
                "Malformed binding {}: expected args ({}) but factory takes ({})",
                factory,
                expected.join(", "),
                found.join(", ")
            ),
            DiError::FactoryFailed { service, cause } => {
                write!(f, "Factory failed for {}: {}", service, cause)
            }
            DiError::Ambiguous { capability, candidates } => write!(
                f,
                "Ambiguous capability {}: candidates [{}]",
                capability,
                candidates.join(", ")
            ),
            DiError::Arity { handler, parameters, extras } => write!(
                f,
                "Handler {} takes {} parameters but {} extra args were supplied",
                handler, parameters, extras
            ),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
