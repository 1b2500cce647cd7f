//! Factory shapes and the baseline arguments handed to every factory.
//!
//! A factory is any `Fn(P1, ..., Pn) -> Result<T, E>` whose parameters are
//! [`FactoryParam`]s. The leading parameters must line up, in order, with the
//! container's [`FactoryArgs`]; this is checked when the factory is
//! registered. Every parameter after them is resolved from the container the
//! value is requested on, at the time it is requested. The `Result` return is
//! the two-value `(produced, failure)` shape.
//!
//! Dependencies between bindings are not validated up front. A missing
//! transitive dependency surfaces as `NotFound` when the dependent is
//! resolved. A singleton whose factory depends on itself, directly or through
//! other singletons, never finishes initializing; cycles are not detected.

use std::any::{type_name, Any};
use std::sync::Arc;

use crate::capabilities::Capability;
use crate::error::{DiError, DiResult, FactoryError};
use crate::invoke::{Cap, Inject, Owned};
use crate::key::{key_of_capability, key_of_type, Key};
use crate::registration::AnyArc;
use crate::traits::ResolverCore;

/// Ordered baseline arguments passed as the leading arguments of every factory
/// registered on a container (typically the owning application handle).
///
/// # Examples
///
/// ```rust
/// use hemlock_di::{Container, FactoryArgs, Resolver};
/// use std::convert::Infallible;
/// use std::sync::Arc;
///
/// struct App { name: String }
/// struct Greeting(String);
///
/// let app = Arc::new(App { name: "hemlock".to_string() });
/// let mut container = Container::with_args(FactoryArgs::new().with(app));
///
/// container.bind(|app: Arc<App>| Ok::<_, Infallible>(Greeting(format!("hello from {}", app.name))));
/// assert_eq!(container.make_required::<Greeting>().0, "hello from hemlock");
/// ```
#[derive(Clone, Default)]
pub struct FactoryArgs {
    values: Vec<AnyArc>,
    keys: Vec<Key>,
}

impl FactoryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` as the next leading argument.
    pub fn with<T: Send + Sync + 'static>(mut self, value: Arc<T>) -> Self {
        self.values.push(value);
        self.keys.push(key_of_type::<T>());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Types of the arguments, in order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub(crate) fn values(&self) -> &[AnyArc] {
        &self.values
    }

    /// Checks that the leading `parameters` of a factory match these
    /// arguments pairwise. Parameters past the baseline are resolved later.
    pub(crate) fn validate(&self, factory: &'static str, parameters: &[Key]) -> DiResult<()> {
        let baseline = self.keys.len();
        if parameters.len() >= baseline && parameters[..baseline] == self.keys[..] {
            return Ok(());
        }
        Err(DiError::MalformedBinding {
            factory,
            expected: self.keys.iter().map(Key::display_name).collect(),
            found: parameters.iter().map(Key::display_name).collect(),
        })
    }
}

impl std::fmt::Debug for FactoryArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.keys.iter().map(Key::display_name))
            .finish()
    }
}

/// A factory parameter.
///
/// A parameter in a baseline position is taken from [`FactoryArgs`]; any
/// other parameter is resolved like a handler parameter. `Arc<T>`,
/// `Cap<dyn I>`, `Owned<T>` and the std value types implement it.
pub trait FactoryParam: Inject {
    /// The key compared with the baseline argument in the same position.
    fn key() -> Key;

    /// Takes this parameter from a baseline argument of the same key.
    fn from_baseline(arg: &Arc<dyn Any + Send + Sync>) -> Option<Self>;
}

impl<T: Send + Sync + 'static> FactoryParam for Arc<T> {
    fn key() -> Key {
        key_of_type::<T>()
    }

    fn from_baseline(arg: &Arc<dyn Any + Send + Sync>) -> Option<Self> {
        arg.clone().downcast::<T>().ok()
    }
}

impl<I: ?Sized + Capability> FactoryParam for Cap<I> {
    fn key() -> Key {
        key_of_capability::<I>()
    }

    // Baseline arguments are concrete
    fn from_baseline(_arg: &Arc<dyn Any + Send + Sync>) -> Option<Self> {
        None
    }
}

impl<T: Clone + Send + Sync + 'static> FactoryParam for Owned<T> {
    fn key() -> Key {
        key_of_type::<T>()
    }

    fn from_baseline(arg: &Arc<dyn Any + Send + Sync>) -> Option<Self> {
        arg.downcast_ref::<T>().cloned().map(Owned)
    }
}

/// A callable that builds a `T` from the container's baseline arguments and
/// whatever else it resolves.
///
/// Implemented for closures and functions of up to six [`FactoryParam`]
/// parameters returning `Result<T, E>` where `E: Into<FactoryError>`.
///
/// # Examples
///
/// ```rust
/// use hemlock_di::{Container, Resolver};
/// use std::convert::Infallible;
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Repo { db: Arc<Database> }
///
/// let mut container = Container::new();
/// container
///     .singleton(|| Ok::<_, Infallible>(Database { url: "sqlite::memory:".to_string() }))
///     .singleton(|db: Arc<Database>| Ok::<_, Infallible>(Repo { db }));
///
/// let repo = container.make_required::<Repo>();
/// assert!(Arc::ptr_eq(&repo.db, &container.make_required::<Database>()));
/// ```
pub trait Factory<Args>: Send + Sync + 'static {
    /// The produced type.
    type Output: Send + Sync + 'static;

    /// Keys of the declared parameters, in order.
    fn parameters() -> Vec<Key>;

    /// Calls the factory. Baseline positions come from `args`, the rest are
    /// resolved against `resolver`.
    fn construct(&self, resolver: &dyn ResolverCore, args: &[AnyArc]) -> DiResult<Self::Output>;
}

fn take_param<P: FactoryParam>(
    resolver: &dyn ResolverCore,
    args: &mut std::slice::Iter<'_, AnyArc>,
) -> DiResult<P> {
    match args.next() {
        Some(arg) => P::from_baseline(arg).ok_or(DiError::TypeMismatch(type_name::<P>())),
        None => P::inject(resolver),
    }
}

macro_rules! impl_factory {
    ($($param:ident),*) => {
        impl<Func, T, E, $($param,)*> Factory<($($param,)*)> for Func
        where
            Func: Fn($($param),*) -> Result<T, E> + Send + Sync + 'static,
            T: Send + Sync + 'static,
            E: Into<FactoryError>,
            $($param: FactoryParam,)*
        {
            type Output = T;

            fn parameters() -> Vec<Key> {
                vec![$($param::key()),*]
            }

            #[allow(non_snake_case, unused_variables, unused_mut)]
            fn construct(&self, resolver: &dyn ResolverCore, args: &[AnyArc]) -> DiResult<T> {
                let mut args = args.iter();
                $(let $param = take_param::<$param>(resolver, &mut args)?;)*
                (self)($($param),*).map_err(|e| {
                    let cause: FactoryError = e.into();
                    DiError::FactoryFailed {
                        service: type_name::<T>(),
                        cause: cause.to_string(),
                    }
                })
            }
        }
    };
}

impl_factory!();
impl_factory!(P1);
impl_factory!(P1, P2);
impl_factory!(P1, P2, P3);
impl_factory!(P1, P2, P3, P4);
impl_factory!(P1, P2, P3, P4, P5);
impl_factory!(P1, P2, P3, P4, P5, P6);
