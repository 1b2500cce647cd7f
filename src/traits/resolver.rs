//! Resolver traits for service resolution.

use std::any::{type_name, Any};
use std::sync::Arc;

use crate::capabilities::Capability;
use crate::error::{DiError, DiResult};
use crate::invoke::{ExtraArg, Handler, Inject};
use crate::key::{key_of_capability, key_of_type, Key};

/// Core resolver trait for object-safe service resolution.
///
/// Implemented by [`Container`](crate::Container). Everything typed in
/// [`Resolver`] is built on these two methods, so a `&dyn ResolverCore` can be
/// handed to code that only needs to look things up.
pub trait ResolverCore: Send + Sync {
    /// Resolves a request to a type-erased value.
    ///
    /// For a [`Key::Type`] request the value is the produced `Arc<T>`; for a
    /// [`Key::Capability`] request it is an `Arc<Arc<dyn I>>` holding the
    /// selected value's interface view.
    ///
    /// # Returns
    ///
    /// * `Ok(value)` - The produced or cached value
    /// * `Err(DiError)` - No registration matched, the match was ambiguous, or
    ///   the selected factory failed
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>>;

    /// Produced type names of the current registrations, in registration order.
    fn registered(&self) -> Vec<&'static str>;
}

/// High-level resolver interface with generic methods for type-safe resolution.
///
/// Blanket-implemented for every [`ResolverCore`], so bring it into scope to
/// call `make`, `resolve` or `call` on a container.
///
/// Every fallible method has a `*_required` counterpart that panics with the
/// formatted [`DiError`]. That is the "abort the unit of work" form; use it
/// where a missing binding is a programming error.
///
/// # Examples
///
/// ```
/// use hemlock_di::{capability, Container, Resolver};
/// use std::convert::Infallible;
///
/// trait Honker: Send + Sync {
///     fn honk(&self) -> String;
/// }
/// capability!(dyn Honker => [honk]);
///
/// struct Car { noise: String }
/// impl Honker for Car {
///     fn honk(&self) -> String { self.noise.clone() }
/// }
///
/// let mut container = Container::new();
/// container.singleton(|| Ok::<_, Infallible>(Car { noise: "Honk!".to_string() }));
/// container.implements::<Car, dyn Honker, _>(|car| car);
///
/// let honker = container.make_capability_required::<dyn Honker>();
/// assert_eq!(honker.honk(), "Honk!");
///
/// let car = container.make::<Car>().unwrap();
/// assert_eq!(car.noise, "Honk!");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete type: the first registration producing exactly `T`.
    fn make<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        let any = self.resolve_any(&key_of_type::<T>())?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(type_name::<T>()))
    }

    /// Resolves a capability interface: the narrowest registration whose
    /// produced type implements `I`.
    fn make_capability<I: ?Sized + Capability>(&self) -> DiResult<Arc<I>> {
        let any = self.resolve_any(&key_of_capability::<I>())?;
        any.downcast::<Arc<I>>()
            .map(|view| (*view).clone())
            .map_err(|_| DiError::TypeMismatch(type_name::<I>()))
    }

    /// Resolves a concrete type and clones the value out of its `Arc`.
    ///
    /// Used for plain value parameters (`String`, integers and the like).
    fn make_value<T: Clone + Send + Sync + 'static>(&self) -> DiResult<T> {
        self.make::<T>().map(|value| (*value).clone())
    }

    fn make_required<T: Send + Sync + 'static>(&self) -> Arc<T> {
        self.make::<T>().unwrap_or_else(|e| panic!("{}", e))
    }

    fn make_capability_required<I: ?Sized + Capability>(&self) -> Arc<I> {
        self.make_capability::<I>().unwrap_or_else(|e| panic!("{}", e))
    }

    /// Resolves any injectable slot type, including tuples of slots.
    ///
    /// ```
    /// use hemlock_di::{Cap, capability, Container, Resolver};
    /// use std::sync::Arc;
    ///
    /// trait Named: Send + Sync {
    ///     fn name(&self) -> &str;
    /// }
    /// capability!(dyn Named => [name]);
    ///
    /// struct Service;
    /// impl Named for Service {
    ///     fn name(&self) -> &str { "service" }
    /// }
    ///
    /// let mut container = Container::new();
    /// container.instance(Service).instance(8080u16);
    /// container.implements::<Service, dyn Named, _>(|s| s);
    ///
    /// let (named, port): (Cap<dyn Named>, u16) = container.resolve().unwrap();
    /// assert_eq!(named.name(), "service");
    /// assert_eq!(port, 8080);
    /// ```
    fn resolve<X: Inject>(&self) -> DiResult<X> {
        X::inject(self)
    }

    /// Resolves into a caller-supplied slot. The slot's declared type picks
    /// interface, concrete or value resolution.
    ///
    /// This is the slot-filling form. The form that takes a function plus
    /// trailing arguments and returns the function's outputs is
    /// [`call`](Resolver::call).
    ///
    /// ```
    /// use hemlock_di::{Container, Resolver};
    ///
    /// let mut container = Container::new();
    /// container.instance(3u8);
    ///
    /// let mut slot: Option<u8> = None;
    /// container.resolve_into(&mut slot).unwrap();
    /// assert_eq!(slot, Some(3));
    /// ```
    fn resolve_into<X: Inject>(&self, slot: &mut Option<X>) -> DiResult<()> {
        *slot = Some(X::inject(self)?);
        Ok(())
    }

    /// Calls `handler`, resolving its leading parameters and passing `extras`
    /// as its trailing parameters.
    ///
    /// Routers use this to run a handler with path parameters as `extras`;
    /// it is the function-taking resolve-into.
    ///
    /// ```
    /// use hemlock_di::{extras, Container, Resolver};
    /// use std::sync::Arc;
    ///
    /// struct Repo { prefix: &'static str }
    ///
    /// let mut container = Container::new();
    /// container.instance(Repo { prefix: "user-" });
    ///
    /// let id = container
    ///     .call(|repo: Arc<Repo>, id: &'static str| format!("{}{}", repo.prefix, id), extras!["42"])
    ///     .unwrap();
    /// assert_eq!(id, "user-42");
    /// ```
    fn call<P, H: Handler<P>>(&self, handler: H, extras: Vec<ExtraArg>) -> DiResult<H::Output> {
        handler.invoke(self, extras)
    }

    fn call_required<P, H: Handler<P>>(&self, handler: H, extras: Vec<ExtraArg>) -> H::Output {
        self.call(handler, extras).unwrap_or_else(|e| panic!("{}", e))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
