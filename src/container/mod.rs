//! The dependency injection container.

use std::any::{type_name, Any};
use std::sync::Arc;
use std::time::Instant;

use crate::capabilities::{Capability, CapabilityTable, CapabilityView};
use crate::config::{AmbiguityPolicy, ContainerConfig};
use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::factory::{Factory, FactoryArgs};
use crate::key::{key_of_type, Key};
use crate::lifetime::Lifetime;
use crate::observer::{DiObserver, LoggingObserver, Observers};
use crate::registration::{AnyArc, Ctor, Registration};
use crate::traits::ResolverCore;

mod scope;

/// An ordered ledger of registration records plus the baseline arguments
/// handed to every factory registered on it.
///
/// Setup code registers bindings on one long-lived container; each unit of
/// work takes a [`scope`](Container::scope) clone, adds its own instances,
/// and resolves or calls handlers against the clone.
///
/// A container is `Send + Sync` and resolution takes `&self`, so a finished
/// container can be shared across threads. Registration needs `&mut self`.
///
/// # Examples
///
/// ```
/// use hemlock_di::{Container, Resolver};
/// use std::convert::Infallible;
/// use std::sync::Arc;
///
/// struct Config { name: String }
/// struct Greeter { greeting: String }
///
/// let mut container = Container::new();
/// container
///     .instance(Config { name: "hemlock".to_string() })
///     .singleton(|| Ok::<_, Infallible>(Greeter { greeting: "hello".to_string() }));
///
/// let message = container
///     .call(|config: Arc<Config>, greeter: Arc<Greeter>| {
///         format!("{} {}", greeter.greeting, config.name)
///     }, vec![])
///     .unwrap();
/// assert_eq!(message, "hello hemlock");
/// ```
pub struct Container {
    registrations: Vec<Arc<Registration>>,
    args: FactoryArgs,
    capabilities: CapabilityTable,
    observers: Observers,
    config: ContainerConfig,
}

impl Container {
    /// Creates an empty container with no baseline arguments.
    pub fn new() -> Self {
        Self::with_config(FactoryArgs::new(), ContainerConfig::default())
    }

    /// Creates an empty container whose factories take `args` as their
    /// leading parameters.
    pub fn with_args(args: FactoryArgs) -> Self {
        Self::with_config(args, ContainerConfig::default())
    }

    pub fn with_config(args: FactoryArgs, config: ContainerConfig) -> Self {
        let mut observers = Observers::new();
        if config.trace_resolutions {
            observers.add(Arc::new(LoggingObserver::new()));
        }
        Self {
            registrations: Vec::new(),
            args,
            capabilities: CapabilityTable::new(),
            observers,
            config,
        }
    }

    /// Creates an empty container configured from the environment.
    pub fn from_env(args: FactoryArgs) -> DiResult<Self> {
        Ok(Self::with_config(args, ContainerConfig::from_env()?))
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// The baseline arguments every factory registered here receives.
    pub fn args(&self) -> &FactoryArgs {
        &self.args
    }

    pub fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Declares that values of `T` satisfy capability `I`.
    ///
    /// The declaration applies to every record producing `T`, including
    /// records registered before it.
    pub fn implements<T, I, F>(&mut self, upcast: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        I: ?Sized + Capability,
        F: Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
    {
        self.capabilities.declare::<T, I, F>(upcast);
        self
    }

    /// Registers a transient factory: every resolution constructs anew.
    ///
    /// Parameters past the baseline arguments are resolved from the container
    /// the request is made on, so a factory resolved through a scope clone
    /// sees that scope's instances.
    ///
    /// # Panics
    ///
    /// If the factory's parameters do not match the baseline arguments.
    /// See [`try_bind`](Self::try_bind).
    pub fn bind<Args: 'static, F: Factory<Args>>(&mut self, factory: F) -> &mut Self {
        self.try_bind(factory).unwrap_or_else(|e| panic!("{}", e))
    }

    pub fn try_bind<Args: 'static, F: Factory<Args>>(&mut self, factory: F) -> DiResult<&mut Self> {
        self.register_factory(Lifetime::Transient, factory)
    }

    /// Registers a singleton factory: the first successful resolution is
    /// cached and returned from then on, along with whatever it was built from.
    ///
    /// # Panics
    ///
    /// If the factory's parameters do not match the baseline arguments.
    pub fn singleton<Args: 'static, F: Factory<Args>>(&mut self, factory: F) -> &mut Self {
        self.try_singleton(factory).unwrap_or_else(|e| panic!("{}", e))
    }

    pub fn try_singleton<Args: 'static, F: Factory<Args>>(&mut self, factory: F) -> DiResult<&mut Self> {
        self.register_factory(Lifetime::Singleton, factory)
    }

    /// Registers a fixed value. Resolving `T` returns this exact allocation.
    pub fn instance<T: Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.instance_arc(Arc::new(value))
    }

    pub fn instance_arc<T: Send + Sync + 'static>(&mut self, value: Arc<T>) -> &mut Self {
        let produced = key_of_type::<T>();
        tracing::trace!(target: "hemlock_di", service = produced.display_name(), lifetime = %Lifetime::Instance, "registered");
        self.registrations
            .push(Arc::new(Registration::instance(produced, value)));
        self
    }

    fn register_factory<Args: 'static, F: Factory<Args>>(
        &mut self,
        lifetime: Lifetime,
        factory: F,
    ) -> DiResult<&mut Self> {
        self.args.validate(type_name::<F>(), &F::parameters())?;

        let produced = key_of_type::<F::Output>();
        let ctor: Ctor = Arc::new(move |resolver: &dyn ResolverCore, args: &[AnyArc]| {
            factory
                .construct(resolver, args)
                .map(|value| Arc::new(value) as AnyArc)
        });
        tracing::trace!(target: "hemlock_di", service = produced.display_name(), lifetime = %lifetime, "registered");
        self.registrations.push(Arc::new(Registration::factory(
            lifetime,
            produced,
            ctor,
            self.args.values().to_vec(),
        )));
        Ok(self)
    }

    /// One descriptor per registration record, in registration order.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.registrations
            .iter()
            .map(|reg| ServiceDescriptor {
                key: reg.produced,
                lifetime: reg.lifetime,
                operations: self.capabilities.operation_count(&reg.produced),
                cached: reg.is_cached(),
            })
            .collect()
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Container Debug ===\n");
        s.push_str(&format!("Baseline args: {:?}\n", self.args));
        s.push_str(&format!("Ambiguity: {:?}\n", self.config.ambiguity));
        s.push_str("Registrations:\n");
        for (i, descriptor) in self.descriptors().iter().enumerate() {
            s.push_str(&format!("  {}: {}\n", i, descriptor));
        }
        s
    }

    fn not_found(&self, key: &Key) -> DiError {
        DiError::NotFound {
            requested: key.display_name(),
            registered: self.registered(),
        }
    }

    /// First record producing exactly `key`.
    fn select_concrete(&self, key: &Key) -> DiResult<&Registration> {
        self.registrations
            .iter()
            .find(|reg| self.capabilities.satisfies(&reg.produced, key))
            .map(|reg| reg.as_ref())
            .ok_or_else(|| self.not_found(key))
    }

    /// The candidate with the fewest declared operations. Ties go to the later
    /// registration unless the ambiguity policy rejects them.
    fn select_capability(&self, key: &Key) -> DiResult<(&Registration, &CapabilityView)> {
        let mut best: Option<(usize, &Registration, &CapabilityView)> = None;
        let mut tied: Vec<&'static str> = Vec::new();

        for reg in &self.registrations {
            let Some(view) = self.capabilities.view(&reg.produced, key) else {
                continue;
            };
            let operations = self.capabilities.operation_count(&reg.produced);
            match best {
                Some((narrowest, ..)) if operations > narrowest => continue,
                Some((narrowest, ..)) if operations == narrowest => {}
                _ => tied.clear(),
            }
            tied.push(reg.produced.display_name());
            best = Some((operations, reg.as_ref(), view));
        }

        let (_, reg, view) = best.ok_or_else(|| self.not_found(key))?;
        if self.config.ambiguity == AmbiguityPolicy::Reject && tied.len() > 1 {
            return Err(DiError::Ambiguous {
                capability: key.display_name(),
                candidates: tied,
            });
        }
        Ok((reg, view))
    }

    fn produce(&self, key: &Key) -> DiResult<AnyArc> {
        match key {
            Key::Type(..) => self.select_concrete(key)?.make(self),
            Key::Capability(..) => {
                let (reg, view) = self.select_capability(key)?;
                let value = reg.make(self)?;
                view.cast(&value)
                    .ok_or(DiError::TypeMismatch(key.display_name()))
            }
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("registrations", &self.registrations)
            .field("args", &self.args)
            .field("observers", &self.observers.len())
            .field("config", &self.config)
            .finish()
    }
}

impl ResolverCore for Container {
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>> {
        if !self.observers.has_observers() {
            return self.produce(key);
        }

        let start = Instant::now();
        self.observers.resolving(key);
        let result = self.produce(key);
        match &result {
            Ok(_) => self.observers.resolved(key, start.elapsed()),
            Err(e) => self.observers.resolution_failed(key, e),
        }
        result
    }

    fn registered(&self) -> Vec<&'static str> {
        self.registrations
            .iter()
            .map(|reg| reg.produced.display_name())
            .collect()
    }
}
