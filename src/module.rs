//! Provider modules for grouped registration.
//!
//! A module registers its bindings first and boots once every module has
//! registered, so a boot phase can resolve bindings contributed by modules
//! installed after it.

use crate::{Container, DiResult};

/// A group of registrations with an optional boot step.
///
/// # Example
///
/// ```rust
/// use hemlock_di::{Container, DiResult, Resolver, ServiceModule};
/// use std::convert::Infallible;
/// use std::sync::Arc;
///
/// struct Settings { url: String }
/// struct Database { url: String }
///
/// struct SettingsModule;
/// impl ServiceModule for SettingsModule {
///     fn register(&self, container: &mut Container) -> DiResult<()> {
///         container.instance(Settings { url: "postgres://localhost".to_string() });
///         Ok(())
///     }
/// }
///
/// struct DatabaseModule;
/// impl ServiceModule for DatabaseModule {
///     fn register(&self, container: &mut Container) -> DiResult<()> {
///         container.try_singleton(|| Ok::<_, Infallible>(Database { url: String::new() }))?;
///         Ok(())
///     }
///
///     fn boot(&self, container: &Container) -> DiResult<()> {
///         let settings = container.make::<Settings>()?;
///         assert!(!settings.url.is_empty());
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let mut container = Container::new();
/// container.install(&[&DatabaseModule, &SettingsModule])?;
/// assert!(container.make::<Database>().is_ok());
/// # Ok(())
/// # }
/// ```
pub trait ServiceModule {
    /// Adds this module's bindings.
    fn register(&self, container: &mut Container) -> DiResult<()>;

    /// Runs after every installed module has registered.
    fn boot(&self, _container: &Container) -> DiResult<()> {
        Ok(())
    }

    /// Name used in log events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl Container {
    /// Runs every module's register phase, then every boot phase, in order.
    /// Stops at the first error.
    pub fn install(&mut self, modules: &[&dyn ServiceModule]) -> DiResult<&mut Self> {
        for module in modules {
            tracing::debug!(target: "hemlock_di", module = module.name(), "registering module");
            module.register(self)?;
        }
        for module in modules {
            tracing::debug!(target: "hemlock_di", module = module.name(), "booting module");
            module.boot(self)?;
        }
        Ok(self)
    }
}
