//! Scope clones: snapshots of a container for one unit of work.

use super::Container;
use crate::factory::FactoryArgs;

impl Container {
    /// Snapshots this container with new baseline arguments.
    ///
    /// The clone starts with the current registrations, capability
    /// declarations, observers and configuration. Afterwards the two are
    /// independent: records added to either side are invisible to the other.
    /// Records present at clone time are shared, so a singleton cached through
    /// either side is the same value on both.
    ///
    /// # Examples
    ///
    /// ```
    /// use hemlock_di::{Container, FactoryArgs, Resolver};
    /// use std::sync::Arc;
    ///
    /// struct App;
    /// struct Request { path: String }
    ///
    /// let app = Arc::new(App);
    /// let root = Container::with_args(FactoryArgs::new().with(app.clone()));
    ///
    /// let mut request_scope = root.clone_scope(FactoryArgs::new().with(app));
    /// request_scope.instance(Request { path: "/users/42".to_string() });
    ///
    /// assert_eq!(request_scope.make_required::<Request>().path, "/users/42");
    /// assert!(root.make::<Request>().is_err());
    /// ```
    pub fn clone_scope(&self, args: FactoryArgs) -> Container {
        tracing::trace!(
            target: "hemlock_di",
            registrations = self.registrations.len(),
            args = args.len(),
            "cloning container scope"
        );
        Container {
            registrations: self.registrations.clone(),
            args,
            capabilities: self.capabilities.clone(),
            observers: self.observers.clone(),
            config: self.config.clone(),
        }
    }

    /// Snapshots this container keeping its baseline arguments.
    pub fn scope(&self) -> Container {
        self.clone_scope(self.args.clone())
    }
}

impl Clone for Container {
    fn clone(&self) -> Self {
        self.scope()
    }
}
