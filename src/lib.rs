//! # hemlock-di
//!
//! Type-directed dependency injection: register how to build values, then
//! resolve them by concrete type or by capability interface, or call handlers
//! whose parameters are supplied from the container.
//!
//! ## Features
//!
//! - **Three binding forms**: transient factories, singleton factories, fixed instances
//! - **Capability interfaces**: resolve `dyn Trait` views, preferring the narrowest producer
//! - **Handler invocation**: leading parameters injected, trailing parameters supplied by the caller
//! - **Scope clones**: snapshot a container per unit of work without touching the parent
//! - **At-most-once singletons**: safe to resolve concurrently from many threads
//!
//! ## Quick Start
//!
//! ```rust
//! use hemlock_di::{Container, FactoryArgs, Resolver};
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! struct App { name: String }
//!
//! struct Database {
//!     url: String,
//! }
//!
//! // Every factory receives the application handle as its first argument
//! let app = Arc::new(App { name: "blog".to_string() });
//! let mut container = Container::with_args(FactoryArgs::new().with(app));
//!
//! container.singleton(|app: Arc<App>| {
//!     Ok::<_, Infallible>(Database { url: format!("postgres://localhost/{}", app.name) })
//! });
//!
//! let db = container.make_required::<Database>();
//! assert_eq!(db.url, "postgres://localhost/blog");
//! assert!(Arc::ptr_eq(&db, &container.make_required::<Database>()));
//! ```
//!
//! ## Capability Interfaces
//!
//! A capability is a trait object type with a declared operation list.
//! Each container records which produced types implement which capabilities.
//!
//! ```rust
//! use hemlock_di::{capability, Container, Resolver};
//! use std::convert::Infallible;
//!
//! trait Honker: Send + Sync {
//!     fn honk(&self) -> String;
//! }
//! capability!(dyn Honker => [honk]);
//!
//! struct Car { noise: String }
//! impl Honker for Car {
//!     fn honk(&self) -> String { self.noise.clone() }
//! }
//!
//! let mut container = Container::new();
//! container
//!     .singleton(|| Ok::<_, Infallible>(Car { noise: "Honk!".to_string() }))
//!     .implements::<Car, dyn Honker, _>(|car| car);
//!
//! let honker = container.make_capability_required::<dyn Honker>();
//! assert_eq!(honker.honk(), "Honk!");
//! ```
//!
//! ## Per-Request Scopes
//!
//! ```rust
//! use hemlock_di::{extras, Container, Resolver};
//! use std::sync::Arc;
//!
//! struct Request { method: &'static str }
//!
//! let root = Container::new();
//!
//! let mut scope = root.scope();
//! scope.instance(Request { method: "GET" });
//!
//! let line = scope
//!     .call(|req: Arc<Request>, id: String| format!("{} /posts/{}", req.method, id), extras!["7".to_string()])
//!     .unwrap();
//! assert_eq!(line, "GET /posts/7");
//! assert!(root.make::<Request>().is_err());
//! ```

pub mod capabilities;
pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod factory;
pub mod invoke;
pub mod key;
pub mod lifetime;
pub mod module;
pub mod observer;
pub mod traits;

// Internal modules
mod registration;

pub use capabilities::{Capability, CapabilityTable};
pub use config::{AmbiguityPolicy, ContainerConfig};
pub use container::Container;
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult, FactoryError};
pub use factory::{Factory, FactoryArgs, FactoryParam};
pub use invoke::{extra, Cap, ExtraArg, Handler, Inject, Owned, Param};
pub use key::{key_of_capability, key_of_type, Key};
pub use lifetime::Lifetime;
pub use module::ServiceModule;
pub use observer::{DiObserver, LoggingObserver};
pub use traits::{Resolver, ResolverCore};
