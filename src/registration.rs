//! Registration records.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::traits::ResolverCore;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// Builds a value from the fixed leading args, resolving anything else
/// against the container the request was made on.
pub(crate) type Ctor = Arc<dyn Fn(&dyn ResolverCore, &[AnyArc]) -> DiResult<AnyArc> + Send + Sync>;

/// One binding from a produced type to the way of obtaining it.
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) produced: Key,
    ctor: Option<Ctor>,
    /// Leading arguments captured when the record was created
    fixed_args: Vec<AnyArc>,
    /// Singleton cache; set at creation for instances, never used for transients.
    /// `get_or_try_init` runs the factory at most once and caches nothing on failure.
    cached: OnceCell<AnyArc>,
}

impl Registration {
    pub(crate) fn factory(
        lifetime: Lifetime,
        produced: Key,
        ctor: Ctor,
        fixed_args: Vec<AnyArc>,
    ) -> Self {
        debug_assert!(lifetime != Lifetime::Instance);
        Self {
            lifetime,
            produced,
            ctor: Some(ctor),
            fixed_args,
            cached: OnceCell::new(),
        }
    }

    pub(crate) fn instance(produced: Key, value: AnyArc) -> Self {
        Self {
            lifetime: Lifetime::Instance,
            produced,
            ctor: None,
            fixed_args: Vec::new(),
            cached: OnceCell::with_value(value),
        }
    }

    pub(crate) fn is_cached(&self) -> bool {
        self.cached.get().is_some()
    }

    /// Produces this record's value according to its lifetime.
    ///
    /// A singleton factory that re-enters its own record through `resolver`
    /// blocks forever.
    pub(crate) fn make(&self, resolver: &dyn ResolverCore) -> DiResult<AnyArc> {
        match self.lifetime {
            Lifetime::Transient => self.construct(resolver),
            Lifetime::Singleton | Lifetime::Instance => self
                .cached
                .get_or_try_init(|| self.construct(resolver))
                .map(Arc::clone),
        }
    }

    fn construct(&self, resolver: &dyn ResolverCore) -> DiResult<AnyArc> {
        let ctor = self
            .ctor
            .as_ref()
            .ok_or(DiError::TypeMismatch(self.produced.display_name()))?;
        (ctor)(resolver, &self.fixed_args)
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("lifetime", &self.lifetime)
            .field("produced", &self.produced.display_name())
            .field("fixed_args", &self.fixed_args.len())
            .field("cached", &self.is_cached())
            .finish()
    }
}
