//! Invocation of handlers with container-resolved parameters.
//!
//! A handler is any closure or function whose parameters implement [`Param`].
//! When called through [`Resolver::call`](crate::Resolver::call) with `n`
//! caller-supplied extras, the last `n` parameters are taken from the extras
//! in order and every parameter before them is resolved from the container by
//! its declared type:
//!
//! | Parameter type | Resolution |
//! | --- | --- |
//! | `Arc<T>` | concrete request for `T` |
//! | `Cap<dyn I>` | capability request for `I` |
//! | `Owned<T>`, `String`, integers, `bool`, ... | concrete request, value cloned out |

use std::any::{type_name, Any};
use std::ops::Deref;
use std::sync::Arc;

use crate::capabilities::Capability;
use crate::error::{DiError, DiResult};
use crate::traits::{Resolver, ResolverCore};

/// A caller-supplied trailing argument.
pub type ExtraArg = Box<dyn Any + Send>;

/// Boxes a value as an [`ExtraArg`].
pub fn extra<T: Any + Send>(value: T) -> ExtraArg {
    Box::new(value)
}

/// Builds a `Vec<ExtraArg>` from a list of values.
///
/// ```
/// use hemlock_di::extras;
///
/// let args = extras!["42", 7u32, String::from("slug")];
/// assert_eq!(args.len(), 3);
/// assert_eq!(*args[0].downcast_ref::<&str>().unwrap(), "42");
/// ```
#[macro_export]
macro_rules! extras {
    ($($value:expr),* $(,)?) => {
        ::std::vec![$($crate::extra($value)),*]
    };
}

/// A type that can be produced by resolving against a container.
pub trait Inject: Sized + 'static {
    fn inject<R: ResolverCore + ?Sized>(resolver: &R) -> DiResult<Self>;
}

/// A handler parameter: injectable, or supplied by the caller as an extra.
pub trait Param: Inject {
    /// Takes this parameter from a caller-supplied trailing argument.
    fn from_extra(arg: ExtraArg) -> DiResult<Self> {
        arg.downcast::<Self>()
            .map(|value| *value)
            .map_err(|_| DiError::TypeMismatch(type_name::<Self>()))
    }
}

impl<T: Send + Sync + 'static> Inject for Arc<T> {
    fn inject<R: ResolverCore + ?Sized>(resolver: &R) -> DiResult<Self> {
        resolver.make::<T>()
    }
}

impl<T: Send + Sync + 'static> Param for Arc<T> {}

/// A value resolved through a capability interface.
///
/// ```
/// use hemlock_di::{capability, Cap, Container, Resolver};
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
/// capability!(dyn Clock => [now]);
///
/// struct Fixed;
/// impl Clock for Fixed {
///     fn now(&self) -> u64 { 1_700_000_000 }
/// }
///
/// let mut container = Container::new();
/// container.instance(Fixed);
/// container.implements::<Fixed, dyn Clock, _>(|f| f);
///
/// let stamp = container.call(|clock: Cap<dyn Clock>| clock.now(), vec![]).unwrap();
/// assert_eq!(stamp, 1_700_000_000);
/// ```
pub struct Cap<I: ?Sized>(pub Arc<I>);

impl<I: ?Sized> Cap<I> {
    pub fn into_inner(self) -> Arc<I> {
        self.0
    }
}

impl<I: ?Sized> Deref for Cap<I> {
    type Target = I;

    fn deref(&self) -> &I {
        &self.0
    }
}

impl<I: ?Sized> Clone for Cap<I> {
    fn clone(&self) -> Self {
        Cap(Arc::clone(&self.0))
    }
}

impl<I: ?Sized + Capability> Inject for Cap<I> {
    fn inject<R: ResolverCore + ?Sized>(resolver: &R) -> DiResult<Self> {
        resolver.make_capability::<I>().map(Cap)
    }
}

impl<I: ?Sized + Capability> Param for Cap<I> {
    fn from_extra(arg: ExtraArg) -> DiResult<Self> {
        match arg.downcast::<Cap<I>>() {
            Ok(cap) => Ok(*cap),
            Err(arg) => arg
                .downcast::<Arc<I>>()
                .map(|view| Cap(*view))
                .map_err(|_| DiError::TypeMismatch(type_name::<I>())),
        }
    }
}

/// A value cloned out of a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owned<T>(pub T);

impl<T> Owned<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Owned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Clone + Send + Sync + 'static> Inject for Owned<T> {
    fn inject<R: ResolverCore + ?Sized>(resolver: &R) -> DiResult<Self> {
        resolver.make_value::<T>().map(Owned)
    }
}

impl<T: Clone + Send + Sync + 'static> Param for Owned<T> {
    fn from_extra(arg: ExtraArg) -> DiResult<Self> {
        match arg.downcast::<Owned<T>>() {
            Ok(owned) => Ok(*owned),
            Err(arg) => arg
                .downcast::<T>()
                .map(|value| Owned(*value))
                .map_err(|_| DiError::TypeMismatch(type_name::<T>())),
        }
    }
}

macro_rules! impl_value_param {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inject for $ty {
                fn inject<R: ResolverCore + ?Sized>(resolver: &R) -> DiResult<Self> {
                    resolver.make_value::<$ty>()
                }
            }

            impl Param for $ty {}

            impl crate::factory::FactoryParam for $ty {
                fn key() -> crate::key::Key {
                    crate::key::key_of_type::<$ty>()
                }

                fn from_baseline(arg: &Arc<dyn Any + Send + Sync>) -> Option<Self> {
                    arg.downcast_ref::<$ty>().cloned()
                }
            }
        )*
    };
}

impl_value_param!(
    String, &'static str, bool, char,
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    f32, f64,
);

macro_rules! impl_inject_tuple {
    ($($slot:ident),+) => {
        impl<$($slot: Inject),+> Inject for ($($slot,)+) {
            fn inject<R: ResolverCore + ?Sized>(resolver: &R) -> DiResult<Self> {
                Ok(($($slot::inject(resolver)?,)+))
            }
        }
    };
}

impl_inject_tuple!(X1);
impl_inject_tuple!(X1, X2);
impl_inject_tuple!(X1, X2, X3);
impl_inject_tuple!(X1, X2, X3, X4);
impl_inject_tuple!(X1, X2, X3, X4, X5);
impl_inject_tuple!(X1, X2, X3, X4, X5, X6);

/// A callable whose parameters are all [`Param`]s.
///
/// Implemented for closures and functions of up to eight parameters. `P` is
/// the parameter tuple and only serves to keep the impls apart.
pub trait Handler<P> {
    type Output;

    /// Number of parameters the handler declares.
    const ARITY: usize;

    fn invoke<R: ResolverCore + ?Sized>(&self, resolver: &R, extras: Vec<ExtraArg>) -> DiResult<Self::Output>;
}

fn next_extra<P: Param>(extras: &mut std::vec::IntoIter<ExtraArg>) -> DiResult<P> {
    let arg = extras.next().ok_or(DiError::TypeMismatch(type_name::<P>()))?;
    P::from_extra(arg)
}

macro_rules! impl_handler {
    ($arity:expr; $($param:ident),*) => {
        impl<Func, Out, $($param,)*> Handler<($($param,)*)> for Func
        where
            Func: Fn($($param),*) -> Out,
            $($param: Param,)*
        {
            type Output = Out;

            const ARITY: usize = $arity;

            #[allow(non_snake_case, unused_variables, unused_mut, unused_assignments)]
            fn invoke<R: ResolverCore + ?Sized>(&self, resolver: &R, extras: Vec<ExtraArg>) -> DiResult<Out> {
                let supplied = extras.len();
                if supplied > $arity {
                    return Err(DiError::Arity {
                        handler: type_name::<Func>(),
                        parameters: $arity,
                        extras: supplied,
                    });
                }
                let leading = $arity - supplied;
                let mut extras = extras.into_iter();
                let mut position = 0usize;
                $(
                    let $param = if position < leading {
                        <$param as Inject>::inject(resolver)?
                    } else {
                        next_extra::<$param>(&mut extras)?
                    };
                    position += 1;
                )*
                Ok((self)($($param),*))
            }
        }
    };
}

impl_handler!(0;);
impl_handler!(1; P1);
impl_handler!(2; P1, P2);
impl_handler!(3; P1, P2, P3);
impl_handler!(4; P1, P2, P3, P4);
impl_handler!(5; P1, P2, P3, P4, P5);
impl_handler!(6; P1, P2, P3, P4, P5, P6);
impl_handler!(7; P1, P2, P3, P4, P5, P6, P7);
impl_handler!(8; P1, P2, P3, P4, P5, P6, P7, P8);
