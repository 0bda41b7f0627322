//! The validator protocol
//!
//! Every rule, whether it checks one field or a whole record, is a
//! [`Validator`]. Rule sets are validators too, so they nest.

use crate::error::Error;
use crate::printer::{Printer, ViolationError};
use std::sync::Arc;

/// Checks a value of type `V`
///
/// The value type is fixed per validator instance, so a validator can only
/// ever be registered against fields of the type it expects.
pub trait Validator<V: ?Sized>: Send + Sync {
    fn validate(&self, value: &V) -> Result<(), Error>;
}

/// A validator whose violation type is known statically
///
/// Configuration is copy-on-write: [`TypedValidator::with_printer`] returns a
/// new validator and leaves `self` untouched, so one instance can be shared
/// by several rules, rule sets and threads.
pub trait TypedValidator<V: ?Sized>: Validator<V> + Clone {
    type Violation: ViolationError;

    /// Run the check and return the typed violation
    fn check(&self, value: &V) -> Result<(), Self::Violation>;

    /// Copy of this validator that renders its violations with `printer`
    fn with_printer<P>(&self, printer: P) -> Self
    where
        P: Printer<Self::Violation> + 'static;
}

impl<V: ?Sized, T: Validator<V> + ?Sized> Validator<V> for Box<T> {
    fn validate(&self, value: &V) -> Result<(), Error> {
        (**self).validate(value)
    }
}

impl<V: ?Sized, T: Validator<V> + ?Sized> Validator<V> for Arc<T> {
    fn validate(&self, value: &V) -> Result<(), Error> {
        (**self).validate(value)
    }
}

impl<V: ?Sized, T: Validator<V> + ?Sized> Validator<V> for &T {
    fn validate(&self, value: &V) -> Result<(), Error> {
        (**self).validate(value)
    }
}

/// Closure adapter, see [`validator_fn`]
#[derive(Clone)]
pub struct ValidatorFn<F>(F);

/// Turn a closure into a [`Validator`]
///
/// Handy for one-off checks and for whole-record rules that look at several
/// fields at once.
pub fn validator_fn<V, F>(f: F) -> ValidatorFn<F>
where
    V: ?Sized,
    F: Fn(&V) -> Result<(), Error> + Send + Sync,
{
    ValidatorFn(f)
}

impl<V, F> Validator<V> for ValidatorFn<F>
where
    V: ?Sized,
    F: Fn(&V) -> Result<(), Error> + Send + Sync,
{
    fn validate(&self, value: &V) -> Result<(), Error> {
        (self.0)(value)
    }
}

impl<F> std::fmt::Debug for ValidatorFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ValidatorFn")
    }
}

/// Box validators into the list taken by [`RuleSet::add`](crate::RuleSet::add)
///
/// ```
/// use requiring::{validators, MaxLength, NotEmpty, Validator};
///
/// let list: Vec<Box<dyn Validator<String>>> = validators![NotEmpty::new(), MaxLength::new(10)];
/// assert_eq!(list.len(), 2);
/// ```
#[macro_export]
macro_rules! validators {
    () => {
        ::std::vec::Vec::new()
    };
    ($($validator:expr),+ $(,)?) => {
        ::std::vec![$(::std::boxed::Box::new($validator) as ::std::boxed::Box<dyn $crate::Validator<_>>),+]
    };
}
