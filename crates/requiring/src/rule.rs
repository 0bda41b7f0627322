//! Named rules binding one field to its validators

use crate::error::{Error, MultiError};
use crate::field::{FieldDescriptor, Record};
use crate::validator::Validator;
use std::any::Any;
use std::fmt;

/// Type-erased validator list for a field of some type `F`
trait FieldCheck<T>: Send + Sync {
    fn run(&self, rule: &str, field: &FieldDescriptor, record: &T, errors: &mut MultiError);

    fn len(&self) -> usize;
}

struct Checks<F: ?Sized> {
    validators: Vec<Box<dyn Validator<F>>>,
}

impl<T: Record, F: Any> FieldCheck<T> for Checks<F> {
    fn run(&self, rule: &str, field: &FieldDescriptor, record: &T, errors: &mut MultiError) {
        let value = match record
            .field_at(field.path().indices())
            .and_then(|value| value.downcast_ref::<F>())
        {
            Some(value) => value,
            None => panic!(
                "`{}` has no `{}` field at path {} (Record impl out of sync with the type)",
                std::any::type_name::<T>(),
                std::any::type_name::<F>(),
                field.path()
            ),
        };

        for validator in &self.validators {
            if let Err(err) = validator.validate(value) {
                // Aggregates from nested rule sets are split so that every
                // member carries this rule's name.
                for member in err.into_members() {
                    errors.push(Error::rule(rule, member));
                }
            }
        }
    }

    fn len(&self) -> usize {
        self.validators.len()
    }
}

/// A name, a field and the validators that govern it
///
/// Rules are created by [`RuleSet`](crate::RuleSet) and immutable afterwards.
pub struct Rule<T> {
    name: String,
    field: FieldDescriptor,
    checks: Box<dyn FieldCheck<T>>,
}

impl<T: Record> Rule<T> {
    pub(crate) fn new<F: Any>(
        name: String,
        field: FieldDescriptor,
        validators: Vec<Box<dyn Validator<F>>>,
    ) -> Self {
        Self {
            name,
            field,
            checks: Box::new(Checks { validators }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field this rule reads
    pub fn field(&self) -> &FieldDescriptor {
        &self.field
    }

    pub fn validator_count(&self) -> usize {
        self.checks.len()
    }

    /// Run every validator against this rule's field of `record`
    ///
    /// Each failure is prefixed with the rule name. Nothing short-circuits.
    pub fn validate(&self, record: &T) -> MultiError {
        let mut errors = MultiError::new();
        self.collect(record, &mut errors);
        errors
    }

    pub(crate) fn collect(&self, record: &T, errors: &mut MultiError) {
        self.checks.run(&self.name, &self.field, record, errors);
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("field", &self.field.name())
            .field("validators", &self.checks.len())
            .finish()
    }
}
