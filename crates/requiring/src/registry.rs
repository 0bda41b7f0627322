//! Rule sets: register rules against a template record, validate any record
//!
//! Construction and use are separate types. A [`RuleSet`] only exists inside
//! the closure given to [`structure`]; what comes out is a read-only
//! [`StructValidator`]. Rules therefore cannot be added once validation can
//! start, and a built validator can be shared between threads without locks.

use crate::error::{Error, MultiError};
use crate::field::{self, FieldDescriptor, FieldError, Record};
use crate::rule::Rule;
use crate::validator::Validator;
use std::any::Any;
use std::fmt;

/// Rules being registered against a template record
///
/// Rule names are unique; registering a name again replaces the earlier rule
/// but keeps its position. Rules run in registration order.
pub struct RuleSet<'t, T: Record> {
    template: &'t T,
    rules: Vec<Rule<T>>,
}

impl<'t, T: Record> RuleSet<'t, T> {
    fn new(template: &'t T) -> Self {
        Self {
            template,
            rules: Vec::new(),
        }
    }

    /// The zero-valued record that field references must point into
    pub fn template(&self) -> &'t T {
        self.template
    }

    /// Register `validators` for the field that `field` returns
    ///
    /// The accessor is called once, on the template.
    ///
    /// # Panics
    ///
    /// If the returned reference is not a visible field of `T`, e.g. a
    /// borrowed constant or a field of a non-flattened sub-record.
    pub fn add<F, A>(
        &mut self,
        field: A,
        name: impl Into<String>,
        validators: Vec<Box<dyn Validator<F>>>,
    ) -> &mut Self
    where
        F: Any,
        A: FnOnce(&T) -> &F,
    {
        match self.try_add(field, name, validators) {
            Ok(set) => set,
            Err(err) => panic!("cannot register rule: {}", err),
        }
    }

    /// Like [`RuleSet::add`], reporting unresolvable fields as errors
    pub fn try_add<F, A>(
        &mut self,
        field: A,
        name: impl Into<String>,
        validators: Vec<Box<dyn Validator<F>>>,
    ) -> Result<&mut Self, FieldError>
    where
        F: Any,
        A: FnOnce(&T) -> &F,
    {
        let template = self.template;
        self.try_add_ref(field(template), name, validators)
    }

    /// Register `validators` for the template field that `field` points at
    ///
    /// ```
    /// # #[cfg(feature = "derive")]
    /// # fn main() {
    /// use requiring::{structure, validators, NotEmpty, Record};
    ///
    /// #[derive(Default, Record)]
    /// struct Login {
    ///     user: String,
    /// }
    ///
    /// let rules = structure::<Login>(|s, login| {
    ///     s.add_ref(&login.user, "user", validators![NotEmpty::new()]);
    /// });
    /// assert_eq!(rules.len(), 1);
    /// # }
    /// # #[cfg(not(feature = "derive"))]
    /// # fn main() {}
    /// ```
    ///
    /// # Panics
    ///
    /// If `field` does not point at a visible field of the template.
    pub fn add_ref<F: Any>(
        &mut self,
        field: &F,
        name: impl Into<String>,
        validators: Vec<Box<dyn Validator<F>>>,
    ) -> &mut Self {
        match self.try_add_ref(field, name, validators) {
            Ok(set) => set,
            Err(err) => panic!("cannot register rule: {}", err),
        }
    }

    /// Like [`RuleSet::add_ref`], reporting unresolvable fields as errors
    pub fn try_add_ref<F: Any>(
        &mut self,
        field: &F,
        name: impl Into<String>,
        validators: Vec<Box<dyn Validator<F>>>,
    ) -> Result<&mut Self, FieldError> {
        let descriptor = field::resolve(self.template, field)?;
        self.insert(Rule::new(name.into(), descriptor, validators));
        Ok(self)
    }

    /// Register validators that receive the whole record
    pub fn add_record(
        &mut self,
        name: impl Into<String>,
        validators: Vec<Box<dyn Validator<T>>>,
    ) -> &mut Self {
        self.insert(Rule::new(
            name.into(),
            FieldDescriptor::root::<T>(),
            validators,
        ));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn insert(&mut self, rule: Rule<T>) {
        tracing::debug!(
            record = std::any::type_name::<T>(),
            rule = rule.name(),
            field = rule.field().name(),
            validators = rule.validator_count(),
            "registered rule"
        );

        match self.rules.iter().position(|r| r.name() == rule.name()) {
            Some(index) => {
                tracing::debug!(rule = rule.name(), "replacing earlier rule with the same name");
                self.rules[index] = rule;
            }
            None => self.rules.push(rule),
        }
    }
}

/// Build a validator for `T`
///
/// `build` receives the rule set and the template record every field
/// reference must point into. All resolution happens here; the returned
/// validator is immutable.
///
/// ```
/// # #[cfg(feature = "derive")]
/// # fn main() {
/// use requiring::{structure, validators, Length, NotEmpty, Record, Validator};
///
/// #[derive(Default, Record)]
/// struct Signup {
///     name: String,
///     email: String,
/// }
///
/// let rules = structure::<Signup>(|s, _| {
///     s.add(|u| &u.name, "name", validators![Length::new(2, 20)]);
///     s.add(|u| &u.email, "email", validators![NotEmpty::new()]);
/// });
///
/// let err = rules
///     .validate(&Signup { name: "x".into(), email: String::new() })
///     .unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "'name' the length must be in range(2 ... 20)\n'email' requires"
/// );
/// # }
/// # #[cfg(not(feature = "derive"))]
/// # fn main() {}
/// ```
pub fn structure<T: Record>(build: impl FnOnce(&mut RuleSet<'_, T>, &T)) -> StructValidator<T> {
    let template = T::default();
    let mut set = RuleSet::new(&template);
    build(&mut set, &template);

    let rules = set.rules;
    tracing::debug!(
        record = std::any::type_name::<T>(),
        rules = rules.len(),
        "built struct validator"
    );
    StructValidator { rules }
}

/// Validates records of type `T` against a fixed list of rules
pub struct StructValidator<T> {
    rules: Vec<Rule<T>>,
}

impl<T: Record> StructValidator<T> {
    /// Same as [`structure`]
    pub fn build(build: impl FnOnce(&mut RuleSet<'_, T>, &T)) -> Self {
        structure(build)
    }

    /// Every violation in `record`, rule by rule in registration order
    pub fn violations(&self, record: &T) -> MultiError {
        let mut errors = MultiError::new();
        for rule in &self.rules {
            rule.collect(record, &mut errors);
        }
        tracing::trace!(
            record = std::any::type_name::<T>(),
            violations = errors.len(),
            "validated record"
        );
        errors
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule<T>> + '_ {
        self.rules.iter()
    }

    pub fn rule(&self, name: &str) -> Option<&Rule<T>> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T: Record> Validator<T> for StructValidator<T> {
    fn validate(&self, value: &T) -> Result<(), Error> {
        self.violations(value).into_result()
    }
}

impl<T> fmt::Debug for StructValidator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructValidator")
            .field("record", &std::any::type_name::<T>())
            .field("rules", &self.rules)
            .finish()
    }
}
