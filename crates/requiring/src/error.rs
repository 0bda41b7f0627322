//! Errors produced by validators, rules and rule sets

use std::collections::BTreeMap;
use std::fmt;

/// A single violation as returned by any [`Validator`](crate::Validator)
pub type BoxedViolation = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Validation failure
///
/// Leaf violations are wrapped with the name of the rule that produced them,
/// and everything a rule set finds is collected into one [`MultiError`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One failed check
    #[error("{0}")]
    Violation(BoxedViolation),

    /// A failure reported under a rule name
    #[error("'{rule}' {source}")]
    Rule { rule: String, source: Box<Error> },

    /// Several failures, one per (rule, validator) pair
    #[error("{0}")]
    Multi(MultiError),
}

impl Error {
    /// Wrap a typed violation
    pub fn violation<E>(violation: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Violation(Box::new(violation))
    }

    /// Attach a rule name to an error
    pub fn rule(name: impl Into<String>, source: Error) -> Self {
        Error::Rule {
            rule: name.into(),
            source: Box::new(source),
        }
    }

    /// Name of the outermost rule, if this error was reported by one
    pub fn rule_name(&self) -> Option<&str> {
        match self {
            Error::Rule { rule, .. } => Some(rule),
            _ => None,
        }
    }

    /// Rule names from the outermost to the innermost
    pub fn rule_path(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = self;
        while let Error::Rule { rule, source } = current {
            names.push(rule.as_str());
            current = source;
        }
        names
    }

    /// The violation underneath any rule wrappers, if it is an `E`
    ///
    /// Aggregates return `None`; iterate them instead.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Error::Violation(violation) => violation.downcast_ref::<E>(),
            Error::Rule { source, .. } => source.downcast_ref::<E>(),
            Error::Multi(_) => None,
        }
    }

    /// Number of leaf violations carried by this error
    pub fn violation_count(&self) -> usize {
        match self {
            Error::Violation(_) => 1,
            Error::Rule { source, .. } => source.violation_count(),
            Error::Multi(errors) => errors.iter().map(Error::violation_count).sum(),
        }
    }

    /// Split an aggregate into its members; any other error is its own only member
    pub fn into_members(self) -> Vec<Error> {
        match self {
            Error::Multi(errors) => errors.errors,
            other => vec![other],
        }
    }
}

impl From<MultiError> for Error {
    fn from(errors: MultiError) -> Self {
        Error::Multi(errors)
    }
}

/// Zero or more validation errors
///
/// An empty `MultiError` means success; [`MultiError::into_result`] turns it
/// into `Ok(())`. Pushing an aggregate splices its members in, so the
/// collection stays flat. Rendered as one line per member, in insertion order.
#[derive(Debug, Default)]
pub struct MultiError {
    errors: Vec<Error>,
}

impl MultiError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error, splicing in the members of an aggregate
    pub fn push(&mut self, error: Error) {
        match error {
            Error::Multi(inner) => self.errors.extend(inner.errors),
            other => self.errors.push(other),
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    /// `Ok(())` when empty, the aggregate otherwise
    pub fn into_result(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Multi(self))
        }
    }

    /// Rendered messages grouped by outermost rule name
    ///
    /// Members reported without a rule are grouped under the empty string.
    pub fn by_rule(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in &self.errors {
            let (rule, message) = match error {
                Error::Rule { rule, source } => (rule.clone(), source.to_string()),
                other => (String::new(), other.to_string()),
            };
            grouped.entry(rule).or_default().push(message);
        }
        grouped
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for MultiError {}

impl FromIterator<Error> for MultiError {
    fn from_iter<I: IntoIterator<Item = Error>>(iter: I) -> Self {
        let mut errors = MultiError::new();
        errors.extend(iter);
        errors
    }
}

impl Extend<Error> for MultiError {
    fn extend<I: IntoIterator<Item = Error>>(&mut self, iter: I) {
        for error in iter {
            self.push(error);
        }
    }
}

impl IntoIterator for MultiError {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a MultiError {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MultiError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.by_rule(), serializer)
    }
}
