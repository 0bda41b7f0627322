//! # requiring
//!
//! Validate structs with rules attached to fields picked by reference.
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "derive")]
//! # fn main() {
//! use requiring::{structure, validators, MaxLength, MinLength, NotEmpty, Record, Validator};
//!
//! #[derive(Default, Record)]
//! struct RegisterForm {
//!     username: String,
//!     password: String,
//! }
//!
//! let rules = structure::<RegisterForm>(|s, form| {
//!     s.add_ref(&form.username, "username", validators![NotEmpty::new(), MaxLength::new(16)]);
//!     s.add(|f| &f.password, "password", validators![MinLength::new(8)]);
//! });
//!
//! let form = RegisterForm {
//!     username: "ada".into(),
//!     password: "hunter2".into(),
//! };
//! let err = rules.validate(&form).unwrap_err();
//! assert_eq!(err.to_string(), "'password' the length must be no less than 8");
//! # }
//! # #[cfg(not(feature = "derive"))]
//! # fn main() {}
//! ```
//!
//! ## Architecture
//!
//! - **Validator protocol** - [`Validator`] checks one value and returns an
//!   [`Error`]. Built-in violations carry their data plus a [`Printer`] that
//!   renders it, so messages can be swapped without touching the check.
//! - **Rule sets** - [`structure`] hands out a [`RuleSet`] and a template
//!   record. Each rule names its field by pointing into the template; the
//!   pointer is resolved to a [`FieldPath`] once, at build time, and used to
//!   find the same field in every record validated later.
//!
//! A built [`StructValidator`] is immutable and `Send + Sync`. Rules run in
//! registration order and nothing short-circuits: one call reports every
//! violation.
//!
//! ## Features
//!
//! - **`derive`** (default) - `#[derive(Record)]`
//! - **`serde`** - serialize [`MultiError`] as `{ rule: [messages] }`

extern crate self as requiring;

pub mod error;
pub mod field;
pub mod length;
pub mod printer;
pub mod registry;
pub mod required;
pub mod rule;
pub mod validator;

pub use error::{BoxedViolation, Error, MultiError};
pub use field::{FieldDescriptor, FieldError, FieldPath, Record};
pub use length::{
    length, max_length, min_length, Length, LengthViolation, MaxLength, MaxLengthViolation,
    MinLength, MinLengthViolation, StringLike,
};
pub use printer::{printer_fn, render, Printer, PrinterFn, PrinterSlot, ViolationError};
pub use registry::{structure, RuleSet, StructValidator};
pub use required::{not_empty, NotEmpty, RangeViolation, UNLIMITED};
pub use rule::Rule;
pub use validator::{validator_fn, TypedValidator, Validator, ValidatorFn};

#[cfg(feature = "derive")]
pub use requiring_derive::Record;

/// Traits needed to call validators and configure them
pub mod prelude {
    pub use crate::printer::{Printer, ViolationError};
    pub use crate::validator::{TypedValidator, Validator};
    pub use crate::validators;
}
