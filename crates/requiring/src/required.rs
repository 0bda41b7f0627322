//! Presence check
//!
//! [`NotEmpty`] reports a [`RangeViolation`] with `min = 1` and `max = 0`.
//! On a `RangeViolation` a bound of zero means "unlimited": the check and
//! the default printer both skip that side.

use crate::error::Error;
use crate::length::{char_len, StringLike};
use crate::printer::{printer_fn, Printer, PrinterSlot, ViolationError};
use crate::validator::{TypedValidator, Validator};
use std::fmt::{self, Write};
use std::sync::Arc;

/// Bound value meaning "no limit on this side"
pub const UNLIMITED: usize = 0;

/// `len` lies within `min..=max`, a zero bound disabling its side
pub(crate) fn within(len: usize, min: usize, max: usize) -> bool {
    (min == UNLIMITED || len >= min) && (max == UNLIMITED || len <= max)
}

/// Fails on empty values
#[derive(Debug, Clone)]
pub struct NotEmpty<T> {
    printer: PrinterSlot<RangeViolation<T>>,
}

pub fn not_empty<T: StringLike>() -> NotEmpty<T> {
    NotEmpty::new()
}

impl<T: StringLike> NotEmpty<T> {
    const MIN: usize = 1;
    const MAX: usize = UNLIMITED;

    pub fn new() -> Self {
        Self {
            printer: PrinterSlot::new(),
        }
    }

    pub fn with_printer<P>(&self, printer: P) -> Self
    where
        P: Printer<RangeViolation<T>> + 'static,
    {
        let printer: Arc<dyn Printer<RangeViolation<T>>> = Arc::new(printer);
        Self {
            printer: PrinterSlot::custom(printer),
        }
    }

    /// Copy of this validator with a fixed message
    pub fn with_message(&self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.with_printer(printer_fn(
            move |w: &mut dyn Write, _: &RangeViolation<T>| w.write_str(&message),
        ))
    }
}

impl<T: StringLike> Default for NotEmpty<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StringLike> TypedValidator<T> for NotEmpty<T> {
    type Violation = RangeViolation<T>;

    fn check(&self, value: &T) -> Result<(), RangeViolation<T>> {
        if !within(char_len(value), Self::MIN, Self::MAX) {
            return Err(RangeViolation {
                min: Self::MIN,
                max: Self::MAX,
                value: value.clone(),
                printer: self.printer.clone(),
            });
        }
        Ok(())
    }

    fn with_printer<P>(&self, printer: P) -> Self
    where
        P: Printer<RangeViolation<T>> + 'static,
    {
        NotEmpty::with_printer(self, printer)
    }
}

impl<T: StringLike> Validator<T> for NotEmpty<T> {
    fn validate(&self, value: &T) -> Result<(), Error> {
        self.check(value).map_err(Error::violation)
    }
}

/// Size of `value` outside `min..=max`; a bound of zero is unlimited
#[derive(Debug, Clone)]
pub struct RangeViolation<T> {
    pub min: usize,
    pub max: usize,
    pub value: T,
    printer: PrinterSlot<RangeViolation<T>>,
}

impl<T> RangeViolation<T> {
    /// Violation rendered by the default printer
    pub fn new(value: T, min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            value,
            printer: PrinterSlot::new(),
        }
    }
}

struct RangePrinter;

impl<T> Printer<RangeViolation<T>> for RangePrinter {
    fn print(&self, w: &mut dyn Write, violation: &RangeViolation<T>) -> fmt::Result {
        match (violation.min, violation.max) {
            (0 | 1, UNLIMITED) => w.write_str("requires"),
            (min, UNLIMITED) => write!(w, "requires at least {}", min),
            (UNLIMITED, max) => write!(w, "requires at most {}", max),
            (min, max) => write!(w, "requires between {} and {}", min, max),
        }
    }
}

impl<T: StringLike> fmt::Display for RangeViolation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.printer.render(self, &RangePrinter))
    }
}

impl<T: StringLike> std::error::Error for RangeViolation<T> {}

impl<T: StringLike> ViolationError for RangeViolation<T> {
    fn set_printer(&mut self, printer: Arc<dyn Printer<Self>>) {
        self.printer.set(printer);
    }
}
