//! String length validators
//!
//! Lengths are counted in Unicode scalar values (`chars()`), not bytes.

use crate::error::Error;
use crate::printer::{printer_fn, Printer, PrinterSlot, ViolationError};
use crate::validator::{TypedValidator, Validator};
use std::fmt::{self, Write};
use std::sync::Arc;

/// Text-like values the length validators accept
pub trait StringLike: AsRef<str> + Clone + fmt::Debug + Send + Sync + 'static {}

impl<T> StringLike for T where T: AsRef<str> + Clone + fmt::Debug + Send + Sync + 'static {}

pub(crate) fn char_len<T: StringLike>(value: &T) -> usize {
    value.as_ref().chars().count()
}

// =============================================================================
// MinLength
// =============================================================================

/// Fails when the value is shorter than `min`
#[derive(Debug, Clone)]
pub struct MinLength<T> {
    min: usize,
    printer: PrinterSlot<MinLengthViolation<T>>,
}

pub fn min_length<T: StringLike>(min: usize) -> MinLength<T> {
    MinLength::new(min)
}

impl<T: StringLike> MinLength<T> {
    pub fn new(min: usize) -> Self {
        Self {
            min,
            printer: PrinterSlot::new(),
        }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    /// Copy of this validator rendering violations with `printer`
    pub fn with_printer<P>(&self, printer: P) -> Self
    where
        P: Printer<MinLengthViolation<T>> + 'static,
    {
        let printer: Arc<dyn Printer<MinLengthViolation<T>>> = Arc::new(printer);
        Self {
            min: self.min,
            printer: PrinterSlot::custom(printer),
        }
    }

    /// Copy of this validator whose message only needs the threshold
    pub fn with_printer_fn<F>(&self, f: F) -> Self
    where
        F: Fn(&mut dyn Write, usize) -> fmt::Result + Send + Sync + 'static,
    {
        self.with_printer(printer_fn(
            move |w: &mut dyn Write, v: &MinLengthViolation<T>| f(w, v.min),
        ))
    }
}

impl<T: StringLike> TypedValidator<T> for MinLength<T> {
    type Violation = MinLengthViolation<T>;

    fn check(&self, value: &T) -> Result<(), MinLengthViolation<T>> {
        if char_len(value) < self.min {
            return Err(MinLengthViolation {
                value: value.clone(),
                min: self.min,
                printer: self.printer.clone(),
            });
        }
        Ok(())
    }

    fn with_printer<P>(&self, printer: P) -> Self
    where
        P: Printer<MinLengthViolation<T>> + 'static,
    {
        MinLength::with_printer(self, printer)
    }
}

impl<T: StringLike> Validator<T> for MinLength<T> {
    fn validate(&self, value: &T) -> Result<(), Error> {
        self.check(value).map_err(Error::violation)
    }
}

/// `value` has fewer than `min` characters
#[derive(Debug, Clone)]
pub struct MinLengthViolation<T> {
    pub value: T,
    pub min: usize,
    printer: PrinterSlot<MinLengthViolation<T>>,
}

struct MinLengthPrinter;

impl<T> Printer<MinLengthViolation<T>> for MinLengthPrinter {
    fn print(&self, w: &mut dyn Write, violation: &MinLengthViolation<T>) -> fmt::Result {
        write!(w, "the length must be no less than {}", violation.min)
    }
}

impl<T: StringLike> fmt::Display for MinLengthViolation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.printer.render(self, &MinLengthPrinter))
    }
}

impl<T: StringLike> std::error::Error for MinLengthViolation<T> {}

impl<T: StringLike> ViolationError for MinLengthViolation<T> {
    fn set_printer(&mut self, printer: Arc<dyn Printer<Self>>) {
        self.printer.set(printer);
    }
}

// =============================================================================
// MaxLength
// =============================================================================

/// Fails when the value is longer than `max`
#[derive(Debug, Clone)]
pub struct MaxLength<T> {
    max: usize,
    printer: PrinterSlot<MaxLengthViolation<T>>,
}

pub fn max_length<T: StringLike>(max: usize) -> MaxLength<T> {
    MaxLength::new(max)
}

impl<T: StringLike> MaxLength<T> {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            printer: PrinterSlot::new(),
        }
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn with_printer<P>(&self, printer: P) -> Self
    where
        P: Printer<MaxLengthViolation<T>> + 'static,
    {
        let printer: Arc<dyn Printer<MaxLengthViolation<T>>> = Arc::new(printer);
        Self {
            max: self.max,
            printer: PrinterSlot::custom(printer),
        }
    }

    pub fn with_printer_fn<F>(&self, f: F) -> Self
    where
        F: Fn(&mut dyn Write, usize) -> fmt::Result + Send + Sync + 'static,
    {
        self.with_printer(printer_fn(
            move |w: &mut dyn Write, v: &MaxLengthViolation<T>| f(w, v.max),
        ))
    }
}

impl<T: StringLike> TypedValidator<T> for MaxLength<T> {
    type Violation = MaxLengthViolation<T>;

    fn check(&self, value: &T) -> Result<(), MaxLengthViolation<T>> {
        if char_len(value) > self.max {
            return Err(MaxLengthViolation {
                value: value.clone(),
                max: self.max,
                printer: self.printer.clone(),
            });
        }
        Ok(())
    }

    fn with_printer<P>(&self, printer: P) -> Self
    where
        P: Printer<MaxLengthViolation<T>> + 'static,
    {
        MaxLength::with_printer(self, printer)
    }
}

impl<T: StringLike> Validator<T> for MaxLength<T> {
    fn validate(&self, value: &T) -> Result<(), Error> {
        self.check(value).map_err(Error::violation)
    }
}

/// `value` has more than `max` characters
#[derive(Debug, Clone)]
pub struct MaxLengthViolation<T> {
    pub value: T,
    pub max: usize,
    printer: PrinterSlot<MaxLengthViolation<T>>,
}

struct MaxLengthPrinter;

impl<T> Printer<MaxLengthViolation<T>> for MaxLengthPrinter {
    fn print(&self, w: &mut dyn Write, violation: &MaxLengthViolation<T>) -> fmt::Result {
        write!(w, "the length must be no greater than {}", violation.max)
    }
}

impl<T: StringLike> fmt::Display for MaxLengthViolation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.printer.render(self, &MaxLengthPrinter))
    }
}

impl<T: StringLike> std::error::Error for MaxLengthViolation<T> {}

impl<T: StringLike> ViolationError for MaxLengthViolation<T> {
    fn set_printer(&mut self, printer: Arc<dyn Printer<Self>>) {
        self.printer.set(printer);
    }
}

// =============================================================================
// Length
// =============================================================================

/// Fails when the value's length is outside `min..=max`
#[derive(Debug, Clone)]
pub struct Length<T> {
    min: usize,
    max: usize,
    printer: PrinterSlot<LengthViolation<T>>,
}

pub fn length<T: StringLike>(min: usize, max: usize) -> Length<T> {
    Length::new(min, max)
}

impl<T: StringLike> Length<T> {
    pub fn new(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            printer: PrinterSlot::new(),
        }
    }

    pub fn bounds(&self) -> (usize, usize) {
        (self.min, self.max)
    }

    pub fn with_printer<P>(&self, printer: P) -> Self
    where
        P: Printer<LengthViolation<T>> + 'static,
    {
        let printer: Arc<dyn Printer<LengthViolation<T>>> = Arc::new(printer);
        Self {
            min: self.min,
            max: self.max,
            printer: PrinterSlot::custom(printer),
        }
    }

    pub fn with_printer_fn<F>(&self, f: F) -> Self
    where
        F: Fn(&mut dyn Write, usize, usize) -> fmt::Result + Send + Sync + 'static,
    {
        self.with_printer(printer_fn(
            move |w: &mut dyn Write, v: &LengthViolation<T>| f(w, v.min, v.max),
        ))
    }
}

impl<T: StringLike> TypedValidator<T> for Length<T> {
    type Violation = LengthViolation<T>;

    fn check(&self, value: &T) -> Result<(), LengthViolation<T>> {
        let len = char_len(value);
        if len < self.min || len > self.max {
            return Err(LengthViolation {
                value: value.clone(),
                min: self.min,
                max: self.max,
                printer: self.printer.clone(),
            });
        }
        Ok(())
    }

    fn with_printer<P>(&self, printer: P) -> Self
    where
        P: Printer<LengthViolation<T>> + 'static,
    {
        Length::with_printer(self, printer)
    }
}

impl<T: StringLike> Validator<T> for Length<T> {
    fn validate(&self, value: &T) -> Result<(), Error> {
        self.check(value).map_err(Error::violation)
    }
}

/// `value` has fewer than `min` or more than `max` characters
#[derive(Debug, Clone)]
pub struct LengthViolation<T> {
    pub value: T,
    pub min: usize,
    pub max: usize,
    printer: PrinterSlot<LengthViolation<T>>,
}

struct LengthPrinter;

impl<T> Printer<LengthViolation<T>> for LengthPrinter {
    fn print(&self, w: &mut dyn Write, violation: &LengthViolation<T>) -> fmt::Result {
        write!(
            w,
            "the length must be in range({} ... {})",
            violation.min, violation.max
        )
    }
}

impl<T: StringLike> fmt::Display for LengthViolation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.printer.render(self, &LengthPrinter))
    }
}

impl<T: StringLike> std::error::Error for LengthViolation<T> {}

impl<T: StringLike> ViolationError for LengthViolation<T> {
    fn set_printer(&mut self, printer: Arc<dyn Printer<Self>>) {
        self.printer.set(printer);
    }
}
