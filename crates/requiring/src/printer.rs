//! Violation printers
//!
//! A violation carries the data of a failed check; a [`Printer`] turns that
//! data into text. Validators hand their printer to every violation they
//! produce, so swapping the printer changes the message without touching the
//! check itself.

use std::fmt;
use std::sync::Arc;

/// Renders violations of kind `E` into a text sink
///
/// Printers must only write: they never mutate the violation or the
/// validator that produced it.
pub trait Printer<E: ?Sized>: Send + Sync {
    fn print(&self, w: &mut dyn fmt::Write, violation: &E) -> fmt::Result;
}

impl<E: ?Sized, P: Printer<E> + ?Sized> Printer<E> for Arc<P> {
    fn print(&self, w: &mut dyn fmt::Write, violation: &E) -> fmt::Result {
        (**self).print(w, violation)
    }
}

/// A typed violation whose text comes from a replaceable [`Printer`]
pub trait ViolationError: std::error::Error + Send + Sync + Sized + 'static {
    /// Replace the printer used by `Display`
    fn set_printer(&mut self, printer: Arc<dyn Printer<Self>>);

    /// Render through `printer`, ignoring the one attached to the violation
    fn render_with(&self, printer: &dyn Printer<Self>) -> String {
        render(printer, self)
    }
}

/// Render a violation into a fresh string
pub fn render<E: ?Sized>(printer: &dyn Printer<E>, violation: &E) -> String {
    let mut buf = String::new();
    // Writing into a String never fails; a printer error keeps what was written.
    let _ = printer.print(&mut buf, violation);
    buf
}

/// Closure adapter, see [`printer_fn`]
#[derive(Clone)]
pub struct PrinterFn<F>(F);

/// Turn a closure into a [`Printer`]
///
/// ```
/// use requiring::{printer_fn, MinLengthViolation};
/// use std::fmt::Write;
///
/// let printer = printer_fn(|w: &mut dyn Write, v: &MinLengthViolation<String>| {
///     write!(w, "{:?} needs {} characters", v.value, v.min)
/// });
/// # let _ = printer;
/// ```
pub fn printer_fn<E, F>(f: F) -> PrinterFn<F>
where
    E: ?Sized,
    F: Fn(&mut dyn fmt::Write, &E) -> fmt::Result + Send + Sync,
{
    PrinterFn(f)
}

impl<E, F> Printer<E> for PrinterFn<F>
where
    E: ?Sized,
    F: Fn(&mut dyn fmt::Write, &E) -> fmt::Result + Send + Sync,
{
    fn print(&self, w: &mut dyn fmt::Write, violation: &E) -> fmt::Result {
        (self.0)(w, violation)
    }
}

impl<F> fmt::Debug for PrinterFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrinterFn")
    }
}

/// Optional custom printer, falling back to a kind's default printer
pub struct PrinterSlot<E>(Option<Arc<dyn Printer<E>>>);

impl<E> PrinterSlot<E> {
    /// No custom printer
    pub fn new() -> Self {
        PrinterSlot(None)
    }

    pub fn custom(printer: Arc<dyn Printer<E>>) -> Self {
        PrinterSlot(Some(printer))
    }

    pub fn is_custom(&self) -> bool {
        self.0.is_some()
    }

    pub fn set(&mut self, printer: Arc<dyn Printer<E>>) {
        self.0 = Some(printer);
    }

    /// Render with the custom printer if any, otherwise with `default`
    pub fn render(&self, violation: &E, default: &dyn Printer<E>) -> String {
        match &self.0 {
            Some(printer) => render(&**printer, violation),
            None => render(default, violation),
        }
    }
}

impl<E> Default for PrinterSlot<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for PrinterSlot<E> {
    fn clone(&self) -> Self {
        PrinterSlot(self.0.clone())
    }
}

impl<E> fmt::Debug for PrinterSlot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_custom() { "custom" } else { "default" })
    }
}
