//! Human-readable explanations of engine walks.

mod formatter;

pub use formatter::TraceFormatter;
