//! Derive macros used by the calendar, display and countdown types.

pub use derive_more::Display;
