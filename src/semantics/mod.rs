//! Selector and value semantics shared by the rules.

pub mod measurement;
pub mod selectors;

pub use measurement::{measurement_from_segment, Measurement, MEASUREMENT_UNITS};
pub use selectors::{is_scoped_selector_alternative, remove_media_queries};
