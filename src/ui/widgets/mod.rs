//! UI widgets

pub mod picker;
pub mod selection;

pub use picker::PickerWidget;
pub use selection::{Refresh, SelectionError, SelectionList};
