//! User Interface module
//!
//! Dialog layer over the engine: selection lists, transaction dialogs, save
//! menus and the host that owns whichever dialog is open.

pub mod dialogs;
pub mod host;
pub mod transaction;
pub mod widgets;

pub use host::{DialogHost, MenuCommand};
pub use transaction::{Action, ActionSet, Outcome, TransactionController};
