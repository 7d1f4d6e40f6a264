//! Aldon UI - Dialog layer for Aldon's Crossing
//!
//! Selection lists, transaction dialogs and save slots over an external
//! rules engine, with a terminal front-end.

pub mod engine;
pub mod game;
pub mod items;
pub mod save;
pub mod ui;

// Re-export commonly used types
pub use engine::{DemoEngine, DialogRequest, Engine, EngineHandle, Task};
pub use game::{DeferredQueue, Poster, Session};
pub use save::{SaveStore, SaveStoreData};
pub use ui::{DialogHost, MenuCommand, TransactionController};
