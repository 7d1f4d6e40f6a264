//! Game module - Session state and the deferred task queue

pub mod deferred;
pub mod session;

pub use deferred::{DeferredQueue, Poster};
pub use session::Session;
