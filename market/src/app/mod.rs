//! Desktop UI for the marketplace console.

pub mod components;
pub mod state;

pub use components::app;
pub use state::{SharedAppState, SHARED_STATE};
