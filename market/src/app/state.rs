//! Handoff of the shared state from `main` to the Dioxus tree.
//!
//! `main` builds one `SharedAppState` before launching the window and parks
//! it here; inside the tree components reach it through `use_context`.

pub use market::SharedAppState;

/// Single static for the main -> Dioxus handoff.
pub static SHARED_STATE: std::sync::OnceLock<SharedAppState> = std::sync::OnceLock::new();
