/// State management module
///
/// This module handles all application state, including:
/// - The original/working image pair (session.rs)
/// - Edit parameters and non-destructive editing (edit.rs)
/// - Persisted user preferences (settings.rs)

pub mod edit;
pub mod session;
pub mod settings;
