//! Session-oriented rendering API.

/// One render pass and its report.
pub mod render_session;
/// Reusable entry point holding options and the supersession counter.
pub mod styler;
