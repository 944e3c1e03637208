//! Output rendering for the interactive screen and for scripting.
//!
//! # Submodules
//!
//! - [`terminal`]: Renders the feed state as article cards, pagination, and notices
//! - [`json`]: Serializes a fetched page for machine consumption

pub mod json;
pub mod terminal;
