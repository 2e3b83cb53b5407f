//! Favor calculation engine
//!
//! Gift-to-experience resolution, level projection, and the debounce
//! machinery that keeps recomputation off the hot path.

pub mod debounce;
pub mod favor;
pub mod projection;

pub use debounce::{Debouncer, DEBOUNCE_WINDOW};
pub use favor::{FavorContext, LinkedOverride};
pub use projection::{project, project_profile, Projection};
