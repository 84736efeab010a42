//! Random character picker that enriches its pick with trait tags consolidated
//! from a booru-style search, optionally constrained to an inferred gender.

pub mod api;
pub mod extract;
pub mod local;
pub mod models;
pub mod picker;
pub mod pool;
pub mod scrape;
pub mod utils;

pub use models::config::Config;
pub use models::{ConsolidatedResult, GenderFilter, GenderMarker, LocalSelection, Selection};
pub use picker::CharacterPicker;
pub use pool::CharacterPool;
