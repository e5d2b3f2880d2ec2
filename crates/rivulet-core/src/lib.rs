pub mod constants;
pub mod content;
pub mod direction;
pub mod error;
pub mod loader;
pub mod math;
pub mod types;
