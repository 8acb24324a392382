//! Configuration and path management for tillbook

pub mod paths;
pub mod settings;

pub use paths::TillbookPaths;
pub use settings::Settings;
