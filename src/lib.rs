pub mod profile;
pub mod scoring;
pub mod settings;
pub mod utils;
