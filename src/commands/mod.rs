pub mod audio;
pub mod categories;
pub mod config;
pub mod monitor;
pub mod trigger;
