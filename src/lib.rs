// driveguard library crate
// Exposes modules for integration testing

pub mod alerts;
pub mod audio;
pub mod cli;
pub mod commands;
pub mod config;
pub mod monitor;
pub mod output;
