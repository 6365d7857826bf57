//! The `jobtrack` command line: configuration, a headless surface over the
//! engine, and terminal rendering.
mod app;
pub mod cli;
pub mod config;
mod effects;
pub mod render;
pub mod surface;

pub use app::{engine_config, run, PageSource};
pub use cli::{Cli, Command, PageArgs};
pub use config::AppConfig;
pub use surface::Surface;
