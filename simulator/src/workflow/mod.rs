pub mod config;
pub mod headless_map;
pub mod runner;
