pub mod cli;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod pool;
