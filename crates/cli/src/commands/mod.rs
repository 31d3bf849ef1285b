//! CLI Commands

pub mod config;
pub mod queries;
pub mod run;
