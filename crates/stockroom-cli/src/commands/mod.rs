//! Command handlers

pub mod backup;
pub mod config;
pub mod item;
pub mod search;
pub mod status;
