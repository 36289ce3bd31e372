//! Shared helpers for the quire CLI

pub mod logging;
pub mod settings;
