//! Utility modules for the search client

pub mod debug;
pub mod http;
