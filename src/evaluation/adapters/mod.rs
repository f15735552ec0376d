//! Adapter implementations for the evaluation ports.

pub mod http;
pub mod lines;
pub mod memory;
pub mod postgres;
