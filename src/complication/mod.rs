//! Complication slots, payloads and provider selection

pub mod binding;
pub mod data;
pub mod registry;
