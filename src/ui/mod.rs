//! UI definitions module

pub mod config_surface;
pub mod label;
pub mod layout;
pub mod visual;
