//! API route modules for the HTTP surface.

pub mod area;
pub mod common;
pub mod community;
pub mod volunteer;
