//! Test utilities

pub mod helpers;
