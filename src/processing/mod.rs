//! Resume analysis module

pub mod analyzer;
