//! Session state and the controller that drives it

pub mod controller;
pub mod state;
