//! HTTP handlers

pub mod health;
pub mod samples;
pub mod behavior;
