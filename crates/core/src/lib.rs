#![deny(warnings)]

pub mod bank;
pub mod config;
pub mod difficulty;
pub mod engine;
pub mod observation;
pub mod quiz;
pub mod reduce;
pub mod sampling;
