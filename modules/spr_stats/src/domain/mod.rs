pub mod error;
pub mod filter;
pub mod identifier;
pub mod ports;
pub mod releases;
pub mod roster;
pub mod service;
pub mod stats;
pub mod views;
