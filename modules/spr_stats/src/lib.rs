// === PUBLIC CONTRACT ===
// Only the contract module should be public for other modules to consume
pub mod contract;

// Re-export the public contract components
pub use contract::{client, error, model};

// === MODULE DEFINITION ===
pub mod module;
pub use module::Dashboard;

// === INTERNAL MODULES ===
// Exposed for the host binary and for tests; external consumers should stick to `contract`.
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;

pub use config::SprStatsConfig;
pub use domain::views::{OpenSprRow, View, ViewData};
