//! Duel-invite coordination engine: invite queueing, auto-expiry countdowns,
//! realtime change ingestion, and accept/reject handling for head-to-head
//! financial-literacy quiz duels.

pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod services;
pub mod state;

pub use config::CoordinatorConfig;
pub use error::ServiceError;
pub use services::session::SessionCoordinator;
