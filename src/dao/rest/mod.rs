//! REST adapter speaking a PostgREST-style row API and a serverless function
//! endpoint, the shape exposed by the managed backend hosting the game data.

pub mod config;
pub mod error;
mod models;
mod store;

pub use config::RestConfig;
pub use store::RestStore;
