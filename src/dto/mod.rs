//! Serde-backed data types exchanged with the managed backend and the UI layer.

pub mod duel;
pub mod invite;
pub mod profile;
pub mod realtime;
pub mod ui;
