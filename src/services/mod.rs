//! Engine services: the realtime ingestor, the countdown driver, the
//! accept/reject handler, and the coordinator that wires them together.

pub mod expiry;
pub mod ingestor;
pub mod respond;
pub mod session;
