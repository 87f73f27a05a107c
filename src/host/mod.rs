//! Host-engine abstraction and the in-memory simulation double.

pub mod api;
pub mod sim;
