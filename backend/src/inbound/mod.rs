//! Inbound adapters translating external requests into domain port calls
//! while keeping framework details at the edge.

pub mod http;
