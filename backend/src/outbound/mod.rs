//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: process-local repositories for database-less runs and tests
//! - **security**: Argon2id password hashing and HS256 bearer tokens
//!
//! Adapters translate between domain types and infrastructure formats and
//! carry no business rules.

pub mod memory;
pub mod persistence;
pub mod security;
