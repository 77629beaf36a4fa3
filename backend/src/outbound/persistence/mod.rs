//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL through `diesel-async` and `bb8` connection pooling.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module; repositories only translate between rows and domain types
//! and map every database failure into the matching port error.
//!
//! # Example
//!
//! ```ignore
//! use referrals::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/referrals")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_company_repository;
mod diesel_notification_repository;
mod diesel_referral_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_company_repository::DieselCompanyRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_referral_repository::DieselReferralRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
