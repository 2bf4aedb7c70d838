//! PostgreSQL persistence adapter using Diesel with `diesel-async` and `bb8`.
//!
//! Row structs and the table definition are private; only the repository,
//! the pool and the schema bootstrap are exported.
//!
//! ```ignore
//! use user_directory::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/user_directory")).await?;
//! apply_schema(&pool).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod bootstrap;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use bootstrap::apply_schema;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DEFAULT_MAX_SIZE, DbPool, PoolConfig, PoolError};
