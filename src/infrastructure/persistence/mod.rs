mod pg_pool;
mod repositories;
mod seed;

pub use pg_pool::{create_pool, run_migrations};
pub use repositories::{InMemoryUserRepository, PgUserRepository};
pub use seed::seed_users;
