use async_trait::async_trait;

use crate::domain::{UserAccount, UserSummary};

use super::RepositoryError;

/// Result of a conditional balance deduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeductionOutcome {
    Deducted { remaining: f64 },
    Insufficient { remaining: f64 },
    NotFound,
}

/// Storage contract for user accounts and their minute balances.
///
/// `deduct_minutes` must perform the balance check and the write as one
/// atomic step: two concurrent calls must never both succeed against a
/// balance that only covers one of them.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, username: &str) -> Result<Option<UserAccount>, RepositoryError>;

    async fn deduct_minutes(
        &self,
        username: &str,
        minutes: f64,
    ) -> Result<DeductionOutcome, RepositoryError>;

    async fn set_limit(&self, username: &str, minutes: f64) -> Result<(), RepositoryError>;

    async fn set_password(&self, username: &str, password: &str) -> Result<(), RepositoryError>;

    /// Inserts or replaces the account.
    async fn add_user(&self, account: &UserAccount) -> Result<(), RepositoryError>;

    /// Inserts the account only when the username is free. Returns whether a row was written.
    async fn insert_if_absent(&self, account: &UserAccount) -> Result<bool, RepositoryError>;

    async fn list_users(&self) -> Result<Vec<UserSummary>, RepositoryError>;
}
