use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::ports::{DeductionOutcome, RepositoryError, UserRepository};
use crate::domain::{UserAccount, UserSummary};

/// Process-local account store. All operations take the same lock, so a
/// deduction's check and write cannot interleave with another deduction.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, UserAccount>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(accounts: impl IntoIterator<Item = UserAccount>) -> Self {
        let users = accounts
            .into_iter()
            .map(|a| (a.username.clone(), a))
            .collect();
        Self {
            users: Mutex::new(users),
        }
    }
}

fn reject_negative(minutes: f64) -> Result<(), RepositoryError> {
    if minutes < 0.0 || minutes.is_nan() {
        return Err(RepositoryError::ConstraintViolation(format!(
            "minutes_remaining must be non-negative, got {}",
            minutes
        )));
    }
    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_user(&self, username: &str) -> Result<Option<UserAccount>, RepositoryError> {
        Ok(self.users.lock().await.get(username).cloned())
    }

    async fn deduct_minutes(
        &self,
        username: &str,
        minutes: f64,
    ) -> Result<DeductionOutcome, RepositoryError> {
        let mut users = self.users.lock().await;
        let Some(user) = users.get_mut(username) else {
            return Ok(DeductionOutcome::NotFound);
        };

        if user.minutes_remaining < minutes {
            return Ok(DeductionOutcome::Insufficient {
                remaining: user.minutes_remaining,
            });
        }

        user.minutes_remaining -= minutes;
        Ok(DeductionOutcome::Deducted {
            remaining: user.minutes_remaining,
        })
    }

    async fn set_limit(&self, username: &str, minutes: f64) -> Result<(), RepositoryError> {
        reject_negative(minutes)?;
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(username)
            .ok_or_else(|| RepositoryError::NotFound(username.to_string()))?;
        user.minutes_remaining = minutes;
        Ok(())
    }

    async fn set_password(&self, username: &str, password: &str) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(username)
            .ok_or_else(|| RepositoryError::NotFound(username.to_string()))?;
        user.password = password.to_string();
        Ok(())
    }

    async fn add_user(&self, account: &UserAccount) -> Result<(), RepositoryError> {
        reject_negative(account.minutes_remaining)?;
        self.users
            .lock()
            .await
            .insert(account.username.clone(), account.clone());
        Ok(())
    }

    async fn insert_if_absent(&self, account: &UserAccount) -> Result<bool, RepositoryError> {
        reject_negative(account.minutes_remaining)?;
        let mut users = self.users.lock().await;
        if users.contains_key(&account.username) {
            return Ok(false);
        }
        users.insert(account.username.clone(), account.clone());
        Ok(true)
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, RepositoryError> {
        let users = self.users.lock().await;
        let mut summaries: Vec<UserSummary> = users
            .values()
            .map(|u| UserSummary {
                username: u.username.clone(),
                minutes_remaining: u.minutes_remaining,
            })
            .collect();
        summaries.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(summaries)
    }
}
