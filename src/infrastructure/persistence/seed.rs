use crate::application::ports::{RepositoryError, UserRepository};
use crate::domain::UserAccount;

/// Creates any missing default accounts. Existing accounts keep their
/// password and balance.
pub async fn seed_users(
    repository: &dyn UserRepository,
    accounts: &[UserAccount],
) -> Result<usize, RepositoryError> {
    let mut created = 0;
    for account in accounts {
        if repository.insert_if_absent(account).await? {
            tracing::info!(username = %account.username, "Seeded default user");
            created += 1;
        }
    }
    Ok(created)
}
