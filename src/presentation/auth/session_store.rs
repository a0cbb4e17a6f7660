use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::AuthenticatedUser;

/// Opaque session tokens mapped to the username they were issued for.
/// Sessions live for the lifetime of the process.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, username: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions
            .write()
            .await
            .insert(token.clone(), username.to_string());
        token
    }

    pub async fn resolve(&self, token: &str) -> Option<AuthenticatedUser> {
        self.sessions
            .read()
            .await
            .get(token)
            .map(AuthenticatedUser::new)
    }

    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}
