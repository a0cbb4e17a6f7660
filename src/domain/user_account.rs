#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub username: String,
    pub password: String,
    pub minutes_remaining: f64,
}

impl UserAccount {
    pub fn new(username: impl Into<String>, password: impl Into<String>, minutes: f64) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            minutes_remaining: minutes,
        }
    }

    /// Exact comparison; passwords are opaque to the service.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

/// Listing row without the credential.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub username: String,
    pub minutes_remaining: f64,
}
