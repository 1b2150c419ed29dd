use std::fmt;

/// Login credentials shared by both client variants.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
    /// Security token appended to the password at login.
    pub token: String,
}

impl Credentials {
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            token: token.into(),
        }
    }

    /// Password as the login endpoints expect it: password followed by token.
    pub fn password_with_token(&self) -> String {
        format!("{}{}", self.password, self.token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("token", &"<redacted>")
            .finish()
    }
}
