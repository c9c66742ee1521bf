//! Forge authentication mode.

use std::fmt;

/// How to authenticate against the forge API.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Basic authentication with the account password.
    Password { username: String, password: String },

    /// Personal access / OAuth token.
    Token(String),
}

impl Credentials {
    /// Picks the authentication mode from the available secrets.
    ///
    /// A token always wins over a password. Empty values count as absent;
    /// with neither, the API is used anonymously.
    pub fn select(
        username: &str,
        password: Option<String>,
        token: Option<String>,
    ) -> Option<Self> {
        let token = token.filter(|t| !t.is_empty());
        let password = password.filter(|p| !p.is_empty());

        match (token, password) {
            (Some(token), _) => Some(Self::Token(token)),
            (None, Some(password)) => Some(Self::Password {
                username: username.to_string(),
                password,
            }),
            (None, None) => None,
        }
    }

    /// Short name of the mode, safe to log.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Password { .. } => "password",
            Self::Token(_) => "token",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
        }
    }
}
