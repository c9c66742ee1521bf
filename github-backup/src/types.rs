//! Forge-side descriptors shared across the crate.

use serde::Serialize;

/// A repository listed on the forge, as needed for backing it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Repository name (last path segment).
    pub name: String,

    /// Full repository name in "owner/name" format.
    pub full_name: String,

    /// `git://` clone URL.
    pub git_url: String,

    /// SSH clone URL (e.g., "git@github.com:owner/name.git").
    pub ssh_url: String,

    /// HTTPS clone URL, advertised to cgit readers.
    pub clone_url: String,

    /// Repository description, if one is set.
    pub description: Option<String>,

    /// Default branch name (e.g., "main").
    pub default_branch: String,

    /// Login of the owning user or organization.
    pub owner_login: String,
}

impl Repository {
    /// Returns the URL to clone from.
    #[must_use]
    pub fn source_url(&self, use_ssh: bool) -> &str {
        if use_ssh {
            &self.ssh_url
        } else {
            &self.git_url
        }
    }
}

/// Profile information about a repository owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerInfo {
    /// Display name, or the login when the profile has no name.
    pub display_name: String,

    /// Public email address, if any.
    pub email: Option<String>,
}

impl OwnerInfo {
    /// Builds owner info from raw profile fields.
    pub fn from_profile(login: &str, name: Option<String>, email: Option<String>) -> Self {
        let display_name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| login.to_string());
        let email = email.filter(|e| !e.trim().is_empty());
        Self {
            display_name,
            email,
        }
    }

    /// Renders the value written to `gitweb.owner`.
    #[must_use]
    pub fn gitweb_owner(&self) -> String {
        match &self.email {
            Some(email) => format!("{} <{}>", self.display_name, email),
            None => self.display_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gitweb_owner_includes_email() {
        let owner = OwnerInfo::from_profile(
            "alice",
            Some("Alice Liddell".to_string()),
            Some("alice@example.com".to_string()),
        );
        assert_eq!(owner.gitweb_owner(), "Alice Liddell <alice@example.com>");
    }

    #[test]
    fn owner_falls_back_to_login() {
        let owner = OwnerInfo::from_profile("alice", None, Some(String::new()));
        assert_eq!(owner.display_name, "alice");
        assert_eq!(owner.email, None);
        assert_eq!(owner.gitweb_owner(), "alice");
    }

    #[test]
    fn source_url_respects_ssh() {
        let repo = Repository {
            name: "tool".to_string(),
            full_name: "alice/tool".to_string(),
            git_url: "git://github.com/alice/tool.git".to_string(),
            ssh_url: "git@github.com:alice/tool.git".to_string(),
            clone_url: "https://github.com/alice/tool.git".to_string(),
            description: None,
            default_branch: "main".to_string(),
            owner_login: "alice".to_string(),
        };
        assert_eq!(repo.source_url(false), "git://github.com/alice/tool.git");
        assert_eq!(repo.source_url(true), "git@github.com:alice/tool.git");
    }
}
