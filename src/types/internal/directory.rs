use serde::{Deserialize, Serialize};
use std::fmt;

/// A user as returned by the external directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryIdentity {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub mail: Option<String>,
    #[serde(default)]
    pub user_principal_name: Option<String>,
}

impl DirectoryIdentity {
    /// Email used for local matching: `mail`, falling back to the principal name
    pub fn email(&self) -> Option<&str> {
        self.mail
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(self.user_principal_name.as_deref().filter(|u| !u.is_empty()))
    }

    pub fn name(&self) -> String {
        self.display_name
            .clone()
            .or_else(|| self.email().map(str::to_string))
            .unwrap_or_default()
    }
}

/// A group (or directory role) as returned by the external directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryGroup {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "@odata.type")]
    pub odata_type: Option<String>,
}

/// Credentials needed to mint a directory access token
#[derive(Clone, PartialEq, Eq)]
pub struct DirectoryCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for DirectoryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Short-lived bearer token for the directory API
#[derive(Clone, PartialEq, Eq)]
pub struct DirectoryAccessToken(String);

impl DirectoryAccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DirectoryAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DirectoryAccessToken(<redacted>)")
    }
}

impl fmt::Display for DirectoryAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[access_token]")
    }
}

/// An already-verified account assertion produced by the directory's interactive login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryAssertion {
    /// Sign-in name; treated as the email
    pub username: String,
    pub name: Option<String>,
    /// Directory object id of the account, when the assertion carries one
    pub external_id: Option<String>,
}
