use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::dto::user::UserResponse;
use crate::types::internal::DirectoryAssertion;

/// Request model for local login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account block of a directory interactive login result
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryAccount {
    /// Sign-in name, used as the email
    pub username: String,

    pub name: Option<String>,

    /// Account identifier as issued by the directory
    pub home_account_id: Option<String>,

    /// Object id of the account inside the tenant
    pub local_account_id: Option<String>,
}

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryLoginResult {
    pub account: DirectoryAccount,
}

/// Request model for directory login
///
/// The login result is trusted as already verified by the directory's interactive flow.
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryLoginRequest {
    pub login_response: DirectoryLoginResult,
}

impl From<DirectoryLoginRequest> for DirectoryAssertion {
    fn from(request: DirectoryLoginRequest) -> Self {
        let account = request.login_response.account;
        // The local account id is the bare object id; the home account id may carry a tenant suffix
        let external_id = account
            .local_account_id
            .filter(|id| !id.is_empty())
            .or_else(|| {
                account
                    .home_account_id
                    .filter(|id| !id.is_empty())
                    .map(|id| id.split('.').next().unwrap_or_default().to_string())
            });

        DirectoryAssertion {
            username: account.username,
            name: account.name,
            external_id,
        }
    }
}

/// Response model for both login flows
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub msg: String,

    /// Bearer token for subsequent requests
    pub token: String,

    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(home: Option<&str>, local: Option<&str>) -> DirectoryLoginRequest {
        DirectoryLoginRequest {
            login_response: DirectoryLoginResult {
                account: DirectoryAccount {
                    username: "jane@corp.example".to_string(),
                    name: Some("Jane".to_string()),
                    home_account_id: home.map(str::to_string),
                    local_account_id: local.map(str::to_string),
                },
            },
        }
    }

    #[test]
    fn test_assertion_prefers_local_account_id() {
        let assertion = DirectoryAssertion::from(request(Some("oid-1.tenant-1"), Some("oid-1")));
        assert_eq!(assertion.external_id.as_deref(), Some("oid-1"));
        assert_eq!(assertion.username, "jane@corp.example");
    }

    #[test]
    fn test_assertion_strips_tenant_from_home_account_id() {
        let assertion = DirectoryAssertion::from(request(Some("oid-2.tenant-1"), None));
        assert_eq!(assertion.external_id.as_deref(), Some("oid-2"));
    }

    #[test]
    fn test_assertion_without_ids() {
        let assertion = DirectoryAssertion::from(request(None, Some("")));
        assert_eq!(assertion.external_id, None);
    }
}
