/// Member accounts: the admin-facing user directory
use crate::error::ClientResult;
use crate::list::Resource;
use crate::session::Role;
use crate::validation;
use serde::{Deserialize, Serialize};

/// An account mirrored from the backend collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub username: String,
    pub role: Role,
}

/// Editable subset of an account; username and password stay untouched
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDraft {
    pub name: String,
    pub role: Role,
}

/// Payload for creating an account through the authenticated register
/// endpoint. The password passes through to the backend and is never stored
/// client-side.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Update payload: only name and role are editable
#[derive(Debug, Clone, Serialize)]
pub struct AccountUpdate {
    pub name: String,
    pub role: Role,
}

/// Public self-registration payload; the backend assigns the default role
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub password: String,
}

/// Validate a self-registration form before it is posted
pub fn validate_registration(request: &RegisterRequest) -> ClientResult<()> {
    validation::require_non_empty("name", &request.name)?;
    validation::require_non_empty("username", &request.username)?;
    validation::require_non_empty("password", &request.password)?;
    Ok(())
}

impl Resource for Account {
    type Draft = AccountDraft;
    type Create = NewAccount;
    type Update = AccountUpdate;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn collection_path() -> &'static str {
        "/api/auth/users"
    }

    fn create_path() -> &'static str {
        "/api/auth/register"
    }

    fn noun() -> &'static str {
        "user"
    }

    fn to_draft(&self) -> AccountDraft {
        AccountDraft {
            name: self.name.clone(),
            role: self.role,
        }
    }

    fn update_from_draft(draft: &AccountDraft) -> ClientResult<AccountUpdate> {
        validation::require_non_empty("name", &draft.name)?;
        Ok(AccountUpdate {
            name: draft.name.trim().to_string(),
            role: draft.role,
        })
    }

    fn merged_with(&self, update: &AccountUpdate) -> Self {
        Self {
            id: self.id.clone(),
            name: update.name.clone(),
            username: self.username.clone(),
            role: update.role,
        }
    }

    fn validate_create(create: &NewAccount) -> ClientResult<()> {
        validation::require_non_empty("name", &create.name)?;
        validation::require_non_empty("username", &create.username)?;
        validation::require_non_empty("password", &create.password)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_deserializes_mongo_id() {
        let account: Account = serde_json::from_str(
            r#"{"_id": "u1", "name": "Asha Patel", "username": "asha", "role": "admin"}"#,
        )
        .unwrap();
        assert_eq!(account.id, "u1");
        assert_eq!(account.role, Role::Admin);
    }

    #[test]
    fn test_update_payload_is_name_and_role_only() {
        let update = AccountUpdate {
            name: "Asha Patel".to_string(),
            role: Role::User,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Asha Patel", "role": "user"})
        );
    }

    #[test]
    fn test_merged_with_keeps_username() {
        let account = Account {
            id: "u1".to_string(),
            name: "Asha".to_string(),
            username: "asha".to_string(),
            role: Role::User,
        };
        let merged = account.merged_with(&AccountUpdate {
            name: "Asha Patel".to_string(),
            role: Role::Admin,
        });
        assert_eq!(merged.name, "Asha Patel");
        assert_eq!(merged.role, Role::Admin);
        assert_eq!(merged.username, "asha");
        assert_eq!(merged.id, "u1");
    }

    #[test]
    fn test_create_requires_all_fields() {
        let create = NewAccount {
            name: "Asha".to_string(),
            username: String::new(),
            password: "secret".to_string(),
            role: Role::User,
        };
        assert!(Account::validate_create(&create).is_err());
    }

    #[test]
    fn test_registration_validation() {
        let request = RegisterRequest {
            name: "Asha".to_string(),
            username: "asha".to_string(),
            password: "secret".to_string(),
        };
        assert!(validate_registration(&request).is_ok());

        let missing_password = RegisterRequest {
            password: String::new(),
            ..request
        };
        assert!(validate_registration(&missing_password).is_err());
    }
}
