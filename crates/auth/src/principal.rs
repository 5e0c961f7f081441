use serde::{Deserialize, Serialize};

use learnhub_core::UserId;

use crate::Role;

/// The signed-in user on whose behalf access checks are made.
///
/// `role` is `None` until the profile document has been read, and stays `None`
/// when the stored tag is not a known role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl Principal {
    pub fn new(user_id: UserId, email: Option<String>) -> Self {
        Self {
            user_id,
            email,
            role: None,
        }
    }
}

/// Document in the `admins` collection, keyed by the user's UID.
///
/// Predates the role model; the admin login page still consults it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminRecord {
    pub email: Option<String>,
    pub is_admin: bool,
    pub role: Option<String>,
    pub permissions: Vec<String>,
}

impl AdminRecord {
    /// Whether an (optional) admin document opens the admin console.
    ///
    /// A missing document and `isAdmin: false` both deny.
    pub fn grants_console(record: Option<&AdminRecord>) -> bool {
        record.is_some_and(|r| r.is_admin)
    }

    /// Role stored on the admin document, if it is a known one.
    pub fn role(&self) -> Option<Role> {
        Role::resolve(self.role.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_record_from_setup_document() {
        let record: AdminRecord = serde_json::from_value(serde_json::json!({
            "email": "root@example.com",
            "isAdmin": true,
            "role": "super-admin",
            "permissions": ["all"],
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert!(AdminRecord::grants_console(Some(&record)));
        assert_eq!(record.role(), Some(Role::SuperAdmin));
    }

    #[test]
    fn missing_or_disabled_admin_record_denies() {
        assert!(!AdminRecord::grants_console(None));

        let record: AdminRecord = serde_json::from_value(serde_json::json!({
            "email": "former@example.com"
        }))
        .unwrap();
        assert!(!record.is_admin);
        assert!(!AdminRecord::grants_console(Some(&record)));
        assert_eq!(record.role(), None);
    }
}
