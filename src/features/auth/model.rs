use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fixed role set. Permissions are static per role, not a dynamic ACL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ViewRecords,
    ManageEmployees,
    ManageViolations,
    ManageFines,
    ManageSettings,
    SendEmail,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Viewer => "viewer",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "admin" => Some(Role::Admin),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }

    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::Admin => &[
                Permission::ViewRecords,
                Permission::ManageEmployees,
                Permission::ManageViolations,
                Permission::ManageFines,
                Permission::ManageSettings,
                Permission::SendEmail,
            ],
            Role::Viewer => &[Permission::ViewRecords],
        }
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

/// Identity attached to the request by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// JWT claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}
