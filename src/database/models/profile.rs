use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Principal role. Ordering: UNASSIGNED < {BUSINESS, CREATOR} < ADMIN < SUPER_ADMIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Unassigned,
    Business,
    Creator,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Position in the role lattice. BUSINESS and CREATOR are peers.
    pub fn rank(self) -> u8 {
        match self {
            Role::Unassigned => 0,
            Role::Business | Role::Creator => 1,
            Role::Admin => 2,
            Role::SuperAdmin => 3,
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Satisfies `required` when at least as privileged, except that the
    /// BUSINESS/CREATOR peers never satisfy each other.
    pub fn satisfies(self, required: Role) -> bool {
        if self == required {
            return true;
        }
        if self.rank() == required.rank() {
            // peers (BUSINESS vs CREATOR) are not interchangeable
            return false;
        }
        self.rank() > required.rank()
    }

    /// Post-login landing route for this role.
    pub fn landing_route(self) -> &'static str {
        match self {
            Role::Admin | Role::SuperAdmin => "/admin",
            Role::Business => "/dashboard/business",
            Role::Creator => "/dashboard/creator",
            Role::Unassigned => "/onboarding/role-selection",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Unassigned => "UNASSIGNED",
            Role::Business => "BUSINESS",
            Role::Creator => "CREATOR",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_lattice_ordering() {
        assert!(Role::SuperAdmin.satisfies(Role::Admin));
        assert!(Role::Admin.satisfies(Role::Business));
        assert!(Role::Admin.satisfies(Role::Creator));
        assert!(Role::Business.satisfies(Role::Unassigned));

        assert!(!Role::Business.satisfies(Role::Creator));
        assert!(!Role::Creator.satisfies(Role::Business));
        assert!(!Role::Business.satisfies(Role::Admin));
        assert!(!Role::Unassigned.satisfies(Role::Business));
        assert!(!Role::Admin.satisfies(Role::SuperAdmin));
    }

    #[test]
    fn landing_routes_per_role() {
        assert_eq!(Role::SuperAdmin.landing_route(), "/admin");
        assert_eq!(Role::Admin.landing_route(), "/admin");
        assert_eq!(Role::Business.landing_route(), "/dashboard/business");
        assert_eq!(Role::Creator.landing_route(), "/dashboard/creator");
        assert_eq!(Role::Unassigned.landing_route(), "/onboarding/role-selection");
    }
}
