//! Account types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_domain_status_conversions;
use crate::utils::payload::{field, opt_string, string_or_empty};

/// Account role; a login must match the role the user picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl_domain_status_conversions!(Role {
    Student => "student",
    Teacher => "teacher",
});

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    /// Raw role string; may be a value this client does not know
    pub role: String,
    pub bio: String,
    pub profile_image: String,
}

impl User {
    /// Builds the user from a login response
    ///
    /// The account may be nested under `user` or inlined. `email` and
    /// `requested_role` fill in what the response omits.
    pub fn from_login(data: &Value, email: &str, requested_role: Role) -> Self {
        Self {
            id: opt_string(data, &["user.id", "id"]).unwrap_or_default(),
            email: opt_string(data, &["user.email"]).unwrap_or_else(|| email.to_string()),
            name: string_or_empty(data, &["user.name", "user.first_name"]),
            role: opt_string(data, &["user.role"])
                .unwrap_or_else(|| requested_role.as_str().to_string()),
            bio: string_or_empty(data, &["user.bio"]),
            profile_image: string_or_empty(data, &["user.profile_image"]),
        }
    }

    /// Refreshes a cached user from a profile response
    pub fn from_profile(data: &Value, cached: &Self) -> Self {
        Self {
            id: opt_string(data, &["id"]).unwrap_or_else(|| cached.id.clone()),
            email: opt_string(data, &["email"]).unwrap_or_else(|| cached.email.clone()),
            name: opt_string(data, &["name", "first_name"]).unwrap_or_else(|| cached.name.clone()),
            role: opt_string(data, &["role"]).unwrap_or_else(|| cached.role.clone()),
            bio: string_or_empty(data, &["bio"]),
            profile_image: string_or_empty(data, &["profile_image"]),
        }
    }

    /// Applies a profile-update response over the submitted values
    pub fn with_profile_update(&self, data: &Value, name: &str, bio: &str, image: &str) -> Self {
        let pick = |key: &str, submitted: &str| {
            field(data, &[key]).and_then(Value::as_str).unwrap_or(submitted).to_string()
        };
        Self {
            name: pick("name", name),
            bio: pick("bio", bio),
            profile_image: pick("profile_image", image),
            ..self.clone()
        }
    }

    /// Parsed role, if it is one this client knows
    pub fn parsed_role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}
