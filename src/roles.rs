//! Role membership for gated commands.
//!
//! Roles are plain names mapped to Matrix user ids in the configuration. The
//! bot owner implicitly holds the [`OWNER_ROLE`].

use std::collections::{HashMap, HashSet};

use mockall::automock;

pub const OWNER_ROLE: &str = "owner";

#[automock]
pub trait RoleChecker {
    /// Whether `user_id` holds `role`. Role names are case-insensitive.
    fn has_role(&self, user_id: &str, role: &str) -> bool;
}

/// Role table read from the configuration.
#[derive(Debug, Default)]
pub struct ConfigRoles {
    members: HashMap<String, HashSet<String>>,
}

impl ConfigRoles {
    pub fn new(owner: &str, roles: &HashMap<String, Vec<String>>) -> Self {
        let mut members: HashMap<String, HashSet<String>> = roles
            .iter()
            .map(|(role, users)| (role.to_lowercase(), users.iter().cloned().collect()))
            .collect();

        members
            .entry(OWNER_ROLE.to_owned())
            .or_default()
            .insert(owner.to_owned());

        ConfigRoles { members }
    }
}

impl RoleChecker for ConfigRoles {
    fn has_role(&self, user_id: &str, role: &str) -> bool {
        self.members
            .get(&role.to_lowercase())
            .is_some_and(|users| users.contains(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_roles() -> ConfigRoles {
        let roles = HashMap::from([
            (
                "Misionero".to_owned(),
                vec!["@ana:example.com".to_owned()],
            ),
            ("papa".to_owned(), vec!["@luis:example.com".to_owned()]),
        ]);
        ConfigRoles::new("@owner:example.com", &roles)
    }

    #[test]
    fn test_has_role() {
        let roles = create_roles();

        assert!(roles.has_role("@ana:example.com", "misionero"));
        assert!(roles.has_role("@luis:example.com", "papa"));
        assert!(!roles.has_role("@ana:example.com", "papa"));
    }

    #[test]
    fn test_role_names_ignore_case() {
        let roles = create_roles();

        assert!(roles.has_role("@ana:example.com", "MISIONERO"));
    }

    #[test]
    fn test_owner_role_is_implicit() {
        let roles = create_roles();

        assert!(roles.has_role("@owner:example.com", OWNER_ROLE));
        assert!(!roles.has_role("@ana:example.com", OWNER_ROLE));
    }

    #[test]
    fn test_unknown_role() {
        let roles = create_roles();

        assert!(!roles.has_role("@ana:example.com", "arzobispo"));
    }
}
