//! Mapping from a verified identity to the group strings the cluster binds
//! RBAC policies against.

use crate::guardia::token::Identity;

/// Group names that are constant within a deployment.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    base_group: String,
    admin_group: String,
}

impl GroupConfig {
    #[must_use]
    pub fn new(base_group: String, admin_group: String) -> Self {
        Self {
            base_group,
            admin_group,
        }
    }

    /// Build the group list for a verified identity.
    ///
    /// Order is part of the contract: the base group first, one
    /// `<namespace>-<role>` group per authorization entry in claim order, and
    /// the admin group last when the admin flag is set.
    #[must_use]
    pub fn for_identity(&self, identity: &Identity) -> Vec<String> {
        let mut groups = Vec::with_capacity(identity.auths.len() + 2);

        groups.push(self.base_group.clone());

        for auth in &identity.auths {
            groups.push(format!("{}-{}", auth.namespace, auth.role));
        }

        if identity.admin_access {
            groups.push(self.admin_group.clone());
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guardia::token::AuthRule;

    fn config() -> GroupConfig {
        GroupConfig::new(
            "unauthenticated-baseline".to_string(),
            "cluster-admin-binding".to_string(),
        )
    }

    fn rule(namespace: &str, role: &str) -> AuthRule {
        AuthRule {
            namespace: namespace.to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn base_group_always_first() {
        let identity = Identity {
            user: "alice".to_string(),
            auths: vec![rule("team-a", "dev")],
            admin_access: false,
        };

        assert_eq!(
            config().for_identity(&identity),
            vec!["unauthenticated-baseline", "team-a-dev"]
        );
    }

    #[test]
    fn auth_rules_keep_claim_order() {
        let identity = Identity {
            user: "bob".to_string(),
            auths: vec![rule("zzz", "admin"), rule("aaa", "view"), rule("mmm", "dev")],
            admin_access: false,
        };

        assert_eq!(
            config().for_identity(&identity),
            vec![
                "unauthenticated-baseline",
                "zzz-admin",
                "aaa-view",
                "mmm-dev"
            ]
        );
    }

    #[test]
    fn admin_group_appended_last() {
        let identity = Identity {
            user: "alice".to_string(),
            auths: vec![rule("team-a", "dev")],
            admin_access: true,
        };

        assert_eq!(
            config().for_identity(&identity),
            vec![
                "unauthenticated-baseline",
                "team-a-dev",
                "cluster-admin-binding"
            ]
        );
    }

    #[test]
    fn admin_without_auths() {
        let identity = Identity {
            user: "alice".to_string(),
            auths: Vec::new(),
            admin_access: true,
        };

        assert_eq!(
            config().for_identity(&identity),
            vec!["unauthenticated-baseline", "cluster-admin-binding"]
        );
    }

    #[test]
    fn mapping_is_deterministic() {
        let identity = Identity {
            user: "alice".to_string(),
            auths: vec![rule("team-a", "dev"), rule("team-b", "ops")],
            admin_access: true,
        };

        let cfg = config();
        assert_eq!(cfg.for_identity(&identity), cfg.for_identity(&identity));
    }
}
