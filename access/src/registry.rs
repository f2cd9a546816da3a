//! The `(role, identity) -> granted` table.

use crate::error::AccessError;
use agora_types::{Address, Role};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRegistry {
    grants: BTreeSet<(Role, Address)>,
    /// Overrides of the administering role. Roles absent here are administered by `Admin`.
    role_admins: BTreeMap<Role, Role>,
}

impl AccessRegistry {
    /// Create a registry with `admins` holding [`Role::Admin`].
    pub fn new(admins: &[Address]) -> Self {
        let mut registry = Self::default();
        for admin in admins {
            registry.grants.insert((Role::Admin, *admin));
        }
        registry
    }

    /// Whether `who` holds `role`, directly or through a wildcard grant.
    pub fn has_role(&self, role: Role, who: &Address) -> bool {
        self.grants.contains(&(role, *who))
            || (role.allows_wildcard() && self.grants.contains(&(role, Address::ANYONE)))
    }

    /// Fail with `Unauthorized` unless `who` holds `role`.
    pub fn check_role(&self, role: Role, who: &Address) -> Result<(), AccessError> {
        if self.has_role(role, who) {
            Ok(())
        } else {
            Err(AccessError::Unauthorized { caller: *who, role })
        }
    }

    /// The role whose holders may grant and revoke `role`.
    pub fn role_admin(&self, role: Role) -> Role {
        self.role_admins.get(&role).copied().unwrap_or(Role::Admin)
    }

    /// Change which role administers `role`. Requires the current administering role.
    pub fn set_role_admin(
        &mut self,
        caller: &Address,
        role: Role,
        admin_role: Role,
    ) -> Result<(), AccessError> {
        self.check_role(self.role_admin(role), caller)?;
        self.role_admins.insert(role, admin_role);
        info!(%role, %admin_role, "role admin changed");
        Ok(())
    }

    /// Grant `role` to `who`. Returns `true` if the grant is new.
    pub fn grant_role(
        &mut self,
        caller: &Address,
        role: Role,
        who: Address,
    ) -> Result<bool, AccessError> {
        self.check_role(self.role_admin(role), caller)?;
        if who.is_anyone() && !role.allows_wildcard() {
            return Err(AccessError::WildcardNotPermitted(role));
        }
        let added = self.grants.insert((role, who));
        if added {
            info!(%role, account = %who, sender = %caller, "role granted");
        }
        Ok(added)
    }

    /// Revoke `role` from `who`. Returns `true` if a grant was removed.
    pub fn revoke_role(
        &mut self,
        caller: &Address,
        role: Role,
        who: &Address,
    ) -> Result<bool, AccessError> {
        self.check_role(self.role_admin(role), caller)?;
        let removed = self.grants.remove(&(role, *who));
        if removed {
            info!(%role, account = %who, sender = %caller, "role revoked");
        }
        Ok(removed)
    }

    /// Drop one of the caller's own roles. No admin check.
    pub fn renounce_role(&mut self, caller: &Address, role: Role) -> bool {
        let removed = self.grants.remove(&(role, *caller));
        if removed {
            info!(%role, account = %caller, "role renounced");
        }
        removed
    }

    /// Direct holders of `role` (the wildcard appears as [`Address::ANYONE`]).
    pub fn members(&self, role: Role) -> Vec<Address> {
        self.grants
            .iter()
            .filter(|(r, _)| *r == role)
            .map(|(_, who)| *who)
            .collect()
    }
}
