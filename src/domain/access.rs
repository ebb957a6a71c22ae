//! Role-based access control for administrative operations.
//!
//! Capabilities are granted by a static table keyed on the admin sub-role.
//! The match is exhaustive: adding a sub-role or capability does not compile
//! until it has been classified, and anything not granted is denied.

use serde::{Deserialize, Serialize};

use super::user::{AdminRole, Role};
use crate::errors::{AppError, AppResult};

/// Administrative actions that require an explicit grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// See the queue of pending seller registrations
    ViewPendingRegistrations,
    /// Approve or reject a seller registration
    ReviewSellerRegistration,
    /// Suspend or reinstate an approved seller
    ManageSellerStanding,
    /// Re-open an approved registration (privileged override)
    ReopenRegistration,
    /// Read the administrative audit trail
    ViewAuditLog,
}

/// Whether the given sub-role holds `capability`.
pub fn admin_role_grants(admin_role: AdminRole, capability: Capability) -> bool {
    use Capability::*;

    match admin_role {
        AdminRole::SuperAdmin => true,
        AdminRole::SellerManager => match capability {
            ViewPendingRegistrations | ReviewSellerRegistration | ManageSellerStanding => true,
            ReopenRegistration | ViewAuditLog => false,
        },
        AdminRole::PriceManager | AdminRole::OrderManager => false,
    }
}

/// The verified caller of an operation, as reported by identity verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub role: Role,
    pub admin_role: Option<AdminRole>,
}

impl Actor {
    pub fn new(user_id: i32, role: Role, admin_role: Option<AdminRole>) -> Self {
        Self {
            user_id,
            role,
            admin_role,
        }
    }

    /// Check a capability without failing.
    pub fn can(&self, capability: Capability) -> bool {
        match (self.role, self.admin_role) {
            (Role::Admin, Some(admin_role)) => admin_role_grants(admin_role, capability),
            _ => false,
        }
    }

    /// Require a capability, returning `Forbidden` if it is not granted.
    pub fn require(&self, capability: Capability) -> AppResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            tracing::debug!(
                user_id = self.user_id,
                role = %self.role,
                ?capability,
                "Capability denied"
            );
            Err(AppError::Forbidden)
        }
    }

    /// Which pending registrations this caller may see.
    pub fn review_scope(&self) -> ReviewScope {
        if self.can(Capability::ViewPendingRegistrations) {
            ReviewScope::All
        } else {
            ReviewScope::Nothing
        }
    }
}

/// Jurisdiction of an admin over the registration queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewScope {
    All,
    Nothing,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(admin_role: AdminRole) -> Actor {
        Actor::new(1, Role::Admin, Some(admin_role))
    }

    #[test]
    fn test_seller_manager_reviews_but_cannot_reopen() {
        let actor = admin(AdminRole::SellerManager);
        assert!(actor.can(Capability::ReviewSellerRegistration));
        assert!(actor.can(Capability::ViewPendingRegistrations));
        assert!(actor.can(Capability::ManageSellerStanding));
        assert!(!actor.can(Capability::ReopenRegistration));
        assert!(!actor.can(Capability::ViewAuditLog));
    }

    #[test]
    fn test_super_admin_holds_everything() {
        let actor = admin(AdminRole::SuperAdmin);
        assert!(actor.can(Capability::ReopenRegistration));
        assert!(actor.can(Capability::ViewAuditLog));
        assert_eq!(actor.review_scope(), ReviewScope::All);
    }

    #[test]
    fn test_price_manager_is_scoped_out() {
        let actor = admin(AdminRole::PriceManager);
        assert!(matches!(
            actor.require(Capability::ReviewSellerRegistration),
            Err(AppError::Forbidden)
        ));
        assert_eq!(actor.review_scope(), ReviewScope::Nothing);
    }

    #[test]
    fn test_unclassified_callers_are_denied() {
        assert!(!admin(AdminRole::OrderManager).can(Capability::ReviewSellerRegistration));
        assert!(!Actor::new(1, Role::Admin, None).can(Capability::ViewPendingRegistrations));
        // A sub-role claim on a non-admin is ignored
        let buyer = Actor::new(2, Role::Buyer, Some(AdminRole::SuperAdmin));
        assert!(!buyer.can(Capability::ReviewSellerRegistration));
    }
}
