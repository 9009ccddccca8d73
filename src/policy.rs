//! Access control policy shared by the catalog, lending and account managers

use crate::{
    error::{AppError, AppResult},
    models::user::Role,
};

/// Operations gated by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ReadCatalog,
    ManageCatalog,
    Borrow,
    ListBorrows,
    ViewOwnProfile,
    ManageAccounts,
}

impl Role {
    /// Rule table. Administrators manage the catalog and accounts but are
    /// barred from borrowing; regular users borrow and return.
    pub fn permits(self, action: Action) -> bool {
        match (self, action) {
            (_, Action::ReadCatalog) => true,
            (_, Action::ViewOwnProfile) => true,
            (Role::Administrator, Action::ManageCatalog) => true,
            (Role::Administrator, Action::ListBorrows) => true,
            (Role::Administrator, Action::ManageAccounts) => true,
            (Role::Administrator, Action::Borrow) => false,
            (Role::Regular, Action::Borrow) => true,
            (Role::Regular, _) => false,
        }
    }
}

/// Check the rule table, translating a denial to an authorization error
pub fn require(role: Role, action: Action) -> AppResult<()> {
    if role.permits(action) {
        return Ok(());
    }

    let message = match action {
        Action::Borrow => "Administrators are not allowed to borrow or return books",
        Action::ManageCatalog => "Only administrators can manage the catalog",
        Action::ListBorrows => "Only administrators can view all borrow records",
        Action::ManageAccounts => "Only administrators can manage user accounts",
        Action::ReadCatalog | Action::ViewOwnProfile => "Operation not permitted",
    };

    Err(AppError::Authorization(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_table_matches_role_matrix() {
        use Action::*;
        use Role::*;

        // (role, action, allowed)
        let matrix = [
            (Administrator, ReadCatalog, true),
            (Administrator, ManageCatalog, true),
            (Administrator, Borrow, false),
            (Administrator, ListBorrows, true),
            (Administrator, ViewOwnProfile, true),
            (Administrator, ManageAccounts, true),
            (Regular, ReadCatalog, true),
            (Regular, ManageCatalog, false),
            (Regular, Borrow, true),
            (Regular, ListBorrows, false),
            (Regular, ViewOwnProfile, true),
            (Regular, ManageAccounts, false),
        ];

        for (role, action, allowed) in matrix {
            assert_eq!(
                role.permits(action),
                allowed,
                "{role:?} / {action:?} should be {allowed}"
            );
            assert_eq!(require(role, action).is_ok(), allowed);
        }
    }

    #[test]
    fn denial_is_an_authorization_error() {
        match require(Role::Administrator, Action::Borrow) {
            Err(AppError::Authorization(_)) => {}
            other => panic!("expected authorization error, got {other:?}"),
        }
    }
}
