use gamevault_auth::Role;
use gamevault_core::UserId;

/// Principal context for a request (authenticated identity + role).
///
/// This is immutable and must be present for all authenticated routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user_id: UserId,
    role: Role,
}

impl PrincipalContext {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
