use crate::model::{id::UserId, role::Role};

/// The caller of a core operation, threaded explicitly through every
/// store-access call instead of living in ambient request state.
///
/// `role`/`user_id` are both `None` for anonymous callers; such a
/// caller may still identify itself with a visitor email when reading
/// or cancelling its own booking.
#[derive(Debug, Clone, Default)]
pub struct Actor {
    pub role: Option<Role>,
    pub user_id: Option<UserId>,
    pub visitor_email: Option<String>,
}

impl Actor {
    pub fn registered(role: Role, user_id: UserId) -> Self {
        Self {
            role: Some(role),
            user_id: Some(user_id),
            visitor_email: None,
        }
    }

    pub fn anonymous(visitor_email: Option<String>) -> Self {
        Self {
            role: None,
            user_id: None,
            visitor_email,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.role.is_none()
    }
}
