use kernel::model::{id::UserId, role::Role, user::User};
use shared::error::{AppError, AppResult};
use std::str::FromStr;

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> AppResult<Self> {
        let UserRow {
            user_id,
            name,
            email,
            role,
        } = value;
        let role = Role::from_str(&role)
            .map_err(|_| AppError::ConversionEntityError(format!("unknown role: {role}")))?;
        Ok(User {
            id: user_id,
            name,
            email,
            role,
        })
    }
}
