use crate::database::{model::user::UserRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        actor::Actor,
        id::UserId,
        user::{event::CreateUser, User},
    },
    permission::{ensure, Capability},
    repository::user::UserRepository,
};
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser, actor: &Actor) -> AppResult<User> {
        ensure(actor, &[], Capability::UserAdmin)?;

        let password_hash = bcrypt::hash(&event.password, bcrypt::DEFAULT_COST)?;
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (user_id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING user_id, name, email, role
            "#,
        )
        .bind(UserId::new())
        .bind(&event.name)
        .bind(&event.email)
        .bind(&password_hash)
        .bind(event.role.to_string())
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(map_user_insert_error)?;

        row.try_into()
    }

    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT user_id, name, email, role
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(User::try_from).transpose()
    }
}

/// A duplicate email violates its unique constraint (23505).
fn map_user_insert_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some("23505") {
            return AppError::ResourceConflict("the email address is already registered".into());
        }
    }
    AppError::SpecificOperationError(e)
}
