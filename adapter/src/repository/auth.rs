use crate::{database::ConnectionPool, redis::RedisClient};
use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        auth::{event::CreateToken, AccessToken},
        id::UserId,
    },
    repository::auth::AuthRepository,
};
use shared::error::{AppError, AppResult};
use std::{str::FromStr, sync::Arc};
use uuid::Uuid;

#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    kv: Arc<RedisClient>,
    ttl: u64,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let value = self.kv.get(&token_key(access_token)).await?;
        value
            .map(|v| {
                UserId::from_str(&v).map_err(|_| {
                    AppError::ConversionEntityError("stored token maps to a broken user id".into())
                })
            })
            .transpose()
    }

    async fn verify_user(&self, email: &str, password: &str) -> AppResult<UserId> {
        let row: Option<(UserId, String)> = sqlx::query_as(
            r#"
            SELECT user_id, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        let Some((user_id, password_hash)) = row else {
            return Err(AppError::Unauthenticated);
        };

        let valid = bcrypt::verify(password, &password_hash)?;
        if !valid {
            return Err(AppError::Unauthenticated);
        }
        Ok(user_id)
    }

    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken> {
        let token = AccessToken(Uuid::new_v4().simple().to_string());
        self.kv
            .set_ex(&token_key(&token), &event.user_id.to_string(), self.ttl)
            .await?;
        Ok(token)
    }

    async fn delete_token(&self, access_token: AccessToken) -> AppResult<()> {
        self.kv.delete(&token_key(&access_token)).await
    }
}

fn token_key(token: &AccessToken) -> String {
    format!("auth:token:{}", token.0)
}
