use crate::model::{
    actor::Actor,
    id::UserId,
    user::{event::CreateUser, User},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, event: CreateUser, actor: &Actor) -> AppResult<User>;
    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>>;
}
