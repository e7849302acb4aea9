use crate::model::{
    actor::Actor,
    id::OfficeId,
    list::{ListOptions, PaginatedList},
    office::{
        event::{CreateOffice, DeleteOffice, UpdateOffice},
        Office,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait OfficeRepository: Send + Sync {
    async fn create(&self, event: CreateOffice, actor: &Actor) -> AppResult<Office>;
    async fn find_all(&self, options: ListOptions) -> AppResult<PaginatedList<Office>>;
    async fn find_by_id(&self, office_id: OfficeId) -> AppResult<Option<Office>>;
    async fn update(&self, event: UpdateOffice, actor: &Actor) -> AppResult<Office>;
    /// Soft delete: marks the office inactive and stamps
    /// `deleted_at`; offices are never hard-deleted.
    async fn delete(&self, event: DeleteOffice, actor: &Actor) -> AppResult<()>;
}
