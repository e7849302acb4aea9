use crate::database::{
    model::office::{OfficeOwnerRow, OfficeRow},
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        actor::Actor,
        id::{OfficeId, UserId},
        list::{ListOptions, PaginatedList},
        office::{
            event::{CreateOffice, DeleteOffice, UpdateOffice},
            Office, OfficeOwner,
        },
    },
    permission::{ensure, Capability},
    repository::office::OfficeRepository,
};
use shared::error::{AppError, AppResult};
use std::collections::HashMap;

#[derive(new)]
pub struct OfficeRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl OfficeRepository for OfficeRepositoryImpl {
    async fn create(&self, event: CreateOffice, actor: &Actor) -> AppResult<Office> {
        ensure(actor, &[], Capability::OfficeAdmin)?;

        let mut tx = self.db.begin().await?;

        let office_id = OfficeId::new();
        let row: OfficeRow = sqlx::query_as(
            r#"
            INSERT INTO offices (office_id, number, company_name)
            VALUES ($1, $2, $3)
            RETURNING office_id, number, company_name, is_active, deleted_at
            "#,
        )
        .bind(office_id)
        .bind(&event.number)
        .bind(&event.company_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_office_insert_error)?;

        replace_owners(&mut tx, office_id, &event.owner_ids).await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        let owners = self.fetch_owners(office_id).await?;
        Ok(row.into_office(owners))
    }

    async fn find_all(&self, options: ListOptions) -> AppResult<PaginatedList<Office>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM offices WHERE deleted_at IS NULL")
                .fetch_one(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        let rows: Vec<OfficeRow> = sqlx::query_as(
            r#"
            SELECT office_id, number, company_name, is_active, deleted_at
            FROM offices
            WHERE deleted_at IS NULL
            ORDER BY number ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(options.limit)
        .bind(options.offset)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let office_ids: Vec<uuid::Uuid> = rows.iter().map(|r| r.office_id.raw()).collect();
        let owner_rows: Vec<OfficeOwnerRow> = sqlx::query_as(
            r#"
            SELECT oo.office_id, u.user_id, u.name AS user_name
            FROM office_owners oo
            INNER JOIN users u ON oo.user_id = u.user_id
            WHERE oo.office_id = ANY($1)
            "#,
        )
        .bind(&office_ids)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let mut owners_by_office: HashMap<OfficeId, Vec<OfficeOwner>> = HashMap::new();
        for row in owner_rows {
            owners_by_office
                .entry(row.office_id)
                .or_default()
                .push(row.into());
        }

        let items = rows
            .into_iter()
            .map(|r| {
                let owners = owners_by_office.remove(&r.office_id).unwrap_or_default();
                r.into_office(owners)
            })
            .collect();

        Ok(PaginatedList {
            total,
            limit: options.limit,
            offset: options.offset,
            items,
        })
    }

    async fn find_by_id(&self, office_id: OfficeId) -> AppResult<Option<Office>> {
        let row: Option<OfficeRow> = sqlx::query_as(
            r#"
            SELECT office_id, number, company_name, is_active, deleted_at
            FROM offices
            WHERE office_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(office_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        match row {
            None => Ok(None),
            Some(row) => {
                let owners = self.fetch_owners(office_id).await?;
                Ok(Some(row.into_office(owners)))
            }
        }
    }

    async fn update(&self, event: UpdateOffice, actor: &Actor) -> AppResult<Office> {
        ensure(actor, &[], Capability::OfficeAdmin)?;

        let mut tx = self.db.begin().await?;

        let row: Option<OfficeRow> = sqlx::query_as(
            r#"
            UPDATE offices
            SET number = COALESCE($2, number),
                company_name = COALESCE($3, company_name),
                is_active = COALESCE($4, is_active),
                updated_at = NOW()
            WHERE office_id = $1 AND deleted_at IS NULL
            RETURNING office_id, number, company_name, is_active, deleted_at
            "#,
        )
        .bind(event.office_id)
        .bind(&event.number)
        .bind(&event.company_name)
        .bind(event.is_active)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_office_insert_error)?;
        let Some(row) = row else {
            return Err(AppError::EntityNotFound(format!(
                "office ({}) was not found",
                event.office_id
            )));
        };

        if let Some(owner_ids) = &event.owner_ids {
            sqlx::query("DELETE FROM office_owners WHERE office_id = $1")
                .bind(event.office_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
            replace_owners(&mut tx, event.office_id, owner_ids).await?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        let owners = self.fetch_owners(event.office_id).await?;
        Ok(row.into_office(owners))
    }

    async fn delete(&self, event: DeleteOffice, actor: &Actor) -> AppResult<()> {
        ensure(actor, &[], Capability::OfficeAdmin)?;

        let res = sqlx::query(
            r#"
            UPDATE offices
            SET is_active = FALSE, deleted_at = NOW(), updated_at = NOW()
            WHERE office_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(event.office_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "office ({}) was not found",
                event.office_id
            )));
        }

        Ok(())
    }
}

impl OfficeRepositoryImpl {
    async fn fetch_owners(&self, office_id: OfficeId) -> AppResult<Vec<OfficeOwner>> {
        let rows: Vec<OfficeOwnerRow> = sqlx::query_as(
            r#"
            SELECT oo.office_id, u.user_id, u.name AS user_name
            FROM office_owners oo
            INNER JOIN users u ON oo.user_id = u.user_id
            WHERE oo.office_id = $1
            "#,
        )
        .bind(office_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(rows.into_iter().map(OfficeOwner::from).collect())
    }
}

async fn replace_owners(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    office_id: OfficeId,
    owner_ids: &[UserId],
) -> AppResult<()> {
    for user_id in owner_ids {
        sqlx::query("INSERT INTO office_owners (office_id, user_id) VALUES ($1, $2)")
            .bind(office_id)
            .bind(user_id)
            .execute(&mut **tx)
            .await
            .map_err(map_office_insert_error)?;
    }
    Ok(())
}

/// A duplicate office number violates its unique constraint (23505);
/// an unknown owner violates the foreign key (23503). Both are caller
/// mistakes, not server faults.
fn map_office_insert_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        match db.code().as_deref() {
            Some("23505") => {
                return AppError::ResourceConflict("the office number is already taken".into())
            }
            Some("23503") => {
                return AppError::UnprocessableEntity("one of the owners does not exist".into())
            }
            _ => {}
        }
    }
    AppError::SpecificOperationError(e)
}
