use crate::database::{
    map_serialization_error, model::availability::AvailabilityRow, set_transaction_serializable,
    ConnectionPool,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use derive_new::new;
use kernel::{
    interval::Interval,
    model::{
        actor::Actor,
        availability::{
            event::{CreateAvailability, DeleteAvailability, UpdateAvailability},
            AvailabilityWindow,
        },
        id::{AvailabilityId, OfficeId, UserId},
    },
    permission::{ensure, Capability},
    repository::availability::AvailabilityRepository,
    slot,
};
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct AvailabilityRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl AvailabilityRepository for AvailabilityRepositoryImpl {
    async fn create(
        &self,
        event: CreateAvailability,
        actor: &Actor,
    ) -> AppResult<AvailabilityWindow> {
        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        let office = fetch_office_state(&mut tx, event.office_id).await?;
        ensure(actor, &office.owner_ids, Capability::AvailabilityWrite)?;
        if !office.is_bookable() {
            return Err(AppError::UnprocessableEntity(format!(
                "office ({}) is inactive or deleted",
                event.office_id
            )));
        }

        // Touching windows are fine; only a half-open intersection
        // with another window of the same office is a conflict.
        let overlapping: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM office_availabilities
                WHERE office_id = $1
                  AND available_from < $3
                  AND $2 < available_to
            )
            "#,
        )
        .bind(event.office_id)
        .bind(event.period.start)
        .bind(event.period.end)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_serialization_error)?;
        if overlapping {
            return Err(AppError::ResourceConflict(
                "an availability window already overlaps this period".into(),
            ));
        }

        let row: AvailabilityRow = sqlx::query_as(
            r#"
            INSERT INTO office_availabilities
                (availability_id, office_id, available_from, available_to)
            VALUES ($1, $2, $3, $4)
            RETURNING availability_id, office_id, available_from, available_to
            "#,
        )
        .bind(AvailabilityId::new())
        .bind(event.office_id)
        .bind(event.period.start)
        .bind(event.period.end)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_serialization_error)?;

        tx.commit().await.map_err(map_serialization_error)?;

        row.try_into()
    }

    async fn find_all(
        &self,
        office_id: OfficeId,
        range: Option<Interval>,
    ) -> AppResult<Vec<AvailabilityWindow>> {
        ensure_office_exists(self.db.inner_ref(), office_id).await?;

        let rows: Vec<AvailabilityRow> = sqlx::query_as(
            r#"
            SELECT availability_id, office_id, available_from, available_to
            FROM office_availabilities
            WHERE office_id = $1
              AND ($2::timestamptz IS NULL OR available_to > $2)
              AND ($3::timestamptz IS NULL OR available_from < $3)
            ORDER BY available_from ASC
            "#,
        )
        .bind(office_id)
        .bind(range.map(|r| r.start))
        .bind(range.map(|r| r.end))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(AvailabilityWindow::try_from).collect()
    }

    async fn update(
        &self,
        event: UpdateAvailability,
        actor: &Actor,
    ) -> AppResult<AvailabilityWindow> {
        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        let office = fetch_office_state(&mut tx, event.office_id).await?;
        ensure(actor, &office.owner_ids, Capability::AvailabilityWrite)?;

        let current: Option<AvailabilityRow> = sqlx::query_as(
            r#"
            SELECT availability_id, office_id, available_from, available_to
            FROM office_availabilities
            WHERE availability_id = $1 AND office_id = $2
            "#,
        )
        .bind(event.availability_id)
        .bind(event.office_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_serialization_error)?;
        let Some(current) = current else {
            return Err(AppError::EntityNotFound(format!(
                "availability window ({}) was not found",
                event.availability_id
            )));
        };

        let merged = Interval::new(
            event.available_from.unwrap_or(current.available_from),
            event.available_to.unwrap_or(current.available_to),
        )?;

        let overlapping: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM office_availabilities
                WHERE office_id = $1
                  AND availability_id <> $2
                  AND available_from < $4
                  AND $3 < available_to
            )
            "#,
        )
        .bind(event.office_id)
        .bind(event.availability_id)
        .bind(merged.start)
        .bind(merged.end)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_serialization_error)?;
        if overlapping {
            return Err(AppError::ResourceConflict(
                "an availability window already overlaps this period".into(),
            ));
        }

        let row: AvailabilityRow = sqlx::query_as(
            r#"
            UPDATE office_availabilities
            SET available_from = $3, available_to = $4
            WHERE availability_id = $1 AND office_id = $2
            RETURNING availability_id, office_id, available_from, available_to
            "#,
        )
        .bind(event.availability_id)
        .bind(event.office_id)
        .bind(merged.start)
        .bind(merged.end)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_serialization_error)?;

        tx.commit().await.map_err(map_serialization_error)?;

        row.try_into()
    }

    async fn delete(&self, event: DeleteAvailability, actor: &Actor) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        let office = fetch_office_state(&mut tx, event.office_id).await?;
        ensure(actor, &office.owner_ids, Capability::AvailabilityWrite)?;

        let window: Option<AvailabilityRow> = sqlx::query_as(
            r#"
            SELECT availability_id, office_id, available_from, available_to
            FROM office_availabilities
            WHERE availability_id = $1 AND office_id = $2
            "#,
        )
        .bind(event.availability_id)
        .bind(event.office_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_serialization_error)?;
        let Some(window) = window else {
            return Err(AppError::EntityNotFound(format!(
                "availability window ({}) was not found",
                event.availability_id
            )));
        };

        // A window with an active booking inside cannot disappear;
        // cancelled/completed bookings do not block deletion.
        let occupied: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE office_id = $1
                  AND deleted_at IS NULL
                  AND status IN ('REQUESTED', 'CONFIRMED')
                  AND start_at >= $2
                  AND end_at <= $3
            )
            "#,
        )
        .bind(event.office_id)
        .bind(window.available_from)
        .bind(window.available_to)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_serialization_error)?;
        if occupied {
            return Err(AppError::ResourceConflict(
                "the window still contains active bookings".into(),
            ));
        }

        let res = sqlx::query(
            r#"
            DELETE FROM office_availabilities
            WHERE availability_id = $1 AND office_id = $2
            "#,
        )
        .bind(event.availability_id)
        .bind(event.office_id)
        .execute(&mut *tx)
        .await
        .map_err(map_serialization_error)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no availability window has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(map_serialization_error)?;

        Ok(())
    }

    async fn find_available_slots(
        &self,
        office_id: OfficeId,
        range: Interval,
        min_duration: Duration,
    ) -> AppResult<Vec<Interval>> {
        ensure_office_exists(self.db.inner_ref(), office_id).await?;

        let windows = self.find_all(office_id, Some(range)).await?;
        let windows: Vec<Interval> = windows.into_iter().map(|w| w.period).collect();

        let bookings: Vec<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT start_at, end_at
            FROM bookings
            WHERE office_id = $1
              AND deleted_at IS NULL
              AND status IN ('REQUESTED', 'CONFIRMED')
              AND start_at < $3
              AND $2 < end_at
            ORDER BY start_at ASC
            "#,
        )
        .bind(office_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        let bookings: Vec<Interval> = bookings
            .into_iter()
            .filter_map(|(start, end)| Interval::new(start, end).ok())
            .collect();

        Ok(slot::free_slots(&windows, &bookings, range, min_duration))
    }
}

pub(crate) struct OfficeState {
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub owner_ids: Vec<UserId>,
}

impl OfficeState {
    pub fn is_bookable(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}

/// Loads the office's active/deleted flags and its owners inside the
/// caller's transaction, failing with `EntityNotFound` when absent.
pub(crate) async fn fetch_office_state(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    office_id: OfficeId,
) -> AppResult<OfficeState> {
    let office: Option<(bool, Option<DateTime<Utc>>)> = sqlx::query_as(
        r#"
        SELECT is_active, deleted_at
        FROM offices
        WHERE office_id = $1
        "#,
    )
    .bind(office_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(map_serialization_error)?;
    let Some((is_active, deleted_at)) = office else {
        return Err(AppError::EntityNotFound(format!(
            "office ({office_id}) was not found"
        )));
    };

    let owner_ids: Vec<UserId> =
        sqlx::query_scalar("SELECT user_id FROM office_owners WHERE office_id = $1")
            .bind(office_id)
            .fetch_all(&mut **tx)
            .await
            .map_err(map_serialization_error)?;

    Ok(OfficeState {
        is_active,
        deleted_at,
        owner_ids,
    })
}

pub(crate) async fn ensure_office_exists(pool: &sqlx::PgPool, office_id: OfficeId) -> AppResult<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM offices WHERE office_id = $1)")
        .bind(office_id)
        .fetch_one(pool)
        .await
        .map_err(AppError::SpecificOperationError)?;
    if exists {
        Ok(())
    } else {
        Err(AppError::EntityNotFound(format!(
            "office ({office_id}) was not found"
        )))
    }
}
