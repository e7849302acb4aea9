use crate::{
    database::{
        map_serialization_error, model::booking::BookingRow, set_transaction_serializable,
        ConnectionPool,
    },
    repository::availability::fetch_office_state,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use kernel::{
    interval::{self, Interval},
    model::{
        actor::Actor,
        booking::{
            event::{BookingListFilter, CreateBooking, UpdateBooking, UpdateBookingStatus},
            Booking, BookingStatus,
        },
        id::{BookingId, OfficeId, UserId, VisitorId},
        list::PaginatedList,
        role::Role,
        visitor::event::CreateVisitor,
    },
    permission::{ensure, Capability},
    repository::booking::BookingRepository,
};
use shared::error::{AppError, AppResult};
use uuid::Uuid;

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

const BOOKING_COLUMNS: &str = r#"
    b.booking_id,
    b.office_id,
    o.number AS office_number,
    o.company_name,
    b.start_at,
    b.end_at,
    b.status,
    b.title,
    b.description,
    b.needs_support,
    b.notes,
    b.visitor_id,
    v.name AS linked_visitor_name,
    v.email AS linked_visitor_email,
    v.whatsapp AS linked_visitor_whatsapp,
    b.visitor_name,
    b.visitor_email,
    b.visitor_whatsapp,
    b.created_by,
    b.created_at,
    b.updated_at
"#;

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn create(&self, event: CreateBooking) -> AppResult<Booking> {
        if !event.has_visitor_reference() {
            return Err(AppError::UnprocessableEntity(
                "a booking needs a visitor reference, inline visitor data or a contact snapshot"
                    .into(),
            ));
        }

        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        // ① the office must exist, be active and not soft-deleted
        let office = fetch_office_state(&mut tx, event.office_id).await?;
        if !office.is_bookable() {
            return Err(AppError::UnprocessableEntity(format!(
                "office ({}) is inactive or deleted",
                event.office_id
            )));
        }

        // ② the interval must be fully contained in a current window
        let windows: Vec<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT available_from, available_to
            FROM office_availabilities
            WHERE office_id = $1
              AND available_from < $3
              AND $2 < available_to
            "#,
        )
        .bind(event.office_id)
        .bind(event.period.start)
        .bind(event.period.end)
        .fetch_all(&mut *tx)
        .await
        .map_err(map_serialization_error)?;
        let windows = windows
            .into_iter()
            .map(|(from, to)| Interval::new(from, to))
            .collect::<AppResult<Vec<Interval>>>()?;
        if !interval::covered_by(&windows, &event.period) {
            return Err(AppError::SlotUnavailable(
                "the requested period is outside the office's availability".into(),
            ));
        }

        // ③ no active booking may overlap the interval
        let conflicting: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE office_id = $1
                  AND deleted_at IS NULL
                  AND status IN ('REQUESTED', 'CONFIRMED')
                  AND start_at < $3
                  AND $2 < end_at
            )
            "#,
        )
        .bind(event.office_id)
        .bind(event.period.start)
        .bind(event.period.end)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_serialization_error)?;
        if conflicting {
            return Err(AppError::ResourceConflict(
                "an active booking already occupies this period".into(),
            ));
        }

        // ④ resolve or create the visitor record
        let visitor_id = resolve_visitor(&mut tx, event.visitor_id, event.visitor.as_ref()).await?;

        // ⑤ persist; the snapshot keeps the booking readable even if
        // the visitor record is later altered
        let visitor_name = event
            .visitor_name
            .or_else(|| event.visitor.as_ref().map(|v| v.name.clone()));
        let visitor_email = event
            .visitor_email
            .or_else(|| event.visitor.as_ref().and_then(|v| v.email.clone()));
        let visitor_whatsapp = event
            .visitor_whatsapp
            .or_else(|| event.visitor.as_ref().and_then(|v| v.whatsapp.clone()));

        let booking_id = BookingId::new();
        let res = sqlx::query(
            r#"
            INSERT INTO bookings
                (booking_id, office_id, start_at, end_at, status,
                 title, description, needs_support, notes,
                 visitor_id, visitor_name, visitor_email, visitor_whatsapp,
                 created_by)
            VALUES ($1, $2, $3, $4, 'REQUESTED', $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(booking_id)
        .bind(event.office_id)
        .bind(event.period.start)
        .bind(event.period.end)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.needs_support)
        .bind(&event.notes)
        .bind(visitor_id)
        .bind(&visitor_name)
        .bind(&visitor_email)
        .bind(&visitor_whatsapp)
        .bind(event.created_by)
        .execute(&mut *tx)
        .await
        .map_err(map_serialization_error)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no booking record has been created".into(),
            ));
        }

        tx.commit().await.map_err(map_serialization_error)?;

        let row = self.fetch_row(booking_id).await?.ok_or_else(|| {
            AppError::NoRowsAffectedError("created booking could not be read back".into())
        })?;
        row.try_into()
    }

    async fn find_all(
        &self,
        filter: BookingListFilter,
        actor: &Actor,
    ) -> AppResult<PaginatedList<Booking>> {
        // Office owners only ever see bookings of offices they own,
        // whatever office filter they asked for.
        let owned_offices: Option<Vec<Uuid>> = match (actor.role, actor.user_id) {
            (Some(Role::OfficeOwner), Some(user_id)) => {
                let ids: Vec<OfficeId> =
                    sqlx::query_scalar("SELECT office_id FROM office_owners WHERE user_id = $1")
                        .bind(user_id)
                        .fetch_all(self.db.inner_ref())
                        .await
                        .map_err(AppError::SpecificOperationError)?;
                Some(ids.iter().map(OfficeId::raw).collect())
            }
            _ => None,
        };

        let status = filter.status.map(|s| s.to_string());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM bookings b
            LEFT JOIN visitors v ON b.visitor_id = v.visitor_id
            WHERE b.deleted_at IS NULL
              AND ($1::uuid IS NULL OR b.office_id = $1)
              AND ($2::varchar IS NULL OR b.status = $2)
              AND ($3::timestamptz IS NULL OR b.start_at >= $3)
              AND ($4::timestamptz IS NULL OR b.end_at <= $4)
              AND ($5::varchar IS NULL
                   OR b.visitor_email ILIKE '%' || $5 || '%'
                   OR v.email ILIKE '%' || $5 || '%')
              AND ($6::uuid[] IS NULL OR b.office_id = ANY($6))
            "#,
        )
        .bind(filter.office_id)
        .bind(&status)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(&filter.visitor_email)
        .bind(&owned_offices)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let query = format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings b
            INNER JOIN offices o ON b.office_id = o.office_id
            LEFT JOIN visitors v ON b.visitor_id = v.visitor_id
            WHERE b.deleted_at IS NULL
              AND ($1::uuid IS NULL OR b.office_id = $1)
              AND ($2::varchar IS NULL OR b.status = $2)
              AND ($3::timestamptz IS NULL OR b.start_at >= $3)
              AND ($4::timestamptz IS NULL OR b.end_at <= $4)
              AND ($5::varchar IS NULL
                   OR b.visitor_email ILIKE '%' || $5 || '%'
                   OR v.email ILIKE '%' || $5 || '%')
              AND ($6::uuid[] IS NULL OR b.office_id = ANY($6))
            ORDER BY b.start_at ASC
            LIMIT $7 OFFSET $8
            "#
        );
        let rows: Vec<BookingRow> = sqlx::query_as(&query)
            .bind(filter.office_id)
            .bind(&status)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(&filter.visitor_email)
            .bind(&owned_offices)
            .bind(filter.list.limit)
            .bind(filter.list.offset)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        let items = rows
            .into_iter()
            .map(Booking::try_from)
            .collect::<AppResult<Vec<Booking>>>()?;

        Ok(PaginatedList {
            total,
            limit: filter.list.limit,
            offset: filter.list.offset,
            items,
        })
    }

    async fn find_by_id(&self, booking_id: BookingId, actor: &Actor) -> AppResult<Booking> {
        let (booking, _) = self.fetch_visible(booking_id, actor).await?;
        Ok(booking)
    }

    async fn update(&self, event: UpdateBooking, actor: &Actor) -> AppResult<Booking> {
        let (_, owner_ids) = self.fetch_visible(event.booking_id, actor).await?;
        ensure(actor, &owner_ids, Capability::BookingListFull)?;

        let res = sqlx::query(
            r#"
            UPDATE bookings
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                needs_support = COALESCE($4, needs_support),
                notes = COALESCE($5, notes),
                visitor_name = COALESCE($6, visitor_name),
                visitor_email = COALESCE($7, visitor_email),
                visitor_whatsapp = COALESCE($8, visitor_whatsapp),
                updated_at = NOW()
            WHERE booking_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(event.booking_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.needs_support)
        .bind(&event.notes)
        .bind(&event.visitor_name)
        .bind(&event.visitor_email)
        .bind(&event.visitor_whatsapp)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "booking ({}) was not found",
                event.booking_id
            )));
        }

        let row = self.fetch_row(event.booking_id).await?.ok_or_else(|| {
            AppError::EntityNotFound(format!("booking ({}) was not found", event.booking_id))
        })?;
        row.try_into()
    }

    async fn update_status(
        &self,
        event: UpdateBookingStatus,
        actor: &Actor,
    ) -> AppResult<Booking> {
        let (booking, owner_ids) = self.fetch_visible(event.booking_id, actor).await?;

        booking.check_transition(event.status, actor, &owner_ids)?;
        if booking.status == event.status {
            // Idempotent no-op.
            return Ok(booking);
        }

        let res = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $2, updated_at = NOW()
            WHERE booking_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(event.booking_id)
        .bind(event.status.to_string())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no booking status has been updated".into(),
            ));
        }

        let row = self.fetch_row(event.booking_id).await?.ok_or_else(|| {
            AppError::EntityNotFound(format!("booking ({}) was not found", event.booking_id))
        })?;
        row.try_into()
    }
}

impl BookingRepositoryImpl {
    async fn fetch_row(&self, booking_id: BookingId) -> AppResult<Option<BookingRow>> {
        let query = format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings b
            INNER JOIN offices o ON b.office_id = o.office_id
            LEFT JOIN visitors v ON b.visitor_id = v.visitor_id
            WHERE b.booking_id = $1 AND b.deleted_at IS NULL
            "#
        );
        sqlx::query_as(&query)
            .bind(booking_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)
    }

    /// Fetches a booking and resolves whether `actor` may see it.
    /// An invisible booking is indistinguishable from an absent one.
    async fn fetch_visible(
        &self,
        booking_id: BookingId,
        actor: &Actor,
    ) -> AppResult<(Booking, Vec<UserId>)> {
        let not_found =
            || AppError::EntityNotFound(format!("booking ({booking_id}) was not found"));

        let row = self.fetch_row(booking_id).await?.ok_or_else(not_found)?;
        let booking: Booking = row.try_into()?;

        let owner_ids: Vec<UserId> =
            sqlx::query_scalar("SELECT user_id FROM office_owners WHERE office_id = $1")
                .bind(booking.office.office_id)
                .fetch_all(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        let visible = match actor.role {
            Some(Role::Admin | Role::Attendant) => true,
            Some(Role::OfficeOwner) => actor.user_id.is_some_and(|id| owner_ids.contains(&id)),
            None => actor
                .visitor_email
                .as_deref()
                .is_some_and(|e| booking.matches_visitor_email(e)),
        };
        if !visible {
            return Err(not_found());
        }

        Ok((booking, owner_ids))
    }
}

/// Visitor resolution: an explicit id wins; inline data is matched by
/// email and reused, or persisted fresh.
async fn resolve_visitor(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    visitor_id: Option<VisitorId>,
    visitor: Option<&CreateVisitor>,
) -> AppResult<Option<VisitorId>> {
    if let Some(id) = visitor_id {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM visitors WHERE visitor_id = $1)")
                .bind(id)
                .fetch_one(&mut **tx)
                .await
                .map_err(map_serialization_error)?;
        if !exists {
            return Err(AppError::EntityNotFound(format!(
                "visitor ({id}) was not found"
            )));
        }
        return Ok(Some(id));
    }

    let Some(visitor) = visitor else {
        return Ok(None);
    };

    if let Some(email) = &visitor.email {
        let existing: Option<VisitorId> =
            sqlx::query_scalar("SELECT visitor_id FROM visitors WHERE lower(email) = lower($1)")
                .bind(email)
                .fetch_optional(&mut **tx)
                .await
                .map_err(map_serialization_error)?;
        if let Some(id) = existing {
            return Ok(Some(id));
        }
    }

    let id = VisitorId::new();
    sqlx::query(
        r#"
        INSERT INTO visitors (visitor_id, name, email, whatsapp)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(&visitor.name)
    .bind(&visitor.email)
    .bind(&visitor.whatsapp)
    .execute(&mut **tx)
    .await
    .map_err(map_serialization_error)?;

    Ok(Some(id))
}
