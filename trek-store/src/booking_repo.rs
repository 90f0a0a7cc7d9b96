use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use trek_booking::{
    Booking, BookingDetails, BookingMember, CreateBookingRequest, UpdateBookingStatusRequest,
};
use trek_catalog::Package;
use trek_core::identity::AuthSession;
use trek_core::repository::BookingRepository;
use trek_core::{CoreError, CoreResult};

use crate::package_repo;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const BOOKING_COLUMNS: &str = "id, user_id, package_id, travel_date, group_name, member_count, \
     total_price, advance_paid, status, payment_status, admin_notes, conversation_link, \
     created_at, updated_at";

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    package_id: Uuid,
    travel_date: NaiveDate,
    group_name: String,
    member_count: i32,
    total_price: i64,
    advance_paid: i64,
    status: String,
    payment_status: String,
    admin_notes: Option<String>,
    conversation_link: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_domain(self) -> CoreResult<Booking> {
        Ok(Booking {
            id: self.id,
            user_id: self.user_id,
            package_id: self.package_id,
            travel_date: self.travel_date,
            group_name: self.group_name,
            member_count: self.member_count,
            total_price: self.total_price,
            advance_paid: self.advance_paid,
            status: self.status.parse().map_err(CoreError::remote)?,
            payment_status: self.payment_status.parse().map_err(CoreError::remote)?,
            admin_notes: self.admin_notes,
            conversation_link: self.conversation_link,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    booking_id: Uuid,
    name: String,
    phone: String,
}

impl From<MemberRow> for BookingMember {
    fn from(row: MemberRow) -> Self {
        BookingMember {
            id: row.id,
            booking_id: row.booking_id,
            name: row.name,
            phone: row.phone,
        }
    }
}

impl PgBookingRepository {
    /// Join a booking page with its packages and member rows in two
    /// batched lookups.
    async fn load_details(&self, bookings: Vec<Booking>) -> CoreResult<Vec<BookingDetails>> {
        if bookings.is_empty() {
            return Ok(Vec::new());
        }

        let booking_ids: Vec<Uuid> = bookings.iter().map(|b| b.id).collect();
        let package_ids: Vec<Uuid> = bookings.iter().map(|b| b.package_id).collect();

        let member_rows = sqlx::query_as::<_, MemberRow>(
            "SELECT id, booking_id, name, phone FROM booking_members WHERE booking_id = ANY($1)",
        )
        .bind(&booking_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::remote)?;

        let package_rows = sqlx::query_as::<_, package_repo::PackageRow>(&format!(
            "SELECT {} FROM packages WHERE id = ANY($1)",
            package_repo::PACKAGE_COLUMNS
        ))
        .bind(&package_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::remote)?;

        let mut members_by_booking: HashMap<Uuid, Vec<BookingMember>> = HashMap::new();
        for row in member_rows {
            members_by_booking
                .entry(row.booking_id)
                .or_default()
                .push(row.into());
        }

        let packages_by_id: HashMap<Uuid, Package> = package_rows
            .into_iter()
            .map(Package::from)
            .map(|p| (p.id, p))
            .collect();

        Ok(bookings
            .into_iter()
            .map(|booking| BookingDetails {
                package: packages_by_id.get(&booking.package_id).cloned(),
                members: members_by_booking.remove(&booking.id).unwrap_or_default(),
                booking,
            })
            .collect())
    }

    async fn fetch_bookings(&self, user_id: Option<Uuid>) -> CoreResult<Vec<Booking>> {
        let rows = match user_id {
            Some(user_id) => {
                sqlx::query_as::<_, BookingRow>(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 \
                     ORDER BY created_at DESC"
                ))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, BookingRow>(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(CoreError::remote)?;

        rows.into_iter().map(BookingRow::into_domain).collect()
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(
        &self,
        session: &AuthSession,
        req: &CreateBookingRequest,
    ) -> CoreResult<Booking> {
        let booking = Booking::new(session.user_id, req);

        let mut tx = self.pool.begin().await.map_err(CoreError::remote)?;

        // 1. Booking row
        sqlx::query(
            "INSERT INTO bookings (id, user_id, package_id, travel_date, group_name, \
             member_count, total_price, advance_paid, status, payment_status, admin_notes, \
             conversation_link, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(booking.id)
        .bind(booking.user_id)
        .bind(booking.package_id)
        .bind(booking.travel_date)
        .bind(&booking.group_name)
        .bind(booking.member_count)
        .bind(booking.total_price)
        .bind(booking.advance_paid)
        .bind(booking.status.as_str())
        .bind(booking.payment_status.as_str())
        .bind(&booking.admin_notes)
        .bind(&booking.conversation_link)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(CoreError::remote)?;

        // 2. One member row per supplied participant
        for member in &req.members {
            sqlx::query(
                "INSERT INTO booking_members (id, booking_id, name, phone) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(Uuid::new_v4())
            .bind(booking.id)
            .bind(&member.name)
            .bind(&member.phone)
            .execute(&mut *tx)
            .await
            .map_err(CoreError::remote)?;
        }

        // 3. Capacity counter. The increment is keyed by package id, so
        // every available-date row of the package is bumped, not just the
        // booked travel date's row.
        sqlx::query(
            "UPDATE package_available_dates SET current_bookings = current_bookings + 1 \
             WHERE package_id = $1",
        )
        .bind(booking.package_id)
        .execute(&mut *tx)
        .await
        .map_err(CoreError::remote)?;

        tx.commit().await.map_err(CoreError::remote)?;

        info!(
            "Booking {} created for user {} ({} members)",
            booking.id,
            session.user_id,
            req.members.len()
        );

        Ok(booking)
    }

    async fn list_for_user(&self, user_id: Uuid) -> CoreResult<Vec<BookingDetails>> {
        let bookings = self.fetch_bookings(Some(user_id)).await?;
        self.load_details(bookings).await
    }

    async fn list_all(&self) -> CoreResult<Vec<BookingDetails>> {
        let bookings = self.fetch_bookings(None).await?;
        self.load_details(bookings).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        req: &UpdateBookingStatusRequest,
    ) -> CoreResult<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET \
             status = $2, \
             admin_notes = COALESCE($3, admin_notes), \
             conversation_link = COALESCE($4, conversation_link), \
             updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id)
        .bind(req.status.as_str())
        .bind(&req.admin_notes)
        .bind(&req.conversation_link)
        .fetch_optional(&self.pool)
        .await
        .map_err(CoreError::remote)?;

        match row {
            Some(row) => row.into_domain(),
            None => Err(CoreError::NotFound("booking")),
        }
    }
}
