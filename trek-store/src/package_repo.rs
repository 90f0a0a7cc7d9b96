use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use trek_catalog::{
    CreatePackageRequest, ItineraryDay, Package, PackageAvailableDate, UpdatePackageRequest,
};
use trek_core::repository::PackageRepository;
use trek_core::{CoreError, CoreResult};

pub struct PgPackageRepository {
    pool: PgPool,
}

impl PgPackageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) const PACKAGE_COLUMNS: &str = "id, title, description, destination, price_per_head, \
     advance_amount, duration_days, start_date, end_date, max_capacity, image_url, \
     gallery, inclusions, facilities, itinerary, contact_phone, contact_email, \
     is_active, created_at, updated_at";

// Internal struct for type-safe querying; list-valued fields live in JSONB.
#[derive(sqlx::FromRow)]
pub(crate) struct PackageRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    destination: String,
    price_per_head: i64,
    advance_amount: i64,
    duration_days: i32,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    max_capacity: i32,
    image_url: Option<String>,
    gallery: Json<Vec<String>>,
    inclusions: Json<Vec<String>>,
    facilities: Json<Vec<String>>,
    itinerary: Json<Vec<ItineraryDay>>,
    contact_phone: Option<String>,
    contact_email: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PackageRow> for Package {
    fn from(row: PackageRow) -> Self {
        Package {
            id: row.id,
            title: row.title,
            description: row.description,
            destination: row.destination,
            price_per_head: row.price_per_head,
            advance_amount: row.advance_amount,
            duration_days: row.duration_days,
            start_date: row.start_date,
            end_date: row.end_date,
            max_capacity: row.max_capacity,
            image_url: row.image_url,
            gallery: row.gallery.0,
            inclusions: row.inclusions.0,
            facilities: row.facilities.0,
            itinerary: row.itinerary.0,
            contact_phone: row.contact_phone,
            contact_email: row.contact_email,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AvailableDateRow {
    id: Uuid,
    package_id: Uuid,
    available_date: NaiveDate,
    current_bookings: i32,
    is_available: bool,
}

impl From<AvailableDateRow> for PackageAvailableDate {
    fn from(row: AvailableDateRow) -> Self {
        PackageAvailableDate {
            id: row.id,
            package_id: row.package_id,
            available_date: row.available_date,
            current_bookings: row.current_bookings,
            is_available: row.is_available,
        }
    }
}

#[async_trait]
impl PackageRepository for PgPackageRepository {
    async fn list_active(&self) -> CoreResult<Vec<Package>> {
        let rows = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages WHERE is_active = TRUE ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::remote)?;

        Ok(rows.into_iter().map(Package::from).collect())
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Package>> {
        let row = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(CoreError::remote)?;

        Ok(row.map(Package::from))
    }

    async fn list_open_dates(
        &self,
        package_id: Uuid,
        today: NaiveDate,
    ) -> CoreResult<Vec<PackageAvailableDate>> {
        let rows = sqlx::query_as::<_, AvailableDateRow>(
            "SELECT id, package_id, available_date, current_bookings, is_available \
             FROM package_available_dates \
             WHERE package_id = $1 AND is_available = TRUE AND available_date >= $2 \
             ORDER BY available_date ASC",
        )
        .bind(package_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::remote)?;

        Ok(rows.into_iter().map(PackageAvailableDate::from).collect())
    }

    async fn create(&self, req: &CreatePackageRequest) -> CoreResult<Package> {
        let package = Package::new(req);

        sqlx::query(
            "INSERT INTO packages (id, title, description, destination, price_per_head, \
             advance_amount, duration_days, start_date, end_date, max_capacity, image_url, \
             gallery, inclusions, facilities, itinerary, contact_phone, contact_email, \
             is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20)",
        )
        .bind(package.id)
        .bind(&package.title)
        .bind(&package.description)
        .bind(&package.destination)
        .bind(package.price_per_head)
        .bind(package.advance_amount)
        .bind(package.duration_days)
        .bind(package.start_date)
        .bind(package.end_date)
        .bind(package.max_capacity)
        .bind(&package.image_url)
        .bind(Json(&package.gallery))
        .bind(Json(&package.inclusions))
        .bind(Json(&package.facilities))
        .bind(Json(&package.itinerary))
        .bind(&package.contact_phone)
        .bind(&package.contact_email)
        .bind(package.is_active)
        .bind(package.created_at)
        .bind(package.updated_at)
        .execute(&self.pool)
        .await
        .map_err(CoreError::remote)?;

        Ok(package)
    }

    async fn update(&self, id: Uuid, req: &UpdatePackageRequest) -> CoreResult<Package> {
        let row = sqlx::query_as::<_, PackageRow>(&format!(
            "UPDATE packages SET \
             title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             destination = COALESCE($4, destination), \
             price_per_head = COALESCE($5, price_per_head), \
             advance_amount = COALESCE($6, advance_amount), \
             duration_days = COALESCE($7, duration_days), \
             start_date = COALESCE($8, start_date), \
             end_date = COALESCE($9, end_date), \
             max_capacity = COALESCE($10, max_capacity), \
             image_url = COALESCE($11, image_url), \
             gallery = COALESCE($12, gallery), \
             inclusions = COALESCE($13, inclusions), \
             facilities = COALESCE($14, facilities), \
             itinerary = COALESCE($15, itinerary), \
             contact_phone = COALESCE($16, contact_phone), \
             contact_email = COALESCE($17, contact_email), \
             is_active = COALESCE($18, is_active), \
             updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PACKAGE_COLUMNS}"
        ))
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.destination)
        .bind(req.price_per_head)
        .bind(req.advance_amount)
        .bind(req.duration_days)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.max_capacity)
        .bind(&req.image_url)
        .bind(req.gallery.as_ref().map(Json))
        .bind(req.inclusions.as_ref().map(Json))
        .bind(req.facilities.as_ref().map(Json))
        .bind(req.itinerary.as_ref().map(Json))
        .bind(&req.contact_phone)
        .bind(&req.contact_email)
        .bind(req.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(CoreError::remote)?;

        row.map(Package::from).ok_or(CoreError::NotFound("package"))
    }

    async fn delete(&self, id: Uuid) -> CoreResult<()> {
        // Unconditional, not reference-checked: bookings against the
        // package keep their rows.
        sqlx::query("DELETE FROM packages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(CoreError::remote)?;

        Ok(())
    }

    async fn add_available_date(
        &self,
        package_id: Uuid,
        date: NaiveDate,
    ) -> CoreResult<PackageAvailableDate> {
        let row = sqlx::query_as::<_, AvailableDateRow>(
            "INSERT INTO package_available_dates (id, package_id, available_date) \
             VALUES ($1, $2, $3) \
             RETURNING id, package_id, available_date, current_bookings, is_available",
        )
        .bind(Uuid::new_v4())
        .bind(package_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(CoreError::remote)?;

        Ok(row.into())
    }

    async fn remove_available_date(&self, date_id: Uuid) -> CoreResult<()> {
        sqlx::query("DELETE FROM package_available_dates WHERE id = $1")
            .bind(date_id)
            .execute(&self.pool)
            .await
            .map_err(CoreError::remote)?;

        Ok(())
    }
}
