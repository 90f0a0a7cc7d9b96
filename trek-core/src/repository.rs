use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::identity::{AuthSession, CreateProfileRequest, Profile, Role};
use crate::CoreResult;
use trek_booking::{Booking, BookingDetails, CreateBookingRequest, UpdateBookingStatusRequest};
use trek_catalog::{CreatePackageRequest, Package, PackageAvailableDate, UpdatePackageRequest};

/// Repository trait for package catalog access.
#[async_trait]
pub trait PackageRepository: Send + Sync {
    /// Active packages only, newest first.
    async fn list_active(&self) -> CoreResult<Vec<Package>>;

    /// `None` when no row matches; absence is not an error.
    async fn get(&self, id: Uuid) -> CoreResult<Option<Package>>;

    /// Dates still open for booking: flagged available and on or after
    /// `today`, ascending.
    async fn list_open_dates(
        &self,
        package_id: Uuid,
        today: NaiveDate,
    ) -> CoreResult<Vec<PackageAvailableDate>>;

    async fn create(&self, req: &CreatePackageRequest) -> CoreResult<Package>;

    /// Partial update; always stamps a fresh `updated_at`.
    async fn update(&self, id: Uuid, req: &UpdatePackageRequest) -> CoreResult<Package>;

    /// Unconditional delete by id. Not reference-checked: bookings
    /// pointing at the package are left behind.
    async fn delete(&self, id: Uuid) -> CoreResult<()>;

    async fn add_available_date(
        &self,
        package_id: Uuid,
        date: NaiveDate,
    ) -> CoreResult<PackageAvailableDate>;

    async fn remove_available_date(&self, date_id: Uuid) -> CoreResult<()>;
}

/// Repository trait for the booking workflow.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Create the booking, its member rows, and the capacity counter
    /// bump as one unit. The caller's identity arrives as an explicit
    /// session value.
    async fn create(
        &self,
        session: &AuthSession,
        req: &CreateBookingRequest,
    ) -> CoreResult<Booking>;

    /// All bookings for one user, newest first, joined with package and
    /// members.
    async fn list_for_user(&self, user_id: Uuid) -> CoreResult<Vec<BookingDetails>>;

    /// The same join, unfiltered. Admin gating happens at the surface.
    async fn list_all(&self) -> CoreResult<Vec<BookingDetails>>;

    /// Set status plus optional notes and conversation link. Any status
    /// may be set from any status; a missing id is `NotFound`.
    async fn update_status(
        &self,
        id: Uuid,
        req: &UpdateBookingStatusRequest,
    ) -> CoreResult<Booking>;
}

/// Repository trait for profile access.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create(&self, req: &CreateProfileRequest) -> CoreResult<Profile>;

    async fn get(&self, id: Uuid) -> CoreResult<Option<Profile>>;

    async fn find_by_username(&self, username: &str) -> CoreResult<Option<Profile>>;

    async fn list(&self) -> CoreResult<Vec<Profile>>;

    async fn update_role(&self, id: Uuid, role: Role) -> CoreResult<Profile>;
}
