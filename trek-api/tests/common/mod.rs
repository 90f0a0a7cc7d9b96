//! Shared test support: an in-memory backend implementing the
//! repository traits, plus request helpers for driving the router.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::util::ServiceExt;
use uuid::Uuid;

use trek_api::middleware::auth::Claims;
use trek_api::state::{AppState, AuthConfig};
use trek_booking::{
    Booking, BookingDetails, BookingMember, BookingStatus, CreateBookingRequest, PaymentStatus,
    UpdateBookingStatusRequest,
};
use trek_catalog::{
    CreatePackageRequest, Package, PackageAvailableDate, UpdatePackageRequest,
};
use trek_core::identity::{AuthSession, CreateProfileRequest, Profile, Role};
use trek_core::repository::{BookingRepository, PackageRepository, ProfileRepository};
use trek_core::{CoreError, CoreResult};

pub const TEST_SECRET: &str = "trek-test-secret";

#[derive(Default)]
pub struct MemBackend {
    pub packages: Mutex<HashMap<Uuid, Package>>,
    pub dates: Mutex<Vec<PackageAvailableDate>>,
    pub bookings: Mutex<Vec<Booking>>,
    pub members: Mutex<Vec<BookingMember>>,
    pub profiles: Mutex<Vec<Profile>>,
}

#[async_trait]
impl PackageRepository for MemBackend {
    async fn list_active(&self) -> CoreResult<Vec<Package>> {
        let mut packages: Vec<Package> = self
            .packages
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        packages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(packages)
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Package>> {
        Ok(self.packages.lock().unwrap().get(&id).cloned())
    }

    async fn list_open_dates(
        &self,
        package_id: Uuid,
        today: NaiveDate,
    ) -> CoreResult<Vec<PackageAvailableDate>> {
        let mut dates: Vec<PackageAvailableDate> = self
            .dates
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.package_id == package_id && d.is_open(today))
            .cloned()
            .collect();
        dates.sort_by_key(|d| d.available_date);
        Ok(dates)
    }

    async fn create(&self, req: &CreatePackageRequest) -> CoreResult<Package> {
        let package = Package::new(req);
        self.packages
            .lock()
            .unwrap()
            .insert(package.id, package.clone());
        Ok(package)
    }

    async fn update(&self, id: Uuid, req: &UpdatePackageRequest) -> CoreResult<Package> {
        let mut packages = self.packages.lock().unwrap();
        let package = packages.get_mut(&id).ok_or(CoreError::NotFound("package"))?;
        package.apply_update(req);
        Ok(package.clone())
    }

    async fn delete(&self, id: Uuid) -> CoreResult<()> {
        self.packages.lock().unwrap().remove(&id);
        self.dates.lock().unwrap().retain(|d| d.package_id != id);
        Ok(())
    }

    async fn add_available_date(
        &self,
        package_id: Uuid,
        date: NaiveDate,
    ) -> CoreResult<PackageAvailableDate> {
        let row = PackageAvailableDate {
            id: Uuid::new_v4(),
            package_id,
            available_date: date,
            current_bookings: 0,
            is_available: true,
        };
        self.dates.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn remove_available_date(&self, date_id: Uuid) -> CoreResult<()> {
        self.dates.lock().unwrap().retain(|d| d.id != date_id);
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for MemBackend {
    async fn create(
        &self,
        session: &AuthSession,
        req: &CreateBookingRequest,
    ) -> CoreResult<Booking> {
        let booking = Booking::new(session.user_id, req);

        self.bookings.lock().unwrap().push(booking.clone());

        let mut members = self.members.lock().unwrap();
        for member in &req.members {
            members.push(BookingMember {
                id: Uuid::new_v4(),
                booking_id: booking.id,
                name: member.name.clone(),
                phone: member.phone.clone(),
            });
        }

        // Counter bump keyed by package id, mirroring the store's SQL:
        // every date row of the package, not just the travel date's.
        let mut dates = self.dates.lock().unwrap();
        for date in dates.iter_mut().filter(|d| d.package_id == req.package_id) {
            date.current_bookings += 1;
        }

        Ok(booking)
    }

    async fn list_for_user(&self, user_id: Uuid) -> CoreResult<Vec<BookingDetails>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(self.join_details(bookings))
    }

    async fn list_all(&self) -> CoreResult<Vec<BookingDetails>> {
        let mut bookings: Vec<Booking> = self.bookings.lock().unwrap().clone();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(self.join_details(bookings))
    }

    async fn update_status(
        &self,
        id: Uuid,
        req: &UpdateBookingStatusRequest,
    ) -> CoreResult<Booking> {
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(CoreError::NotFound("booking"))?;

        booking.status = req.status;
        if let Some(notes) = &req.admin_notes {
            booking.admin_notes = Some(notes.clone());
        }
        if let Some(link) = &req.conversation_link {
            booking.conversation_link = Some(link.clone());
        }
        booking.updated_at = Utc::now();

        Ok(booking.clone())
    }
}

impl MemBackend {
    fn join_details(&self, bookings: Vec<Booking>) -> Vec<BookingDetails> {
        let packages = self.packages.lock().unwrap();
        let members = self.members.lock().unwrap();

        bookings
            .into_iter()
            .map(|booking| BookingDetails {
                package: packages.get(&booking.package_id).cloned(),
                members: members
                    .iter()
                    .filter(|m| m.booking_id == booking.id)
                    .cloned()
                    .collect(),
                booking,
            })
            .collect()
    }
}

#[async_trait]
impl ProfileRepository for MemBackend {
    async fn create(&self, req: &CreateProfileRequest) -> CoreResult<Profile> {
        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4(),
            username: req.username.clone(),
            phone: req.phone.clone(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        };
        self.profiles.lock().unwrap().push(profile.clone());
        Ok(profile)
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Profile>> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> CoreResult<Option<Profile>> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn list(&self) -> CoreResult<Vec<Profile>> {
        let mut profiles = self.profiles.lock().unwrap().clone();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }

    async fn update_role(&self, id: Uuid, role: Role) -> CoreResult<Profile> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::NotFound("profile"))?;
        profile.role = role;
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn test_state(backend: &Arc<MemBackend>) -> AppState {
    AppState {
        packages: backend.clone(),
        bookings: backend.clone(),
        profiles: backend.clone(),
        auth: AuthConfig {
            secret: TEST_SECRET.to_string(),
            expiration: 3600,
        },
    }
}

pub fn seed_profile(backend: &MemBackend, username: &str, role: Role) -> Profile {
    let now = Utc::now();
    let profile = Profile {
        id: Uuid::new_v4(),
        username: username.to_string(),
        phone: None,
        role,
        created_at: now,
        updated_at: now,
    };
    backend.profiles.lock().unwrap().push(profile.clone());
    profile
}

pub fn seed_package(backend: &MemBackend, title: &str, is_active: bool) -> Package {
    let mut package = Package::new(&CreatePackageRequest {
        title: title.to_string(),
        description: None,
        destination: "Annapurna".to_string(),
        price_per_head: 50_000_00,
        advance_amount: 10_000_00,
        duration_days: 7,
        start_date: None,
        end_date: None,
        max_capacity: 10,
        image_url: None,
        gallery: vec![],
        inclusions: vec![],
        facilities: vec![],
        itinerary: vec![],
        contact_phone: None,
        contact_email: None,
    });
    package.is_active = is_active;
    backend
        .packages
        .lock()
        .unwrap()
        .insert(package.id, package.clone());
    package
}

pub fn seed_date(
    backend: &MemBackend,
    package_id: Uuid,
    date: NaiveDate,
    is_available: bool,
) -> PackageAvailableDate {
    let row = PackageAvailableDate {
        id: Uuid::new_v4(),
        package_id,
        available_date: date,
        current_bookings: 0,
        is_available,
    };
    backend.dates.lock().unwrap().push(row.clone());
    row
}

pub fn seed_booking(
    backend: &MemBackend,
    user_id: Uuid,
    package_id: Uuid,
    status: BookingStatus,
    total_price: i64,
    advance_paid: i64,
    created_at: DateTime<Utc>,
) -> Booking {
    let booking = Booking {
        id: Uuid::new_v4(),
        user_id,
        package_id,
        travel_date: NaiveDate::from_ymd_opt(2026, 11, 5).unwrap(),
        group_name: "Ridge Runners".to_string(),
        member_count: 1,
        total_price,
        advance_paid,
        status,
        payment_status: PaymentStatus::AdvancePaid,
        admin_notes: None,
        conversation_link: None,
        created_at,
        updated_at: created_at,
    };
    backend.bookings.lock().unwrap().push(booking.clone());
    booking
}

pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(minutes)
}

pub fn bearer(profile: &Profile) -> String {
    let claims = Claims {
        sub: profile.id.to_string(),
        username: profile.username.clone(),
        role: profile.role.as_str().to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    format!("Bearer {}", token)
}

// ============================================================================
// Request helper
// ============================================================================

pub async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}
