use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One day of a package itinerary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItineraryDay {
    pub day: i32,
    pub title: String,
    pub activities: Vec<String>,
}

/// A sellable trek offering with price, capacity, and itinerary metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub destination: String,
    /// Price per participant, in minor currency units.
    pub price_per_head: i64,
    /// Advance payable at booking time, in minor currency units.
    pub advance_amount: i64,
    pub duration_days: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_capacity: i32,
    pub image_url: Option<String>,
    pub gallery: Vec<String>,
    pub inclusions: Vec<String>,
    pub facilities: Vec<String>,
    pub itinerary: Vec<ItineraryDay>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    /// Soft-deactivation flag; inactive packages are hidden from the
    /// public catalog but keep their rows.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Package {
    pub fn new(req: &CreatePackageRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: req.title.clone(),
            description: req.description.clone(),
            destination: req.destination.clone(),
            price_per_head: req.price_per_head,
            advance_amount: req.advance_amount,
            duration_days: req.duration_days,
            start_date: req.start_date,
            end_date: req.end_date,
            max_capacity: req.max_capacity,
            image_url: req.image_url.clone(),
            gallery: req.gallery.clone(),
            inclusions: req.inclusions.clone(),
            facilities: req.facilities.clone(),
            itinerary: req.itinerary.clone(),
            contact_phone: req.contact_phone.clone(),
            contact_email: req.contact_email.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update; absent fields keep their current value.
    pub fn apply_update(&mut self, req: &UpdatePackageRequest) {
        if let Some(title) = &req.title {
            self.title = title.clone();
        }
        if let Some(description) = &req.description {
            self.description = Some(description.clone());
        }
        if let Some(destination) = &req.destination {
            self.destination = destination.clone();
        }
        if let Some(price) = req.price_per_head {
            self.price_per_head = price;
        }
        if let Some(advance) = req.advance_amount {
            self.advance_amount = advance;
        }
        if let Some(days) = req.duration_days {
            self.duration_days = days;
        }
        if let Some(start) = req.start_date {
            self.start_date = Some(start);
        }
        if let Some(end) = req.end_date {
            self.end_date = Some(end);
        }
        if let Some(capacity) = req.max_capacity {
            self.max_capacity = capacity;
        }
        if let Some(url) = &req.image_url {
            self.image_url = Some(url.clone());
        }
        if let Some(gallery) = &req.gallery {
            self.gallery = gallery.clone();
        }
        if let Some(inclusions) = &req.inclusions {
            self.inclusions = inclusions.clone();
        }
        if let Some(facilities) = &req.facilities {
            self.facilities = facilities.clone();
        }
        if let Some(itinerary) = &req.itinerary {
            self.itinerary = itinerary.clone();
        }
        if let Some(phone) = &req.contact_phone {
            self.contact_phone = Some(phone.clone());
        }
        if let Some(email) = &req.contact_email {
            self.contact_email = Some(email.clone());
        }
        if let Some(active) = req.is_active {
            self.is_active = active;
        }
        self.updated_at = Utc::now();
    }
}

/// A calendar date a package can be booked on, with its own running
/// counter of bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageAvailableDate {
    pub id: Uuid,
    pub package_id: Uuid,
    pub available_date: NaiveDate,
    pub current_bookings: i32,
    pub is_available: bool,
}

impl PackageAvailableDate {
    /// Whether this date is shown to customers: flagged available and
    /// not in the past.
    pub fn is_open(&self, today: NaiveDate) -> bool {
        self.is_available && self.available_date >= today
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePackageRequest {
    pub title: String,
    pub description: Option<String>,
    pub destination: String,
    pub price_per_head: i64,
    #[serde(default)]
    pub advance_amount: i64,
    pub duration_days: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_capacity: i32,
    pub image_url: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePackageRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub destination: Option<String>,
    pub price_per_head: Option<i64>,
    pub advance_amount: Option<i64>,
    pub duration_days: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_capacity: Option<i32>,
    pub image_url: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub inclusions: Option<Vec<String>>,
    pub facilities: Option<Vec<String>>,
    pub itinerary: Option<Vec<ItineraryDay>>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: Option<bool>,
}
