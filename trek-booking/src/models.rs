use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use trek_catalog::Package;
use uuid::Uuid;

/// Booking status in the lifecycle. A booking starts at `Pending`; only
/// an admin actor moves it to `Confirmed` or `Cancelled`, and the update
/// operation itself does not guard the transition (spelled out in
/// DESIGN.md).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

/// How much of the booking price has been collected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    AdvancePaid,
    FullyPaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::AdvancePaid => "advance_paid",
            PaymentStatus::FullyPaid => "fully_paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "advance_paid" => Ok(PaymentStatus::AdvancePaid),
            "fully_paid" => Ok(PaymentStatus::FullyPaid),
            other => Err(ModelError::UnknownPaymentStatus(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("unknown booking status: {0}")]
    UnknownStatus(String),

    #[error("unknown payment status: {0}")]
    UnknownPaymentStatus(String),
}

/// A user's reservation against a package for a travel date and group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub package_id: Uuid,
    pub travel_date: NaiveDate,
    pub group_name: String,
    pub member_count: i32,
    /// Total price in minor currency units, as supplied by the caller.
    pub total_price: i64,
    /// Advance collected in minor currency units, as supplied by the caller.
    pub advance_paid: i64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub admin_notes: Option<String>,
    pub conversation_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Build a fresh booking for the given user. Status starts at
    /// `Pending` with the advance recorded as paid.
    pub fn new(user_id: Uuid, req: &CreateBookingRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            package_id: req.package_id,
            travel_date: req.travel_date,
            group_name: req.group_name.clone(),
            member_count: req.member_count,
            total_price: req.total_price,
            advance_paid: req.advance_paid,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::AdvancePaid,
            admin_notes: None,
            conversation_link: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One named participant attached to a booking. Member rows are written
/// together with their booking and never independently mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingMember {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberInput {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub package_id: Uuid,
    pub travel_date: NaiveDate,
    pub group_name: String,
    pub member_count: i32,
    pub total_price: i64,
    #[serde(default)]
    pub advance_paid: i64,
    pub members: Vec<MemberInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
    pub admin_notes: Option<String>,
    pub conversation_link: Option<String>,
}

/// A booking joined with its package and member rows, the shape both
/// "my bookings" and the admin listing return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDetails {
    pub booking: Booking,
    /// None when the package was deleted out from under the booking.
    pub package: Option<Package>,
    pub members: Vec<BookingMember>,
}
