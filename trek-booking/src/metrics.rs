use crate::models::{Booking, BookingStatus};
use serde::{Deserialize, Serialize};

/// Derived dashboard aggregates over the full booking set. Computed on
/// demand in a single pass and never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardMetrics {
    pub total_bookings: i64,
    pub pending_bookings: i64,
    pub confirmed_bookings: i64,
    pub cancelled_bookings: i64,
    /// Sum of `total_price` over confirmed bookings only.
    pub total_revenue: i64,
    /// Sum of `advance_paid` over every booking, cancelled included.
    pub advance_revenue: i64,
}

impl DashboardMetrics {
    pub fn compute(bookings: &[Booking]) -> Self {
        let mut metrics = DashboardMetrics::default();

        for booking in bookings {
            metrics.total_bookings += 1;
            metrics.advance_revenue += booking.advance_paid;

            match booking.status {
                BookingStatus::Pending => metrics.pending_bookings += 1,
                BookingStatus::Confirmed => {
                    metrics.confirmed_bookings += 1;
                    metrics.total_revenue += booking.total_price;
                }
                BookingStatus::Cancelled => metrics.cancelled_bookings += 1,
            }
        }

        metrics
    }
}
