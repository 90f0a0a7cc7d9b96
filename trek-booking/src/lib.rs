pub mod metrics;
pub mod models;

pub use metrics::DashboardMetrics;
pub use models::{
    Booking, BookingDetails, BookingMember, BookingStatus, CreateBookingRequest, MemberInput,
    PaymentStatus, UpdateBookingStatusRequest,
};
