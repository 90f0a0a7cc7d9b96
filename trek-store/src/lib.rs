pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod package_repo;
pub mod profile_repo;

pub use booking_repo::PgBookingRepository;
pub use database::DbClient;
pub use package_repo::PgPackageRepository;
pub use profile_repo::PgProfileRepository;
