pub mod package;

pub use package::{
    CreatePackageRequest, ItineraryDay, Package, PackageAvailableDate, UpdatePackageRequest,
};
