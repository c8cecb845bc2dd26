pub mod availability;
pub mod catalog;
pub mod presentation;
pub mod recommendations;

pub use availability::AvailabilityTable;
pub use catalog::{MovieCatalog, TmdbClient};
