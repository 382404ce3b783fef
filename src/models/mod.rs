pub mod price;
pub mod snapshot;
