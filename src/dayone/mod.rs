pub mod generators;
pub mod paginate;
pub mod quirks;
pub mod serialize;
pub mod transform;
pub mod types;
