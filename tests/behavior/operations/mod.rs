pub mod buckets;
pub mod download;
pub mod objects;
