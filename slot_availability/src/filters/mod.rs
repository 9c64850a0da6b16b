pub mod location;
pub mod recency;
