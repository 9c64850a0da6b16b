pub mod contracts;
pub mod delivery;
pub mod idempotency;
