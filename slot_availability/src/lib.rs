pub mod contracts;
pub mod filters;
pub mod slot;
