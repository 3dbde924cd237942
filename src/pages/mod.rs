pub mod investigation;
pub mod not_found;
