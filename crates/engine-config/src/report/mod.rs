pub mod step;
pub mod summary;
