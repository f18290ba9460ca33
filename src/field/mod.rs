pub mod classifier;
pub mod consolidate;
pub mod field_model;
pub mod parent;
pub mod people;
