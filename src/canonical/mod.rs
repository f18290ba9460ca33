pub mod canonicalize;
pub mod error;
