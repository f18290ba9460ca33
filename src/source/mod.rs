pub mod doc_error;
pub mod reference;
