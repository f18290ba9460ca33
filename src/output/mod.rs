pub mod bindings;
pub mod error;
pub mod flow;
pub mod interview;
pub mod review;
pub mod screens;
