pub mod path_model;
