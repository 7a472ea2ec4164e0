pub mod batch;
pub mod drill;
pub mod input;
pub mod view;
