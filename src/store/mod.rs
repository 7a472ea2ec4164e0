pub mod import;
pub mod phrase_store;
pub mod schema;
