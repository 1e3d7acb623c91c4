// Public library interface for coinflow-backend
pub mod api;
pub mod records;
pub mod schema;
pub mod store;
pub mod utils;
