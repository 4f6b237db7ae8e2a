pub mod api;
pub mod data_store;
pub mod sequence;
pub mod summary;

pub use data_store::{DataStore, LoadState};
