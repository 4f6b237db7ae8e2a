use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const API_PREFIX: &str = "/api/v1";
pub const CONTACT_TABLE: &str = "contact_submissions";
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;
