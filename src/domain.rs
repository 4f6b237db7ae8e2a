pub mod entities;
pub mod fallback;
pub mod use_cases;
