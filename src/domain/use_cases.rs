pub mod contact;
pub mod resources;
