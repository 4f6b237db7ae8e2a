pub mod blog_post;
pub mod contact;
pub mod option_fields;
pub mod project;
pub mod resource;
pub mod skill;
