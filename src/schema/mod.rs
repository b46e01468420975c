pub mod auth;
pub mod common;
pub mod cs_group;
