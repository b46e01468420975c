pub mod cs_group;
pub mod user;
