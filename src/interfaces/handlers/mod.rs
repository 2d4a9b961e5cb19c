pub mod auth;
pub mod companies;
pub mod experiences;
pub mod home;
pub mod system;
