pub mod company;
pub mod experience;
pub mod sqlx_repo;
pub mod token;
pub mod user;
