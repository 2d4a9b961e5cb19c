pub mod auth;
pub mod company;
pub mod experience;
pub mod extractors;

#[cfg(test)]
mod mocks;
