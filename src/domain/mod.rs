pub mod entities;
pub mod password;
pub mod policy;
pub mod use_cases;
pub mod validation;
