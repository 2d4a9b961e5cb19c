pub mod auth;
pub mod db;
pub mod utils;
pub mod web;
