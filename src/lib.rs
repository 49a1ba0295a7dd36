pub mod cart;
pub mod error;
pub mod http;
pub mod mail;
pub mod model;
pub mod repository;
