pub mod auth;
pub mod comment;
pub mod review;
pub mod shared;
pub mod upload;
pub mod user;
pub mod wine;
