pub mod book;
pub mod user;
