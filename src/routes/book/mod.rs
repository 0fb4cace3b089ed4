mod handler;
mod model;

pub use handler::{remove_book, save_book};
pub use model::SavedBook;
