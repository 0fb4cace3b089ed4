//! 客户端本地状态：已保存书目的持久化缓存。
//! 服务端不依赖这里的任何东西。

mod saved_books;
mod storage;

pub use saved_books::{SAVED_BOOKS_KEY, SavedBooks};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
