use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::routes::book::SavedBook;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub saved_books: Vec<SavedBook>,
}

impl User {
    pub fn book_count(&self) -> usize {
        self.saved_books.len()
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

pub enum RemoveBook {
    Removed(User),
    NotSaved,
    NoSuchUser,
}

/// 内存用户表，按用户ID索引
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<HashMap<String, User>>,
}

impl UserStore {
    pub fn find_by_id(&self, user_id: &str) -> Option<User> {
        self.users
            .read()
            .expect("user store lock poisoned")
            .get(user_id)
            .cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .expect("user store lock poisoned")
            .values()
            .find(|user| user.email == email)
            .cloned()
    }

    /// 用户名或邮箱任一已被占用即拒绝，返回 None
    pub fn insert(&self, user: User) -> Option<User> {
        let mut users = self.users.write().expect("user store lock poisoned");
        let taken = users
            .values()
            .any(|existing| existing.username == user.username || existing.email == user.email);
        if taken {
            return None;
        }
        users.insert(user.user_id.clone(), user.clone());
        Some(user)
    }

    /// 追加一条保存的书目，按 book_id 去重
    pub fn save_book(&self, user_id: &str, book: SavedBook) -> Option<User> {
        let mut users = self.users.write().expect("user store lock poisoned");
        let user = users.get_mut(user_id)?;
        if !user.saved_books.iter().any(|b| b.book_id == book.book_id) {
            user.saved_books.push(book);
        }
        Some(user.clone())
    }

    pub fn remove_book(&self, user_id: &str, book_id: &str) -> RemoveBook {
        let mut users = self.users.write().expect("user store lock poisoned");
        let Some(user) = users.get_mut(user_id) else {
            return RemoveBook::NoSuchUser;
        };
        let before = user.saved_books.len();
        user.saved_books.retain(|b| b.book_id != book_id);
        if user.saved_books.len() == before {
            return RemoveBook::NotSaved;
        }
        RemoveBook::Removed(user.clone())
    }
}
