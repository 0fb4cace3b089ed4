use serde::{Deserialize, Serialize};

/// 保存到用户账户的书目条目，字段与外部图书目录的检索结果对应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedBook {
    pub book_id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub link: String,
}
