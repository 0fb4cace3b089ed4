use super::storage::KeyValueStore;

/// 存储槽位名，整份列表作为一个值读写
pub const SAVED_BOOKS_KEY: &str = "saved_books";

/// 已保存书目ID的本地缓存。
///
/// 用于在页面刷新之间记住哪些书已经保存过，禁用重复的保存操作。
/// 每次变更都整体覆写存储，最后写入者生效；不做淘汰，也不设上限。
pub struct SavedBooks<S: KeyValueStore> {
    store: S,
    ids: Vec<String>,
    dirty: bool,
}

impl<S: KeyValueStore> SavedBooks<S> {
    /// 从存储槽位加载；槽位缺失或内容不可解析时从空集开始
    pub fn load(store: S) -> Self {
        let ids = store
            .read(SAVED_BOOKS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        SavedBooks {
            store,
            ids,
            dirty: false,
        }
    }

    pub fn contains(&self, book_id: &str) -> bool {
        self.ids.iter().any(|id| id == book_id)
    }

    /// 记录一个新保存的ID，保持插入顺序并去重
    pub fn insert(&mut self, book_id: impl Into<String>) {
        let book_id = book_id.into();
        if self.contains(&book_id) {
            return;
        }
        self.ids.push(book_id);
        self.dirty = true;
        self.flush();
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// 将当前列表整体覆写进存储
    pub fn flush(&mut self) {
        if let Ok(raw) = serde_json::to_string(&self.ids) {
            self.store.write(SAVED_BOOKS_KEY, &raw);
            self.dirty = false;
        }
    }
}

impl<S: KeyValueStore> Drop for SavedBooks<S> {
    fn drop(&mut self) {
        if self.dirty {
            self.flush();
        }
    }
}
