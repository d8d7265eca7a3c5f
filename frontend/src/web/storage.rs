//! LocalStorage 封装模块
//!
//! 会话以原始字符串写入（不做 JSON 编码），与其他标签页 / 旧版本客户端保持兼容。

use brickwall::KeyValueStore;
use gloo_storage::{LocalStorage, Storage};

/// 浏览器本地存储
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if LocalStorage::raw().set_item(key, value).is_err() {
            brickwall::log_error!("[Storage] Failed to write {}", key);
        }
    }

    fn remove(&self, key: &str) {
        LocalStorage::delete(key);
    }
}
