//! 会话模块
//!
//! 会话由两个持久化字符串组成：`token` 与 `userEmail`。
//! 任意一个缺失（或为空字符串）都视为"没有会话"。

use brickwall_shared::{STORAGE_EMAIL_KEY, STORAGE_TOKEN_KEY};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// =========================================================
// 存储抽象 (Key/Value Storage)
// =========================================================

/// 持久化键值存储
///
/// 浏览器中由 LocalStorage 实现。存储操作视为总是成功，
/// 配额 / 权限类失败属于环境错误，不在这里恢复。
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// 内存键值存储
///
/// 克隆出的实例共享同一份数据，方便在测试中从外部观察网关对会话的修改。
#[derive(Clone, Default, Debug)]
pub struct MemoryStore {
    map: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.map.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.map.borrow_mut().remove(key);
    }
}

// =========================================================
// 会话 (Session)
// =========================================================

/// 客户端持有的认证凭据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub email: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            email: Some(email.into()),
        }
    }

    /// token 与 email 同时存在才算有效会话
    pub fn is_active(&self) -> bool {
        self.token.is_some() && self.email.is_some()
    }

    /// `Authorization` 头的值
    pub fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }
}

/// 会话存储
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 读取会话；任一字段缺失时返回空会话
    pub fn load(&self) -> Session {
        let read = |key: &str| self.storage.get(key).filter(|v| !v.is_empty());
        match (read(STORAGE_TOKEN_KEY), read(STORAGE_EMAIL_KEY)) {
            (Some(token), Some(email)) => Session::new(token, email),
            _ => Session::default(),
        }
    }

    /// 保存会话，只应在认证成功后调用
    pub fn save(&self, token: &str, email: &str) {
        self.storage.set(STORAGE_TOKEN_KEY, token);
        self.storage.set(STORAGE_EMAIL_KEY, email);
        log_info!("[Session] Saved session for {}", email);
    }

    /// 清除会话（幂等）
    pub fn clear(&self) {
        self.storage.remove(STORAGE_TOKEN_KEY);
        self.storage.remove(STORAGE_EMAIL_KEY);
        log_info!("[Session] Cleared");
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
