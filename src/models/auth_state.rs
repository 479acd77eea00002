//! 登录状态（浏览器会话快照）与账号凭据

use std::fmt;

use serde::{Deserialize, Serialize};

/// 浏览器会话快照：cookie + 各 origin 的 localStorage
///
/// 字段布局与 Playwright 的 `storage_state` 文件兼容，旧的 auth 文件可以直接复用
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    #[serde(default)]
    pub cookies: Vec<StoredCookie>,
    #[serde(default)]
    pub origins: Vec<OriginStorage>,
}

impl AuthState {
    /// 合并同一 origin 的 localStorage，后写入的覆盖先写入的
    pub fn upsert_origin(&mut self, storage: OriginStorage) {
        match self.origins.iter_mut().find(|o| o.origin == storage.origin) {
            Some(existing) => *existing = storage,
            None => self.origins.push(storage),
        }
    }
}

/// 单个 cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default = "default_cookie_path")]
    pub path: String,
    /// 过期时间（秒级 Unix 时间戳），-1 表示会话 cookie
    #[serde(default = "session_expiry")]
    pub expires: f64,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

impl StoredCookie {
    pub fn is_session(&self) -> bool {
        self.expires <= 0.0
    }
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn session_expiry() -> f64 {
    -1.0
}

/// 某个 origin 下的 localStorage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginStorage {
    pub origin: String,
    #[serde(rename = "localStorage", default)]
    pub local_storage: Vec<StorageEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub name: String,
    pub value: String,
}

/// 登录凭据，只来自环境变量，永远不落盘
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// 两个值都存在且非空时才构造
    pub fn from_parts(identifier: Option<String>, secret: Option<String>) -> Option<Self> {
        match (identifier, secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some(Self::new(id, secret))
            }
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_playwright_storage_state() {
        let raw = r#"{
            "cookies": [
                {"name": "LEETCODE_SESSION", "value": "abc", "domain": ".leetcode.com",
                 "path": "/", "expires": -1, "httpOnly": true, "secure": true, "sameSite": "Lax"},
                {"name": "csrftoken", "value": "xyz", "domain": "leetcode.com"}
            ],
            "origins": [
                {"origin": "https://leetcode.com",
                 "localStorage": [{"name": "theme", "value": "dark"}]}
            ]
        }"#;

        let state: AuthState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.cookies.len(), 2);
        assert!(state.cookies[0].http_only);
        assert!(state.cookies[0].is_session());
        assert_eq!(state.cookies[1].path, "/");
        assert_eq!(state.origins[0].local_storage[0].value, "dark");
    }

    #[test]
    fn test_upsert_origin_replaces_existing() {
        let mut state = AuthState::default();
        state.upsert_origin(OriginStorage {
            origin: "https://leetcode.com".into(),
            local_storage: vec![],
        });
        state.upsert_origin(OriginStorage {
            origin: "https://leetcode.com".into(),
            local_storage: vec![StorageEntry {
                name: "k".into(),
                value: "v".into(),
            }],
        });
        assert_eq!(state.origins.len(), 1);
        assert_eq!(state.origins[0].local_storage.len(), 1);
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = Credentials::new("me@example.com", "hunter2");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("me@example.com"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_credentials_require_both_parts() {
        assert!(Credentials::from_parts(Some("a".into()), None).is_none());
        assert!(Credentials::from_parts(Some("a".into()), Some(String::new())).is_none());
        assert!(Credentials::from_parts(Some("a".into()), Some("b".into())).is_some());
    }
}
