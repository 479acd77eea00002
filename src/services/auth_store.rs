//! 登录状态存储 - 业务能力层
//!
//! 只负责"读 / 写 auth 文件"能力，文件格式对其他模块不透明

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::AuthStoreError;
use crate::infrastructure::PageDriver;
use crate::models::AuthState;

/// 登录状态存储
///
/// 职责：
/// - 启动时读取一次登录状态，损坏 / 不可读视为不存在
/// - 结束时整体覆盖写入（先写临时文件再重命名，磁盘上永远是完整快照）
pub struct AuthStateStore {
    path: PathBuf,
}

impl AuthStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// 读取登录状态
    pub async fn load(&self) -> Option<AuthState> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("登录状态文件不存在: {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("⚠️ 无法读取登录状态文件 {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<AuthState>(&content) {
            Ok(state) => {
                info!(
                    "[AUTH] 已读取登录状态 {} ({} 个 cookie)",
                    self.path.display(),
                    state.cookies.len()
                );
                Some(state)
            }
            Err(e) => {
                warn!(
                    "⚠️ 登录状态文件已损坏，忽略 {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    /// 抓取当前会话并写入文件
    pub async fn save(&self, page: &dyn PageDriver) -> Result<(), AuthStoreError> {
        let state = page.snapshot().await?;
        self.write(&state).await
    }

    /// 把给定快照原子地写入文件
    pub async fn write(&self, state: &AuthState) -> Result<(), AuthStoreError> {
        let content = serde_json::to_string_pretty(state)?;
        let write_err = |source| AuthStoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, content).await.map_err(write_err)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(write_err(e));
        }

        debug!("登录状态已写入 {}", self.path.display());
        Ok(())
    }

    /// 尽力保存：失败只记录日志，返回是否成功
    pub async fn persist(&self, page: &dyn PageDriver) -> bool {
        match self.save(page).await {
            Ok(()) => {
                info!("[AUTH] 登录状态已保存/更新: {}", self.path.display());
                true
            }
            Err(e) => {
                warn!("[AUTH] ⚠️ 无法保存登录状态: {}", e);
                false
            }
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "auth_state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
