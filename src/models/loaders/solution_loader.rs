use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

use crate::config::Config;

/// 默认的解答文件位置：`<problems_dir>/<slug>/solution.py`
pub fn default_solution_path(config: &Config, slug: &str) -> PathBuf {
    config.problems_dir.join(slug).join("solution.py")
}

/// 读取解答文件内容
///
/// 文件不存在时直接报错，此时还没有启动浏览器
pub async fn load_solution(solution_path: &Path) -> Result<String> {
    if !fs::try_exists(solution_path).await.unwrap_or(false) {
        anyhow::bail!(
            "解答文件不存在: {}（请先编辑 solution.py）",
            solution_path.display()
        );
    }

    let code = fs::read_to_string(solution_path)
        .await
        .with_context(|| format!("无法读取解答文件: {}", solution_path.display()))?;

    tracing::debug!(
        "已读取解答文件 {} ({} 字节)",
        solution_path.display(),
        code.len()
    );

    Ok(code)
}
