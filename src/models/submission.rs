use std::fmt::Display;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ConfigError;
use crate::models::Language;

/// 一次提交请求
///
/// 源码是不透明文本，不做任何解析和校验
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    /// 题目标识（URL 中的 slug，如 `two-sum`）
    pub slug: String,
    /// 源码
    pub code: String,
    /// 提交语言
    pub language: Language,
}

impl SubmissionRequest {
    /// 创建提交请求，slug 会被校验（它会直接拼进 URL）
    pub fn new(
        slug: impl Into<String>,
        code: impl Into<String>,
        language: Language,
    ) -> Result<Self, ConfigError> {
        let slug = slug.into();
        if !slug_pattern().is_match(&slug) {
            return Err(ConfigError::InvalidSlug(slug));
        }
        Ok(Self {
            slug,
            code: code.into(),
            language,
        })
    }

    /// 题目页面地址
    pub fn problem_url(&self, site_url: &str) -> String {
        problem_url(site_url, &self.slug)
    }
}

impl Display for SubmissionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[题目 {} 语言 {} 代码 {} 字节]",
            self.slug,
            self.language.tag(),
            self.code.len()
        )
    }
}

pub fn problem_url(site_url: &str, slug: &str) -> String {
    format!("{}/problems/{}/", site_url.trim_end_matches('/'), slug)
}

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex"))
}
