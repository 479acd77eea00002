use std::str::FromStr;

use crate::error::ConfigError;

/// 提交语言枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Python 3
    #[default]
    Python3,
    /// Python 2
    Python,
    /// C++
    Cpp,
    /// Java
    Java,
    /// C
    C,
    /// JavaScript
    JavaScript,
    /// TypeScript
    TypeScript,
    /// Go
    Go,
    /// Rust
    Rust,
}

impl Language {
    /// 获取标准标签（配置文件 / 命令行里使用的写法）
    pub fn tag(self) -> &'static str {
        match self {
            Language::Python3 => "python3",
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::C => "c",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Go => "go",
            Language::Rust => "rust",
        }
    }

    /// 语言下拉框中显示的名称：(首选, 备选)
    pub fn labels(self) -> (&'static str, &'static str) {
        match self {
            Language::Python3 => ("Python3", "Python"),
            Language::Python => ("Python", "Python2"),
            Language::Cpp => ("C++", "Cpp"),
            Language::Java => ("Java", "Java"),
            Language::C => ("C", "C"),
            Language::JavaScript => ("JavaScript", "Javascript"),
            Language::TypeScript => ("TypeScript", "Typescript"),
            Language::Go => ("Go", "Golang"),
            Language::Rust => ("Rust", "Rust"),
        }
    }
}

/// 从字符串解析语言（忽略大小写，支持常见别名）
impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python3" | "py3" | "py" => Ok(Language::Python3),
            "python" | "python2" | "py2" => Ok(Language::Python),
            "cpp" | "c++" | "cxx" => Ok(Language::Cpp),
            "java" => Ok(Language::Java),
            "c" => Ok(Language::C),
            "javascript" | "js" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "go" | "golang" => Ok(Language::Go),
            "rust" | "rs" => Ok(Language::Rust),
            _ => Err(ConfigError::UnknownLanguage(s.to_string())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.labels().0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("Python3".parse::<Language>().unwrap(), Language::Python3);
        assert_eq!(" c++ ".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("golang".parse::<Language>().unwrap(), Language::Go);
        assert!(matches!(
            "brainfuck".parse::<Language>(),
            Err(ConfigError::UnknownLanguage(tag)) if tag == "brainfuck"
        ));
    }

    #[test]
    fn test_default_is_python3_with_fallback_label() {
        let lang = Language::default();
        assert_eq!(lang.labels(), ("Python3", "Python"));
        assert_eq!(lang.tag().parse::<Language>().unwrap(), lang);
    }
}
