use std::fmt;

/// 判题结果
///
/// `Unknown` 是合法的终态：提交已尝试，但页面上没有识别到结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Accepted,
    WrongAnswer,
    RuntimeError,
    Unknown,
}

impl Verdict {
    /// 全文扫描时的匹配顺序，先匹配者优先
    pub const SCAN_PRIORITY: [Verdict; 3] =
        [Verdict::Accepted, Verdict::WrongAnswer, Verdict::RuntimeError];

    /// 页面上对应的文字
    pub fn marker(self) -> Option<&'static str> {
        match self {
            Verdict::Accepted => Some("Accepted"),
            Verdict::WrongAnswer => Some("Wrong Answer"),
            Verdict::RuntimeError => Some("Runtime Error"),
            Verdict::Unknown => None,
        }
    }

    /// 按优先级扫描一次页面文字
    pub fn classify_text(text: &str) -> Verdict {
        Self::SCAN_PRIORITY
            .into_iter()
            .find(|v| v.marker().is_some_and(|m| text.contains(m)))
            .unwrap_or(Verdict::Unknown)
    }

    pub fn is_detected(self) -> bool {
        self != Verdict::Unknown
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.marker() {
            Some(marker) => f.write_str(marker),
            None => f.write_str("Unknown"),
        }
    }
}
