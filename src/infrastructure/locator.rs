//! 元素定位器
//!
//! CSS 选择器无法表达"按文字"、"按角色"查找，这里统一编译成页面内执行的 JS，
//! 所有参数都以 JSON 字符串字面量嵌入，避免引号 / 反引号注入

use std::fmt;

use serde_json::Value as JsonValue;

/// 文字匹配时跳过的元素（内容不会显示在页面上）
const NON_RENDERED_TAGS: &str = "script, style, noscript, template";

/// 页面元素定位方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// CSS 选择器
    Css(String),
    /// 可见文字包含给定内容（忽略大小写）的最内层已渲染元素
    Text(String),
    /// ARIA 角色 + 可访问名称（忽略大小写，优先完全相同，没有时再按包含匹配）
    Role { role: String, name: String },
    /// 匹配 CSS 且文字包含给定内容
    CssWithText { css: String, text: String },
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Locator::Text(text.into())
    }

    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Locator::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    pub fn css_with_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Locator::CssWithText {
            css: css.into(),
            text: text.into(),
        }
    }

    /// 返回一个求值为 `Element[]` 的 JS 表达式
    pub fn to_js(&self) -> String {
        match self {
            Locator::Css(css) => format!(
                "Array.from(document.querySelectorAll({}))",
                js_string(css)
            ),
            Locator::Text(text) => format!(
                r#"(() => {{
                    const needle = {needle}.toLowerCase();
                    const shown = el => !el.closest({hidden}) && el.getClientRects().length > 0;
                    const hit = el => shown(el)
                        && (el.innerText || '').replace(/\s+/g, ' ').toLowerCase().includes(needle);
                    return Array.from(document.querySelectorAll('body *'))
                        .filter(el => hit(el) && !Array.from(el.children).some(hit));
                }})()"#,
                needle = js_string(text),
                hidden = js_string(NON_RENDERED_TAGS)
            ),
            Locator::Role { role, name } => format!(
                r#"(() => {{
                    const role = {role};
                    const needle = {name}.replace(/\s+/g, ' ').trim().toLowerCase();
                    const implicit = {{
                        button: 'button, input[type="button"], input[type="submit"]',
                        option: 'option',
                        link: 'a[href]',
                        textbox: 'input:not([type]), input[type="text"], input[type="email"], textarea',
                    }};
                    const selector = '[role="' + role + '"]' + (implicit[role] ? ', ' + implicit[role] : '');
                    const label = el => (el.getAttribute('aria-label') || el.innerText || el.value || '')
                        .replace(/\s+/g, ' ').trim().toLowerCase();
                    const candidates = Array.from(document.querySelectorAll(selector));
                    const exact = candidates.filter(el => label(el) === needle);
                    return exact.length > 0 ? exact : candidates.filter(el => label(el).includes(needle));
                }})()"#,
                role = js_string(role),
                name = js_string(name)
            ),
            Locator::CssWithText { css, text } => format!(
                r#"Array.from(document.querySelectorAll({css}))
                    .filter(el => (el.innerText || el.value || '').toLowerCase().includes({needle}.toLowerCase()))"#,
                css = js_string(css),
                needle = js_string(text)
            ),
        }
    }

    /// 统计匹配数量的脚本
    pub fn count_script(&self) -> String {
        format!("({}).length", self.to_js())
    }

    /// 点击第一个匹配元素的脚本，返回是否找到
    pub fn click_script(&self) -> String {
        format!(
            r#"(() => {{
                const el = ({})[0];
                if (!el) return false;
                el.scrollIntoView({{ block: 'center' }});
                el.click();
                return true;
            }})()"#,
            self.to_js()
        )
    }

    /// 给第一个匹配的输入框赋值并触发 input / change 事件，返回是否找到
    pub fn fill_script(&self, value: &str) -> String {
        format!(
            r#"(() => {{
                const el = ({})[0];
                if (!el) return false;
                el.focus();
                const proto = el.tagName === 'TEXTAREA' ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype;
                const setter = Object.getOwnPropertyDescriptor(proto, 'value');
                if (setter && setter.set) {{ setter.set.call(el, {value}); }} else {{ el.value = {value}; }}
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            self.to_js(),
            value = js_string(value)
        )
    }

    /// 第一个匹配元素的可见文字，找不到时为 null
    pub fn inner_text_script(&self) -> String {
        format!(
            r#"(() => {{
                const el = ({})[0];
                return el ? (el.innerText || '') : null;
            }})()"#,
            self.to_js()
        )
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(css) => write!(f, "{}", css),
            Locator::Text(text) => write!(f, "text={}", text),
            Locator::Role { role, name } => write!(f, "role={}[name={}]", role, name),
            Locator::CssWithText { css, text } => write!(f, "{}:has-text({})", css, text),
        }
    }
}

/// 把任意文本编码为 JS 字符串字面量
pub fn js_string(s: &str) -> String {
    JsonValue::String(s.to_string()).to_string()
}
