//! 预览与导出
//!
//! 渲染失败不会阻塞编辑：预览退化为转义后的原文，代码块退化为自动识别或纯文本。

use crate::kernel::services::ports::{Highlighter, MarkdownRenderer};
use crate::models::UNTITLED_FILE_NAME;

pub const WELCOME_HTML: &str = "<div class=\"welcome\">\
<h1>Welcome to mdpad</h1>\
<p>Open a markdown file or start typing to see the preview here.</p>\
</div>";

const EXPORT_STYLE: &str = "body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; max-width: 800px; margin: 0 auto; padding: 20px; }
h1, h2 { border-bottom: 1px solid #eee; padding-bottom: 8px; }
code { background-color: #f4f4f4; padding: 2px 4px; border-radius: 3px; }
pre { background-color: #f4f4f4; padding: 16px; border-radius: 6px; overflow-x: auto; }
blockquote { border-left: 4px solid #ddd; margin: 0; padding-left: 16px; color: #666; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ddd; padding: 8px 12px; text-align: left; }";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn raw_block(text: &str) -> String {
    format!("<pre>{}</pre>", escape_html(text))
}

fn render_body(renderer: Option<&dyn MarkdownRenderer>, text: &str) -> String {
    let Some(renderer) = renderer else {
        return raw_block(text);
    };
    match renderer.render(text) {
        Ok(html) => html,
        Err(e) => {
            tracing::debug!(error = %e, "render failed, falling back to raw text");
            raw_block(text)
        }
    }
}

/// 空白文档显示欢迎页
pub fn render_preview(renderer: Option<&dyn MarkdownRenderer>, text: &str) -> String {
    if text.trim().is_empty() {
        return WELCOME_HTML.to_string();
    }
    render_body(renderer, text)
}

/// 提示的语言受支持且高亮成功时使用它，否则自动识别，再失败就输出转义后的代码
pub fn highlight_code(highlighter: &dyn Highlighter, code: &str, hint: Option<&str>) -> String {
    let hint = hint.map(str::trim).filter(|h| !h.is_empty());
    if let Some(lang) = hint.filter(|lang| highlighter.supports(lang)) {
        match highlighter.highlight(code, lang) {
            Ok(html) => return html,
            Err(e) => tracing::debug!(lang, error = %e, "highlight failed"),
        }
    }
    match highlighter.highlight_auto(code) {
        Ok(html) => html,
        Err(e) => {
            tracing::debug!(error = %e, "auto highlight failed");
            escape_html(code)
        }
    }
}

/// 完整的独立 HTML 文档
pub fn export_html(renderer: Option<&dyn MarkdownRenderer>, title: &str, text: &str) -> String {
    let body = render_body(renderer, text);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
<title>{}</title>\n<style>\n{}\n</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        EXPORT_STYLE,
        body
    )
}

/// `notes/a.md` -> `notes/a.html`；没有 markdown 扩展名时直接追加 `.html`
pub fn export_file_name(identity: Option<&str>) -> String {
    let identity = identity.unwrap_or(UNTITLED_FILE_NAME);
    let lower = identity.to_ascii_lowercase();
    for ext in [".markdown", ".md"] {
        if lower.ends_with(ext) {
            let stem = &identity[..identity.len() - ext.len()];
            return format!("{}.html", stem);
        }
    }
    format!("{}.html", identity)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/preview.rs"]
mod tests;
