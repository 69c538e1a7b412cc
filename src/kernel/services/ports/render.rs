//! 渲染协作者：markdown -> HTML，代码块高亮

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    Malformed(String),
    Highlight(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Malformed(msg) => write!(f, "Malformed markdown: {}", msg),
            RenderError::Highlight(msg) => write!(f, "Highlight failed: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

pub trait MarkdownRenderer: Send {
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}

pub trait Highlighter: Send {
    fn supports(&self, language: &str) -> bool;

    fn highlight(&self, code: &str, language: &str) -> Result<String, RenderError>;

    fn highlight_auto(&self, code: &str) -> Result<String, RenderError>;
}
