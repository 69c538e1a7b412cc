//! 状态栏统计：字数、大小、光标位置

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub chars: usize,
    pub non_whitespace_chars: usize,
    pub bytes: usize,
    pub lines: usize,
}

impl DocumentStats {
    pub fn of(text: &str) -> Self {
        let mut chars = 0;
        let mut non_whitespace_chars = 0;
        for ch in text.chars() {
            chars += 1;
            if !ch.is_whitespace() {
                non_whitespace_chars += 1;
            }
        }

        Self {
            chars,
            non_whitespace_chars,
            bytes: text.len(),
            lines: text.split('\n').count(),
        }
    }
}

pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// 1-based (行, 列)，列按字符计数。越界的偏移会被收回到最近的字符边界
pub fn cursor_position(text: &str, byte_offset: usize) -> (usize, usize) {
    let mut offset = byte_offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[cfg(test)]
#[path = "../../tests/unit/models/stats.rs"]
mod tests;
