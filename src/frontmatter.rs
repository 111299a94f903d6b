use std::sync::LazyLock;

use regex::Regex;

// pandoc-style metadata block at the very start of the file
static FRONTMATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:.*?\r?\n)?---[ \t]*(?:\r?\n|\z)").unwrap()
});

/// Returns `content` without its leading `---` block (and the blank lines after it).
/// Content without a closed block is returned unchanged.
pub(crate) fn strip_frontmatter(content: &str) -> &str {
    match FRONTMATTER.find(content) {
        Some(m) => content[m.end()..].trim_start_matches(['\r', '\n']),
        None => content,
    }
}
