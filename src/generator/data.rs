pub(super) const UNTITLED: &str = "无标题";
pub(super) const NO_EXCERPT: &str = "暂无摘要";
pub(super) const DEFAULT_TAG: &str = "随笔";

pub(super) const EXCERPT_CHARS: usize = 150;
pub(super) const ELLIPSIS: &str = "...";

/// Keyword rules for posts without an explicit `tag:` line, in priority order.
pub(super) const TAG_RULES: &[(&[&str], &str)] = &[
    (&["技术", "代码", "编程"], "技术"),
    (&["生活", "日常"], "生活"),
];
