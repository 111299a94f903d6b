use std::{path::Path, sync::LazyLock};

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use regex::Regex;

use crate::frontmatter::strip_frontmatter;

use super::data::{DEFAULT_TAG, ELLIPSIS, EXCERPT_CHARS, NO_EXCERPT, TAG_RULES, UNTITLED};

static TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(.+)$").unwrap());
static TITLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+.*(?:\n|\z)").unwrap());
static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t\r]*\n").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());

static DATE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"date:\s*([0-9]{4}-[0-9]{2}-[0-9]{2})").unwrap());
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").unwrap());
static TAG_FIELD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"tag:\s*(.+)").unwrap());

static MD_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\.md$").unwrap());
static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}-").unwrap());
static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\x{4E00}-\x{9FA5}]+").unwrap());

/// Text of the first `# ` heading, or the untitled placeholder.
pub(crate) fn extract_title(content: &str) -> String {
    TITLE
        .captures_iter(content)
        .map(|caps| caps[1].trim().to_string())
        .find(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Plain text of the first body paragraph, cut to 150 characters and suffixed with `...`.
pub(crate) fn extract_excerpt(content: &str) -> String {
    let body = strip_frontmatter(content);
    let body = TITLE_LINE.replacen(body, 1, "");

    for paragraph in BLANK_LINE.split(&body) {
        let trimmed = paragraph.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("```") {
            continue;
        }

        let plain = trimmed.replace("**", "").replace(['*', '`'], "");
        let plain = LINK.replace_all(&plain, "$1");

        let mut excerpt: String = plain.chars().take(EXCERPT_CHARS).collect();
        excerpt.push_str(ELLIPSIS);
        return excerpt;
    }

    NO_EXCERPT.to_string()
}

fn first_valid_date<'a>(candidates: impl Iterator<Item = &'a str>) -> Option<NaiveDate> {
    candidates
        .filter_map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .next()
}

/// `date:` line, then a date in the file name, then the UTC date of the file's mtime.
pub(crate) fn extract_date(
    file_path: &Path,
    file_name: &str,
    content: &str,
) -> anyhow::Result<NaiveDate> {
    let from_content = DATE_FIELD
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()));
    if let Some(date) = first_valid_date(from_content) {
        return Ok(date);
    }

    if let Some(date) = first_valid_date(DATE.find_iter(file_name).map(|m| m.as_str())) {
        debug!("{file_name}: date taken from the file name");
        return Ok(date);
    }

    let modified = file_path
        .metadata()
        .and_then(|m| m.modified())
        .with_context(|| format!("while reading mtime of {file_path:?}"))?;
    debug!("{file_name}: date taken from mtime");
    Ok(DateTime::<Utc>::from(modified).date_naive())
}

/// Explicit `tag:` line, else the first keyword rule that matches, else the default tag.
pub(crate) fn extract_tag(content: &str) -> String {
    if let Some(tag) = TAG_FIELD
        .captures_iter(content)
        .map(|caps| caps[1].trim().to_string())
        .find(|tag| !tag.is_empty())
    {
        return tag;
    }

    TAG_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| content.contains(k)))
        .map_or(DEFAULT_TAG, |&(_, tag)| tag)
        .to_string()
}

/// URL-safe slug of a post file name.
pub(crate) fn generate_id(file_name: &str) -> String {
    let stem = MD_SUFFIX.replace(file_name, "");
    let stem = DATE_PREFIX.replace(&stem, "");
    let lower = stem.to_lowercase();
    NON_SLUG
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}
