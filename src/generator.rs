use std::{
    path::{Component, Path, PathBuf},
    time::SystemTime,
};

use anyhow::{bail, Context as _};
use log::{debug, warn};

use crate::{
    context::Context,
    index::save_index,
    metadata::{IndexDocument, PostRecord},
};

mod data;
mod extract;

use extract::{extract_date, extract_excerpt, extract_tag, extract_title, generate_id};

fn is_markdown(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".md")
}

/// Markdown file names directly inside `posts_dir`, most recently modified first.
pub(crate) fn scan(posts_dir: &Path) -> anyhow::Result<Vec<String>> {
    if !posts_dir.is_dir() {
        bail!("posts directory {posts_dir:?} does not exist");
    }

    let mut files: Vec<(SystemTime, String)> = vec![];
    for entry in std::fs::read_dir(posts_dir)? {
        let entry = entry?;
        let Ok(file_name) = entry.file_name().into_string() else {
            warn!("skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        if !is_markdown(&file_name) {
            continue;
        }

        // follows symlinks, unlike DirEntry::metadata
        let meta = std::fs::metadata(entry.path())
            .with_context(|| format!("while reading metadata of {file_name:?}"))?;
        if !meta.is_file() {
            debug!("skipping {file_name:?}: not a regular file");
            continue;
        }
        files.push((meta.modified()?, file_name));
    }

    // same mtime: ordered by name so that reruns give the same index
    files.sort_by(|(a_time, a_name), (b_time, b_name)| {
        b_time.cmp(a_time).then_with(|| a_name.cmp(b_name))
    });

    Ok(files.into_iter().map(|(_, file_name)| file_name).collect())
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// `ctx.posts_dir` as seen from the directory holding the index.
fn posts_prefix(ctx: &Context) -> anyhow::Result<PathBuf> {
    let posts_dir = without_cur_dir(&ctx.posts_dir);
    let site_root = without_cur_dir(ctx.site_root());
    if posts_dir.is_absolute() == site_root.is_absolute() {
        if let Ok(rel) = posts_dir.strip_prefix(&site_root) {
            if rel.components().all(|c| matches!(c, Component::Normal(_))) {
                return Ok(rel.to_path_buf());
            }
        }
    }

    // mixed absolute/relative paths or `..` components
    let posts_dir = ctx
        .posts_dir
        .canonicalize()
        .with_context(|| format!("while resolving {:?}", ctx.posts_dir))?;
    let site_root = ctx
        .site_root()
        .canonicalize()
        .with_context(|| format!("while resolving {:?}", ctx.site_root()))?;
    match posts_dir.strip_prefix(&site_root) {
        Ok(rel) => Ok(rel.to_path_buf()),
        Err(_) => bail!(
            "posts directory {:?} is not inside {:?}, the directory of the index",
            ctx.posts_dir,
            ctx.site_root()
        ),
    }
}

fn build_record(ctx: &Context, prefix: &Path, file_name: &str) -> anyhow::Result<PostRecord> {
    let path = ctx.posts_dir.join(file_name);
    let content = std::fs::read_to_string(&path)?;

    let record = PostRecord {
        id: generate_id(file_name),
        title: extract_title(&content),
        excerpt: extract_excerpt(&content),
        date: extract_date(&path, file_name, &content)?,
        tag: extract_tag(&content),
        file: prefix.join(file_name).to_string_lossy().replace('\\', "/"),
    };
    if record.id.is_empty() {
        warn!("{file_name:?} produced an empty id");
    }

    println!("  ✓ {} ({})", record.title, record.date);
    Ok(record)
}

/// Scans `ctx.posts_dir` and overwrites `ctx.output` with the resulting index.
/// Nothing is written unless every post was processed.
pub(crate) fn generate(ctx: &Context) -> anyhow::Result<IndexDocument> {
    println!("🔍 扫描文章目录...");

    let files = scan(&ctx.posts_dir)?;
    println!("📄 找到 {} 篇文章", files.len());
    let prefix = posts_prefix(ctx)?;

    let mut posts = Vec::with_capacity(files.len());
    for file_name in files.iter() {
        let record = build_record(ctx, &prefix, file_name)
            .with_context(|| format!("while processing {file_name:?}"))?;
        posts.push(record);
    }

    let index = IndexDocument { posts };
    save_index(&ctx.output, &index)?;

    println!("\n✅ 已生成 {}", ctx.output.display());
    println!("📊 共 {} 篇文章", index.posts.len());

    Ok(index)
}
