use std::path::{Path, PathBuf};

pub(crate) const DEFAULT_POSTS_DIR: &str = "posts";
pub(crate) const DEFAULT_OUTPUT: &str = "posts.json";
pub(crate) const DEFAULT_BLOG_NAME: &str = "我的博客";

#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub posts_dir: PathBuf,
    pub output: PathBuf,

    pub blog_name: String,
}

impl Context {
    pub fn new(posts_dir: PathBuf, output: PathBuf, blog_name: String) -> Self {
        Self {
            posts_dir,
            output,
            blog_name,
        }
    }

    /// Directory holding the index. `file` entries of the index are relative to it.
    pub fn site_root(&self) -> &Path {
        match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}
