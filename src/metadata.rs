use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One entry of `posts.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct PostRecord {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub date: NaiveDate,
    pub tag: String,
    /// path of the markdown source, always with `/` separators
    pub file: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct IndexDocument {
    pub posts: Vec<PostRecord>,
}
