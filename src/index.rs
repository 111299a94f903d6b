use std::{
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use log::info;

use crate::metadata::IndexDocument;

pub(crate) fn load_index(index_path: &Path) -> anyhow::Result<IndexDocument> {
    let fd = File::open(index_path).with_context(|| format!("while opening {index_path:?}"))?;
    let reader = BufReader::new(fd);
    serde_json::from_reader(reader).with_context(|| format!("while parsing {index_path:?}"))
}

/// Overwrites `index_path` with the pretty-printed index.
pub(crate) fn save_index(index_path: &Path, index: &IndexDocument) -> anyhow::Result<()> {
    let fd = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(index_path)
        .with_context(|| format!("while opening {index_path:?}"))?;
    let mut writer = BufWriter::new(fd);
    serde_json::to_writer_pretty(&mut writer, index)?;
    writer.flush()?;
    info!("index written to {index_path:?}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::metadata::PostRecord;

    fn record() -> PostRecord {
        PostRecord {
            id: "hello".to_string(),
            title: "Hello".to_string(),
            excerpt: "Hi....".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, 11).unwrap(),
            tag: "随笔".to_string(),
            file: "posts/2026-02-11-hello.md".to_string(),
        }
    }

    #[test]
    fn pretty_json_layout() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        save_index(&path, &IndexDocument { posts: vec![record()] }).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            concat!(
                "{\n",
                "  \"posts\": [\n",
                "    {\n",
                "      \"id\": \"hello\",\n",
                "      \"title\": \"Hello\",\n",
                "      \"excerpt\": \"Hi....\",\n",
                "      \"date\": \"2026-02-11\",\n",
                "      \"tag\": \"随笔\",\n",
                "      \"file\": \"posts/2026-02-11-hello.md\"\n",
                "    }\n",
                "  ]\n",
                "}"
            )
        );
        assert_eq!(load_index(&path).unwrap().posts, vec![record()]);
    }

    #[test]
    fn overwrite_truncates_previous_content() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        save_index(&path, &IndexDocument { posts: vec![record(); 3] }).unwrap();
        save_index(&path, &IndexDocument::default()).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\n  \"posts\": []\n}"
        );
    }

    #[test]
    fn missing_index_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_index(&dir.path().join("posts.json")).is_err());
    }
}
