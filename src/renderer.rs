use anyhow::{bail, Context as _};
use chrono::{Datelike, Utc};
use maud::{html, PreEscaped, DOCTYPE};
use pulldown_cmark::{Event, Options, Parser};

use crate::{
    context::Context,
    frontmatter::strip_frontmatter,
    index::load_index,
    metadata::{IndexDocument, PostRecord},
};

/// Order used by the browser list view: newest `date` first.
/// Posts sharing a date keep their index order.
pub(crate) fn render_order(posts: &[PostRecord]) -> Vec<&PostRecord> {
    let mut sorted: Vec<&PostRecord> = posts.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

pub(crate) fn find_post<'a>(index: &'a IndexDocument, id: &str) -> Option<&'a PostRecord> {
    index.posts.iter().find(|post| post.id == id)
}

pub(crate) fn render_list(posts: &[PostRecord]) -> String {
    if posts.is_empty() {
        return "暂无文章\n".to_string();
    }

    let mut res = String::new();
    for post in render_order(posts) {
        res.push_str(&format!(
            "{}  [{}]  {}\n    {}\n    id: {}\n",
            post.date, post.tag, post.title, post.excerpt, post.id
        ));
    }
    res
}

fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    // every newline in a paragraph is a line break
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        _ => event,
    });

    let mut body_html = String::new();
    pulldown_cmark::html::push_html(&mut body_html, parser);
    body_html
}

/// Standalone page for one post; `markdown` is the raw content of `post.file`.
pub(crate) fn render_post_page(ctx: &Context, post: &PostRecord, markdown: &str) -> String {
    let body = markdown_to_html(strip_frontmatter(markdown));

    html! {
        (DOCTYPE)
        html lang="zh-CN" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (post.title) " - " (ctx.blog_name) }
                link rel="stylesheet" href="style.css";
            }
            body {
                header.header {
                    a.logo href="index.html" { (ctx.blog_name) }
                    nav.nav {
                        a.nav-link href="index.html" { "首页" }
                    }
                }
                main.main {
                    article.post-content {
                        div.post-header {
                            h1 { (post.title) }
                            div.post-meta {
                                span.post-date { (post.date.to_string()) }
                                span.post-tag { (post.tag) }
                            }
                        }
                        div id="postBody" { (PreEscaped(body)) }
                        a.back href="index.html" { "← 返回首页" }
                    }
                }
                footer.footer {
                    p { (PreEscaped("&copy; ")) (Utc::now().year()) " " (ctx.blog_name) }
                }
            }
        }
    }
    .into_string()
}

/// Looks `id` up in the index at `ctx.output` and renders the post it points to,
/// either as its markdown body or as a full page.
pub(crate) fn render_post(ctx: &Context, id: &str, as_page: bool) -> anyhow::Result<String> {
    let index = load_index(&ctx.output)?;
    let Some(post) = find_post(&index, id) else {
        bail!("post not found: {id}");
    };

    let path = ctx.site_root().join(&post.file);
    let markdown =
        std::fs::read_to_string(&path).with_context(|| format!("while reading {path:?}"))?;

    if as_page {
        Ok(render_post_page(ctx, post, &markdown))
    } else {
        Ok(strip_frontmatter(&markdown).to_string())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn post(id: &str, date: (i32, u32, u32)) -> PostRecord {
        PostRecord {
            id: id.to_string(),
            title: format!("Title of {id}"),
            excerpt: format!("About {id}..."),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            tag: "随笔".to_string(),
            file: format!("posts/{id}.md"),
        }
    }

    #[test]
    fn render_order_differs_from_index_order() {
        // index order is by mtime, which need not follow the declared dates
        let posts = vec![
            post("touched-recently", (2020, 1, 1)),
            post("newest", (2026, 2, 11)),
            post("same-day-a", (2024, 5, 5)),
            post("same-day-b", (2024, 5, 5)),
        ];
        let ids: Vec<_> = render_order(&posts).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["newest", "same-day-a", "same-day-b", "touched-recently"]
        );
    }

    #[test]
    fn finds_first_post_with_id() {
        let mut dup = post("dup", (2024, 1, 1));
        dup.title = "second".to_string();
        let index = IndexDocument {
            posts: vec![post("dup", (2023, 1, 1)), dup, post("other", (2022, 1, 1))],
        };
        assert_eq!(find_post(&index, "dup").unwrap().title, "Title of dup");
        assert!(find_post(&index, "missing").is_none());
    }

    #[test]
    fn list_view() {
        assert_eq!(render_list(&[]), "暂无文章\n");

        let listing = render_list(&[post("old", (2020, 1, 1)), post("new", (2021, 1, 1))]);
        let new_at = listing.find("Title of new").unwrap();
        let old_at = listing.find("Title of old").unwrap();
        assert!(new_at < old_at);
        assert!(listing.starts_with("2021-01-01  [随笔]  Title of new\n"));
    }

    #[test]
    fn post_page_strips_frontmatter() {
        let ctx = Context::new("posts".into(), "posts.json".into(), "我的博客".to_string());
        let markdown = "---\ntag: 技术\n---\n# Hello\n\nline one\nline two\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~\n";
        let page = render_post_page(&ctx, &post("hello", (2026, 2, 11)), markdown);

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Title of hello - 我的博客</title>"));
        assert!(page.contains("<span class=\"post-date\">2026-02-11</span>"));
        assert!(!page.contains("tag: 技术"));
        assert!(page.contains("<h1>Hello</h1>"));
        assert!(page.contains("line one<br />"));
        assert!(page.contains("<table>"));
        assert!(page.contains("<del>old</del>"));
        assert!(page.contains("class=\"nav-link\""));
        assert!(page.contains(">首页</a>"));
        assert!(page.contains(&format!("&copy; {} 我的博客", Utc::now().year())));
    }

    #[test]
    fn render_post_through_index() {
        let root = tempfile::TempDir::new().unwrap();
        let posts_dir = root.path().join("posts");
        std::fs::create_dir(&posts_dir).unwrap();
        std::fs::write(
            posts_dir.join("2026-02-11-hello.md"),
            "---\ndate: 2026-02-11\n---\n# Hello\n\nThis is a test post.\n",
        )
        .unwrap();
        let ctx = Context::new(posts_dir, root.path().join("posts.json"), "blog".to_string());
        crate::generator::generate(&ctx).unwrap();

        // resolved next to the index, not against the working directory
        assert_eq!(
            crate::index::load_index(&ctx.output).unwrap().posts[0].file,
            "posts/2026-02-11-hello.md"
        );
        let body = render_post(&ctx, "hello", false).unwrap();
        assert_eq!(body, "# Hello\n\nThis is a test post.\n");

        let page = render_post(&ctx, "hello", true).unwrap();
        assert!(page.contains("<p>This is a test post.</p>"));

        let err = render_post(&ctx, "nope", false).unwrap_err();
        assert_eq!(err.to_string(), "post not found: nope");
    }

    #[test]
    fn post_page_escapes_metadata() {
        let ctx = Context::new("posts".into(), "posts.json".into(), "blog".to_string());
        let mut record = post("x", (2026, 2, 11));
        record.title = "<script>".to_string();
        let page = render_post_page(&ctx, &record, "");
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }
}
