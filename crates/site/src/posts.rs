//! Post index for the blog front page.
//!
//! Built from a rendered batch: directory index pages are dropped, every
//! other post becomes a [`Post`], and the list is ordered newest first.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::batch::BatchOutput;

/// Display format for post dates.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// One entry of the post index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// Frontmatter title, or the last URL segment when there is none.
    pub title: String,
    /// Site URL derived from the document id.
    pub url: String,
    /// Publication date as `YYYY/MM/DD`; `None` when missing or unparseable.
    pub date: Option<String>,
    /// Parsed publication date used for ordering.
    #[serde(skip)]
    pub published: Option<NaiveDate>,
}

/// Map a document id such as `posts/hello.md` to its site URL.
///
/// `index.md` files map to their directory URL, which ends in `/`.
pub fn post_url(id: &str) -> String {
    let path = id.trim_start_matches("./").replace('\\', "/");
    let path = path.strip_suffix(".md").unwrap_or(&path);
    let path = match path.strip_suffix("index") {
        Some(dir) if dir.is_empty() || dir.ends_with('/') => dir,
        _ => path,
    };
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Parse a frontmatter date: `YYYY-MM-DD`, `YYYY/MM/DD`, RFC 3339, or
/// `YYYY-MM-DD HH:MM:SS`.
pub fn parse_post_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Build the post index, newest first. Undated posts keep their batch order
/// after every dated one; failed documents are left out.
pub fn build_post_index(output: &BatchOutput) -> Vec<Post> {
    let mut posts: Vec<Post> = output
        .results
        .iter()
        .filter_map(|result| {
            let Some(document) = &result.document else {
                log::debug!("{} failed to render, leaving it out of the index", result.id);
                return None;
            };
            let url = post_url(&result.id);
            if url.ends_with('/') {
                return None;
            }

            let frontmatter = &document.frontmatter;
            let published = frontmatter.date().and_then(parse_post_date);
            if let Some(raw) = frontmatter.date()
                && published.is_none()
            {
                log::warn!("{}: unrecognised date '{raw}'", result.id);
            }

            let title = match frontmatter.title() {
                Some(title) => title.to_string(),
                None => url.rsplit('/').next().unwrap_or_default().to_string(),
            };
            Some(Post {
                title,
                url,
                date: published.map(|date| date.format(DATE_FORMAT).to_string()),
                published,
            })
        })
        .collect();

    posts.sort_by(|a, b| b.published.cmp(&a.published));
    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BatchOptions, DocumentInput, render_batch};

    fn post(id: &str, frontmatter: &str) -> DocumentInput {
        DocumentInput {
            id: id.to_string(),
            source: format!("---\n{frontmatter}\n---\nBody"),
        }
    }

    #[test]
    fn urls_from_ids() {
        assert_eq!(post_url("posts/hello.md"), "/posts/hello");
        assert_eq!(post_url("./posts/index.md"), "/posts/");
        assert_eq!(post_url("index.md"), "/");
        assert_eq!(post_url("posts/reindex.md"), "/posts/reindex");
        assert_eq!(post_url("/posts\\win.md"), "/posts/win");
    }

    #[test]
    fn dates_in_common_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(parse_post_date("2024-03-01"), expected);
        assert_eq!(parse_post_date(" 2024/03/01 "), expected);
        assert_eq!(parse_post_date("2024-03-01T23:00:00+09:00"), expected);
        assert_eq!(parse_post_date("2024-03-01 12:30:00"), expected);
        assert_eq!(parse_post_date("someday"), None);
        assert_eq!(parse_post_date("2024-02-30"), None);
    }

    #[test]
    fn index_is_filtered_and_newest_first() {
        let inputs = vec![
            post("posts/index.md", "title: All posts"),
            post("posts/old.md", "title: Old\ndate: 2023-01-05"),
            post("posts/undated.md", "draft: true"),
            post("posts/new.md", "title: New\ndate: 2024-03-01"),
            post("posts/bad.md", "title: Bad\ndate: someday"),
            DocumentInput {
                id: "posts/broken.md".to_string(),
                source: "---\ntitle: Broken".to_string(),
            },
            post("posts/stamp.md", "title: Stamp\ndate: 2023-06-30T08:00:00Z"),
        ];
        let output = render_batch(inputs, &BatchOptions::default());
        let posts = build_post_index(&output);

        let urls: Vec<_> = posts.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            [
                "/posts/new",
                "/posts/stamp",
                "/posts/old",
                "/posts/undated",
                "/posts/bad"
            ]
        );

        assert_eq!(posts[0].title, "New");
        assert_eq!(posts[0].date.as_deref(), Some("2024/03/01"));
        assert_eq!(posts[1].date.as_deref(), Some("2023/06/30"));
        assert_eq!(posts[3].title, "undated");
        assert_eq!(posts[3].date, None);
        assert_eq!(posts[4].date, None);
    }

    #[test]
    fn serializes_without_sort_key() {
        let post = Post {
            title: "Hi".to_string(),
            url: "/posts/hi".to_string(),
            date: Some("2024/03/01".to_string()),
            published: NaiveDate::from_ymd_opt(2024, 3, 1),
        };
        assert_eq!(
            serde_json::to_string(&post).unwrap(),
            r#"{"title":"Hi","url":"/posts/hi","date":"2024/03/01"}"#
        );
    }
}
