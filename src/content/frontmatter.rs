//! Front-matter parsing
//!
//! Every document begins with a YAML block fenced by `---` lines. Unlike
//! looser generators we treat a malformed block as an error instead of
//! silently demoting it to body text: a document that fails here is reported
//! and produces no output.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Why a front-matter block failed to parse.
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("missing front-matter block (expected leading '---')")]
    Missing,
    #[error("unterminated front-matter block (no closing '---')")]
    Unterminated,
    #[error("invalid front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid date format: '{0}'")]
    BadDate(String),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
}

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value
                .split_whitespace()
                .map(|s| s.to_string())
                .collect())
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a source document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub updated: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub categories: Vec<String>,
    pub layout: Option<String>,
    pub excerpt: Option<String>,
    /// Documents are published unless explicitly marked otherwise
    #[serde(default = "default_published")]
    pub published: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

fn default_published() -> bool {
    true
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            date: None,
            updated: None,
            categories: Vec::new(),
            layout: None,
            excerpt: None,
            published: true,
            extra: HashMap::new(),
        }
    }
}

impl FrontMatter {
    /// Parse front-matter from a document string.
    /// Returns (front_matter, body).
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}');

        let rest = content
            .strip_prefix("---")
            .ok_or(FrontMatterError::Missing)?;
        // Step over exactly one line break so a closing fence on the very
        // next line (an empty block) is still found.
        let rest = rest.strip_prefix('\r').unwrap_or(rest);
        let rest = rest.strip_prefix('\n').unwrap_or(rest);

        let (yaml_content, body) = if let Some(after) = rest.strip_prefix("---") {
            ("", after)
        } else {
            let end_pos = rest.find("\n---").ok_or(FrontMatterError::Unterminated)?;
            (&rest[..end_pos], &rest[end_pos + 4..])
        };
        let body = body.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let fm: FrontMatter = serde_yaml::from_str(yaml_content)?;
        Ok((fm, body))
    }

    /// Parse the publication date. A present-but-unparsable date is an error,
    /// not a missing one.
    pub fn parse_date(&self) -> Result<Option<NaiveDateTime>, FrontMatterError> {
        parse_optional(self.date.as_deref())
    }

    /// Parse the updated date
    pub fn parse_updated(&self) -> Result<Option<NaiveDateTime>, FrontMatterError> {
        parse_optional(self.updated.as_deref())
    }
}

fn parse_optional(value: Option<&str>) -> Result<Option<NaiveDateTime>, FrontMatterError> {
    match value {
        None => Ok(None),
        Some(s) => parse_date_string(s)
            .map(Some)
            .ok_or_else(|| FrontMatterError::BadDate(s.to_string())),
    }
}

/// Parse a date string in the formats the original content uses
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%z",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d"];
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
layout: post
title: Hello World
date: 2020-09-20 10:30:00
categories: jekyll update
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert_eq!(fm.layout, Some("post".to_string()));
        assert_eq!(fm.categories, vec!["jekyll", "update"]);
        assert!(body.contains("This is the content."));
    }

    #[test]
    fn test_parse_category_list() {
        let content = r#"---
title: Listed
categories:
  - dropwizard
  - kotlin
---
body
"#;
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.categories, vec!["dropwizard", "kotlin"]);
    }

    #[test]
    fn test_empty_block_is_terminated_not_an_error() {
        let (fm, body) = FrontMatter::parse("---\n---\nJust the body.\n").unwrap();
        assert_eq!(fm.title, None);
        assert!(fm.published);
        assert!(body.contains("Just the body."));
    }

    #[test]
    fn test_blank_line_inside_block() {
        let (fm, body) = FrontMatter::parse("---\n\ntitle: Spaced\n---\nbody\n").unwrap();
        assert_eq!(fm.title, Some("Spaced".to_string()));
        assert!(body.contains("body"));
    }

    #[test]
    fn test_missing_block_is_error() {
        let err = FrontMatter::parse("Just prose, no metadata.\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Missing));
    }

    #[test]
    fn test_unterminated_block_is_error() {
        let err = FrontMatter::parse("---\ntitle: Oops\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated));
    }

    #[test]
    fn test_invalid_date_is_error() {
        let fm = FrontMatter {
            date: Some("next tuesday".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            fm.parse_date(),
            Err(FrontMatterError::BadDate(_))
        ));
    }

    #[test]
    fn test_parse_date_formats() {
        for s in ["2020-10-09", "2020/10/09", "2020-10-09 08:15:00"] {
            let dt = parse_date_string(s).unwrap();
            assert_eq!(dt.format("%Y-%m-%d").to_string(), "2020-10-09");
        }
    }

    #[test]
    fn test_unpublished_flag() {
        let content = "---\ntitle: Draft\npublished: false\n---\nwip\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert!(!fm.published);
    }
}
