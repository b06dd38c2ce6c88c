//! Front-matter parsing

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{ContentError, PostRecord};

/// Front-matter data from a post, also the shape of a content index entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub summary: Option<String>,
    pub slug: Option<String>,
    pub lang: Option<String>,
    pub draft: bool,
    pub hidden: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse<'a>(origin: &str, content: &'a str) -> Result<(Self, &'a str), ContentError> {
        let trimmed = content.trim_start();

        let Some(rest) = trimmed.strip_prefix("---") else {
            return Ok((FrontMatter::default(), content));
        };
        let rest = rest.trim_start_matches(['\n', '\r']);

        // Empty block: closing fence right after the opening one
        if let Some(after) = rest.strip_prefix("---") {
            return Ok((FrontMatter::default(), after.trim_start_matches(['\n', '\r'])));
        }

        let Some(end_pos) = rest.find("\n---") else {
            // No closing ---, treat as no front-matter
            return Ok((FrontMatter::default(), content));
        };

        let yaml_content = &rest[..end_pos];
        let remaining = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml_content).map_err(|e| {
            ContentError::FrontMatter {
                origin: origin.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok((fm, remaining))
    }

    /// Validate and turn into a record.
    ///
    /// `fallback_slug` is used when the front-matter has none (the file stem
    /// for markdown sources). Language falls back to `default_lang`.
    pub fn into_record(
        self,
        origin: &str,
        fallback_slug: Option<&str>,
        default_lang: &str,
        tz: Tz,
        body: String,
    ) -> Result<PostRecord, ContentError> {
        let slug = self
            .slug
            .as_deref()
            .or(fallback_slug)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ContentError::MissingSlug {
                origin: origin.to_string(),
            })?
            .to_string();
        if !is_path_segment(&slug) {
            return Err(ContentError::InvalidSlug {
                origin: origin.to_string(),
                slug,
            });
        }

        let raw_date = self.date.ok_or_else(|| ContentError::MissingDate {
            origin: origin.to_string(),
        })?;
        let date = parse_date_string(&raw_date, tz).ok_or_else(|| ContentError::InvalidDate {
            origin: origin.to_string(),
            value: raw_date.clone(),
        })?;

        Ok(PostRecord {
            title: self.title.unwrap_or_else(|| slug.clone()),
            slug,
            summary: self.summary,
            date,
            lang: self.lang.unwrap_or_else(|| default_lang.to_string()),
            draft: self.draft,
            hidden: self.hidden,
            body,
        })
    }
}

/// A slug ends up both in `/post/<slug>` and as a directory name under the
/// public dir, so it must stay one plain segment.
fn is_path_segment(slug: &str) -> bool {
    slug != "."
        && !slug.contains("..")
        && !slug
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
}

/// Parse a date string in various formats.
///
/// Values carrying an offset keep it; naive values are read as wall-clock
/// time in `tz`.
pub fn parse_date_string(s: &str, tz: Tz) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();

    // Try RFC 3339 / ISO 8601
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    let offset_formats = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%z"];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    let naive_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in naive_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(dt, tz);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return localize(d.and_hms_opt(0, 0, 0)?, tz);
        }
    }

    None
}

fn localize(dt: NaiveDateTime, tz: Tz) -> Option<DateTime<FixedOffset>> {
    tz.from_local_datetime(&dt)
        .earliest()
        .map(|local| local.fixed_offset())
}
