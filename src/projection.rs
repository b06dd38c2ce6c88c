//! Post feed projection
//!
//! Pure functions that turn the raw post collection into what the site
//! shows: the visible posts, newest first, optionally narrowed to one
//! language, and the entries of the syndication feed. Nothing here does I/O
//! or keeps state, so the same collection always projects to the same
//! output.

use chrono::{DateTime, FixedOffset};

use crate::config::SiteConfig;
use crate::content::PostRecord;
use crate::feed::render_feed_document;

/// Which posts a listing shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PostFilter {
    #[default]
    All,
    Lang(String),
}

impl PostFilter {
    /// Build from an optional language tag, empty meaning all
    pub fn from_lang(lang: Option<&str>) -> Self {
        match lang.map(str::trim) {
            Some(lang) if !lang.is_empty() => PostFilter::Lang(lang.to_string()),
            _ => PostFilter::All,
        }
    }

    pub fn lang(&self) -> Option<&str> {
        match self {
            PostFilter::All => None,
            PostFilter::Lang(lang) => Some(lang),
        }
    }

    /// Whether a record belongs in this listing
    pub fn matches(&self, record: &PostRecord) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Lang(lang) => record.lang == *lang,
        }
    }
}

/// One item of the syndication feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub description: String,
    pub url: String,
    pub date: DateTime<FixedOffset>,
}

/// Records that are neither drafts nor hidden, in their original order
pub fn select_visible(records: &[PostRecord]) -> Vec<&PostRecord> {
    records.iter().filter(|r| r.is_visible()).collect()
}

/// Newest first. The sort is stable, so records with the same date keep
/// their relative order.
pub fn sort_by_recency<'a>(mut records: Vec<&'a PostRecord>) -> Vec<&'a PostRecord> {
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records
}

/// Keep the records the filter selects, preserving order
pub fn filter_by<'a>(records: Vec<&'a PostRecord>, filter: &PostFilter) -> Vec<&'a PostRecord> {
    filter_by_predicate(records, |r| filter.matches(r))
}

/// Keep the records satisfying `predicate`, preserving order
pub fn filter_by_predicate<'a, P>(records: Vec<&'a PostRecord>, predicate: P) -> Vec<&'a PostRecord>
where
    P: Fn(&PostRecord) -> bool,
{
    records.into_iter().filter(|&r| predicate(r)).collect()
}

/// Map a record to its feed item. A missing summary becomes an empty
/// description.
pub fn to_feed_entry(record: &PostRecord, site_base_url: &str) -> FeedEntry {
    FeedEntry {
        title: record.title.clone(),
        description: record.summary.clone().unwrap_or_default(),
        url: record.permalink(site_base_url),
        date: record.date,
    }
}

/// Visible posts, newest first, narrowed by `filter`
pub fn project_listing<'a>(records: &'a [PostRecord], filter: &PostFilter) -> Vec<&'a PostRecord> {
    filter_by(sort_by_recency(select_visible(records)), filter)
}

/// Feed entries for every visible post, newest first
pub fn project_feed_entries(records: &[PostRecord], site_base_url: &str) -> Vec<FeedEntry> {
    sort_by_recency(select_visible(records))
        .into_iter()
        .map(|r| to_feed_entry(r, site_base_url))
        .collect()
}

/// The full feed document for the site
pub fn project_feed(records: &[PostRecord], config: &SiteConfig) -> String {
    let entries = project_feed_entries(records, config.base_url());
    render_feed_document(&entries, &config.feed_metadata())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(slug: &str, date: &str) -> PostRecord {
        let date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let date = FixedOffset::east_opt(0)
            .unwrap()
            .from_utc_datetime(&date);
        PostRecord::new(slug, &slug.to_uppercase(), date, "en")
    }

    fn slugs(records: &[&PostRecord]) -> Vec<String> {
        records.iter().map(|r| r.slug.clone()).collect()
    }

    /// Deterministic pseudo-random collections for property checks
    fn collections() -> Vec<Vec<PostRecord>> {
        let mut seed: u64 = 0x5eed;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as u32
        };
        (0..50)
            .map(|_| {
                let len = next() % 12;
                (0..len)
                    .map(|i| {
                        // few distinct days so ties are common
                        let mut p = post(&format!("p{}", i), &format!("2024-01-{:02}", next() % 4 + 1));
                        p.draft = next() % 4 == 0;
                        p.hidden = next() % 5 == 0;
                        p.lang = if next() % 2 == 0 { "en" } else { "zh-CN" }.to_string();
                        p
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_scenario_visible_and_sorted() {
        let mut c = post("c", "2024-02-01");
        c.draft = true;
        let records = vec![post("a", "2024-01-01"), post("b", "2024-03-01"), c];

        let projected = sort_by_recency(select_visible(&records));
        assert_eq!(slugs(&projected), vec!["b", "a"]);
    }

    #[test]
    fn test_scenario_language_filter() {
        let mut zh = post("zh", "2024-01-02");
        zh.lang = "zh-CN".to_string();
        let records = vec![post("en1", "2024-01-01"), zh, post("en2", "2024-01-03")];

        let en = filter_by(select_visible(&records), &PostFilter::Lang("en".to_string()));
        assert_eq!(slugs(&en), vec!["en1", "en2"]);

        let zh = filter_by(select_visible(&records), &PostFilter::from_lang(Some("zh-CN")));
        assert_eq!(slugs(&zh), vec!["zh"]);

        let all = filter_by(select_visible(&records), &PostFilter::All);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_scenario_missing_summary() {
        let record = post("quiet", "2024-01-01");
        let entry = to_feed_entry(&record, "https://www.skyward.moe");
        assert_eq!(entry.description, "");
        assert_eq!(entry.url, "https://www.skyward.moe/post/quiet");
        assert_eq!(entry.title, "QUIET");
        assert_eq!(entry.date, record.date);
    }

    #[test]
    fn test_scenario_empty_input() {
        let records: Vec<PostRecord> = Vec::new();
        assert!(select_visible(&records).is_empty());
        assert!(sort_by_recency(Vec::new()).is_empty());
        assert!(project_listing(&records, &PostFilter::All).is_empty());
        assert!(project_feed_entries(&records, "https://x.test").is_empty());
    }

    #[test]
    fn test_hidden_never_projected() {
        let mut hidden = post("hidden", "2030-01-01");
        hidden.hidden = true;
        let records = vec![hidden, post("shown", "2024-01-01")];
        assert_eq!(slugs(&project_listing(&records, &PostFilter::All)), vec!["shown"]);
        assert_eq!(project_feed_entries(&records, "https://x.test").len(), 1);
    }

    #[test]
    fn test_select_visible_is_ordered_subsequence() {
        for records in collections() {
            let visible = select_visible(&records);
            assert!(visible.iter().all(|r| !r.draft && !r.hidden));
            assert_eq!(
                visible.len(),
                records.iter().filter(|r| r.is_visible()).count()
            );
            // slugs are "p<index>", so original positions are recoverable
            let positions: Vec<usize> = visible
                .iter()
                .map(|r| records.iter().position(|o| o.slug == r.slug).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_sort_is_non_increasing_and_stable() {
        for records in collections() {
            let sorted = sort_by_recency(select_visible(&records));
            for pair in sorted.windows(2) {
                assert!(pair[0].date >= pair[1].date);
                if pair[0].date == pair[1].date {
                    let first = records.iter().position(|r| r.slug == pair[0].slug).unwrap();
                    let second = records.iter().position(|r| r.slug == pair[1].slug).unwrap();
                    assert!(first < second, "tie order changed");
                }
            }
        }
    }

    #[test]
    fn test_sort_is_idempotent() {
        for records in collections() {
            let once = sort_by_recency(records.iter().collect());
            let twice = sort_by_recency(once.clone());
            assert_eq!(slugs(&once), slugs(&twice));
        }
    }

    #[test]
    fn test_dates_compare_as_instants() {
        // 09:00 in Shanghai is earlier than 02:00 UTC the same day
        let shanghai = FixedOffset::east_opt(8 * 3600).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let mut early = post("early", "2024-01-01");
        early.date = shanghai.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let mut late = post("late", "2024-01-01");
        late.date = utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();

        let records = vec![early, late];
        assert_eq!(
            slugs(&sort_by_recency(select_visible(&records))),
            vec!["late", "early"]
        );
    }

    #[test]
    fn test_predicate_filter() {
        let records = vec![post("keep", "2024-01-01"), post("drop", "2024-01-02")];
        let kept = filter_by_predicate(select_visible(&records), |r| r.slug.starts_with('k'));
        assert_eq!(slugs(&kept), vec!["keep"]);
    }
}
