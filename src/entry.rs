use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in history. Oldest entries are evicted.
pub const MAX_ENTRIES: usize = 50;

/// Title placeholder for content whose first line is blank.
pub const UNTITLED: &str = "Untitled";

const TITLE_MAX_CHARS: usize = 50;

/// One saved snippet with its derived title and timestamps.
///
/// Field names and timestamp encoding match the remote table row, so the
/// struct deserializes straight from a PostgREST response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub content: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Derive an entry title from its content.
///
/// Only the literal first line is considered; if it trims to nothing the
/// fixed placeholder is returned, otherwise the line truncated to 50 chars
/// with a `...` marker when longer.
pub fn derive_title(content: &str) -> String {
    let first_line = content.split('\n').next().unwrap_or("").trim();
    if first_line.is_empty() {
        return UNTITLED.to_string();
    }
    if first_line.chars().count() > TITLE_MAX_CHARS {
        let truncated: String = first_line.chars().take(TITLE_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        first_line.to_string()
    }
}

/// Insert `entry` at the front of a newest-first list, skipping the insert
/// when its content is byte-identical to the current front entry.
///
/// The duplicate check deliberately looks at the front entry only, not the
/// whole list. Returns whether the entry was inserted; the list never grows
/// past [`MAX_ENTRIES`].
pub fn push_latest(entries: &mut Vec<Entry>, entry: Entry) -> bool {
    if entries.first().is_some_and(|front| front.content == entry.content) {
        return false;
    }
    entries.insert(0, entry);
    entries.truncate(MAX_ENTRIES);
    true
}

/// Remove the entry with the given id. Returns `false` when no entry matched.
pub fn remove_by_id(entries: &mut Vec<Entry>, id: &str) -> bool {
    let before = entries.len();
    entries.retain(|entry| entry.id != id);
    entries.len() != before
}

/// Case-insensitive substring filter over title and content, preserving the
/// list order. An empty query matches everything.
pub fn filter_entries(entries: &[Entry], query: &str) -> Vec<Entry> {
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| {
            entry.title.to_lowercase().contains(&needle)
                || entry.content.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Short content excerpt for the history cards.
pub fn snippet(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        content.to_string()
    } else {
        let head: String = content.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

/// Compact timestamp for the history cards, relative to `now`.
pub fn format_relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = now.date_naive().num_days_from_ce() - ts.date_naive().num_days_from_ce();
    match days {
        i32::MIN..=0 => ts.format("%H:%M").to_string(),
        1 => "yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        _ => ts.format("%Y-%m-%d").to_string(),
    }
}

/// Lowercase base36 rendering of an integer, as used by the local adapter's
/// id scheme.
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(id: &str, content: &str, secs: i64) -> Entry {
        let ts = Utc.timestamp_opt(secs, 0).single().unwrap();
        Entry {
            id: id.to_string(),
            content: content.to_string(),
            title: derive_title(content),
            created_at: ts,
            updated_at: ts,
            user_id: None,
        }
    }

    #[test]
    fn title_uses_first_line() {
        assert_eq!(
            derive_title("Meeting notes\nDiscuss Q3 plan"),
            "Meeting notes"
        );
    }

    #[test]
    fn title_placeholder_for_blank_first_line() {
        assert_eq!(derive_title(""), UNTITLED);
        assert_eq!(derive_title("   \t"), UNTITLED);
        // Only the literal first line counts, even when later lines have text.
        assert_eq!(derive_title("  \nreal content"), UNTITLED);
    }

    #[test]
    fn title_truncates_long_first_line() {
        let long = "x".repeat(60);
        let title = derive_title(&long);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));

        let exact = "y".repeat(50);
        assert_eq!(derive_title(&exact), exact);
    }

    #[test]
    fn title_truncation_counts_chars_not_bytes() {
        let long = "日".repeat(51);
        let title = derive_title(&long);
        assert!(title.starts_with(&"日".repeat(50)));
        assert!(title.ends_with("..."));
    }

    #[test]
    fn push_skips_duplicate_of_front_entry() {
        let mut list = Vec::new();
        assert!(push_latest(&mut list, entry("a", "same text", 1)));
        assert!(!push_latest(&mut list, entry("b", "same text", 2)));
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "a");
    }

    #[test]
    fn push_duplicate_check_is_front_only() {
        let mut list = Vec::new();
        push_latest(&mut list, entry("a", "one", 1));
        push_latest(&mut list, entry("b", "two", 2));
        // "one" is still in the list, but not at the front, so it saves again.
        assert!(push_latest(&mut list, entry("c", "one", 3)));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn list_is_capped_at_fifty_newest() {
        let mut list = Vec::new();
        for i in 0..51u64 {
            push_latest(&mut list, entry(&format!("id{i}"), &format!("content {i}"), i as i64));
        }
        assert_eq!(list.len(), MAX_ENTRIES);
        assert_eq!(list[0].id, "id50");
        assert_eq!(list[MAX_ENTRIES - 1].id, "id1");
    }

    #[test]
    fn remove_by_id_removes_exactly_one() {
        let mut list = vec![entry("a", "1", 1), entry("b", "2", 2), entry("c", "3", 3)];
        assert!(remove_by_id(&mut list, "b"));
        assert_eq!(
            list.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            ["a", "c"]
        );
        assert!(!remove_by_id(&mut list, "missing"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn search_matches_title_and_content_case_insensitive() {
        let list = vec![
            entry("a", "Groceries\nmilk and eggs", 1),
            entry("b", "meeting notes\ndiscuss MILK order", 2),
            entry("c", "todo\nnothing here", 3),
        ];
        let hits = filter_entries(&list, "milk");
        assert_eq!(
            hits.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            ["a", "b"]
        );
        assert_eq!(filter_entries(&list, "").len(), 3);
        assert!(filter_entries(&list, "zzz").is_empty());
    }

    #[test]
    fn search_preserves_order() {
        let list = vec![entry("a", "x1", 1), entry("b", "x2", 2), entry("c", "x3", 3)];
        let hits = filter_entries(&list, "x");
        assert_eq!(
            hits.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            ["a", "b", "c"]
        );
    }

    #[test]
    fn snippet_truncates_with_marker() {
        assert_eq!(snippet("short", 100), "short");
        let long = "a".repeat(120);
        let s = snippet(&long, 100);
        assert_eq!(s.chars().count(), 103);
        assert!(s.ends_with("..."));
    }

    #[test]
    fn relative_time_boundaries() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 20, 0, 0).unwrap();
        let today = Utc.with_ymd_and_hms(2025, 6, 15, 9, 30, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2025, 6, 14, 23, 0, 0).unwrap();
        let four_days = Utc.with_ymd_and_hms(2025, 6, 11, 1, 0, 0).unwrap();
        let last_month = Utc.with_ymd_and_hms(2025, 5, 2, 1, 0, 0).unwrap();

        assert_eq!(format_relative(today, now), "09:30");
        assert_eq!(format_relative(yesterday, now), "yesterday");
        assert_eq!(format_relative(four_days, now), "4 days ago");
        assert_eq!(format_relative(last_month, now), "2025-05-02");
    }

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(46_655), "zzz");
    }
}
