//! Atom feed document.

use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};

use super::SiteMeta;

/// One `<entry>` of the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub slug: String,
    pub updated: DateTime<Utc>,
    /// Rendered article HTML; escaped when written.
    pub html: String,
}

/// Render an Atom document for `entries`.
///
/// `generated_at` stands in for the feed's `updated` stamp when no entry
/// carries a date.
pub fn atom(meta: &SiteMeta, entries: &[FeedEntry], generated_at: DateTime<Utc>) -> String {
    let base = meta.base_url();
    let updated = entries
        .iter()
        .map(|e| e.updated)
        .max()
        .unwrap_or(generated_at);

    let mut xml = String::with_capacity(1024 + entries.len() * 512);
    xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    // write! into a String cannot fail
    let _ = write!(
        xml,
        "<feed xmlns=\"http://www.w3.org/2005/Atom\" xml:base=\"{base}\">\n\
         \x20 <title>{title}</title>\n\
         \x20 <subtitle>{subtitle}</subtitle>\n\
         \x20 <link href=\"{base}/feed.xml\" rel=\"self\"/>\n\
         \x20 <link href=\"{base}/\"/>\n\
         \x20 <updated>{updated}</updated>\n\
         \x20 <id>{base}/</id>\n\
         \x20 <author>\n\
         \x20   <name>{name}</name>\n\
         \x20   <email>{email}</email>\n\
         \x20 </author>\n",
        base = escape(base),
        title = escape(&meta.title),
        subtitle = escape(&meta.description),
        updated = rfc3339(updated),
        name = escape(&meta.author.name),
        email = escape(&meta.author.email),
    );

    for entry in entries {
        let _ = write!(
            xml,
            "  <entry>\n\
             \x20   <title>{title}</title>\n\
             \x20   <link href=\"{base}/blog/{slug}/\"/>\n\
             \x20   <updated>{updated}</updated>\n\
             \x20   <id>{base}/blog/{slug}/</id>\n\
             \x20   <content xml:lang=\"{lang}\" type=\"html\">{content}</content>\n\
             \x20 </entry>\n",
            title = escape(&entry.title),
            base = escape(base),
            slug = escape(&entry.slug),
            updated = rfc3339(entry.updated),
            lang = escape(&meta.language),
            content = escape(&entry.html),
        );
    }

    xml.push_str("</feed>\n");
    xml
}

fn rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Escape text for XML character data and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Author;
    use chrono::TimeZone;

    fn meta() -> SiteMeta {
        SiteMeta {
            title: "Tom & Co".into(),
            description: "Notes".into(),
            url: "https://example.com/".into(),
            language: "en".into(),
            author: Author {
                name: "Tom".into(),
                email: "tom@example.com".into(),
            },
            ..SiteMeta::default()
        }
    }

    #[test]
    fn feed_header_and_entries() {
        let older = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap();
        let entries = vec![
            FeedEntry {
                title: "Old".into(),
                slug: "old".into(),
                updated: older,
                html: "<p>a</p>".into(),
            },
            FeedEntry {
                title: "New".into(),
                slug: "new".into(),
                updated: newer,
                html: "<p>b</p>".into(),
            },
        ];

        let xml = atom(&meta(), &entries, Utc::now());

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("xml:base=\"https://example.com\""));
        assert!(xml.contains("<title>Tom &amp; Co</title>"));
        assert!(xml.contains("<updated>2024-01-20T00:00:00Z</updated>"));
        assert!(xml.contains("<link href=\"https://example.com/blog/old/\"/>"));
        assert!(xml.contains("&lt;p&gt;a&lt;/p&gt;"));
        assert_eq!(xml.matches("<entry>").count(), 2);
        assert!(xml.trim_end().ends_with("</feed>"));
    }

    #[test]
    fn empty_feed_uses_generation_time() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let xml = atom(&meta(), &[], at);
        assert!(xml.contains("<updated>2025-03-01T12:00:00Z</updated>"));
        assert!(!xml.contains("<entry>"));
    }
}
