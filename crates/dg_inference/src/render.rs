use chrono::NaiveDate;

const STYLE: &str = r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
        }
        h1 {
            color: #1a1a2e;
            border-bottom: 2px solid #4a4e69;
            padding-bottom: 10px;
        }
        h2 {
            color: #4a4e69;
            margin-top: 30px;
            border-left: 4px solid #4a4e69;
            padding-left: 15px;
        }
        h3 {
            color: #22223b;
            margin-top: 20px;
            font-size: 16px;
        }
        ul {
            padding-left: 20px;
        }
        li {
            margin-bottom: 8px;
        }
        hr {
            border: none;
            border-top: 1px solid #ddd;
            margin: 30px 0;
        }
        a {
            color: #4a4e69;
        }
        .meta {
            color: #666;
            font-size: 0.9em;
            margin-bottom: 20px;
        }
        .toc {
            background: #f5f5f5;
            padding: 15px 20px;
            border-radius: 5px;
            margin-bottom: 30px;
        }
        .toc h3 {
            margin-top: 0;
            margin-bottom: 10px;
        }
        .toc ul {
            margin: 0;
        }
        .notice {
            background: #f9f9f9;
            border-radius: 8px;
            padding: 20px;
            margin: 20px 0;
        }
        .footer {
            margin-top: 40px;
            padding-top: 20px;
            border-top: 1px solid #ddd;
            font-size: 0.85em;
            color: #666;
        }
"#;

fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %d, %Y").to_string()
}

fn short_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"utf-8\">\n    <style>{STYLE}    </style>\n</head>\n<body>\n    <h1>{title}</h1>\n{body}\n    <div class=\"footer\">\n        <p>This digest was generated automatically.</p>\n    </div>\n</body>\n</html>\n"
    )
}

/// Wrap a raw model reply in a minimal container when it does not already
/// start with markup.
pub fn ensure_markup(summary: &str) -> String {
    if summary.trim_start().starts_with('<') {
        summary.to_string()
    } else {
        format!("<div>{summary}</div>")
    }
}

pub fn digest_subject(date: NaiveDate) -> String {
    format!("Daily Meeting Digest - {}", short_date(date))
}

pub fn newsletter_subject(date: NaiveDate) -> String {
    format!("Daily Newsletter Digest - {}", short_date(date))
}

/// The complete meeting digest document. Titles show up in a table of
/// contents only when there is more than one meeting.
pub fn digest_email(titles: &[String], summary: &str, date: NaiveDate) -> String {
    let meta = format!(
        "    <p class=\"meta\">{} &bull; {}</p>\n",
        long_date(date),
        pluralize(titles.len(), "meeting"),
    );

    let toc = if titles.len() > 1 {
        let items: String = titles
            .iter()
            .map(|title| format!("<li>{title}</li>"))
            .collect();
        format!(
            "    <div class=\"toc\">\n        <h3>Today's Meetings</h3>\n        <ul>{items}</ul>\n    </div>\n"
        )
    } else {
        String::new()
    };

    let body = format!("{meta}{toc}    {}", ensure_markup(summary));
    document("Daily Meeting Digest", &body)
}

/// Notification document for a day with no recorded meetings; distinct from
/// a digest, never an empty shell with a zero count.
pub fn no_meetings_email(date: NaiveDate) -> String {
    let body = format!(
        "    <p class=\"meta\">{}</p>\n    <div class=\"notice\">\n        <p>No meeting notes were recorded today.</p>\n    </div>",
        long_date(date),
    );
    document("Daily Meeting Digest", &body)
}

/// The complete newsletter digest document.
pub fn newsletter_email(
    summary: &str,
    email_count: usize,
    article_count: usize,
    date: NaiveDate,
) -> String {
    let body = format!(
        "    <p class=\"meta\">{} &bull; {}, {}</p>\n    {}",
        long_date(date),
        pluralize(email_count, "email"),
        pluralize(article_count, "article"),
        ensure_markup(summary),
    );
    document("Daily Newsletter Digest", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_ensure_markup_wraps_plain_text() {
        assert_eq!(ensure_markup("plain reply"), "<div>plain reply</div>");
        assert_eq!(ensure_markup("<h2>already</h2>"), "<h2>already</h2>");
        assert_eq!(ensure_markup("  <p>leading space</p>"), "  <p>leading space</p>");
    }

    #[test]
    fn test_digest_email_single_meeting() {
        let html = digest_email(&["Kickoff".to_string()], "<h2>Summary</h2>", date());
        assert!(html.contains("1 meeting &bull;") || html.contains("&bull; 1 meeting"));
        assert!(!html.contains("1 meetings"));
        // No TOC for a single meeting.
        assert!(!html.contains("Today's Meetings"));
        assert!(html.contains("<h2>Summary</h2>"));
        assert!(html.contains("Monday, January 15, 2024"));
    }

    #[test]
    fn test_digest_email_multiple_meetings_has_toc() {
        let titles = vec!["First".to_string(), "Second".to_string()];
        let html = digest_email(&titles, "<h2>Summary</h2>", date());
        assert!(html.contains("2 meetings"));
        assert!(html.contains("Today's Meetings"));
        assert!(html.contains("<li>First</li>"));
        assert!(html.contains("<li>Second</li>"));
    }

    #[test]
    fn test_no_meetings_email_is_distinct() {
        let html = no_meetings_email(date());
        assert!(html.contains("No meeting notes were recorded today."));
        assert!(!html.contains("0 meetings"));
    }

    #[test]
    fn test_newsletter_email_counts() {
        let html = newsletter_email("summary text", 1, 2, date());
        assert!(html.contains("1 email, 2 articles"));
        assert!(html.contains("<div>summary text</div>"));
    }

    #[test]
    fn test_subjects() {
        assert_eq!(
            digest_subject(date()),
            "Daily Meeting Digest - January 15, 2024"
        );
        assert_eq!(
            newsletter_subject(date()),
            "Daily Newsletter Digest - January 15, 2024"
        );
    }
}
