use dg_core::truncate::{truncate_chars, CharBudget};
use dg_core::{ContentItem, DigestEntry, MeetingRecord};

/// Per-meeting transcript cap inside the digest prompt.
pub const MEETING_TRANSCRIPT_CHARS: usize = 50_000;
/// Per-item body cap for newsletter content.
pub const ITEM_BODY_CHARS: usize = 10_000;
/// Running cap across all newsletter items.
pub const BATCH_CHARS: usize = 100_000;
/// Cap for a single video transcript.
pub const TRANSCRIPT_CHARS: usize = 100 * 1024;

/// Truncation limits applied while assembling a prompt. Item-level and
/// batch-level budgets are independent policies.
#[derive(Debug, Clone, Default)]
pub struct PromptLimits {
    pub body_chars: Option<usize>,
    pub secondary_chars: Option<usize>,
    pub batch_chars: Option<usize>,
}

/// Render one delimited block per entry, concatenated in input order. Each
/// block is tagged with its 1-based index when more than one entry is
/// present. Returns `None` for an empty input: no content means no prompt.
pub fn render_entries(entries: &[&dyn DigestEntry], limits: &PromptLimits) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let tag_index = entries.len() > 1;
    let mut budget = limits.batch_chars.map(CharBudget::new);
    let mut blocks = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        let block = render_block(*entry, tag_index.then_some(i + 1), limits);
        if let Some(budget) = budget.as_mut() {
            if !budget.admit(block.chars().count()) {
                break;
            }
        }
        blocks.push(block);
    }

    Some(blocks.join("\n"))
}

fn render_block(entry: &dyn DigestEntry, index: Option<usize>, limits: &PromptLimits) -> String {
    let mut block = String::from("---\n");

    match index {
        Some(i) => block.push_str(&format!("{} {}: {}\n", entry.kind_label(), i, entry.heading())),
        None => block.push_str(&format!("{}: {}\n", entry.kind_label(), entry.heading())),
    }
    block.push_str(&format!("{}: {}\n", entry.byline_label(), entry.byline()));
    block.push_str(&format!("SOURCE: {}\n", entry.source_label()));
    if let Some(link) = entry.link() {
        block.push_str(&format!("LINK: {link}\n"));
    }
    block.push('\n');

    let body = if entry.body().is_empty() {
        "No content available"
    } else {
        entry.body()
    };
    match limits.body_chars {
        Some(max) => block.push_str(&truncate_chars(body, max)),
        None => block.push_str(body),
    }
    block.push('\n');

    if let Some(secondary) = entry.secondary() {
        block.push_str("\nTRANSCRIPT:\n");
        match limits.secondary_chars {
            Some(max) => block.push_str(&truncate_chars(secondary, max)),
            None => block.push_str(secondary),
        }
        block.push('\n');
    }

    block.push_str("---");
    block
}

/// Prompt for the daily meeting digest: one detailed record per meeting.
pub fn meetings_prompt(meetings: &[MeetingRecord]) -> Option<String> {
    let entries: Vec<&dyn DigestEntry> = meetings.iter().map(|m| m as &dyn DigestEntry).collect();
    let blocks = render_entries(
        &entries,
        &PromptLimits {
            body_chars: None,
            secondary_chars: Some(MEETING_TRANSCRIPT_CHARS),
            batch_chars: None,
        },
    )?;

    Some(format!(
        "You are creating detailed meeting records for a CRM/database. Preserve valuable \
         information - don't reduce to executive bullet points.\n\n\
         You are processing {count} meetings from today.\n\n\
         For EACH meeting, provide a record including:\n\n\
         1. **Meeting Context**: Who was there, what company/organization, purpose of the \
         meeting (2-3 sentences)\n\
         2. **Discussion Overview**: Brief summary of main topics covered (3-5 bullet points max)\n\
         3. **Key Information**: Important facts, metrics, timelines, details mentioned - be \
         thorough here\n\
         4. **Decisions & Outcomes**: What was decided or agreed upon\n\
         5. **Action Items**: Specific next steps with owners if mentioned\n\
         6. **Open Questions**: Unresolved questions or topics to follow up on\n\n\
         Format your response as clean HTML. Use:\n\
         - <h2> for each meeting title\n\
         - <h3> for section headers within each meeting\n\
         - <ul><li> for bullet points\n\
         - <p> for paragraphs\n\
         - <strong> for emphasis on important items\n\
         - <hr> to separate meetings\n\n\
         Keep Discussion Overview brief. Put the detail in Key Information instead.\n\n\
         Here are today's meetings:\n\n\
         {blocks}\n",
        count = meetings.len(),
    ))
}

/// Prompt for the newsletter digest: one section per source, never grouped
/// by theme.
pub fn newsletter_prompt(items: &[ContentItem]) -> Option<String> {
    let entries: Vec<&dyn DigestEntry> = items.iter().map(|i| i as &dyn DigestEntry).collect();
    let blocks = render_entries(
        &entries,
        &PromptLimits {
            body_chars: Some(ITEM_BODY_CHARS),
            secondary_chars: None,
            batch_chars: Some(BATCH_CHARS),
        },
    )?;

    Some(format!(
        "You are a helpful assistant that summarizes daily newsletters and articles. Your \
         goal is to create a concise, well-organized digest that captures the key insights \
         and important information from the day's content.\n\n\
         IMPORTANT: Summarize each newsletter/article separately. Each summary section MUST \
         have a header that clearly identifies the source. Do NOT group content by theme - \
         keep each source's summary in its own distinct section.\n\n\
         For each newsletter/article:\n\
         1. Use the source name as the section header\n\
         2. Identify the main topic or thesis\n\
         3. Extract 2-3 key takeaways or insights\n\
         4. Note any actionable items or important dates/events\n\n\
         Format your response as clean HTML suitable for an email digest. Use:\n\
         - <h2> for the source name\n\
         - <h3> for the article title or subject if relevant\n\
         - <ul><li> for key points\n\
         - <p> for any additional context\n\
         - <a href=\"...\"> for links to original articles when available\n\n\
         Here is the content to summarize:\n\n\
         {blocks}\n",
    ))
}

/// Prompt for a single video transcript.
pub fn transcript_prompt(transcript: &str) -> String {
    let transcript = truncate_chars(transcript, TRANSCRIPT_CHARS);
    format!(
        "Summarize this video transcript. Extract:\n\n\
         1. **Main Topic & Thesis**: What is this video about? What's the central argument \
         or message?\n\n\
         2. **Key Learnings** (bullet points): What are the most important takeaways?\n\n\
         3. **Notable Quotes or Insights**: Any memorable statements or unique perspectives?\n\n\
         4. **Actionable Takeaways**: What can someone do with this information?\n\n\
         Keep the summary concise but comprehensive.\n\n\
         Here's the transcript:\n\n\
         {transcript}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::truncate::TRUNCATION_MARKER;
    use dg_core::ContentKind;

    fn meeting(title: &str, transcript: Option<String>) -> MeetingRecord {
        MeetingRecord::new(
            title.to_string(),
            vec!["a@b.com".to_string(), "c@d.com".to_string()],
            "Discussed the roadmap.".to_string(),
            transcript,
        )
    }

    fn article(title: &str, body: &str) -> ContentItem {
        ContentItem {
            title: title.to_string(),
            author: "Jane".to_string(),
            published_at: None,
            body: body.to_string(),
            source: "Test Feed".to_string(),
            link: Some("https://example.com/a".to_string()),
            kind: ContentKind::Article,
        }
    }

    #[test]
    fn test_empty_input_yields_no_prompt() {
        assert!(meetings_prompt(&[]).is_none());
        assert!(newsletter_prompt(&[]).is_none());
        assert!(render_entries(&[], &PromptLimits::default()).is_none());
    }

    #[test]
    fn test_single_entry_untagged() {
        let meetings = vec![meeting("Kickoff", None)];
        let prompt = meetings_prompt(&meetings).unwrap();
        assert!(prompt.contains("MEETING: Kickoff"));
        assert!(!prompt.contains("MEETING 1:"));
        assert!(prompt.contains("ATTENDEES: a@b.com, c@d.com"));
        assert!(prompt.contains("---"));
    }

    #[test]
    fn test_multiple_entries_indexed_in_order() {
        let meetings = vec![meeting("First", None), meeting("Second", None)];
        let prompt = meetings_prompt(&meetings).unwrap();
        let first = prompt.find("MEETING 1: First").unwrap();
        let second = prompt.find("MEETING 2: Second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_transcript_truncated_with_marker() {
        let long = "x".repeat(MEETING_TRANSCRIPT_CHARS + 100);
        let meetings = vec![meeting("Long", Some(long))];
        let prompt = meetings_prompt(&meetings).unwrap();
        assert!(prompt.contains(TRUNCATION_MARKER));
        assert!(prompt.contains("TRANSCRIPT:"));
    }

    #[test]
    fn test_batch_budget_stops_items() {
        let items: Vec<ContentItem> = (0..30)
            .map(|i| article(&format!("Item {i}"), &"y".repeat(ITEM_BODY_CHARS)))
            .collect();
        let prompt = newsletter_prompt(&items).unwrap();
        // 10k chars per block against a 100k running budget: the tail of the
        // batch never makes it in.
        assert!(prompt.contains("ARTICLE 1: Item 0"));
        assert!(!prompt.contains("Item 29"));
    }

    #[test]
    fn test_newsletter_includes_link_and_source() {
        let items = vec![article("Post", "Body text")];
        let prompt = newsletter_prompt(&items).unwrap();
        assert!(prompt.contains("SOURCE: Test Feed"));
        assert!(prompt.contains("LINK: https://example.com/a"));
        assert!(prompt.contains("FROM: Jane"));
    }

    #[test]
    fn test_empty_body_placeholder() {
        let items = vec![article("Empty", "")];
        let prompt = newsletter_prompt(&items).unwrap();
        assert!(prompt.contains("No content available"));
    }

    #[test]
    fn test_transcript_prompt_truncates() {
        let long = "z".repeat(TRANSCRIPT_CHARS + 1);
        let prompt = transcript_prompt(&long);
        assert!(prompt.contains(TRUNCATION_MARKER));

        let short = transcript_prompt("short transcript");
        assert!(short.contains("short transcript"));
        assert!(!short.contains(TRUNCATION_MARKER));
    }
}
