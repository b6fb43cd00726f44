//! Parsing of semi-structured model output
//!
//! The summarization prompt mandates a `# Summary` section followed by a
//! `# Sources` section of markdown links. Model output is free text though,
//! so parsing is total: malformed input never fails, it degrades to a
//! best-effort [`ParsedContent`].

use crate::types::{ParsedContent, Source};

const SUMMARY_HEADER: &str = "# Summary";
const SOURCES_HEADER: &str = "# Sources";

/// Classify one line of the sources section
///
/// Recognized shapes, after stripping an optional `- ` / `* ` bullet:
/// - `[title](url)` markdown links,
/// - bare lines starting with `http`, used as both title and url.
///
/// Every other shape is ignored, as is a link line whose brackets cannot be
/// sliced apart.
fn classify_source_line(line: &str) -> Option<Source> {
    let mut s = line.trim();
    if let Some(rest) = s.strip_prefix("- ").or_else(|| s.strip_prefix("* ")) {
        s = rest.trim();
    }

    if s.starts_with('[') && s.contains("](") && s.ends_with(')') {
        let title_end = s.find(']')?;
        let title = &s[1..title_end];
        let url_start = s[title_end..].find('(').map(|i| title_end + i + 1)?;
        let url_end = s[url_start..].find(')').map(|i| url_start + i)?;
        let url = &s[url_start..url_end];
        Some(Source {
            title: title.to_string(),
            url: url.to_string(),
        })
    } else if s.starts_with("http") {
        Some(Source {
            title: s.to_string(),
            url: s.to_string(),
        })
    } else {
        None
    }
}

/// Extract a summary body and cited sources from raw model output
///
/// Sources are taken from everything after the first `# Sources` occurrence,
/// one recognized line each, in document order and without deduplication.
/// The summary is the text strictly between the first `# Summary` and the
/// first subsequent `# Sources` (or the end of the text); when no `# Summary`
/// header is present the whole trimmed content is used.
pub fn parse_response(content: &str) -> ParsedContent {
    let sources = match content.find(SOURCES_HEADER) {
        Some(idx) => content[idx + SOURCES_HEADER.len()..]
            .lines()
            .filter_map(classify_source_line)
            .collect(),
        None => Vec::new(),
    };

    let summary_md = match content.find(SUMMARY_HEADER) {
        Some(idx) => {
            let body = &content[idx + SUMMARY_HEADER.len()..];
            let end = body.find(SOURCES_HEADER).unwrap_or(body.len());
            body[..end].trim().to_string()
        }
        None => content.trim().to_string(),
    };

    ParsedContent { summary_md, sources }
}
