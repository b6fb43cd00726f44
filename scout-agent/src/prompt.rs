//! Prompt construction for the summarization stage
//!
//! Pure functions rendering the instruction-and-context prompt sent to the
//! language model. The `# Summary` / `# Sources` headings mandated here are
//! the exact contract the response parser relies on.

use crate::types::SearchResult;

/// Render the numbered context block from ranked search results
pub fn build_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. [{}]({})\n{}\n", i + 1, r.title, r.url, r.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the full research prompt for a query and its search results
pub fn build_research_prompt(query: &str, results: &[SearchResult]) -> String {
    let context_text = build_context(results);
    format!(
        r#"
You are a meticulous research assistant.

Task: Research the following query:
"{query}"

Context: Here are some relevant search results:
{context_text}

Rules:
- Produce a detailed Markdown summary with sections.
- Do NOT use placeholders.
- Always include at least 3 sources in the 'Sources' section as markdown links.

Format strictly as:

# Summary
<actual summary>

# Sources
- [Title](URL)
- [Title](URL)
- [Title](URL)
"#
    )
}
