//! Prompt assembly for one classification batch

/// Instruction used when the caller supplies no prompt of their own
pub const DEFAULT_PROMPT: &str = "For each of the following webpages, determine if it describes a business process or workflow that could be automated with RPA. If yes, summarize the RPA opportunity in one sentence.\n\
Respond ONLY with a JSON array using this exact format:\n\
[{\"url\": \"...\", \"summary\": \"...\", \"rpa_opportunity\": \"...\"}]\n\n";

/// Separator placed between page sections
pub const PREVIEW_DELIMITER: &str = "\n\n---\n\n";

/// Plain-text excerpt of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePreview {
    pub url: String,
    pub text: String,
}

/// Builds the prompt for one batch
///
/// A blank or missing `prompt` falls back to [`DEFAULT_PROMPT`]. The
/// instructions are followed by a blank line and one `URL:`/`Preview:`
/// section per page, in batch order.
pub fn build_prompt(prompt: Option<&str>, previews: &[PagePreview]) -> String {
    let intro = prompt
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(DEFAULT_PROMPT);

    let sections = previews
        .iter()
        .map(|preview| format!("URL: {}\nPreview: {}", preview.url, preview.text))
        .collect::<Vec<_>>()
        .join(PREVIEW_DELIMITER);

    format!("{}\n\n{}", intro.trim_end(), sections)
}
