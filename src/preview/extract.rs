use scraper::{ElementRef, Html};

/// Elements whose content never counts as visible text
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "img", "input"];

/// Extracts the visible text of an HTML document, truncated to `max_chars`
///
/// Text nodes are trimmed, empty ones dropped, and the rest joined with a
/// single space. Subtrees rooted at `script`, `style`, `img` and `input` are
/// skipped. Truncation counts characters, not bytes.
///
/// # Example
///
/// ```
/// use rpa_scout::preview::extract_preview_text;
///
/// let html = "<html><body><h1>Invoices</h1><script>track()</script><p>Upload a PDF</p></body></html>";
/// assert_eq!(extract_preview_text(html, 800), "Invoices Upload a PDF");
/// assert_eq!(extract_preview_text(html, 8), "Invoices");
/// ```
pub fn extract_preview_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);

    let mut pieces = Vec::new();
    collect_text(document.root_element(), &mut pieces);

    let text = pieces.join(" ");
    text.trim().chars().take(max_chars).collect()
}

fn collect_text<'a>(element: ElementRef<'a>, pieces: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed);
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !SKIPPED_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, pieces);
            }
        }
    }
}
