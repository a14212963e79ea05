//! Markdown to HTML for the preview pane.

use pulldown_cmark::{Event, Options, Parser, html};

/// Render `text` as an HTML fragment. Raw HTML in the source is shown as
/// text rather than passed through.
pub fn render_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}
