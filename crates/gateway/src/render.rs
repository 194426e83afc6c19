//! Sanitizing renderer: markdown reply text in, safe HTML out.
//!
//! Pure and deterministic. Raw HTML embedded in the reply is never
//! passed through: every `Html`/`InlineHtml` event is re-emitted as
//! plain text so the writer escapes it.

use pulldown_cmark::{html, Event, Options, Parser};

use tr_domain::error::{Error, Result};

/// Render a raw completion reply to sanitized HTML.
///
/// A renderer failure is a fatal server error: without it there is no
/// safe text to return.
pub fn render_reply(raw: &str) -> Result<String> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(raw, options).map(|event| match event {
        // Escape raw markup instead of emitting it.
        Event::Html(s) | Event::InlineHtml(s) => Event::Text(s),
        other => other,
    });

    let mut out = Vec::new();
    html::write_html_io(&mut out, events).map_err(|e| Error::Render(e.to_string()))?;
    let markup =
        String::from_utf8(out).map_err(|e| Error::Render(format!("invalid UTF-8: {e}")))?;

    // One-line replies come out as `<p>…</p>\n`; the trailing newline is
    // noise for JSON payloads.
    Ok(markup.trim_end().to_owned())
}
