//! Directory listing page

use crate::fs::DirEntry;
use std::fmt::Write;

/// Render a bare listing: one link per entry, directories suffixed with `/`
pub fn render_listing(entries: &[DirEntry]) -> String {
    let mut html = String::from(
        "<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n<pre>\n",
    );
    for entry in entries {
        let slash = if entry.is_dir { "/" } else { "" };
        let _ = writeln!(
            html,
            "<a href=\"./{}{slash}\">{}{slash}</a>",
            urlencoding::encode(&entry.name),
            escape_html(&entry.name),
        );
    }
    html.push_str("</pre>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
