/// Minimal HTML fragments for the streamed page.
///
/// A page is written in up to three pieces: [`header`] as soon as the
/// request arrives, optionally [`apology`] if the walk is slow, then
/// [`body`] with the table and closing tags. No template engine; every
/// interpolated string goes through [`escape`].
use crate::path::LogicalPath;
use dusleuth_core::encode::Row;
use std::fmt::Write;

/// Everything the final fragment shows.
#[derive(Debug)]
pub struct BodyView<'a> {
    pub path: &'a LogicalPath,
    pub rows: &'a [Row],
    /// Humanized grand total.
    pub total: &'a str,
    /// Pre-serialised chart JSON, if one was requested.
    pub chart: Option<&'a str>,
}

pub fn header(path: &LogicalPath) -> String {
    let path = escape(&path.to_string());
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>dusleuth: {path}</title>\n</head>\n<body>\n<h1>{path}</h1>\n"
    )
}

pub fn apology() -> String {
    "<p>Please wait, caches are cold...</p>\n".to_string()
}

pub fn body(view: &BodyView<'_>) -> String {
    let mut html = String::new();

    if !view.path.is_root() {
        let parent = view.path.parent();
        let _ = writeln!(
            html,
            "<p><a href=\"?path={}\">..</a> ({})</p>",
            path_query(&parent),
            escape(&parent.to_string())
        );
    }

    html.push_str("<table>\n<tr><th>Name</th><th>Share</th><th>Size</th></tr>\n");
    for row in view.rows {
        let name = escape(&row.name);
        let cell = if row.inaccessible {
            format!("{name}/ <em>(inaccessible)</em>")
        } else if row.is_dir {
            let href = path_query(&view.path.child(&row.name));
            format!("<a href=\"?path={href}\">{name}/</a>")
        } else {
            name
        };
        let _ = writeln!(
            html,
            "<tr><td>{cell}</td><td>{}</td><td>{}</td></tr>",
            row.percentage, row.size
        );
    }
    html.push_str("</table>\n");
    let _ = writeln!(html, "<p>Total: {}</p>", escape(view.total));

    if let Some(chart) = view.chart {
        // Keep `</script>` inside the payload from ending the element.
        let _ = writeln!(
            html,
            "<script type=\"application/json\" id=\"chart-data\">{}</script>",
            chart.replace("</", "<\\/")
        );
    }

    html.push_str("</body>\n</html>\n");
    html
}

pub fn server_error() -> String {
    "<p>Internal server error (see log)</p>\n</body>\n</html>\n".to_string()
}

/// Escape text for HTML element and attribute content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Query-string form of a logical path.
fn path_query(path: &LogicalPath) -> String {
    urlencoding::encode(&path.to_string()).into_owned()
}
