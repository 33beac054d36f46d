//! Server-rendered HTML pages.

use bizdir_core::{
    ANY_OPTION, DisplayCell, DisplayTable, FilterSet, MAX_PAGE_SIZE, MIN_PAGE_SIZE, PageWindow,
};
use bizdir_database::{DirectoryPage, FilterOptions, Kpis};
use std::borrow::Cow;
use std::fmt::Write;

const TITLE: &str = "Business Directory";

const STYLE: &str = r#"
* { font-family: ui-sans-serif, -apple-system, system-ui, "Helvetica Neue", Arial; }
body { margin: 0; display: flex; min-height: 100vh; }
aside { width: 280px; padding: 16px; background: #f9fafb; border-right: 1px solid #eee; }
aside label { display: block; margin-top: 12px; font-size: 0.9rem; color: #374151; }
aside input, aside select { width: 100%; box-sizing: border-box; margin-top: 4px; }
main { flex: 1; padding: 16px 24px 48px; overflow-x: auto; }
h1 { letter-spacing: -0.02em; margin-bottom: 0.15rem; }
.subtle { color: #6b7280; margin-bottom: 1rem; }
.kpis { display: flex; gap: 12px; }
.kpi { flex: 1; padding: 14px 16px; border: 1px solid #eee; border-radius: 14px; box-shadow: 0 1px 4px rgba(0,0,0,0.04); }
.kpi .label { font-size: 0.82rem; color: #6b7280; }
.kpi .value { font-size: 1.4rem; font-weight: 700; margin-top: 2px; }
.pager { display: flex; gap: 8px; align-items: center; justify-content: center; margin: 12px 0; }
.pager .info { color: #6b7280; }
table { width: 100%; border-collapse: separate; border-spacing: 0; }
thead th { position: sticky; top: 0; background: #fff; border-bottom: 1px solid #eee; text-align: left; }
tbody tr:nth-child(even) { background: #fafafa; }
td, th { padding: 10px 12px; vertical-align: top; white-space: nowrap; max-width: 420px; overflow: hidden; text-overflow: ellipsis; }
a { text-decoration: none; }
.error { padding: 12px 16px; border-radius: 10px; background: #fef2f2; color: #991b1b; }
.info-box { padding: 12px 16px; border-radius: 10px; background: #eff6ff; color: #1e40af; }
.downloads { display: flex; gap: 16px; margin-top: 16px; }
"#;

/// Escapes text for use in HTML content and quoted attributes.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Formats a count with comma thousands separators.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = TITLE,
        style = STYLE,
        body = body
    )
}

/// The password form, with the failure notice after a wrong attempt.
pub fn login_page(wrong_password: bool) -> String {
    let notice = if wrong_password {
        "<p class=\"error\">Wrong password</p>"
    } else {
        ""
    };
    layout(&format!(
        "<main>\n<h1>{}</h1>\n<form method=\"post\" action=\"/login\">\n\
         <label>Password <input type=\"password\" name=\"password\" autofocus></label>\n\
         <button type=\"submit\">Enter</button>\n</form>\n{}\n</main>",
        TITLE, notice
    ))
}

/// A page that only shows an error, used when the directory cannot be opened.
pub fn error_page(message: &str) -> String {
    layout(&format!(
        "<main>\n<h1>{}</h1>\n<p class=\"error\">{}</p>\n</main>",
        TITLE,
        escape_html(message)
    ))
}

/// What the results area shows.
#[derive(Debug, Clone)]
pub enum ResultsPanel {
    /// A page of results
    Page {
        /// Counters, window and records
        page: DirectoryPage,
        /// The records formatted for display
        table: DisplayTable,
    },
    /// A query failed; the message is shown inline
    Failed(String),
}

/// The browsing page: filter sidebar, counters, pager and results.
pub fn directory_page(
    options: &FilterOptions,
    filters: &FilterSet,
    page_size: u32,
    panel: &ResultsPanel,
) -> String {
    let mut body = String::new();
    body.push_str(&sidebar(options, filters, page_size));
    body.push_str("<main>\n");
    let _ = write!(
        body,
        "<h1>{}</h1>\n<div class=\"subtle\">Fast search &amp; filters on a normalized dataset</div>\n",
        TITLE
    );

    match panel {
        ResultsPanel::Failed(message) => {
            let _ = write!(
                body,
                "<p class=\"error\">Query failed: {}</p>\n",
                escape_html(message)
            );
        }
        ResultsPanel::Page { page, table } => {
            body.push_str(&kpi_cards(&page.kpis));
            body.push_str(&pager(&page.window));
            body.push_str(&results(table, page.window.page));
        }
    }

    body.push_str("</main>");
    layout(&body)
}

fn sidebar(options: &FilterOptions, filters: &FilterSet, page_size: u32) -> String {
    let mut html = String::from("<aside>\n<h2>Filters</h2>\n<form method=\"get\" action=\"/search\">\n");
    let _ = write!(
        html,
        "<label>Keyword (name / address / website)\
         <input type=\"text\" name=\"keyword\" value=\"{}\"></label>\n",
        escape_html(filters.keyword().as_deref().unwrap_or(""))
    );
    html.push_str(&selector("City", "city", options.cities(), filters.city_value()));
    html.push_str(&selector("State", "state", options.states(), filters.state_value()));
    let _ = write!(
        html,
        "<label>ZIP / Postal (starts with)\
         <input type=\"text\" name=\"zip\" value=\"{}\"></label>\n<hr>\n\
         <label>Rows per page<input type=\"number\" name=\"page_size\" \
         min=\"{}\" max=\"{}\" step=\"10\" value=\"{}\"></label>\n\
         <p><button type=\"submit\">Apply</button></p>\n</form>\n\
         <form method=\"post\" action=\"/logout\"><button type=\"submit\">Log out</button></form>\n\
         </aside>\n",
        escape_html(filters.zip_prefix().as_deref().unwrap_or("")),
        MIN_PAGE_SIZE,
        MAX_PAGE_SIZE,
        page_size
    );
    html
}

/// A `<select>` with `(any)` first; nothing when there are no options.
fn selector(label: &str, name: &str, values: &[String], selected: Option<&str>) -> String {
    if values.is_empty() {
        return String::new();
    }
    let mut html = format!("<label>{}<select name=\"{}\">\n", label, name);
    let _ = writeln!(html, "<option value=\"{0}\">{0}</option>", ANY_OPTION);
    for value in values {
        let escaped = escape_html(value);
        let mark = if selected == Some(value.as_str()) {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(html, "<option value=\"{0}\"{1}>{0}</option>", escaped, mark);
    }
    html.push_str("</select></label>\n");
    html
}

fn kpi_cards(kpis: &Kpis) -> String {
    let cards = [
        ("Total Rows", kpis.total_rows),
        ("Rows (filtered)", kpis.filtered_rows),
        ("Cities", kpis.distinct_cities),
        ("ZIPs (distinct)", kpis.distinct_zips),
    ];
    let mut html = String::from("<div class=\"kpis\">\n");
    for (label, value) in cards {
        let _ = writeln!(
            html,
            "<div class=\"kpi\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
            label,
            group_thousands(value)
        );
    }
    html.push_str("</div>\n<hr>\n");
    html
}

/// Pager caption shown between the Prev and Next buttons.
pub fn pager_text(window: &PageWindow) -> String {
    format!(
        "Page <b>{}</b> of <b>{}</b> \u{2014} showing {}\u{2013}{} of {}",
        window.page, window.max_page, window.start_row, window.end_row, window.filtered_rows
    )
}

fn pager(window: &PageWindow) -> String {
    let prev_disabled = if window.page <= 1 { " disabled" } else { "" };
    let next_disabled = if window.page >= window.max_page {
        " disabled"
    } else {
        ""
    };
    format!(
        "<div class=\"pager\">\n\
         <form method=\"post\" action=\"/page/prev\"><button type=\"submit\"{}>&#9664; Prev</button></form>\n\
         <span class=\"info\">{}</span>\n\
         <form method=\"post\" action=\"/page/next\"><button type=\"submit\"{}>Next &#9654;</button></form>\n\
         </div>\n",
        prev_disabled,
        pager_text(window),
        next_disabled
    )
}

fn cell_html(cell: &DisplayCell) -> Cow<'_, str> {
    match cell {
        DisplayCell::Text(text) => escape_html(text),
        DisplayCell::Link(url) => Cow::Owned(format!(
            "<a href=\"{}\" target=\"_blank\">{}</a>",
            escape_html(url),
            DisplayCell::LINK_LABEL
        )),
        DisplayCell::Empty => Cow::Borrowed(""),
    }
}

fn results(table: &DisplayTable, page: u32) -> String {
    if table.is_empty() {
        return "<p class=\"info-box\">No results. Adjust filters or keyword.</p>\n".to_string();
    }

    let mut html = String::from(
        "<h2>Results</h2>\n<div class=\"subtle\">Use the filters on the left. \
         Download the current page or the full filtered data below.</div>\n<table>\n<thead><tr>",
    );
    for header in table.headers() {
        let _ = write!(html, "<th>{}</th>", header);
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in table.rows() {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", cell_html(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    let _ = write!(
        html,
        "<div class=\"downloads\">\n\
         <a href=\"/export/page.csv\" download=\"{}\">Download This Page (CSV)</a>\n\
         <a href=\"/export/all.csv\" download=\"{}\">Download All Filtered (CSV)</a>\n</div>\n",
        bizdir_database::page_export_filename(page),
        bizdir_database::FULL_EXPORT_FILENAME
    );
    html
}
