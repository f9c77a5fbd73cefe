//! HTML document rendering.
//!
//! Wraps a [`PageView`] into a self-contained HTML page: a sidebar with the
//! page selector, the upload control and a dataset summary, plus the page
//! blocks with markdown rendered and charts inlined as SVG. No scripts.

mod style;

use pulldown_cmark::{Options, Parser, html};

use crate::charts::svg::render_chart;
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::pages::{Block, Page, PageView};
use crate::types::DatasetInfo;

/// Sidebar state that is not part of the page itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentContext<'a> {
    /// Summary of the loaded dataset, if any.
    pub dataset: Option<&'a DatasetInfo>,
    /// Message from the last failed upload.
    pub upload_error: Option<&'a str>,
    /// Show navigation links and the upload/clear forms. Off for documents
    /// written to disk.
    pub interactive: bool,
}

/// Render `view` as a complete HTML document.
pub fn render_document(view: &PageView, ctx: &DocumentContext<'_>, config: &DashboardConfig) -> Result<String> {
    let mut body = String::new();
    for block in &view.blocks {
        body.push_str(&render_block(block, config)?);
        body.push('\n');
    }

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{page} · Customer Satisfaction Case Study</title>
    <style>{css}</style>
</head>
<body>
    <aside>
        {navigation}
        {upload}
    </aside>
    <main>
        <h1>{title}</h1>
        {body}
    </main>
</body>
</html>
"#,
        page = escape_html(view.page.display_name()),
        css = style::inline_css(),
        navigation = render_navigation(view.page, ctx.interactive),
        upload = render_upload_section(view.page, ctx),
        title = escape_html(&view.title),
    ))
}

/// Render one block as an HTML fragment.
pub fn render_block(block: &Block, config: &DashboardConfig) -> Result<String> {
    Ok(match block {
        Block::Markdown { text } => markdown_to_html(text),
        Block::Warning { text } => format!(r#"<div class="warning">{}</div>"#, escape_html(text)),
        Block::Chart { chart } => format!(
            r#"<figure class="chart">{}</figure>"#,
            render_chart(chart, config.chart_width, config.chart_height)?
        ),
        Block::Error { title, code, message } => format!(
            r#"<div class="error"><strong>{}</strong><p>{}</p><code>{}</code></div>"#,
            escape_html(title),
            escape_html(message),
            escape_html(code)
        ),
    })
}

/// CommonMark with tables and strikethrough.
pub fn markdown_to_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::with_capacity(text.len() * 2);
    html::push_html(&mut out, Parser::new_ext(text, options));
    out
}

fn render_navigation(current: Page, interactive: bool) -> String {
    let items: String = Page::ALL
        .iter()
        .map(|page| {
            let class = if *page == current { r#" class="active""# } else { "" };
            let label = escape_html(page.display_name());
            if interactive {
                format!(r#"<li{class}><a href="/?page={}">{label}</a></li>"#, page.slug())
            } else {
                format!("<li{class}><span>{label}</span></li>")
            }
        })
        .collect();

    format!(
        r#"<section><h2>Navigation</h2><nav aria-label="Select Page:"><ul>{items}</ul></nav></section>"#
    )
}

fn render_upload_section(current: Page, ctx: &DocumentContext<'_>) -> String {
    let mut out = String::from("<section><h2>Upload Dataset</h2>");

    if ctx.interactive {
        out.push_str(&format!(
            r#"<form action="/upload?page={slug}" method="post" enctype="multipart/form-data">
<label for="file">Upload your CSV</label>
<input id="file" type="file" name="file" accept=".csv,text/csv" required>
<button type="submit">Upload</button>
</form>"#,
            slug = current.slug()
        ));
    }

    if let Some(message) = ctx.upload_error {
        out.push_str(&format!(r#"<div class="error">{}</div>"#, escape_html(message)));
    }

    if let Some(info) = ctx.dataset {
        out.push_str(&render_dataset_summary(info));
        if ctx.interactive {
            out.push_str(&format!(
                r#"<form action="/clear?page={}" method="post"><button type="submit">Clear dataset</button></form>"#,
                current.slug()
            ));
        }
    }

    out.push_str("</section>");
    out
}

fn render_dataset_summary(info: &DatasetInfo) -> String {
    let mut out = format!(
        r#"<dl class="dataset-summary"><dt>File</dt><dd>{}</dd><dt>Size</dt><dd>{}</dd><dt>Rows</dt><dd>{}</dd><dt>Columns</dt><dd>{}</dd></dl>"#,
        escape_html(&info.name),
        format_bytes(info.size_bytes),
        info.row_count,
        info.column_count
    );
    if !info.columns.is_empty() {
        out.push_str(&render_column_table(info));
    }
    out
}

/// Per-column dtype and null count.
fn render_column_table(info: &DatasetInfo) -> String {
    let rows: String = info
        .columns
        .iter()
        .map(|col| {
            format!(
                r#"<tr><td>{}</td><td>{}</td><td class="nulls">{}</td></tr>"#,
                escape_html(&col.name),
                escape_html(&col.dtype),
                col.null_count
            )
        })
        .collect();

    format!(
        r#"<table class="column-table"><thead><tr><th>Column</th><th>Type</th><th>Nulls</th></tr></thead><tbody>{rows}</tbody></table>"#
    )
}

fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DatasetState;
    use crate::pages::render_page;
    use crate::types::ColumnInfo;

    fn info() -> DatasetInfo {
        DatasetInfo {
            name: "orders <q1>.csv".into(),
            size_bytes: 2048,
            row_count: 3,
            column_count: 2,
            columns: vec![
                ColumnInfo {
                    name: "order_delivered_customer_date".into(),
                    dtype: "datetime[ms]".into(),
                    null_count: 1,
                },
                ColumnInfo {
                    name: "delivery_delay".into(),
                    dtype: "i64".into(),
                    null_count: 0,
                },
            ],
        }
    }

    #[test]
    fn test_markdown_to_html() {
        let html = markdown_to_html("### Key Findings\n* **Delivery delays** drive negative reviews.");
        assert!(html.contains("<h3>Key Findings</h3>"));
        assert!(html.contains("<strong>Delivery delays</strong>"));
        assert!(html.contains("<li>"));
    }

    #[test]
    fn test_document_marks_active_page_and_shows_warning() {
        let config = DashboardConfig::default();
        let view = render_page(Page::FactorsAndCauses, &DatasetState::Absent, &config);
        let ctx = DocumentContext {
            interactive: true,
            ..Default::default()
        };
        let html = render_document(&view, &ctx, &config).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<li class="active"><a href="/?page=factors-and-causes">Factors and Causes</a></li>"#));
        assert!(html.contains(r#"<div class="warning">"#));
        assert!(html.contains(r#"action="/upload?page=factors-and-causes""#));
        assert!(!html.contains("<svg"));
        assert!(!html.contains("Clear dataset"));
    }

    #[test]
    fn test_static_document_has_no_forms() {
        let config = DashboardConfig::default();
        let view = render_page(Page::Welcome, &DatasetState::Absent, &config);
        let dataset = info();
        let ctx = DocumentContext {
            dataset: Some(&dataset),
            ..Default::default()
        };
        let html = render_document(&view, &ctx, &config).unwrap();

        assert!(!html.contains("<form"));
        assert!(html.contains(r#"<a href="https://drive.google.com/file/d/1h02g6ObGWiTID990u2pWTw5o3aNEYzSb/view?usp=sharing">link</a>"#));
        assert!(html.contains("orders &lt;q1&gt;.csv"));
        assert!(html.contains("2.0 KB"));
    }

    #[test]
    fn test_summary_lists_column_types_and_nulls() {
        let html = render_dataset_summary(&info());

        assert!(html.contains(r#"<table class="column-table">"#));
        assert!(html.contains(
            r#"<tr><td>order_delivered_customer_date</td><td>datetime[ms]</td><td class="nulls">1</td></tr>"#
        ));
        assert!(html.contains(r#"<tr><td>delivery_delay</td><td>i64</td><td class="nulls">0</td></tr>"#));
    }

    #[test]
    fn test_upload_error_is_escaped() {
        let config = DashboardConfig::default();
        let view = render_page(Page::Welcome, &DatasetState::Absent, &config);
        let ctx = DocumentContext {
            upload_error: Some("Failed to load x.csv: <bad>"),
            interactive: true,
            ..Default::default()
        };
        let html = render_document(&view, &ctx, &config).unwrap();
        assert!(html.contains("Failed to load x.csv: &lt;bad&gt;"));
    }

    #[test]
    fn test_error_block_renders_code() {
        let block = Block::Error {
            title: "Top Sellers".into(),
            code: "COLUMN_NOT_FOUND".into(),
            message: "Column 'seller_id' not found in dataset".into(),
        };
        let html = render_block(&block, &DashboardConfig::default()).unwrap();
        assert!(html.contains("<code>COLUMN_NOT_FOUND</code>"));
        assert!(html.contains("&#39;seller_id&#39;"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
