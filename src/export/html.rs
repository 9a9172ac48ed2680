//! Standalone HTML report: header with mode, word limit and count, then one
//! card per lead. All lead and message text is escaped.

use std::fmt::Write;

use crate::outreach::OutreachTable;

/// Report header values.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub title: String,
    /// `"MOCK"` or `"API"`.
    pub mode: String,
    pub word_limit: usize,
}

const STYLE: &str = r#"
    *, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: system-ui, -apple-system, sans-serif;
      background: linear-gradient(135deg, #0B1220 0%, #0F1C2E 100%);
      color: #E8EEF6; padding: 2rem; min-height: 100vh;
    }
    .hero {
      border: 1px solid rgba(255,255,255,0.08); background: #121B2A;
      border-radius: 16px; padding: 20px 24px; margin-bottom: 14px;
    }
    .pill {
      background: rgba(62,142,251,0.15); color: #3E8EFB;
      padding: 4px 10px; border-radius: 999px; font-size: 0.8rem;
    }
    .meta { color: #A7B3C5; font-size: 0.9rem; margin-top: 0.5rem; }
    .card {
      border: 1px solid rgba(255,255,255,0.08); background: #121B2A;
      border-radius: 12px; padding: 14px 18px; margin-bottom: 10px;
    }
    .who { color: #A7B3C5; font-size: 0.85rem; margin-bottom: 0.4rem; }
    .msg { white-space: pre-wrap; line-height: 1.45; }
    .msg.error { color: #F28B82; }
"#;

/// Render the report as a complete HTML document.
pub fn render_html(table: &OutreachTable, meta: &ReportMeta) -> String {
    let title = escape(&meta.title);
    let mut out = String::with_capacity(4096 + table.len() * 512);

    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "<!doctype html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\" />\n  \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n  \
         <title>{title}</title>\n  <style>{STYLE}  </style>\n</head>\n<body>\n"
    );
    let _ = write!(
        out,
        "  <div class=\"hero\">\n    <span class=\"pill\">{mode}</span>\n    <h1>{title}</h1>\n    \
         <div class=\"meta\">Word limit: {limit} · Messages: {count}</div>\n  </div>\n",
        mode = escape(&meta.mode),
        limit = meta.word_limit,
        count = table.len(),
    );

    for row in &table.rows {
        let lead = &row.lead;
        let name = if lead.name().is_empty() { "(no name)" } else { lead.name() };
        let class = if row.message.is_failed() { "msg error" } else { "msg" };
        let _ = write!(
            out,
            "  <div class=\"card\">\n    <div class=\"who\">{name} · {role} @ {company}{email}</div>\n    \
             <div class=\"{class}\">{message}</div>\n  </div>\n",
            name = escape(name),
            role = escape(lead.role()),
            company = escape(lead.company()),
            email = if lead.email().is_empty() {
                String::new()
            } else {
                format!(" · {}", escape(lead.email()))
            },
            message = escape(&row.outreach_message()),
        );
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Minimal HTML text escaping for element content and quoted attributes.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::{Lead, LeadField};
    use crate::llm::ProviderError;
    use crate::outreach::{MessageOutcome, OutreachResult};

    fn meta() -> ReportMeta {
        ReportMeta { title: "Outreach Pack".into(), mode: "MOCK".into(), word_limit: 80 }
    }

    #[test]
    fn header_carries_mode_limit_and_count() {
        let table = OutreachTable {
            columns: LeadField::ALL.to_vec(),
            rows: vec![OutreachResult {
                lead: Lead { name: Some("Ada".into()), role: Some("CTO".into()), ..Lead::default() },
                message: MessageOutcome::Generated("Hi Ada".into()),
            }],
        };
        let html = render_html(&table, &meta());
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>Outreach Pack</title>"));
        assert!(html.contains(">MOCK</span>"));
        assert!(html.contains("Word limit: 80 · Messages: 1"));
        assert!(html.contains("Ada · CTO @ "));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn user_text_is_escaped() {
        let table = OutreachTable {
            columns: vec![LeadField::Name],
            rows: vec![OutreachResult {
                lead: Lead { name: Some("<script>alert(1)</script>".into()), ..Lead::default() },
                message: MessageOutcome::Generated("Tom & Jerry's \"deal\"".into()),
            }],
        };
        let html = render_html(&table, &meta());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Tom &amp; Jerry&#39;s &quot;deal&quot;"));
    }

    #[test]
    fn failed_rows_get_error_class_and_missing_name_placeholder() {
        let table = OutreachTable {
            columns: vec![LeadField::Email],
            rows: vec![OutreachResult {
                lead: Lead { email: Some("x@y.z".into()), ..Lead::default() },
                message: MessageOutcome::Failed(ProviderError::Request("HTTP 401".into()).into()),
            }],
        };
        let html = render_html(&table, &meta());
        assert!(html.contains("class=\"msg error\">[ERROR] provider request failed: HTTP 401"));
        assert!(html.contains("(no name)"));
        assert!(html.contains(" · x@y.z"));
    }
}
