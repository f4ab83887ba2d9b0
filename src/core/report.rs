//! HTML rendering of the node table.
//!
//! Usage columns are shaded by the first number found in their text:
//! 60..80 is a warning, 80 and above is critical.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::domain::{Field, NormalizedRecord};

lazy_static! {
    static ref FIRST_NUMBER: Regex = Regex::new(r"[0-9]+").expect("static regex");
}

pub const WARNING_PERCENT: u64 = 60;
pub const CRITICAL_PERCENT: u64 = 80;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UsageLevel {
    Normal,
    Warning,
    Critical,
}

impl UsageLevel {
    pub fn from_percent(value: u64) -> Self {
        if value >= CRITICAL_PERCENT {
            UsageLevel::Critical
        } else if value >= WARNING_PERCENT {
            UsageLevel::Warning
        } else {
            UsageLevel::Normal
        }
    }

    /// Text with no digits is never shaded.
    pub fn from_description(text: &str) -> Self {
        extract_percent(text).map(Self::from_percent).unwrap_or(UsageLevel::Normal)
    }

    pub fn background(self) -> Option<&'static str> {
        match self {
            UsageLevel::Normal => None,
            UsageLevel::Warning => Some("#F9E79F"),
            UsageLevel::Critical => Some("#F5B7B1"),
        }
    }
}

/// First run of ASCII digits. Other scripts' digits are not numbers here.
/// A run too long for u64 saturates.
pub fn extract_percent(text: &str) -> Option<u64> {
    FIRST_NUMBER
        .find(text)
        .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
}

/// Columns that get threshold shading.
pub fn is_usage_field(field: Field) -> bool {
    matches!(field, Field::DiskUsage | Field::CpuUsage | Field::MemoryUsage)
}

pub fn cell_level(field: Field, value: &str) -> UsageLevel {
    if is_usage_field(field) && !value.is_empty() {
        UsageLevel::from_description(value)
    } else {
        UsageLevel::Normal
    }
}

const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8" />
    <style type="text/css">
    table {
        border-radius:3px;
        border-collapse: collapse;
        height: auto;
        max-width: 900px;
        padding:5px;
        width: 100%;
    }
    th {
        background:#CACFD2;
        font-size:13px;
        font-weight: 300;
        padding:10px;
        text-align:center;
        border: 2px solid;
    }
    tr {
        font-size:16px;
        font-weight:normal;
        border: 2px solid;
    }
    td {
        padding:10px;
        text-align:left;
        font-weight:300;
        font-size:13px;
        border: 2px solid;
    }
    </style>
</head>
<body>
    <table>
"#;

const TAIL: &str = r#"    </table>
</body>
</html>
"#;

/// Builds the standalone document. An empty slice yields a header-only table.
pub fn render_report(records: &[NormalizedRecord]) -> String {
    let mut html = String::with_capacity(HEAD.len() + TAIL.len() + records.len() * 512);
    html.push_str(HEAD);

    // Header comes from the fixed column list, so an empty report still has one.
    html.push_str("        <thead>\n            <tr>");
    for field in Field::ALL {
        html.push_str("<th>");
        html.push_str(field.name());
        html.push_str("</th>");
    }
    html.push_str("</tr>\n        </thead>\n        <tbody>\n");

    for record in records {
        html.push_str("            <tr>");
        for (field, value) in record.cells() {
            push_cell(&mut html, cell_level(field, value), value);
        }
        html.push_str("</tr>\n");
    }

    html.push_str("        </tbody>\n");
    html.push_str(TAIL);
    html
}

fn push_cell(html: &mut String, level: UsageLevel, value: &str) {
    match level.background() {
        Some(color) => {
            html.push_str(r#"<td style="background:"#);
            html.push_str(color);
            html.push_str(r#"">"#);
        }
        None => html.push_str("<td>"),
    }
    push_escaped(html, value);
    html.push_str("</td>");
}

fn push_escaped(html: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => html.push_str("&amp;"),
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '"' => html.push_str("&quot;"),
            _ => html.push(c),
        }
    }
}
