//! Rendered view model.
//!
//! Views produce these values; surfaces display them. They serialize to JSON
//! for machine consumers and implement `Display` as plain-text tables.

use std::fmt;

use serde::Serialize;

/// Text of the row shown in place of an empty table body.
pub const PLACEHOLDER_TEXT: &str = "No data available";

/// Status indicator shown in a table cell or section header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StatusTag {
    /// State not yet known (cold start).
    Loading,
    Active,
    /// Peer carried by an active stream from this source.
    ActiveFrom(String),
    Inactive,
    Idle,
    /// Connected for this long, no observed activity.
    Connected(String),
}

impl fmt::Display for StatusTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading..."),
            Self::Active => write!(f, "Active"),
            Self::ActiveFrom(source) => write!(f, "Active: {source}"),
            Self::Inactive => write!(f, "Inactive"),
            Self::Idle => write!(f, "Idle"),
            Self::Connected(elapsed) => write!(f, "Connected: {elapsed}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Status(StatusTag),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_status(&self) -> Option<&StatusTag> {
        match self {
            Self::Status(tag) => Some(tag),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Status(tag) => write!(f, "{tag}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableBody {
    Rows { rows: Vec<Vec<Cell>> },
    /// Single row spanning `colspan` columns.
    Placeholder { text: String, colspan: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub id: &'static str,
    pub columns: Vec<&'static str>,
    pub body: TableBody,
}

impl Table {
    /// Build a table, substituting the placeholder row when `rows` is empty.
    pub fn build(id: &'static str, columns: &[&'static str], rows: Vec<Vec<Cell>>) -> Self {
        let body = if rows.is_empty() {
            TableBody::Placeholder {
                text: PLACEHOLDER_TEXT.to_string(),
                colspan: columns.len(),
            }
        } else {
            TableBody::Rows { rows }
        };
        Self {
            id,
            columns: columns.to_vec(),
            body,
        }
    }

    /// Data rows. Empty for a placeholder body.
    pub fn rows(&self) -> &[Vec<Cell>] {
        match &self.body {
            TableBody::Rows { rows } => rows,
            TableBody::Placeholder { .. } => &[],
        }
    }

    /// Rendered row count, placeholder included.
    pub fn row_count(&self) -> usize {
        match &self.body {
            TableBody::Rows { rows } => rows.len(),
            TableBody::Placeholder { .. } => 1,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.body, TableBody::Placeholder { .. })
    }

    /// Text of column `col` for every data row.
    pub fn column(&self, col: usize) -> Vec<String> {
        self.rows()
            .iter()
            .filter_map(|row| row.get(col).map(ToString::to_string))
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        let rendered: Vec<Vec<String>> = self
            .rows()
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();
        for row in &rendered {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        write_line(f, &widths, &self.columns)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;

        match &self.body {
            TableBody::Placeholder { text, .. } => writeln!(f, "{text}"),
            TableBody::Rows { .. } => {
                for row in &rendered {
                    let cells: Vec<&str> = row.iter().map(String::as_str).collect();
                    write_line(f, &widths, &cells)?;
                }
                Ok(())
            }
        }
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, widths: &[usize], cells: &[&str]) -> fmt::Result {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| format!("{:<w$}", cells.get(i).copied().unwrap_or(""), w = *w))
        .collect();
    writeln!(f, "{}", padded.join(" | ").trim_end())
}

/// A titled block holding one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub heading: String,
    pub status: Option<StatusTag>,
    pub table: Table,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            Some(status) => writeln!(f, "{}  [{status}]", self.heading)?,
            None => writeln!(f, "{}", self.heading)?,
        }
        write!(f, "{}", self.table)
    }
}

/// Complete output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedView {
    /// View name (`summary`, `modules`).
    pub view: &'static str,
    pub title: String,
    /// Headline figures, in display order.
    pub stats: Vec<(&'static str, String)>,
    pub sections: Vec<Section>,
}

impl RenderedView {
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    pub fn stat(&self, label: &str) -> Option<&str> {
        self.stats
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Every status shown anywhere in the view.
    pub fn statuses(&self) -> Vec<&StatusTag> {
        self.sections
            .iter()
            .flat_map(|s| {
                s.status.iter().chain(
                    s.table
                        .rows()
                        .iter()
                        .flat_map(|row| row.iter().filter_map(Cell::as_status)),
                )
            })
            .collect()
    }
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        if !self.stats.is_empty() {
            let stats: Vec<String> = self
                .stats
                .iter()
                .map(|(label, value)| format!("{label}: {value}"))
                .collect();
            writeln!(f, "{}", stats.join(" | "))?;
        }
        for section in &self.sections {
            writeln!(f)?;
            write!(f, "{section}")?;
        }
        Ok(())
    }
}
