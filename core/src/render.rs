//! Plain-text table layout for the stdout report.

use std::fmt;

use crate::stats::{CrossTab, Describe, GroupedDescribe, ValueCounts};

/// Format a statistic the way every table in the report shows it.
pub fn fmt_num(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.6}"),
        _ => "NaN".to_string(),
    }
}

/// A right-aligned grid with an index column.
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    pub index_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<(String, Vec<String>)>,
}

impl TextTable {
    pub fn new(index_name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            index_name: index_name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, index: impl Into<String>, cells: Vec<String>) {
        self.rows.push((index.into(), cells));
    }

    fn widths(&self) -> (usize, Vec<usize>) {
        let index_w = self
            .rows
            .iter()
            .map(|(i, _)| i.len())
            .chain(std::iter::once(self.index_name.len()))
            .max()
            .unwrap_or(0);
        let col_w = self
            .columns
            .iter()
            .enumerate()
            .map(|(c, name)| {
                self.rows
                    .iter()
                    .filter_map(|(_, cells)| cells.get(c).map(String::len))
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        (index_w, col_w)
    }
}

impl fmt::Display for TextTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (index_w, col_w) = self.widths();

        write!(f, "{:<index_w$}", self.index_name)?;
        for (name, w) in self.columns.iter().zip(&col_w) {
            write!(f, "  {name:>w$}")?;
        }
        writeln!(f)?;

        for (index, cells) in &self.rows {
            write!(f, "{index:<index_w$}")?;
            for (cell, w) in cells.iter().zip(&col_w) {
                write!(f, "  {cell:>w$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<K: fmt::Display + Ord + Clone> fmt::Display for GroupedDescribe<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = Describe::FIELDS.iter().map(|s| s.to_string()).collect();
        let mut table = TextTable::new(format!("[{}]", self.column), columns);
        for (key, d) in &self.groups {
            table.push(key.to_string(), d.values().iter().map(|v| fmt_num(*v)).collect());
        }
        write!(f, "{table}")
    }
}

impl<K: fmt::Display + Ord + Clone> ValueCounts<K> {
    pub fn count_table(&self) -> TextTable {
        let mut table = TextTable::new(self.column.clone(), vec!["count".into()]);
        for (k, c) in &self.counts {
            table.push(k.to_string(), vec![c.to_string()]);
        }
        table
    }

    pub fn percent_table(&self) -> TextTable {
        let mut table = TextTable::new(self.column.clone(), vec!["proportion".into()]);
        for (k, p) in self.percentages() {
            table.push(k.to_string(), vec![fmt_num(Some(p))]);
        }
        table
    }
}

impl<R, C> CrossTab<R, C>
where
    R: fmt::Display + Ord + Clone,
    C: fmt::Display + Ord + Clone,
{
    fn header(&self) -> (String, Vec<String>) {
        (
            format!("{} \\ {}", self.row_name, self.col_name),
            self.cols.iter().map(|c| c.to_string()).collect(),
        )
    }

    pub fn count_table(&self) -> TextTable {
        let (index, columns) = self.header();
        let mut table = TextTable::new(index, columns);
        for (r, counts) in self.rows.iter().zip(&self.counts) {
            table.push(r.to_string(), counts.iter().map(|c| c.to_string()).collect());
        }
        table
    }

    pub fn row_percent_table(&self) -> TextTable {
        let (index, columns) = self.header();
        let mut table = TextTable::new(index, columns);
        for (r, pcts) in self.rows.iter().zip(self.row_percentages()) {
            table.push(r.to_string(), pcts.into_iter().map(|p| fmt_num(Some(p))).collect());
        }
        table
    }
}

/// Print a raw header + rows grid with a positional index, like a head() preview.
pub fn preview_table(headers: &[String], rows: &[Vec<String>]) -> TextTable {
    let mut table = TextTable::new("", headers.to_vec());
    for (i, row) in rows.iter().enumerate() {
        table.push(i.to_string(), row.clone());
    }
    table
}
