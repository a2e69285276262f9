use super::traits::{CountStatement, Statement};
use crate::clause::{LOAD_DATA_OPTIONS, Options, OptionsBuilder};
use crate::error::{DbError, DbResult};
use crate::escape::{protect_identifier, quote_str};

/// LOAD DATA statement builder.
#[derive(Debug, Clone)]
pub struct LoadData {
    options: Options,
    infile: Option<String>,
    duplicates: Option<&'static str>,
    table: Option<String>,
    charset: Option<String>,
    columns_terminated_by: Option<String>,
    columns_enclosed_by: Option<(String, bool)>,
    columns_escaped_by: Option<String>,
    lines_starting_by: Option<String>,
    lines_terminated_by: Option<String>,
    ignore_lines: Option<u64>,
}

impl Default for LoadData {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadData {
    pub fn new() -> Self {
        Self {
            options: Options::new(&LOAD_DATA_OPTIONS),
            infile: None,
            duplicates: None,
            table: None,
            charset: None,
            columns_terminated_by: None,
            columns_enclosed_by: None,
            columns_escaped_by: None,
            lines_starting_by: None,
            lines_terminated_by: None,
            ignore_lines: None,
        }
    }

    pub fn infile(&mut self, file: impl Into<String>) -> &mut Self {
        self.infile = Some(file.into());
        self
    }

    /// Replace rows that duplicate a unique key.
    pub fn replace(&mut self) -> &mut Self {
        self.duplicates = Some("REPLACE");
        self
    }

    /// Skip rows that duplicate a unique key.
    pub fn ignore(&mut self) -> &mut Self {
        self.duplicates = Some("IGNORE");
        self
    }

    pub fn into_table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn charset(&mut self, charset: impl Into<String>) -> &mut Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn columns_terminated_by(&mut self, s: impl Into<String>) -> &mut Self {
        self.columns_terminated_by = Some(s.into());
        self
    }

    pub fn columns_enclosed_by(&mut self, s: impl Into<String>) -> &mut Self {
        self.columns_enclosed_by = Some((s.into(), false));
        self
    }

    pub fn columns_optionally_enclosed_by(&mut self, s: impl Into<String>) -> &mut Self {
        self.columns_enclosed_by = Some((s.into(), true));
        self
    }

    pub fn columns_escaped_by(&mut self, s: impl Into<String>) -> &mut Self {
        self.columns_escaped_by = Some(s.into());
        self
    }

    pub fn lines_starting_by(&mut self, s: impl Into<String>) -> &mut Self {
        self.lines_starting_by = Some(s.into());
        self
    }

    pub fn lines_terminated_by(&mut self, s: impl Into<String>) -> &mut Self {
        self.lines_terminated_by = Some(s.into());
        self
    }

    pub fn ignore_lines(&mut self, lines: u64) -> &mut Self {
        self.ignore_lines = Some(lines);
        self
    }

    fn render_columns(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(s) = &self.columns_terminated_by {
            parts.push(format!("TERMINATED BY {}", quote_str(s)));
        }
        if let Some((s, optionally)) = &self.columns_enclosed_by {
            let prefix = if *optionally { "OPTIONALLY " } else { "" };
            parts.push(format!("{prefix}ENCLOSED BY {}", quote_str(s)));
        }
        if let Some(s) = &self.columns_escaped_by {
            parts.push(format!("ESCAPED BY {}", quote_str(s)));
        }
        (!parts.is_empty()).then(|| format!(" COLUMNS {}", parts.join(" ")))
    }

    fn render_lines(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(s) = &self.lines_starting_by {
            parts.push(format!("STARTING BY {}", quote_str(s)));
        }
        if let Some(s) = &self.lines_terminated_by {
            parts.push(format!("TERMINATED BY {}", quote_str(s)));
        }
        (!parts.is_empty()).then(|| format!(" LINES {}", parts.join(" ")))
    }
}

impl Statement for LoadData {
    fn sql(&self) -> DbResult<String> {
        let mut sql = String::from("LOAD DATA");
        if let Some(options) = self.options.render()? {
            sql.push_str(&options);
        }
        let Some(infile) = &self.infile else {
            return Err(DbError::logic("INFILE must be set"));
        };
        sql.push_str(" INFILE ");
        sql.push_str(&quote_str(infile));
        if let Some(duplicates) = self.duplicates {
            sql.push(' ');
            sql.push_str(duplicates);
        }
        let Some(table) = &self.table else {
            return Err(DbError::logic("INTO TABLE must be set"));
        };
        sql.push_str(" INTO TABLE ");
        sql.push_str(&protect_identifier(table));
        if let Some(charset) = &self.charset {
            if charset.is_empty() || !charset.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(DbError::invalid_argument(format!("Invalid charset: {charset}")));
            }
            sql.push_str(" CHARACTER SET ");
            sql.push_str(charset);
        }
        if let Some(columns) = self.render_columns() {
            sql.push_str(&columns);
        }
        if let Some(lines) = self.render_lines() {
            sql.push_str(&lines);
        }
        if let Some(lines) = self.ignore_lines {
            sql.push_str(&format!(" IGNORE {lines} LINES"));
        }
        Ok(sql)
    }
}

impl CountStatement for LoadData {}

impl OptionsBuilder for LoadData {
    fn options_clause(&mut self) -> &mut Options {
        &mut self.options
    }
}
