use crate::error::{DbError, DbResult};

/// Allowed statement options, in the order the grammar expects them, and
/// the groups of options that exclude each other.
#[derive(Debug)]
pub struct OptionSet {
    pub allowed: &'static [&'static str],
    pub exclusive: &'static [&'static [&'static str]],
}

pub static SELECT_OPTIONS: OptionSet = OptionSet {
    allowed: &[
        "ALL",
        "DISTINCT",
        "DISTINCTROW",
        "HIGH_PRIORITY",
        "STRAIGHT_JOIN",
        "SQL_SMALL_RESULT",
        "SQL_BIG_RESULT",
        "SQL_BUFFER_RESULT",
        "SQL_CACHE",
        "SQL_NO_CACHE",
        "SQL_CALC_FOUND_ROWS",
    ],
    exclusive: &[&["ALL", "DISTINCT", "DISTINCTROW"], &["SQL_CACHE", "SQL_NO_CACHE"]],
};

pub static INSERT_OPTIONS: OptionSet = OptionSet {
    allowed: &["LOW_PRIORITY", "DELAYED", "HIGH_PRIORITY", "IGNORE"],
    exclusive: &[&["LOW_PRIORITY", "DELAYED", "HIGH_PRIORITY"]],
};

pub static REPLACE_OPTIONS: OptionSet = OptionSet {
    allowed: &["LOW_PRIORITY", "DELAYED"],
    exclusive: &[&["LOW_PRIORITY", "DELAYED"]],
};

pub static UPDATE_OPTIONS: OptionSet = OptionSet {
    allowed: &["LOW_PRIORITY", "IGNORE"],
    exclusive: &[],
};

pub static DELETE_OPTIONS: OptionSet = OptionSet {
    allowed: &["LOW_PRIORITY", "QUICK", "IGNORE"],
    exclusive: &[],
};

pub static LOAD_DATA_OPTIONS: OptionSet = OptionSet {
    allowed: &["LOW_PRIORITY", "CONCURRENT", "LOCAL"],
    exclusive: &[&["LOW_PRIORITY", "CONCURRENT"]],
};

pub static WITH_OPTIONS: OptionSet = OptionSet {
    allowed: &["RECURSIVE"],
    exclusive: &[],
};

/// Statement options (e.g. `DISTINCT`, `LOW_PRIORITY`).
///
/// Values are validated against the statement's [`OptionSet`] at render time
/// and rendered in grammar order, each once.
#[derive(Debug, Clone)]
pub struct Options {
    set: &'static OptionSet,
    values: Vec<String>,
}

impl Options {
    pub fn new(set: &'static OptionSet) -> Self {
        Self {
            set,
            values: Vec::new(),
        }
    }

    pub fn set(&mut self, values: Vec<String>) {
        self.values = values;
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    pub fn render(&self) -> DbResult<Option<String>> {
        if self.values.is_empty() {
            return Ok(None);
        }
        let mut positions = Vec::with_capacity(self.values.len());
        for value in &self.values {
            let normalized = value.trim().to_uppercase();
            let Some(position) = self.set.allowed.iter().position(|o| *o == normalized) else {
                return Err(DbError::invalid_argument(format!(
                    "Invalid option: {value}"
                )));
            };
            if !positions.contains(&position) {
                positions.push(position);
            }
        }

        for group in self.set.exclusive {
            let used: Vec<&str> = group
                .iter()
                .copied()
                .filter(|option| positions.iter().any(|&p| self.set.allowed[p] == *option))
                .collect();
            if used.len() > 1 {
                return Err(DbError::invalid_argument(format!(
                    "Options {} can not be used together",
                    used.join(" and ")
                )));
            }
        }

        positions.sort_unstable();
        let rendered: Vec<&str> = positions.iter().map(|&p| self.set.allowed[p]).collect();
        Ok(Some(format!(" {}", rendered.join(" "))))
    }
}

/// Statements that accept options.
pub trait OptionsBuilder: Sized {
    fn options_clause(&mut self) -> &mut Options;

    /// Replace the options.
    fn options<S: Into<String>>(&mut self, options: impl IntoIterator<Item = S>) -> &mut Self {
        self.options_clause()
            .set(options.into_iter().map(Into::into).collect());
        self
    }

    /// Add one option.
    fn option(&mut self, option: impl Into<String>) -> &mut Self {
        self.options_clause().push(option);
        self
    }
}
