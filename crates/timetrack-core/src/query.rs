//! Parameterized SQL construction.
//!
//! Values never reach the statement text: every value becomes a positional
//! `$n` placeholder paired with a [`QueryArg`] at index `n - 1`.

use chrono::{DateTime, Utc};

use crate::UserFilter;

pub const USER_SELECT: &str = "SELECT * FROM users";

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryArg {
    Int(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl From<i64> for QueryArg {
    fn from(value: i64) -> Self {
        QueryArg::Int(value)
    }
}

impl From<String> for QueryArg {
    fn from(value: String) -> Self {
        QueryArg::Text(value)
    }
}

impl From<&str> for QueryArg {
    fn from(value: &str) -> Self {
        QueryArg::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for QueryArg {
    fn from(value: DateTime<Utc>) -> Self {
        QueryArg::Timestamp(value)
    }
}

/// Statement text plus its bound arguments, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub args: Vec<QueryArg>,
}

impl BuiltQuery {
    /// Statement whose placeholders are filled by subsequent [`bind`](Self::bind) calls.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    pub fn bind(mut self, arg: impl Into<QueryArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends `value` and returns its placeholder, e.g. `$3`.
    fn push_arg(&mut self, value: QueryArg) -> String {
        self.args.push(value);
        format!("${}", self.args.len())
    }
}

/// Equality predicates in fixed evaluation order: (column, bound value if present).
fn user_predicates(filter: &UserFilter) -> [(&'static str, Option<QueryArg>); 7] {
    [
        ("id", filter.id.as_present().map(|v| QueryArg::Int(*v))),
        (
            "passport_number",
            filter.passport_number.as_present().map(|v| QueryArg::Int(*v)),
        ),
        (
            "passport_serie",
            filter.passport_serie.as_present().map(|v| QueryArg::Int(*v)),
        ),
        ("surname", filter.surname.as_present().cloned().map(QueryArg::Text)),
        ("name", filter.name.as_present().cloned().map(QueryArg::Text)),
        (
            "patronymic",
            filter.patronymic.as_present().cloned().map(QueryArg::Text),
        ),
        ("address", filter.address.as_present().cloned().map(QueryArg::Text)),
    ]
}

/// Render a user lookup for `filter`.
///
/// Present fields become `column = $n` predicates under a single `WHERE`,
/// joined by `AND`. `LIMIT` and `OFFSET` follow whenever they are set,
/// whether or not any predicate exists. Never fails: an empty filter
/// selects every user.
pub fn build_user_query(filter: &UserFilter) -> BuiltQuery {
    let mut query = BuiltQuery::new(USER_SELECT);
    let mut predicates = 0;

    for (column, value) in user_predicates(filter) {
        let Some(value) = value else {
            continue;
        };

        let keyword = if predicates == 0 { "WHERE" } else { "AND" };
        let placeholder = query.push_arg(value);
        query.sql.push_str(&format!(" {} {} = {}", keyword, column, placeholder));
        predicates += 1;
    }

    if let Some(limit) = filter.limit {
        let placeholder = query.push_arg(QueryArg::Int(limit));
        query.sql.push_str(&format!(" LIMIT {}", placeholder));
    }

    if let Some(offset) = filter.offset {
        let placeholder = query.push_arg(QueryArg::Int(offset));
        query.sql.push_str(&format!(" OFFSET {}", placeholder));
    }

    query
}
