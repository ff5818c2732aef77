use serde::{Deserialize, Serialize};

use crate::ast::{Action, Condition, Expr, OrderItem};

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    pub table: String,
    pub columns: Vec<Expr>,
    pub filter: Option<Condition>,
    #[serde(default)]
    pub group_by: Vec<Expr>,
    #[serde(default)]
    pub order_by: Vec<OrderItem>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Select {
    pub fn new(table: impl Into<String>, columns: Vec<Expr>) -> Self {
        Self {
            table: table.into(),
            columns,
            filter: None,
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }
}

/// An INSERT statement with one or more rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    /// One entry per row, aligned with `columns`
    pub rows: Vec<Vec<Expr>>,
}

impl Insert {
    /// True when some row leaves a cell to the column default.
    pub fn has_defaults(&self) -> bool {
        self.rows.iter().flatten().any(|cell| matches!(cell, Expr::Default))
    }

    /// Split into one insert per set of provided columns, without any
    /// `DEFAULT` cells.
    ///
    /// Groups keep the order they first appear in. A row that provides no
    /// column at all becomes an insert of its own.
    pub fn split_by_columns(&self) -> Vec<Insert> {
        let mut groups: Vec<(Vec<usize>, Vec<Vec<Expr>>)> = Vec::new();
        for row in &self.rows {
            let provided: Vec<usize> = row
                .iter()
                .enumerate()
                .filter(|(_, cell)| !matches!(cell, Expr::Default))
                .map(|(i, _)| i)
                .collect();
            let cells: Vec<Expr> = provided.iter().map(|&i| row[i].clone()).collect();
            let existing = if provided.is_empty() {
                None
            } else {
                groups.iter_mut().find(|(cols, _)| *cols == provided)
            };
            match existing {
                Some((_, rows)) => rows.push(cells),
                None => groups.push((provided, vec![cells])),
            }
        }
        groups
            .into_iter()
            .map(|(indices, rows)| Insert {
                table: self.table.clone(),
                columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
                rows,
            })
            .collect()
    }
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub table: String,
    /// `column = expr` pairs in document order
    pub assignments: Vec<(String, Expr)>,
    pub filter: Option<Condition>,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    pub table: String,
    pub filter: Option<Condition>,
}

/// Any compiled statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    pub fn action(&self) -> Action {
        match self {
            Statement::Select(_) => Action::Select,
            Statement::Insert(_) => Action::Insert,
            Statement::Update(_) => Action::Update,
            Statement::Delete(_) => Action::Delete,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            Statement::Select(s) => &s.table,
            Statement::Insert(s) => &s.table,
            Statement::Update(s) => &s.table,
            Statement::Delete(s) => &s.table,
        }
    }
}

impl From<Select> for Statement {
    fn from(s: Select) -> Self {
        Statement::Select(s)
    }
}

impl From<Insert> for Statement {
    fn from(s: Insert) -> Self {
        Statement::Insert(s)
    }
}

impl From<Update> for Statement {
    fn from(s: Update) -> Self {
        Statement::Update(s)
    }
}

impl From<Delete> for Statement {
    fn from(s: Delete) -> Self {
        Statement::Delete(s)
    }
}

/// A row-limited select plus the count statement sharing its WHERE clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectPage {
    pub select: Select,
    pub count: Select,
}

impl SelectPage {
    pub fn offset(&self) -> u64 {
        self.select.offset.unwrap_or_default()
    }

    pub fn limit(&self) -> u64 {
        self.select.limit.unwrap_or_default()
    }
}

/// Result of compiling a select request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectPlan {
    Single(Select),
    Paged(SelectPage),
}
