use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cell grid handed over by the spreadsheet adapter, header row already located
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { headers, rows }
    }

    /// Position of a header, compared after trimming
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Cell at `column` in `row`; short rows read as null
    pub fn cell<'a>(row: &'a [Value], column: usize) -> &'a Value {
        row.get(column).unwrap_or(&Value::Null)
    }
}

/// An amount cell left out of the totals: unreadable, or too large to sum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountIssue {
    pub row_index: usize,
    pub raw: String,
}
