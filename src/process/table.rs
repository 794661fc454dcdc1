use serde::Serialize;

/// Parsed delimited text: the first retained row is the header, the rest are data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Column names, trimmed, in file order.
    pub header: Vec<String>,
    /// Each retained data row, fields trimmed. Never fully blank.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Position of `name` in the header, compared after trimming.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == name)
    }
}
