use ahash::AHashMap;

/// One table's column list and rows, as extracted from a COPY block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Tables keyed by name, iterated in first-occurrence order.
///
/// Inserting a name that is already present replaces the stored table but
/// keeps its original position.
#[derive(Debug, Default, Clone)]
pub struct TableSet {
    tables: Vec<ParsedTable>,
    index: AHashMap<String, usize>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table, returning the one it replaced, if any.
    pub fn insert(&mut self, table: ParsedTable) -> Option<ParsedTable> {
        match self.index.get(&table.name) {
            Some(&pos) => Some(std::mem::replace(&mut self.tables[pos], table)),
            None => {
                self.index.insert(table.name.clone(), self.tables.len());
                self.tables.push(table);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParsedTable> {
        self.index.get(name).map(|&pos| &self.tables[pos])
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParsedTable> {
        self.tables.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }
}

impl IntoIterator for TableSet {
    type Item = ParsedTable;
    type IntoIter = std::vec::IntoIter<ParsedTable>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}

impl<'a> IntoIterator for &'a TableSet {
    type Item = &'a ParsedTable;
    type IntoIter = std::slice::Iter<'a, ParsedTable>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
