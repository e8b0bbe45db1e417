use std::collections::HashMap;

/// Identifies one editable field: a column of an item on a sheet.
///
/// The three parts are kept as separate fields, so any sheet, item or column
/// name (delimiters included) maps to its own entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditKey {
    pub sheet: String,
    pub item: String,
    pub column: String,
}

impl EditKey {
    pub fn new(sheet: impl Into<String>, item: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            item: item.into(),
            column: column.into(),
        }
    }
}

/// Pending field values for the whole session.
///
/// Entries are only ever added or overwritten. Commit reads them without
/// clearing, so edits to items that are not on screen survive navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    staged: HashMap<EditKey, String>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<'a>(&'a self, key: &EditKey, default: &'a str) -> &'a str {
        self.staged.get(key).map(String::as_str).unwrap_or(default)
    }

    pub fn pending(&self, key: &EditKey) -> Option<&str> {
        self.staged.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: EditKey, value: impl Into<String>) {
        self.staged.insert(key, value.into());
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EditKey, &str)> {
        self.staged.iter().map(|(key, value)| (key, value.as_str()))
    }

    pub fn pending_for_sheet<'a>(
        &'a self,
        sheet: &'a str,
    ) -> impl Iterator<Item = (&'a EditKey, &'a str)> + 'a {
        self.iter().filter(move |(key, _)| key.sheet == sheet)
    }
}
