/// Records parsed from a job result, plus how many entries were skipped as malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> ResultSet<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

impl<T> Default for ResultSet<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}
