use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Label of a month exactly as it appears in the input file names.
pub type MonthLabel = String;

/// Numeric column extracted from one store sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreColumn {
    /// Sheet name, which doubles as the store name.
    pub store: String,
    /// Values in sheet order; empty cells are not included.
    pub values: Vec<f64>,
}

impl StoreColumn {
    pub fn new(store: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            store: store.into(),
            values,
        }
    }

    /// Sum of the column rounded half-to-even. Empty columns total 0.
    pub fn total(&self) -> i64 {
        round_half_even(self.values.iter().sum())
    }
}

/// Per-store totals for one month, kept in the order the stores were read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreTotals {
    entries: Vec<(String, i64)>,
}

impl StoreTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the total of a store.
    pub fn insert(&mut self, store: impl Into<String>, total: i64) {
        let store = store.into();
        match self.entries.iter_mut().find(|(name, _)| *name == store) {
            Some(entry) => entry.1 = total,
            None => self.entries.push((store, total)),
        }
    }

    pub fn get(&self, store: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(name, _)| name == store)
            .map(|(_, total)| *total)
    }

    pub fn stores(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(name, total)| (name.as_str(), *total))
    }

    pub fn sum(&self) -> i64 {
        self.entries.iter().map(|(_, total)| total).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for StoreTotals {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        let mut totals = StoreTotals::new();
        for (store, total) in iter {
            totals.insert(store, total);
        }
        totals
    }
}

impl Serialize for StoreTotals {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (store, total) in &self.entries {
            map.serialize_entry(store, total)?;
        }
        map.end()
    }
}

/// Average and per-store totals computed for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRecord {
    pub month: MonthLabel,
    /// Rounded mean of the store totals.
    pub average: i64,
    pub store_totals: StoreTotals,
}

/// Rounds to the nearest integer, resolving ties towards the even neighbour.
pub fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_rounds_half_to_even() {
        assert_eq!(StoreColumn::new("A", vec![0.25, 0.25]).total(), 0);
        assert_eq!(StoreColumn::new("A", vec![1.0, 0.5]).total(), 2);
        assert_eq!(StoreColumn::new("A", vec![2.0, 0.5]).total(), 2);
        assert_eq!(StoreColumn::new("A", vec![10.4, 20.4]).total(), 31);
    }

    #[test]
    fn empty_column_totals_zero() {
        assert_eq!(StoreColumn::new("A", Vec::new()).total(), 0);
    }

    #[test]
    fn total_is_order_independent() {
        let forward = StoreColumn::new("A", vec![100.0, 250.5, 49.5, 0.25]);
        let reversed = StoreColumn::new("A", vec![0.25, 49.5, 250.5, 100.0]);
        assert_eq!(forward.total(), reversed.total());
        assert_eq!(forward.total(), 400);
    }

    #[test]
    fn store_totals_keep_insertion_order_and_replace_in_place() {
        let mut totals = StoreTotals::new();
        totals.insert("B", 2);
        totals.insert("A", 1);
        totals.insert("B", 3);

        assert_eq!(totals.stores().collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(totals.get("B"), Some(3));
        assert_eq!(totals.get("C"), None);
        assert_eq!(totals.sum(), 4);
        assert_eq!(totals.len(), 2);
    }
}
