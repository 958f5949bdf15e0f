// Narrows the catalog to the rows shown in the table.

use super::model::UnitRecord;

/// Returns the records whose path contains `filter_text`, in catalog order.
/// An empty filter matches everything.
pub fn apply<'a>(catalog: &'a [UnitRecord], filter_text: &str) -> Vec<&'a UnitRecord> {
    catalog
        .iter()
        .filter(|record| filter_text.is_empty() || record.source_path.contains(filter_text))
        .collect()
}
