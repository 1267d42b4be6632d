use std::collections::BTreeMap;

use super::model::CellValue;

// ---------------------------------------------------------------------------
// Partitioning rows by a categorical key
// ---------------------------------------------------------------------------

/// Rows sharing one key value, as indices into the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<'a> {
    pub key: &'a CellValue,
    pub rows: Vec<usize>,
}

/// Group row indices by key, in the order each key is first seen.
///
/// Rows whose key is `None` (missing) belong to no partition.
pub fn partition_first_seen<'a>(keys: &[Option<&'a CellValue>]) -> Vec<Partition<'a>> {
    let mut slot: BTreeMap<&CellValue, usize> = BTreeMap::new();
    let mut partitions: Vec<Partition<'a>> = Vec::new();

    for (row, key) in keys.iter().enumerate() {
        let Some(key) = *key else {
            continue;
        };
        let idx = *slot.entry(key).or_insert_with(|| {
            partitions.push(Partition {
                key,
                rows: Vec::new(),
            });
            partitions.len() - 1
        });
        partitions[idx].rows.push(row);
    }
    partitions
}

/// Group row indices by key, placing keys listed in `order` first (in that
/// order) and any unlisted keys after them in first-seen order.
///
/// Listed keys that never occur produce no partition.
pub fn partition_ordered<'a>(
    keys: &[Option<&'a CellValue>],
    order: &[String],
) -> Vec<Partition<'a>> {
    let mut partitions = partition_first_seen(keys);
    let rank = |p: &Partition<'_>| {
        let label = p.key.to_string();
        order.iter().position(|o| *o == label).unwrap_or(order.len())
    };
    // Stable sort keeps first-seen order among unlisted keys.
    partitions.sort_by_key(rank);
    partitions
}
