use std::collections::BTreeMap;

/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Counts occurrences of each label, sorted by label.
pub fn count_by<'a, I>(labels: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for label in labels {
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Returns the label with the highest count.
///
/// Ties between labels sharing the highest count go to the
/// lexicographically last label.
pub fn most_common(counts: &BTreeMap<String, usize>) -> Option<(&str, usize)> {
    counts
        .iter()
        .max_by(|(a_label, a_count), (b_label, b_count)| {
            a_count.cmp(b_count).then_with(|| a_label.cmp(b_label))
        })
        .map(|(label, count)| (label.as_str(), *count))
}
