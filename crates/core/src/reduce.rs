//! Majority vote over the labels gathered in one detection session.

use std::collections::HashMap;

/// Returns the most frequent label, or `default` when nothing was observed.
///
/// Ties resolve to the label that appeared first in `observations`.
pub fn reduce<S: AsRef<str>>(observations: &[S], default: &str) -> String {
    // label -> (count, first index)
    let mut tally: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, label) in observations.iter().enumerate() {
        let entry = tally.entry(label.as_ref()).or_insert((0, idx));
        entry.0 += 1;
    }

    tally
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(label, _)| label.to_owned())
        .unwrap_or_else(|| default.to_owned())
}
