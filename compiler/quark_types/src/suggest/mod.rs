//! "Did you mean?" suggestions for unknown names, by edit distance.

/// Levenshtein distance: single-character insertions, deletions and
/// substitutions needed to turn `a` into `b`.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b_len = b.chars().count();
    if a.is_empty() {
        return b_len;
    }
    if b.is_empty() {
        return a.chars().count();
    }

    // Two-row optimization instead of the full matrix.
    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a.chars().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b.chars().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

fn threshold(name_len: usize) -> usize {
    match name_len {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        6..=10 => 3,
        n => (n / 2).min(5),
    }
}

/// Closest candidate within a length-scaled threshold. Ties go to the
/// lexicographically smaller candidate so the result does not depend on
/// iteration order.
pub fn suggest_similar<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    if name.is_empty() {
        return None;
    }
    let limit = threshold(name.len());
    let mut best: Option<(usize, &str)> = None;

    for candidate in candidates {
        if candidate == name || name.len().abs_diff(candidate.len()) > limit {
            continue;
        }
        let distance = edit_distance(name, candidate);
        if distance > limit {
            continue;
        }
        if best.map_or(true, |b| (distance, candidate) < b) {
            best = Some((distance, candidate));
        }
    }

    best.map(|(_, s)| s)
}

#[cfg(test)]
mod tests;
