//! Sequence similarity used for typosquat detection.

/// Length of the longest common subsequence of `a` and `b`, by characters.
pub fn lcs_len(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() || b_chars.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b_chars.len() + 1];
    let mut curr = vec![0usize; b_chars.len() + 1];
    for ca in &a_chars {
        for (j, cb) in b_chars.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

/// `2 * M / T` where `M` is the LCS length and `T` the combined length.
///
/// An empty side scores 0.0, so a missing label never looks like a lookalike.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let total = a.chars().count() + b.chars().count();
    2.0 * lcs_len(a, b) as f64 / total as f64
}
