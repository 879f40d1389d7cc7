//! Footer label.

/// Label shown under the list, e.g. `"1 review"` or `"45 reviews"`.
pub fn review_count_label(count: usize) -> String {
    match count {
        1 => "1 review".to_string(),
        n => format!("{n} reviews"),
    }
}
