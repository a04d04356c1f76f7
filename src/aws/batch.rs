//! Fixed-size grouping for APIs that cap how many identifiers one call may take.

/// Split `items` into groups of exactly `n`, right-padding the last group with `fill`.
///
/// Yields `ceil(len / n)` groups; an empty input yields no groups. The input is
/// consumed once, so the grouping is not restartable: collect the items first if
/// you need to walk them again.
///
/// # Panics
///
/// Panics if `n` is zero.
pub fn grouper<T, I>(items: I, n: usize, fill: T) -> Vec<Vec<T>>
where
    I: IntoIterator<Item = T>,
    T: Clone,
{
    assert!(n > 0, "group size must be non-zero");

    let mut groups = Vec::new();
    let mut current = Vec::with_capacity(n);
    for item in items {
        current.push(item);
        if current.len() == n {
            groups.push(std::mem::replace(&mut current, Vec::with_capacity(n)));
        }
    }
    if !current.is_empty() {
        current.resize(n, fill);
        groups.push(current);
    }
    groups
}
