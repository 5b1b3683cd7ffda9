use ahash::AHashSet;

/// Produces a collision-free sibling name.
///
/// Returns `desired` unchanged when no other sibling holds it, otherwise the
/// smallest unused `-N` suffix with N >= 2. Comparison is case-insensitive;
/// the exact string is what gets stored. `exclude` is the current name of the
/// node being (re)named, so a node never collides with itself.
pub fn unique_name<'a, I>(desired: &str, exclude: Option<&str>, taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let excluded = exclude.map(str::to_lowercase);
    let taken: AHashSet<String> = taken
        .into_iter()
        .map(str::to_lowercase)
        .filter(|n| Some(n) != excluded.as_ref())
        .collect();

    if !taken.contains(&desired.to_lowercase()) {
        return desired.to_string();
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{}-{}", desired, n);
        if !taken.contains(&candidate.to_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}

/// Sorts a sibling collection in place: ascending, case-insensitive by name,
/// ties broken by pre-sort relative order.
pub fn sort_by_name<T, F>(items: &mut [T], name_of: F)
where
    F: Fn(&T) -> &str,
{
    // sort_by_cached_key is stable, which the tie-break rule relies on.
    items.sort_by_cached_key(|item| name_of(item).to_lowercase());
}
