//! Name filters applied to remote directory listings.

/// Entries starting with `.` are hidden and never transferred.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Case-insensitive `.csv` extension check.
pub fn is_csv(name: &str) -> bool {
    name.to_lowercase().ends_with(".csv")
}

/// Drop hidden entries, keeping the order of the rest.
pub fn exclude_hidden<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    names.into_iter().filter(|name| !is_hidden(name)).collect()
}

/// Keep only CSV entries, in listing order.
pub fn select_csv<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    names.into_iter().filter(|name| is_csv(name)).collect()
}
