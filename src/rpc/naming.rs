//! Method name mapping
//!
//! The daemon registers its handlers as `API.<Name>` where `<Name>` is an
//! exported (capitalized) method. Callers use snake_case operation names,
//! which are split on `_` and re-joined with each segment capitalized.

/// Namespace the daemon registers its API under
pub const NAMESPACE: &str = "API";

/// Convert an underscore-delimited name to PascalCase
///
/// Only the first character of each segment is upper-cased; the rest of the
/// segment is left as-is, so names that are already PascalCase map to
/// themselves.
pub fn pascal_case(name: &str) -> String {
    name.split('_').map(capitalize).collect()
}

/// Full RPC method name for an operation: `API.` + PascalCase(name)
pub fn method_name(name: &str) -> String {
    format!("{}.{}", NAMESPACE, pascal_case(name))
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
