//! `${…}` property placeholder substitution
//!
//! The substitutor scans a string for `${name}` tokens and replaces each
//! with a value from a caller-supplied lookup. Tokens the lookup cannot
//! resolve are kept verbatim so a later stage can detect them as an error
//! condition. Replacement values are themselves substituted, with a guard
//! against a property chain that loops back on itself.

/// Replace every `${name}` token in `text` using `lookup`.
///
/// Unresolved tokens are left as literal `${name}` markers.
pub fn substitute<F>(text: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut in_flight = Vec::new();
    substitute_guarded(text, lookup, &mut in_flight)
}

fn substitute_guarded<F>(text: &str, lookup: &F, in_flight: &mut Vec<String>) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                let already_expanding = in_flight.iter().any(|n| n == name);
                match lookup(name) {
                    Some(value) if !already_expanding => {
                        in_flight.push(name.to_string());
                        out.push_str(&substitute_guarded(&value, lookup, in_flight));
                        in_flight.pop();
                    }
                    _ => out.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            None => {
                // unterminated token, keep the tail as-is
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Whether `text` is still a single unresolved `${…}` marker.
pub fn is_unresolved(text: &str) -> bool {
    text.starts_with("${") && text.ends_with('}')
}
