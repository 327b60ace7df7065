use std::collections::{BTreeSet, HashMap};

const DELIMITER_START: &str = "${";
const DELIMITER_END: &str = "}";

/// Expands `${name}` variables from `vars`. Unknown variables are left verbatim,
/// and an unterminated `${` is copied through literally.
pub fn expand(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(DELIMITER_START) {
        out.push_str(&rest[..start]);
        let after = &rest[start + DELIMITER_START.len()..];

        match after.find(DELIMITER_END) {
            Some(end) => {
                let key = &after[..end];
                match vars.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str(DELIMITER_START);
                        out.push_str(key);
                        out.push_str(DELIMITER_END);
                    }
                }
                rest = &after[end + DELIMITER_END.len()..];
            }
            None => {
                out.push_str(DELIMITER_START);
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Names of all `${...}` variables referenced by the template.
pub fn variables(template: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut rest = template;

    while let Some(start) = rest.find(DELIMITER_START) {
        let after = &rest[start + DELIMITER_START.len()..];
        let Some(end) = after.find(DELIMITER_END) else {
            break;
        };
        found.insert(after[..end].to_string());
        rest = &after[end + DELIMITER_END.len()..];
    }

    found
}
