use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Authored tag spans are matched first so words inside them are left alone.
static PROP_SCAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[peicb]:[^\]]+\]|\b(\w+)\b").expect("prop scan pattern is valid")
});

/// Mark every word of `description` that names a prop as `[i:<word>]`.
///
/// A word matches when its lowercase form is a key of `props` with a
/// non-empty value; the word keeps its original case inside the tag. Text
/// already inside a `[p:..]`, `[e:..]`, `[i:..]`, `[c:..]` or `[b:..]` span
/// passes through unchanged, so running this twice changes nothing.
pub fn parse_props(description: &str, props: &BTreeMap<String, String>) -> String {
    if description.is_empty() || props.is_empty() {
        return description.to_string();
    }
    PROP_SCAN
        .replace_all(description, |caps: &Captures<'_>| match caps.get(1) {
            Some(word)
                if props
                    .get(&word.as_str().to_lowercase())
                    .is_some_and(|value| !value.is_empty()) =>
            {
                format!("[i:{}]", word.as_str())
            }
            _ => caps[0].to_string(),
        })
        .into_owned()
}
