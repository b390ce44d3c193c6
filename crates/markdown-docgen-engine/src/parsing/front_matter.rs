use serde_json::Value;
use std::collections::BTreeMap;

const DELIMITER: &str = "---";

/// Front matter values keyed by their top-level YAML key.
pub type FrontMatter = BTreeMap<String, Value>;

/// Split a leading `---` delimited YAML block off a markdown source.
///
/// The block is parsed as YAML; only a top-level mapping contributes entries.
/// Invalid YAML is logged and yields no entries, with the block still removed
/// from the body. When there is no (closed) block the source is returned
/// untouched.
pub fn split_front_matter(source: &str) -> (FrontMatter, &str) {
    let Some((yaml, body)) = split_block(source) else {
        return (FrontMatter::new(), source);
    };
    (parse_yaml(yaml), body)
}

/// Read a front matter entry as a string. Non-string scalars are rendered,
/// sequences and mappings are not.
pub fn string_value(front_matter: &FrontMatter, key: &str) -> Option<String> {
    match front_matter.get(key)? {
        Value::String(s) => Some(s.trim_end().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn split_block(source: &str) -> Option<(&str, &str)> {
    let rest = source
        .strip_prefix('\u{FEFF}')
        .unwrap_or(source)
        .strip_prefix(DELIMITER)?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    // Unterminated block: treat the whole thing as markdown.
    None
}

fn parse_yaml(yaml: &str) -> FrontMatter {
    if yaml.trim().is_empty() {
        return FrontMatter::new();
    }

    let value = serde_yaml::from_str::<serde_yaml::Value>(yaml)
        .map_err(|e| e.to_string())
        .and_then(|value| serde_json::to_value(value).map_err(|e| e.to_string()));

    match value {
        Ok(Value::Object(map)) => map.into_iter().collect(),
        Ok(Value::Null) => FrontMatter::new(),
        Ok(_) => {
            log::warn!("Front matter is not a mapping, ignoring it");
            FrontMatter::new()
        }
        Err(e) => {
            log::warn!("Invalid front matter: {e}");
            FrontMatter::new()
        }
    }
}
