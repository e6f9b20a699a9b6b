//! Conversions between API response shapes and flat attribute values.
//!
//! These helpers are pure and total: the flatten/expand pairs are inverses on
//! the fields they cover, so values round-trip unchanged from create through
//! read back into state.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::api::Tag;

/// Flatten a tag list into the `tags` attribute map.
pub fn tags_to_map(tags: &[Tag]) -> BTreeMap<String, String> {
    tags.iter()
        .map(|t| (t.key.clone(), t.value.clone()))
        .collect()
}

/// Expand the `tags` attribute map into a tag list, in key order.
pub fn map_to_tags(map: &BTreeMap<String, String>) -> Vec<Tag> {
    map.iter()
        .map(|(key, value)| Tag {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Read an optional string attribute from declarative state.
///
/// Absent, null, and empty-string values all read as `None`.
pub fn optional_string(state: &Value, name: &str) -> Option<String> {
    state
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tags_round_trip() {
        let mut map = BTreeMap::new();
        map.insert("env".to_string(), "prod".to_string());
        map.insert("team".to_string(), "payments".to_string());

        assert_eq!(tags_to_map(&map_to_tags(&map)), map);
    }

    #[test]
    fn test_map_to_tags_is_key_ordered() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), "2".to_string());
        map.insert("a".to_string(), "1".to_string());

        let tags = map_to_tags(&map);
        assert_eq!(tags[0].key, "a");
        assert_eq!(tags[1].key, "b");
    }

    #[test]
    fn test_optional_string() {
        let state = json!({"framework": "rails", "language": "", "owner": null});

        assert_eq!(optional_string(&state, "framework").as_deref(), Some("rails"));
        assert_eq!(optional_string(&state, "language"), None);
        assert_eq!(optional_string(&state, "owner"), None);
        assert_eq!(optional_string(&state, "missing"), None);
    }
}
