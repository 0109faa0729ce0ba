//! Pluggable wrap/unwrap strategies for embedding type tags in JSON values.
//!
//! A [`TagStrategy`] decides *how* a `(type_name, state)` pair is folded
//! into a single primitive value and recognized again on the way back.
//! The dispatch logic in [`codec`](crate::codec) is parameterized over the
//! strategy, so alternative tagging conventions plug in without touching
//! the marshaller/unmarshaller dispatch itself.

use serde_json::{Map, Value};

/// Default key under which [`StateDictStrategy`] stores the type name.
pub const DEFAULT_TYPE_KEY: &str = "__type__";

/// Default key under which [`StateDictStrategy`] stores the marshalled state.
pub const DEFAULT_STATE_KEY: &str = "state";

/// Result of [`TagStrategy::unwrap`].
#[derive(Debug, Clone, PartialEq)]
pub enum Unwrapped {
    /// The value carried a type tag; it has been split into the tag and
    /// the marshalled state.
    Tagged {
        /// Registered name of the custom type.
        type_name: String,
        /// The marshalled state of the object.
        state: Value,
    },
    /// The value is ordinary data and is handed back unchanged.
    Plain(Value),
}

/// A tagging convention: folds a `(type_name, state)` pair into one
/// primitive value, and recognizes such values on decode.
///
/// Implementations must be pure: `wrap` is deterministic and `unwrap` on a
/// value that `wrap` did not produce yields [`Unwrapped::Plain`] with the
/// input intact.
pub trait TagStrategy {
    /// Fold the type name and marshalled state into a single value.
    fn wrap(&self, type_name: &str, state: Value) -> Value;

    /// Split a value into `(type_name, state)` if it carries a tag,
    /// otherwise hand it back unchanged.
    fn unwrap(&self, value: Value) -> Unwrapped;
}

/// The default tagging convention: a two-entry object holding the type
/// name and the state under two configurable keys.
///
/// `wrap("Point", state)` yields `{"__type__": "Point", "state": state}`
/// with the default keys. A value is recognized as tagged only when it is
/// an object with **exactly** two entries and a present, non-null tag
/// slot. This is a structural heuristic, not proof of intent: a
/// legitimate two-field application record using the same key names is
/// indistinguishable from a tagged object. Override the keys (or swap in
/// another strategy) when application data may collide.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tagged_state::{StateDictStrategy, TagStrategy, Unwrapped};
///
/// let strategy = StateDictStrategy::new();
/// let wrapped = strategy.wrap("Point", json!({"x": 1, "y": 2}));
/// assert_eq!(wrapped, json!({"__type__": "Point", "state": {"x": 1, "y": 2}}));
///
/// // Three entries: never treated as a tag, even with the tag key present.
/// let plain = json!({"__type__": "Point", "state": {}, "extra": 0});
/// assert_eq!(strategy.unwrap(plain.clone()), Unwrapped::Plain(plain));
/// ```
#[derive(Debug, Clone)]
pub struct StateDictStrategy {
    /// Object key for the type name.
    pub type_key: String,
    /// Object key for the marshalled state.
    pub state_key: String,
}

impl Default for StateDictStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl StateDictStrategy {
    /// Strategy with the default `"__type__"` / `"state"` keys.
    pub fn new() -> Self {
        Self::with_keys(DEFAULT_TYPE_KEY, DEFAULT_STATE_KEY)
    }

    /// Strategy with custom tag and state keys.
    pub fn with_keys(type_key: impl Into<String>, state_key: impl Into<String>) -> Self {
        Self {
            type_key: type_key.into(),
            state_key: state_key.into(),
        }
    }
}

impl TagStrategy for StateDictStrategy {
    fn wrap(&self, type_name: &str, state: Value) -> Value {
        let mut map = Map::with_capacity(2);
        map.insert(self.type_key.clone(), Value::String(type_name.to_owned()));
        map.insert(self.state_key.clone(), state);
        Value::Object(map)
    }

    fn unwrap(&self, value: Value) -> Unwrapped {
        match value {
            Value::Object(mut map) if map.len() == 2 => {
                let type_name = match map.get(&self.type_key) {
                    Some(Value::String(name)) => name.clone(),
                    // A non-null, non-string tag is still recognized; its
                    // JSON rendering becomes the (unresolvable) type name
                    // so the decode error can report it.
                    Some(tag) if !tag.is_null() => tag.to_string(),
                    _ => return Unwrapped::Plain(Value::Object(map)),
                };
                // Missing state slot decodes as null state.
                let state = map.remove(&self.state_key).unwrap_or(Value::Null);
                Unwrapped::Tagged { type_name, state }
            }
            other => Unwrapped::Plain(other),
        }
    }
}

/// Sequence-based tagging: `[prefix + type_name, state]`.
///
/// A non-default alternative to [`StateDictStrategy`] for data models
/// where two-entry objects are common application data but two-element
/// sequences headed by a prefixed string are not. Recognized shape: a
/// two-element sequence whose first element is a string starting with the
/// prefix (default `"!"`).
#[derive(Debug, Clone)]
pub struct SeqTagStrategy {
    /// String prefix marking the first sequence element as a type name.
    pub prefix: String,
}

impl Default for SeqTagStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl SeqTagStrategy {
    /// Strategy with the default `"!"` prefix.
    pub fn new() -> Self {
        Self::with_prefix("!")
    }

    /// Strategy with a custom type-name prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl TagStrategy for SeqTagStrategy {
    fn wrap(&self, type_name: &str, state: Value) -> Value {
        Value::Array(vec![
            Value::String(format!("{}{}", self.prefix, type_name)),
            state,
        ])
    }

    fn unwrap(&self, value: Value) -> Unwrapped {
        match value {
            Value::Array(mut items) if items.len() == 2 => {
                let type_name = items[0]
                    .as_str()
                    .and_then(|s| s.strip_prefix(self.prefix.as_str()))
                    .map(str::to_owned);
                match type_name {
                    Some(type_name) => {
                        let state = items.pop().unwrap_or(Value::Null);
                        Unwrapped::Tagged { type_name, state }
                    }
                    None => Unwrapped::Plain(Value::Array(items)),
                }
            }
            other => Unwrapped::Plain(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrap_produces_exactly_the_two_configured_keys() {
        let strategy = StateDictStrategy::new();
        let wrapped = strategy.wrap("Point", json!({"x": 1}));
        let map = wrapped.as_object().expect("object");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(DEFAULT_TYPE_KEY), Some(&json!("Point")));
        assert_eq!(map.get(DEFAULT_STATE_KEY), Some(&json!({"x": 1})));
    }

    #[test]
    fn unwrap_rejects_wrong_shapes() {
        let strategy = StateDictStrategy::new();
        let cases = vec![
            json!(null),
            json!(true),
            json!(42),
            json!("__type__"),
            json!([1, 2]),
            json!({}),
            json!({"__type__": "Point"}),
            json!({"__type__": "Point", "state": {}, "extra": 1}),
            json!({"state": {}, "other": 1}),
            json!({"__type__": null, "state": {}}),
        ];
        for case in cases {
            assert_eq!(
                strategy.unwrap(case.clone()),
                Unwrapped::Plain(case.clone()),
                "expected pass-through for {case}"
            );
        }
    }

    #[test]
    fn unwrap_extracts_tag_and_state() {
        let strategy = StateDictStrategy::new();
        let unwrapped = strategy.unwrap(json!({"__type__": "Point", "state": {"x": 1}}));
        assert_eq!(
            unwrapped,
            Unwrapped::Tagged {
                type_name: "Point".to_string(),
                state: json!({"x": 1}),
            }
        );
    }

    #[test]
    fn unwrap_defaults_missing_state_to_null() {
        let strategy = StateDictStrategy::new();
        let unwrapped = strategy.unwrap(json!({"__type__": "Point", "unrelated": 1}));
        assert_eq!(
            unwrapped,
            Unwrapped::Tagged {
                type_name: "Point".to_string(),
                state: Value::Null,
            }
        );
    }

    #[test]
    fn unwrap_renders_non_string_tags() {
        let strategy = StateDictStrategy::new();
        let unwrapped = strategy.unwrap(json!({"__type__": 5, "state": {}}));
        assert_eq!(
            unwrapped,
            Unwrapped::Tagged {
                type_name: "5".to_string(),
                state: json!({}),
            }
        );
    }

    #[test]
    fn custom_keys_ignore_default_keys() {
        let strategy = StateDictStrategy::with_keys("t", "s");
        assert_eq!(
            strategy.wrap("Point", json!(1)),
            json!({"t": "Point", "s": 1})
        );
        let default_keyed = json!({"__type__": "Point", "state": 1});
        assert_eq!(
            strategy.unwrap(default_keyed.clone()),
            Unwrapped::Plain(default_keyed)
        );
    }

    #[test]
    fn seq_strategy_round_trips_and_passes_through() {
        let strategy = SeqTagStrategy::new();
        let wrapped = strategy.wrap("Point", json!({"x": 1}));
        assert_eq!(wrapped, json!(["!Point", {"x": 1}]));
        assert_eq!(
            strategy.unwrap(wrapped),
            Unwrapped::Tagged {
                type_name: "Point".to_string(),
                state: json!({"x": 1}),
            }
        );

        let plain = json!(["Point", {"x": 1}]);
        assert_eq!(strategy.unwrap(plain.clone()), Unwrapped::Plain(plain));
        let plain = json!(["!Point", 1, 2]);
        assert_eq!(strategy.unwrap(plain.clone()), Unwrapped::Plain(plain));
    }
}
