//! The tag codec: marshaller/unmarshaller dispatch around a tagging
//! strategy.
//!
//! [`ObjectCodec`] is the piece that sits between a registry of custom
//! types and a byte-level serializer that only understands plain JSON
//! values. On encode it turns a registered instance into a (usually
//! tagged) primitive value; on decode it recognizes tagged values and
//! reconstructs the original type, passing everything else through
//! untouched.

use std::any::{Any, TypeId};

use serde_json::Value;

use crate::error::CodecError;
use crate::registry::{TypeRegistry, UnmarshalEntry};
use crate::strategy::{StateDictStrategy, TagStrategy, Unwrapped};

/// Result of [`ObjectCodec::decode`].
pub enum Decoded {
    /// Ordinary data, passed through unchanged.
    Value(Value),
    /// A reconstructed instance of a registered custom type.
    Instance(Box<dyn Any>),
}

impl Decoded {
    /// The passed-through value, if this is ordinary data.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Decoded::Value(value) => Some(value),
            Decoded::Instance(_) => None,
        }
    }

    /// The reconstructed instance as a concrete type, if this is an
    /// instance of `T`.
    pub fn downcast<T: Any>(self) -> Option<T> {
        match self {
            Decoded::Instance(instance) => instance.downcast().ok().map(|boxed| *boxed),
            Decoded::Value(_) => None,
        }
    }

    /// `true` if decode reconstructed a custom-type instance.
    pub fn is_instance(&self) -> bool {
        matches!(self, Decoded::Instance(_))
    }
}

impl std::fmt::Debug for Decoded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decoded::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Decoded::Instance(_) => f.debug_tuple("Instance").finish_non_exhaustive(),
        }
    }
}

/// Encodes and decodes custom-type instances against a [`TypeRegistry`],
/// tagging marshalled state via a pluggable [`TagStrategy`].
///
/// The codec owns only its strategy. The registry belongs to the
/// surrounding serializer and is passed into each operation, so one codec
/// configuration can serve any number of registries.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
/// use tagged_state::{ObjectCodec, TypeRegistry};
///
/// #[derive(Serialize, Deserialize, PartialEq, Debug)]
/// struct Point { x: i64, y: i64 }
///
/// let mut registry = TypeRegistry::new();
/// registry.register_custom_type::<Point>("Point");
///
/// let codec = ObjectCodec::new();
/// let wire = codec.encode(&registry, &Point { x: 1, y: 2 })?;
/// assert_eq!(wire, json!({"__type__": "Point", "state": {"x": 1, "y": 2}}));
///
/// let point: Point = codec.decode(&registry, wire)?.downcast().unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// # Ok::<(), tagged_state::CodecError>(())
/// ```
pub struct ObjectCodec {
    strategy: Box<dyn TagStrategy + Send + Sync>,
}

impl Default for ObjectCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectCodec {
    /// Codec with the default [`StateDictStrategy`] and its
    /// `"__type__"` / `"state"` keys.
    pub fn new() -> Self {
        Self::with_strategy(StateDictStrategy::new())
    }

    /// Codec with the default strategy under custom tag/state keys.
    pub fn with_keys(type_key: impl Into<String>, state_key: impl Into<String>) -> Self {
        Self::with_strategy(StateDictStrategy::with_keys(type_key, state_key))
    }

    /// Codec with an arbitrary tagging strategy.
    pub fn with_strategy(strategy: impl TagStrategy + Send + Sync + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }

    /// Encodes a custom-type instance into a primitive value.
    ///
    /// Looks up `T`'s marshal entry, marshals the instance to state, and
    /// wraps the state with the type tag unless the entry opted out via
    /// `wrap_state = false`.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnknownType`] when `T` has no registered marshaller;
    /// [`CodecError::User`] when the marshal function itself fails.
    pub fn encode<T: Any>(
        &self,
        registry: &TypeRegistry,
        instance: &T,
    ) -> Result<Value, CodecError> {
        let entry = registry
            .marshaller(TypeId::of::<T>())
            .ok_or_else(|| CodecError::UnknownType(std::any::type_name::<T>()))?;

        let state = (entry.marshal)(instance)?;
        if entry.wrap_state {
            Ok(self.strategy.wrap(&entry.type_name, state))
        } else {
            Ok(state)
        }
    }

    /// Decodes a primitive value that may carry a type tag.
    ///
    /// Untagged values pass through unchanged as [`Decoded::Value`].
    /// Tagged values are dispatched to the registered unmarshaller: an
    /// in-place entry allocates a blank instance through its factory and
    /// populates it, a by-value entry constructs the instance directly
    /// from the state.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnknownTag`] when the tag names an unregistered
    /// type; [`CodecError::User`] when the unmarshal function itself
    /// fails.
    pub fn decode(&self, registry: &TypeRegistry, value: Value) -> Result<Decoded, CodecError> {
        let (type_name, state) = match self.strategy.unwrap(value) {
            Unwrapped::Plain(value) => return Ok(Decoded::Value(value)),
            Unwrapped::Tagged { type_name, state } => (type_name, state),
        };

        match registry.unmarshaller(&type_name) {
            None => Err(CodecError::UnknownTag(type_name)),
            Some(UnmarshalEntry::InPlace { factory, populate }) => {
                let mut instance = factory();
                populate(instance.as_mut(), state)?;
                Ok(Decoded::Instance(instance))
            }
            Some(UnmarshalEntry::ByValue(construct)) => {
                Ok(Decoded::Instance(construct(state)?))
            }
        }
    }
}
