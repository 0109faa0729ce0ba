//! Type-tag wrapping and marshaller dispatch for custom types over JSON
//! values.
//!
//! A byte-level serializer (JSON, CBOR, MessagePack, ...) natively
//! understands only a small set of primitive kinds: null, booleans,
//! numbers, strings, sequences, and string-keyed composites. This crate
//! is the adapter that lets such a serializer carry arbitrary registered
//! types: on encode it marshals an instance to its primitive state and
//! wraps it with a type tag, on decode it recognizes tagged values and
//! reconstructs the exact original type, passing ordinary data through
//! untouched.
//!
//! The three pieces:
//!
//! - [`TypeRegistry`]: lookup tables mapping a runtime type to its
//!   marshaller and a type name back to its unmarshaller.
//! - [`TagStrategy`]: the pluggable tagging convention; the default
//!   [`StateDictStrategy`] emits `{"__type__": name, "state": state}`.
//! - [`ObjectCodec`]: the dispatch between the two.
//!
//! # Example
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//! use tagged_state::{ObjectCodec, TypeRegistry};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Point { x: i64, y: i64 }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_custom_type::<Point>("Point");
//!
//! let codec = ObjectCodec::new();
//! let wire = codec.encode(&registry, &Point { x: 1, y: 2 })?;
//! assert_eq!(wire, json!({"__type__": "Point", "state": {"x": 1, "y": 2}}));
//!
//! // Tagged values come back as instances...
//! let point: Point = codec.decode(&registry, wire)?.downcast().unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//!
//! // ...while ordinary data passes through unchanged.
//! let plain = json!({"x": 1, "y": 2});
//! assert_eq!(codec.decode(&registry, plain.clone())?.into_value(), Some(plain));
//! # Ok::<(), tagged_state::CodecError>(())
//! ```

pub mod codec;
pub mod error;
pub mod registry;
pub mod strategy;

pub use codec::{Decoded, ObjectCodec};
pub use error::{BoxError, CodecError};
pub use registry::{MarshalEntry, TypeRegistry, UnmarshalEntry};
pub use strategy::{
    SeqTagStrategy, StateDictStrategy, TagStrategy, Unwrapped, DEFAULT_STATE_KEY, DEFAULT_TYPE_KEY,
};
