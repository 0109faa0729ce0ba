//! Marshal/unmarshal lookup tables keyed by runtime type and type name.
//!
//! The registry is the codec's external collaborator: it maps a runtime
//! type to `(type_name, marshal_fn, wrap_state)` and a type-name string
//! back to a reconstruction recipe. Entries are type-erased behind
//! `dyn Any` so a single registry serves arbitrary types; the typed
//! `register_*` methods adapt user closures to the erased signatures.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::BoxError;

/// Type-erased marshal function: instance to primitive state.
pub type MarshalFn = Box<dyn Fn(&dyn Any) -> Result<Value, BoxError> + Send + Sync>;

/// Produces a blank instance of the target type, outside any normal
/// constructor contract. The registry-supplied "raw allocate" capability.
pub type FactoryFn = Box<dyn Fn() -> Box<dyn Any> + Send + Sync>;

/// Fills a factory-produced instance in place from marshalled state.
pub type PopulateFn = Box<dyn Fn(&mut dyn Any, Value) -> Result<(), BoxError> + Send + Sync>;

/// Builds a fully constructed instance directly from marshalled state.
pub type ConstructFn = Box<dyn Fn(Value) -> Result<Box<dyn Any>, BoxError> + Send + Sync>;

/// How a registered type is encoded, keyed by `TypeId` in the registry.
pub struct MarshalEntry {
    /// Registered name of the custom type, embedded in the tag on encode.
    pub type_name: String,
    /// When `false` the marshalled state is emitted bare, without a tag.
    /// Only safe when the type is unambiguous from surrounding context;
    /// the caller upholds that invariant.
    pub wrap_state: bool,
    /// Converts an instance into its primitive state.
    pub marshal: MarshalFn,
}

/// How a type name is decoded back into an instance.
///
/// The two variants accommodate types that cannot be built from state
/// alone (two-phase init) versus types that are a pure function of their
/// state.
pub enum UnmarshalEntry {
    /// Allocate a blank instance via `factory`, then populate its state
    /// in place.
    InPlace {
        factory: FactoryFn,
        populate: PopulateFn,
    },
    /// The function constructs the value itself from the state.
    ByValue(ConstructFn),
}

/// The two lookup tables the codec dispatches against.
///
/// Registration replaces any previous entry for the same type or name
/// (last registration wins). Lookups are O(1); the codec only ever reads.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use tagged_state::TypeRegistry;
///
/// #[derive(Serialize, Deserialize, PartialEq, Debug)]
/// struct Point { x: i64, y: i64 }
///
/// let mut registry = TypeRegistry::new();
/// registry.register_custom_type::<Point>("Point");
/// assert!(registry.unmarshaller("Point").is_some());
/// ```
#[derive(Default)]
pub struct TypeRegistry {
    marshallers: HashMap<TypeId, MarshalEntry>,
    unmarshallers: HashMap<String, UnmarshalEntry>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the marshal entry for a runtime type.
    pub fn marshaller(&self, type_id: TypeId) -> Option<&MarshalEntry> {
        self.marshallers.get(&type_id)
    }

    /// Looks up the unmarshal entry for a type name.
    pub fn unmarshaller(&self, type_name: &str) -> Option<&UnmarshalEntry> {
        self.unmarshallers.get(type_name)
    }

    /// Registers the encode direction for `T`.
    pub fn register_marshaller<T, F>(
        &mut self,
        type_name: impl Into<String>,
        wrap_state: bool,
        marshal: F,
    ) where
        T: Any,
        F: Fn(&T) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        let marshal: MarshalFn = Box::new(move |any: &dyn Any| match any.downcast_ref::<T>() {
            Some(instance) => marshal(instance),
            None => Err(mismatch::<T>("marshaller")),
        });
        self.marshallers.insert(
            TypeId::of::<T>(),
            MarshalEntry {
                type_name: type_name.into(),
                wrap_state,
                marshal,
            },
        );
    }

    /// Registers the decode direction for `T` as factory + in-place
    /// populate.
    ///
    /// `factory` stands in for raw allocation: it produces a blank
    /// instance whose state `populate` then overwrites wholesale. It is
    /// not expected to run the type's meaningful construction logic.
    pub fn register_unmarshaller_in_place<T, F, P>(
        &mut self,
        type_name: impl Into<String>,
        factory: F,
        populate: P,
    ) where
        T: Any,
        F: Fn() -> T + Send + Sync + 'static,
        P: Fn(&mut T, Value) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let factory: FactoryFn = Box::new(move || Box::new(factory()) as Box<dyn Any>);
        let populate: PopulateFn =
            Box::new(move |any: &mut dyn Any, state| match any.downcast_mut::<T>() {
                Some(instance) => populate(instance, state),
                None => Err(mismatch::<T>("unmarshaller")),
            });
        self.unmarshallers
            .insert(type_name.into(), UnmarshalEntry::InPlace { factory, populate });
    }

    /// Registers the decode direction for `T` as a self-constructing
    /// function of the state.
    pub fn register_unmarshaller<T, F>(&mut self, type_name: impl Into<String>, construct: F)
    where
        T: Any,
        F: Fn(Value) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let construct: ConstructFn =
            Box::new(move |state| construct(state).map(|v| Box::new(v) as Box<dyn Any>));
        self.unmarshallers
            .insert(type_name.into(), UnmarshalEntry::ByValue(construct));
    }

    /// Registers both directions for `T` with serde-backed defaults.
    ///
    /// Encode marshals via [`serde_json::to_value`] with `wrap_state =
    /// true`; decode constructs via [`serde_json::from_value`]. Serde
    /// errors propagate as user errors.
    pub fn register_custom_type<T>(&mut self, type_name: impl Into<String>)
    where
        T: Any + Serialize + DeserializeOwned,
    {
        let type_name = type_name.into();
        self.register_marshaller::<T, _>(type_name.clone(), true, |instance| {
            serde_json::to_value(instance).map_err(BoxError::from)
        });
        self.register_unmarshaller::<T, _>(type_name, |state| {
            serde_json::from_value(state).map_err(BoxError::from)
        });
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("marshallers", &self.marshallers.len())
            .field("unmarshallers", &self.unmarshallers.keys())
            .finish()
    }
}

fn mismatch<T>(role: &str) -> BoxError {
    format!(
        "{role} for \"{}\" invoked with a different runtime type",
        std::any::type_name::<T>()
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Meters(f64);

    #[test]
    fn last_registration_wins() {
        let mut registry = TypeRegistry::new();
        registry.register_marshaller::<Meters, _>("Meters", true, |m| Ok(json!(m.0)));
        registry.register_marshaller::<Meters, _>("Distance", false, |m| Ok(json!(m.0)));

        let entry = registry.marshaller(TypeId::of::<Meters>()).expect("entry");
        assert_eq!(entry.type_name, "Distance");
        assert!(!entry.wrap_state);
    }

    #[test]
    fn marshal_adapter_rejects_foreign_instances() {
        let mut registry = TypeRegistry::new();
        registry.register_marshaller::<Meters, _>("Meters", true, |m| Ok(json!(m.0)));

        let entry = registry.marshaller(TypeId::of::<Meters>()).expect("entry");
        let err = (entry.marshal)(&42_u32).expect_err("mismatch");
        assert!(err.to_string().contains("different runtime type"));
    }
}
