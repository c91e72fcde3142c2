//! Schema registry for the binary object codec.
//!
//! Every type that travels through the codec as an object is described by a
//! [`Shape`]: a stable signed 32-bit type tag plus an ordered list of fields,
//! each identified by an 8-bit field tag and backed by a getter and a setter.
//!
//! # Architecture
//!
//! - [`Record`] is implemented by concrete types, usually through the `record!`
//!   macro, and supplies the type tag, a blank constructor and field accessors
//! - [`Object`] is the type-erased view the codec works with; every `Record` is
//!   an `Object`
//! - [`FieldValue`] converts field types to and from codec [`Value`]s
//! - [`Registry`] is built once at startup and shared behind an `Arc`; it is
//!   never mutated after it is handed to a reader or writer
//!
//! # Blank construction
//!
//! Decoding builds instances through [`Record::blank`] and the field setters,
//! never through validating constructors. A decoded record therefore holds
//! exactly the values that were written.
//!
//! [`Value`]: crate::types::Value

mod field;
mod registry;

pub use field::FieldValue;
pub use registry::{FieldInfo, Registry, Shape};

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::Result;
use crate::types::Value;

/// Type-erased view of a registered record.
pub trait Object: Any + Send + Sync + fmt::Debug {
    fn type_tag(&self) -> i32;

    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    /// Structural equality against another object of any type.
    fn object_eq(&self, other: &dyn Object) -> bool;
}

impl<T: Record> Object for T {
    fn type_tag(&self) -> i32 {
        T::TYPE_TAG
    }

    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn object_eq(&self, other: &dyn Object) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|other| self == other)
    }
}

/// A concrete type with a registered wire shape.
pub trait Record: Any + Clone + PartialEq + fmt::Debug + Send + Sync {
    /// Stable type tag. Must be unique across the registry.
    const TYPE_TAG: i32;

    const TYPE_NAME: &'static str;

    /// Builds an instance without running any validation.
    fn blank() -> Self;

    /// Field descriptors in wire order.
    fn fields() -> Vec<FieldDescriptor<Self>>;

    /// Replace-on-read hook, called once all fields have been decoded.
    ///
    /// Singleton-like types return a canonical shared instance so decoded
    /// values keep reference identity with it.
    fn substitute(self) -> Arc<dyn Object> {
        Arc::new(self)
    }
}

/// Getter signature for a field.
pub type Getter<T> = fn(&T) -> Value;

/// Setter signature for a field.
pub type Setter<T> = fn(&mut T, Value) -> Result<()>;

/// One field of a record: its tag, a name for diagnostics and its accessors.
pub struct FieldDescriptor<T> {
    tag: u8,
    name: &'static str,
    getter: Option<Getter<T>>,
    setter: Option<Setter<T>>,
}

impl<T> FieldDescriptor<T> {
    pub fn new(tag: u8, name: &'static str, getter: Getter<T>, setter: Setter<T>) -> Self {
        Self { tag, name, getter: Some(getter), setter: Some(setter) }
    }

    /// A field with a getter but no setter. Registration rejects it.
    pub fn read_only(tag: u8, name: &'static str, getter: Getter<T>) -> Self {
        Self { tag, name, getter: Some(getter), setter: None }
    }

    pub fn tag(&self) -> u8 {
        self.tag
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Implements [`Record`] for a struct from a list of `tag => field` pairs.
///
/// The singleton form declares a unit struct whose decoded instances are
/// replaced by one canonical `Arc`.
macro_rules! record {
    ($ty:ident, tag = $tag:expr, name = $name:expr, { $($ftag:literal => $field:ident),* $(,)? }) => {
        impl $crate::schema::Record for $ty {
            const TYPE_TAG: i32 = $tag;
            const TYPE_NAME: &'static str = $name;

            fn blank() -> Self {
                <Self as ::std::default::Default>::default()
            }

            fn fields() -> ::std::vec::Vec<$crate::schema::FieldDescriptor<Self>> {
                ::std::vec![$(
                    $crate::schema::FieldDescriptor::new(
                        $ftag,
                        stringify!($field),
                        |record: &Self| $crate::schema::FieldValue::to_value(&record.$field),
                        |record: &mut Self, value: $crate::types::Value| -> $crate::Result<()> {
                            record.$field = $crate::schema::FieldValue::from_value(value)?;
                            Ok(())
                        },
                    )
                ),*]
            }
        }
    };
    ($ty:ident, tag = $tag:expr, name = $name:expr, singleton) => {
        impl $ty {
            /// The canonical shared instance that decoding resolves to.
            pub fn canonical() -> ::std::sync::Arc<dyn $crate::schema::Object> {
                static CANONICAL: ::std::sync::LazyLock<::std::sync::Arc<dyn $crate::schema::Object>> =
                    ::std::sync::LazyLock::new(|| -> ::std::sync::Arc<dyn $crate::schema::Object> {
                        ::std::sync::Arc::new($ty)
                    });
                ::std::sync::Arc::clone(&CANONICAL)
            }
        }

        impl $crate::schema::Record for $ty {
            const TYPE_TAG: i32 = $tag;
            const TYPE_NAME: &'static str = $name;

            fn blank() -> Self {
                $ty
            }

            fn fields() -> ::std::vec::Vec<$crate::schema::FieldDescriptor<Self>> {
                ::std::vec::Vec::new()
            }

            fn substitute(self) -> ::std::sync::Arc<dyn $crate::schema::Object> {
                Self::canonical()
            }
        }
    };
}

pub(crate) use record;
