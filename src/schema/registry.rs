//! Type tag to shape registry.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::{Getter, Object, Record, Setter};
use crate::messages::Message;
use crate::types::{LapGap, TimeGap, TimedResult, Value};
use crate::{Result, TimingError};

/// Tag and name of one field within a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub tag: u8,
    pub name: &'static str,
}

/// Type-erased accessors for one registered record type.
trait ShapeOps: Send + Sync {
    fn get(&self, object: &dyn Object, index: usize) -> Result<Value>;

    fn instantiate(&self) -> Box<dyn Any + Send>;

    fn set(&self, instance: &mut (dyn Any + Send), index: usize, value: Value) -> Result<()>;

    fn complete(&self, instance: Box<dyn Any + Send>) -> Result<Arc<dyn Object>>;
}

struct TypedOps<T> {
    accessors: Vec<(Getter<T>, Setter<T>)>,
}

impl<T: Record> TypedOps<T> {
    fn wrong_type() -> TimingError {
        TimingError::UnregisteredType { type_name: format!("instance passed as {}", T::TYPE_NAME) }
    }
}

impl<T: Record> ShapeOps for TypedOps<T> {
    fn get(&self, object: &dyn Object, index: usize) -> Result<Value> {
        let record = object.as_any().downcast_ref::<T>().ok_or_else(Self::wrong_type)?;
        let (getter, _) = self.accessors[index];
        Ok(getter(record))
    }

    fn instantiate(&self) -> Box<dyn Any + Send> {
        Box::new(T::blank())
    }

    fn set(&self, instance: &mut (dyn Any + Send), index: usize, value: Value) -> Result<()> {
        let record = instance.downcast_mut::<T>().ok_or_else(Self::wrong_type)?;
        let (_, setter) = self.accessors[index];
        setter(record, value)
    }

    fn complete(&self, instance: Box<dyn Any + Send>) -> Result<Arc<dyn Object>> {
        let record = instance.downcast::<T>().map_err(|_| Self::wrong_type())?;
        Ok((*record).substitute())
    }
}

/// The registered wire layout of one record type.
pub struct Shape {
    type_tag: i32,
    type_name: &'static str,
    type_id: TypeId,
    fields: Vec<FieldInfo>,
    ops: Box<dyn ShapeOps>,
}

impl Shape {
    fn build<T: Record>() -> Result<Self> {
        let descriptors = T::fields();
        if descriptors.len() > u8::MAX as usize {
            return Err(TimingError::Schema {
                type_name: T::TYPE_NAME,
                reason: format!("{} fields exceed the single-byte field count", descriptors.len()),
            });
        }

        let mut fields = Vec::with_capacity(descriptors.len());
        let mut accessors = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if fields.iter().any(|field: &FieldInfo| field.tag == descriptor.tag) {
                return Err(TimingError::DuplicateFieldTag {
                    type_name: T::TYPE_NAME,
                    field_tag: descriptor.tag,
                });
            }
            let missing = |accessor| TimingError::MissingAccessor {
                type_name: T::TYPE_NAME,
                field: descriptor.name,
                accessor,
            };
            let getter = descriptor.getter.ok_or_else(|| missing("getter"))?;
            let setter = descriptor.setter.ok_or_else(|| missing("setter"))?;
            fields.push(FieldInfo { tag: descriptor.tag, name: descriptor.name });
            accessors.push((getter, setter));
        }

        Ok(Self {
            type_tag: T::TYPE_TAG,
            type_name: T::TYPE_NAME,
            type_id: TypeId::of::<T>(),
            fields,
            ops: Box::new(TypedOps::<T> { accessors }),
        })
    }

    pub fn type_tag(&self) -> i32 {
        self.type_tag
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields in wire order.
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn field_index(&self, tag: u8) -> Option<usize> {
        self.fields.iter().position(|field| field.tag == tag)
    }

    pub(crate) fn get(&self, object: &dyn Object, index: usize) -> Result<Value> {
        self.ops.get(object, index)
    }

    pub(crate) fn instantiate(&self) -> Box<dyn Any + Send> {
        self.ops.instantiate()
    }

    pub(crate) fn set(
        &self,
        instance: &mut (dyn Any + Send),
        index: usize,
        value: Value,
    ) -> Result<()> {
        self.ops.set(instance, index, value).map_err(|e| TimingError::Field {
            type_name: self.type_name,
            field_tag: self.fields[index].tag,
            details: e.to_string(),
        })
    }

    pub(crate) fn complete(&self, instance: Box<dyn Any + Send>) -> Result<Arc<dyn Object>> {
        self.ops.complete(instance)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("type_tag", &self.type_tag)
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Maps type tags and runtime types to shapes.
///
/// Build it once with [`Registry::standard`] (or [`Registry::new`] plus
/// [`Registry::register`] calls), then share it behind an `Arc`. Lookups on a
/// shared registry are read-only.
#[derive(Debug, Default)]
pub struct Registry {
    by_tag: HashMap<i32, Arc<Shape>>,
    by_type: HashMap<TypeId, i32>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the timing value records and the full message catalogue.
    pub fn standard() -> Result<Self> {
        let mut registry = Self::new();
        registry.register::<TimedResult>()?.register::<TimeGap>()?.register::<LapGap>()?;
        Message::register_all(&mut registry)?;
        debug!("Standard registry built with {} shapes", registry.len());
        Ok(registry)
    }

    /// Registers a record type.
    ///
    /// Registering the same type twice is a no-op. Reusing a tag for a different
    /// type, repeating a field tag or omitting an accessor is an error.
    pub fn register<T: Record>(&mut self) -> Result<&mut Self> {
        if let Some(existing) = self.by_tag.get(&T::TYPE_TAG) {
            if existing.type_id == TypeId::of::<T>() {
                return Ok(self);
            }
            return Err(TimingError::DuplicateTypeTag {
                tag: T::TYPE_TAG,
                existing: existing.type_name,
                attempted: T::TYPE_NAME,
            });
        }

        let shape = Shape::build::<T>()?;
        debug!(
            "Registered shape {} (tag {}, {} fields)",
            shape.type_name,
            shape.type_tag,
            shape.fields.len()
        );
        self.by_type.insert(shape.type_id, shape.type_tag);
        self.by_tag.insert(shape.type_tag, Arc::new(shape));
        Ok(self)
    }

    /// Resolves a type tag read from the wire.
    pub fn lookup(&self, tag: i32) -> Result<&Arc<Shape>> {
        self.by_tag.get(&tag).ok_or(TimingError::UnknownTypeTag { tag })
    }

    /// Resolves the shape registered for `T`.
    pub fn lookup_type<T: Record>(&self) -> Result<&Arc<Shape>> {
        self.lookup_type_id(TypeId::of::<T>(), T::TYPE_NAME)
    }

    /// Resolves the shape of a type-erased object.
    pub fn shape_of(&self, object: &dyn Object) -> Result<&Arc<Shape>> {
        let type_id = <dyn Any as Any>::type_id(object.as_any());
        self.lookup_type_id(type_id, object.type_name())
    }

    fn lookup_type_id(&self, type_id: TypeId, type_name: &str) -> Result<&Arc<Shape>> {
        self.by_type
            .get(&type_id)
            .and_then(|tag| self.by_tag.get(tag))
            .ok_or_else(|| TimingError::UnregisteredType { type_name: type_name.to_string() })
    }

    pub fn contains(&self, tag: i32) -> bool {
        self.by_tag.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}
