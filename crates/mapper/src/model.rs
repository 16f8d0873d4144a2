//! The contract between the mapper and user model types.
//!
//! A model declares its property names, accepts mapped values one property at
//! a time and optionally advertises a nested type per property. Construction
//! is separate: a [`ModelRef`] carries a constructor that a registered factory
//! may replace.
//!
//! ```rust
//! use mapper::{AssignError, Mapped, Model};
//!
//! #[derive(Default)]
//! struct Account {
//!     id: Option<u64>,
//!     display_name: Option<String>,
//! }
//!
//! impl Model for Account {
//!     fn properties(&self) -> &'static [&'static str] {
//!         &["id", "displayName"]
//!     }
//!
//!     fn assign(&mut self, property: &str, value: Mapped) -> Result<(), AssignError> {
//!         match property {
//!             "id" => self.id = value.into_data()?,
//!             "displayName" => self.display_name = value.into_data()?,
//!             other => return Err(AssignError::UnknownProperty(other.to_string())),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut account = Account::default();
//! account.assign("id", Mapped::Data(7.into())).unwrap();
//! assert_eq!(account.id, Some(7));
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AssignError, ConstructError};

/// Type erasure helpers implemented for every [`Model`].
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    /// Short type name, used in errors and logs.
    fn type_name(&self) -> &'static str;
}

impl<T: Model> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn type_name(&self) -> &'static str {
        short_type_name::<T>()
    }
}

/// A type the mapper can populate.
pub trait Model: AsAny + Send + 'static {
    /// Declared property names, in declaration order. Inherited properties
    /// are listed alongside the model's own.
    fn properties(&self) -> &'static [&'static str];

    /// Writes one resolved value onto the instance.
    fn assign(&mut self, property: &str, value: Mapped) -> Result<(), AssignError>;

    /// Type reference held as the property's default value, if any.
    ///
    /// Consulted when `derive_type` is enabled and no nested type was declared.
    fn default_type(&self, property: &str) -> Option<ModelRef> {
        let _ = property;
        None
    }
}

impl dyn Model {
    pub fn is<T: Model>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Model>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Model>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn downcast<T: Model>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast::<T>().ok()
    }
}

impl fmt::Debug for dyn Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.type_name()).finish_non_exhaustive()
    }
}

/// Construction strategy used when no factory is registered for a type.
pub trait Construct: Model + Sized {
    fn construct(input: FactoryInput<'_>) -> Result<Self, ConstructError>;
}

/// What a factory receives: the value being mapped (absent when building a
/// template) and extra positional parameters. Array elements get their index
/// prepended to the parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactoryInput<'a> {
    pub value: Option<&'a Value>,
    pub params: &'a [Value],
}

impl<'a> FactoryInput<'a> {
    /// Input for a template instance: no value, no parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(value: Option<&'a Value>, params: &'a [Value]) -> Self {
        Self { value, params }
    }

    /// The value, or [`ConstructError::MissingValue`].
    pub fn require(&self) -> Result<&'a Value, ConstructError> {
        self.value.ok_or(ConstructError::MissingValue)
    }

    /// Deserializes the value into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConstructError> {
        let value = self.require()?;
        Ok(T::deserialize(value)?)
    }
}

type Constructor = fn(FactoryInput<'_>) -> Result<Box<dyn Model>, ConstructError>;

/// Copyable reference to a model type: identity, name and default constructor.
///
/// Equality and hashing use the type identity only.
#[derive(Clone, Copy)]
pub struct ModelRef {
    id: TypeId,
    name: &'static str,
    constructor: Constructor,
}

impl ModelRef {
    /// Reference to a model built through its [`Construct`] impl.
    pub fn of<T: Construct>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name::<T>(),
            constructor: construct_boxed::<T>,
        }
    }

    /// Reference to a model built with `T::default()`, ignoring the input.
    pub fn defaulted<T: Model + Default>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name::<T>(),
            constructor: default_boxed::<T>,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True if this reference names `T`.
    pub fn is<T: Model>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Runs the default constructor.
    pub fn construct(&self, input: FactoryInput<'_>) -> Result<Box<dyn Model>, ConstructError> {
        (self.constructor)(input)
    }
}

impl PartialEq for ModelRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModelRef {}

impl Hash for ModelRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelRef").field(&self.name).finish()
    }
}

fn construct_boxed<T: Construct>(input: FactoryInput<'_>) -> Result<Box<dyn Model>, ConstructError> {
    let model = T::construct(input)?;
    Ok(Box::new(model))
}

fn default_boxed<T: Model + Default>(
    _input: FactoryInput<'_>,
) -> Result<Box<dyn Model>, ConstructError> {
    Ok(Box::new(T::default()))
}

pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

/// Result of mapping one value.
#[derive(Debug)]
pub enum Mapped {
    /// Input was null, or an error handler declined to supply an instance.
    Absent,
    /// Raw data assigned without a nested type.
    Data(Value),
    Instance(Box<dyn Model>),
    /// One entry per input array element, in order.
    List(Vec<Mapped>),
}

impl Mapped {
    pub fn is_absent(&self) -> bool {
        matches!(self, Mapped::Absent)
    }

    /// Shape name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Mapped::Absent => "absent",
            Mapped::Data(_) => "data",
            Mapped::Instance(_) => "instance",
            Mapped::List(_) => "list",
        }
    }

    pub fn as_model<T: Model>(&self) -> Option<&T> {
        match self {
            Mapped::Instance(model) => model.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Extracts an instance of `T`.
    pub fn into_model<T: Model>(self) -> Result<T, AssignError> {
        let expected = short_type_name::<T>();
        match self {
            Mapped::Instance(model) => {
                let found = model.type_name();
                model
                    .downcast::<T>()
                    .map(|model| *model)
                    .ok_or(AssignError::Shape { expected, found })
            }
            other => Err(AssignError::Shape {
                expected,
                found: other.kind(),
            }),
        }
    }

    /// Like [`into_model`](Self::into_model), with absent or null input
    /// yielding `None`.
    pub fn into_optional_model<T: Model>(self) -> Result<Option<T>, AssignError> {
        match self {
            Mapped::Absent | Mapped::Data(Value::Null) => Ok(None),
            other => other.into_model().map(Some),
        }
    }

    /// Extracts a list of `T`; absent input yields an empty list.
    pub fn into_models<T: Model>(self) -> Result<Vec<T>, AssignError> {
        match self {
            Mapped::List(items) => items.into_iter().map(Mapped::into_model).collect(),
            Mapped::Absent => Ok(Vec::new()),
            other => Err(AssignError::Shape {
                expected: "list",
                found: other.kind(),
            }),
        }
    }

    /// Deserializes raw data; absent input deserializes from `null`.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, AssignError> {
        match self {
            Mapped::Data(value) => Ok(serde_json::from_value(value)?),
            Mapped::Absent => Ok(serde_json::from_value(Value::Null)?),
            other => Err(AssignError::Shape {
                expected: "data",
                found: other.kind(),
            }),
        }
    }
}
