//! Record (aggregate) values.

use super::{Data, Field, Kind, ToValue, Type, Value};

/// Builder for record values, fields kept in declaration order.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    name: String,
    fields: Vec<Field>,
}

impl RecordBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add an exported field
    pub fn field<T: ToValue + ?Sized>(self, name: impl Into<String>, value: &T) -> Self {
        self.with_field(name, value, true)
    }

    /// Add an unexported field: kept in the value, never compared or rendered
    pub fn private<T: ToValue + ?Sized>(self, name: impl Into<String>, value: &T) -> Self {
        self.with_field(name, value, false)
    }

    pub fn with_field<T: ToValue + ?Sized>(
        mut self,
        name: impl Into<String>,
        value: &T,
        exported: bool,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.to_value(),
            exported,
        });
        self
    }

    pub fn build(self) -> Value {
        Value::new(Type::new(Kind::Struct, self.name), Data::Struct(self.fields))
    }
}

/// Declare a struct and derive [`ToValue`] and [`Typed`] for it.
///
/// Fields declared with a visibility qualifier (`pub`, `pub(crate)`) are
/// exported; fields without one are unexported and skipped by the engine
/// and the dumper.
///
/// ```
/// use trailcheck_core::record;
/// use trailcheck_core::value::ToValue;
///
/// record! {
///     #[derive(Debug, Clone)]
///     pub struct Point {
///         pub x: i32,
///         pub y: i32,
///         label: String,
///     }
/// }
///
/// let p = Point { x: 1, y: 2, label: "origin".into() };
/// assert_eq!(p.to_value().type_name(), "Point");
/// ```
///
/// [`Typed`]: crate::value::Typed
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::value::Typed for $name {
            fn type_of() -> $crate::value::Type {
                $crate::value::Type::new($crate::value::Kind::Struct, stringify!($name))
            }
        }

        impl $crate::value::ToValue for $name {
            fn to_value(&self) -> $crate::value::Value {
                let record = $crate::value::Value::record(stringify!($name));
                $(
                    let record = record.with_field(
                        stringify!($field),
                        &self.$field,
                        !stringify!($fvis).is_empty(),
                    );
                )*
                record.build()
            }
        }
    };
}
