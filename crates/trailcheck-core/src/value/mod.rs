//! Dynamic value model.
//!
//! Every value the equality engine compares or the dumper renders is first
//! converted into a [`Value`]: a stable [`Type`] identifier plus tagged
//! [`Data`]. Conversions live in [`convert`], records are declared with
//! [`Value::record`] or the [`record!`](crate::record) macro, and the
//! deterministic key order used for maps and sets lives in [`order`].

pub mod convert;
pub mod order;
pub mod record;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset as _, TimeDelta, Utc};
use std::fmt;

pub use convert::{Complex128, Complex64, Dyn, Nil, ToValue, Typed, Zoned};
pub use order::cmp_values;
pub use record::RecordBuilder;

/// Type name used for every timestamp representation.
pub const DATETIME: &str = "DateTime";

/// Type name used for every duration representation.
pub const DURATION: &str = "Duration";

/// Type name used for every timezone representation.
pub const ZONE: &str = "Zone";

/// Shape category of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// Untyped absence.
    Invalid,
    Bool,
    Isize,
    I8,
    I16,
    I32,
    I64,
    I128,
    Usize,
    /// Byte.
    U8,
    U16,
    U32,
    U64,
    U128,
    /// Raw address.
    Uintptr,
    F32,
    F64,
    Complex64,
    Complex128,
    Char,
    Str,
    /// Fixed-size sequence.
    Array,
    /// Variable-size sequence.
    Slice,
    Map,
    Set,
    Chan,
    Func,
    /// Nullable or owning indirection.
    Ptr,
    /// Open handle holding a value of any concrete type.
    Interface,
    Struct,
}

impl Kind {
    /// True for kinds with a length
    pub fn has_len(&self) -> bool {
        matches!(
            self,
            Kind::Str | Kind::Array | Kind::Slice | Kind::Map | Kind::Set
        )
    }

    /// Lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::Bool => "bool",
            Kind::Isize => "isize",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::I128 => "i128",
            Kind::Usize => "usize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::U128 => "u128",
            Kind::Uintptr => "uintptr",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::Complex64 => "complex64",
            Kind::Complex128 => "complex128",
            Kind::Char => "char",
            Kind::Str => "str",
            Kind::Array => "array",
            Kind::Slice => "slice",
            Kind::Map => "map",
            Kind::Set => "set",
            Kind::Chan => "chan",
            Kind::Func => "func",
            Kind::Ptr => "ptr",
            Kind::Interface => "interface",
            Kind::Struct => "struct",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable type identifier: the shape category plus the type name.
///
/// Two values have the same declared type when both the kind and the name
/// match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Type {
    kind: Kind,
    name: String,
}

impl Type {
    pub fn new(kind: Kind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Type of the untyped absence
    pub fn invalid() -> Self {
        Self::new(Kind::Invalid, "nil")
    }

    /// Static type of `T`
    pub fn of<T: Typed + ?Sized>() -> Self {
        T::type_of()
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Timezone with a canonical identity.
///
/// Equality compares the zone name only; the offset records what the zone
/// was observed at and is used to place wall clocks on the timeline.
#[derive(Debug, Clone)]
pub struct Zone {
    name: String,
    offset: FixedOffset,
}

impl Zone {
    /// The UTC zone
    pub fn utc() -> Self {
        Self {
            name: "UTC".to_string(),
            offset: Utc.fix(),
        }
    }

    /// Anonymous fixed-offset zone named after its offset (`+02:00`)
    pub fn fixed(offset: FixedOffset) -> Self {
        Self {
            name: offset.to_string(),
            offset,
        }
    }

    /// Named zone observed at the given offset (`Europe/Warsaw`, `+01:00`)
    pub fn named(name: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl PartialEq for Zone {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Zone {}

impl std::hash::Hash for Zone {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// One record field.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub value: Value,
    /// Unexported fields are neither compared nor rendered.
    pub exported: bool,
}

/// Tagged payload of a [`Value`].
#[derive(Debug, Clone)]
pub enum Data {
    Invalid,
    Bool(bool),
    Int(i128),
    Uint(u128),
    Float(f64),
    Complex(f64, f64),
    Char(char),
    Str(String),
    /// Arrays and slices. `items` is `None` for a nil slice.
    Seq { items: Option<Vec<Value>> },
    /// Maps and sets in source iteration order. Set entries carry the
    /// element as both key and value.
    Map { entries: Option<Vec<(Value, Value)>> },
    /// Channel and function handles, compared by identity.
    Handle(Option<usize>),
    Ptr {
        addr: usize,
        target: Option<Box<Value>>,
    },
    Interface(Option<Box<Value>>),
    Struct(Vec<Field>),
    Time(DateTime<FixedOffset>, Zone),
    Duration(TimeDelta),
    Zone(Zone),
}

/// A runtime value of any supported shape.
#[derive(Debug, Clone)]
pub struct Value {
    ty: Type,
    data: Data,
}

impl Value {
    pub fn new(ty: Type, data: Data) -> Self {
        Self { ty, data }
    }

    /// The untyped absence
    pub fn nil() -> Self {
        Self::new(Type::invalid(), Data::Invalid)
    }

    /// Start building a record value
    pub fn record(name: impl Into<String>) -> RecordBuilder {
        RecordBuilder::new(name)
    }

    /// Text value
    pub fn string(s: impl Into<String>) -> Self {
        Self::new(Type::of::<String>(), Data::Str(s.into()))
    }

    /// Timestamp in the given zone
    pub fn time(instant: DateTime<Utc>, zone: Zone) -> Self {
        let local = instant.with_timezone(&zone.offset());
        Self::new(Type::new(Kind::Struct, DATETIME), Data::Time(local, zone))
    }

    /// Timestamp from a wall clock reading in the given zone
    pub fn wall_time(wall: NaiveDateTime, zone: Zone) -> Self {
        let utc = wall - TimeDelta::seconds(i64::from(zone.offset().local_minus_utc()));
        Self::time(utc.and_utc(), zone)
    }

    pub fn duration(d: TimeDelta) -> Self {
        Self::new(Type::new(Kind::I64, DURATION), Data::Duration(d))
    }

    pub fn zone(zone: Zone) -> Self {
        Self::new(Type::new(Kind::Struct, ZONE), Data::Zone(zone))
    }

    /// Channel handle; `None` is a nil channel
    pub fn chan(elem: &str, addr: Option<usize>) -> Self {
        Self::new(Type::new(Kind::Chan, format!("chan {elem}")), Data::Handle(addr))
    }

    /// Function handle; `None` is a nil function
    pub fn func(name: impl Into<String>, addr: Option<usize>) -> Self {
        Self::new(Type::new(Kind::Func, name), Data::Handle(addr))
    }

    /// Open handle of the given interface name
    pub fn interface(name: impl Into<String>, held: Option<Value>) -> Self {
        Self::new(
            Type::new(Kind::Interface, name),
            Data::Interface(held.map(Box::new)),
        )
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn kind(&self) -> Kind {
        self.ty.kind
    }

    pub fn type_name(&self) -> &str {
        &self.ty.name
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    /// True for the untyped absence
    pub fn is_invalid(&self) -> bool {
        matches!(self.data, Data::Invalid)
    }

    /// True for nil pointers, slices, maps, handles and open handles
    pub fn is_nil(&self) -> bool {
        match &self.data {
            Data::Invalid => true,
            Data::Seq { items } => self.kind() == Kind::Slice && items.is_none(),
            Data::Map { entries } => entries.is_none(),
            Data::Handle(addr) => addr.is_none(),
            Data::Ptr { target, .. } => target.is_none(),
            Data::Interface(held) => held.is_none(),
            _ => false,
        }
    }

    /// Length of strings (in bytes), sequences, maps and sets
    pub fn len(&self) -> Option<usize> {
        match &self.data {
            Data::Str(s) => Some(s.len()),
            Data::Seq { items } => Some(items.as_ref().map_or(0, Vec::len)),
            Data::Map { entries } => Some(entries.as_ref().map_or(0, Vec::len)),
            _ => None,
        }
    }

    /// True when [`Value::len`] is `Some(0)`
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Value of the named record field, exported or not
    pub fn field(&self, name: &str) -> Option<&Value> {
        match &self.deref().data {
            Data::Struct(fields) => fields.iter().find(|f| f.name == name).map(|f| &f.value),
            _ => None,
        }
    }

    /// Follow pointers and open handles down to the held value
    pub fn deref(&self) -> &Value {
        match &self.data {
            Data::Ptr {
                target: Some(t), ..
            } => t.deref(),
            Data::Interface(Some(held)) => held.deref(),
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_identity_ignores_offset() {
        let summer = Zone::named("Europe/Warsaw", FixedOffset::east_opt(7200).unwrap());
        let winter = Zone::named("Europe/Warsaw", FixedOffset::east_opt(3600).unwrap());
        assert_eq!(summer, winter);
        assert_ne!(Zone::utc(), Zone::fixed(FixedOffset::east_opt(0).unwrap()));
    }

    #[test]
    fn test_nil_detection_per_kind() {
        assert!(Value::nil().is_nil());
        assert!(None::<i32>.to_value().is_nil());
        assert!(!Some(1).to_value().is_nil());
        assert!(Value::chan("i32", None).is_nil());
        assert!(!Value::chan("i32", Some(8)).is_nil());
        assert!(!vec![1].to_value().is_nil());
    }

    #[test]
    fn test_len_only_for_len_kinds() {
        assert_eq!("abc".to_value().len(), Some(3));
        assert_eq!(vec![1, 2].to_value().len(), Some(2));
        assert_eq!(42.to_value().len(), None);
    }

    #[test]
    fn test_wall_time_places_instant_by_offset() {
        let zone = Zone::named("Asia/Tokyo", FixedOffset::east_opt(9 * 3600).unwrap());
        let wall = chrono::NaiveDate::from_ymd_opt(2022, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let v = Value::wall_time(wall, zone);
        match v.data() {
            Data::Time(t, z) => {
                assert_eq!(t.with_timezone(&Utc).to_rfc3339(), "2022-01-01T00:00:00+00:00");
                assert_eq!(z.name(), "Asia/Tokyo");
            }
            other => panic!("unexpected data {other:?}"),
        }
    }
}
