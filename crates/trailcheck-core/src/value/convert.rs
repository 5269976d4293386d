//! Conversions from Rust values into [`Value`].
//!
//! [`ToValue`] is object safe so open handles can hold `dyn ToValue`;
//! [`Typed`] supplies the static type needed to name nil and empty
//! containers.
//!
//! References are transparent (`&T` converts exactly like `T`). `Box`, `Rc`
//! and `Arc` are non-nil pointers, `Option<T>` is a nullable pointer.
//! Functions are compared by identity, so function items must be cast to a
//! function pointer first (`parse as fn(&str) -> u8`).

use super::{Data, Kind, Type, Value, Zone, DATETIME, DURATION, ZONE};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender, SyncSender};
use std::sync::Arc;

/// Type name of decoded JSON values.
pub const JSON_VALUE: &str = "json::Value";

/// Convert a value into its dynamic representation.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Static type of a convertible value.
pub trait Typed {
    fn type_of() -> Type;
}

fn addr_of<T: ?Sized>(r: &T) -> usize {
    r as *const T as *const () as usize
}

fn seq<'a, T, I>(ty: Type, items: I) -> Value
where
    T: ToValue + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let items = items.into_iter().map(ToValue::to_value).collect();
    Value::new(ty, Data::Seq { items: Some(items) })
}

fn map<'a, K, V, I>(ty: Type, entries: I) -> Value
where
    K: ToValue + 'a,
    V: ToValue + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let entries = entries
        .into_iter()
        .map(|(k, v)| (k.to_value(), v.to_value()))
        .collect();
    Value::new(ty, Data::Map { entries: Some(entries) })
}

fn set<'a, T, I>(ty: Type, items: I) -> Value
where
    T: ToValue + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let entries = items
        .into_iter()
        .map(|item| {
            let v = item.to_value();
            (v.clone(), v)
        })
        .collect();
    Value::new(ty, Data::Map { entries: Some(entries) })
}

fn ptr(ty: Type, addr: usize, target: Option<Value>) -> Value {
    Value::new(
        ty,
        Data::Ptr {
            addr,
            target: target.map(Box::new),
        },
    )
}

// ========== Primitives ==========

macro_rules! impl_signed {
    ($($t:ty => $kind:ident),* $(,)?) => {$(
        impl Typed for $t {
            fn type_of() -> Type {
                Type::new(Kind::$kind, stringify!($t))
            }
        }

        impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::new(<$t as Typed>::type_of(), Data::Int(*self as i128))
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($t:ty => $kind:ident),* $(,)?) => {$(
        impl Typed for $t {
            fn type_of() -> Type {
                Type::new(Kind::$kind, stringify!($t))
            }
        }

        impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::new(<$t as Typed>::type_of(), Data::Uint(*self as u128))
            }
        }
    )*};
}

impl_signed!(isize => Isize, i8 => I8, i16 => I16, i32 => I32, i64 => I64, i128 => I128);
impl_unsigned!(usize => Usize, u8 => U8, u16 => U16, u32 => U32, u64 => U64, u128 => U128);

impl Typed for f32 {
    fn type_of() -> Type {
        Type::new(Kind::F32, "f32")
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::new(Self::type_of(), Data::Float(f64::from(*self)))
    }
}

impl Typed for f64 {
    fn type_of() -> Type {
        Type::new(Kind::F64, "f64")
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::new(Self::type_of(), Data::Float(*self))
    }
}

impl Typed for bool {
    fn type_of() -> Type {
        Type::new(Kind::Bool, "bool")
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::new(Self::type_of(), Data::Bool(*self))
    }
}

impl Typed for char {
    fn type_of() -> Type {
        Type::new(Kind::Char, "char")
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::new(Self::type_of(), Data::Char(*self))
    }
}

// `str` and `String` share one type so literals compare against owned text.
impl Typed for str {
    fn type_of() -> Type {
        Type::new(Kind::Str, "String")
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::new(Self::type_of(), Data::Str(self.to_string()))
    }
}

impl Typed for String {
    fn type_of() -> Type {
        Type::new(Kind::Str, "String")
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::new(Self::type_of(), Data::Str(self.clone()))
    }
}

impl Typed for () {
    fn type_of() -> Type {
        Type::new(Kind::Struct, "()")
    }
}

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::new(Self::type_of(), Data::Struct(Vec::new()))
    }
}

/// Complex number with `f32` parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex64 {
    pub re: f32,
    pub im: f32,
}

impl Typed for Complex64 {
    fn type_of() -> Type {
        Type::new(Kind::Complex64, "Complex64")
    }
}

impl ToValue for Complex64 {
    fn to_value(&self) -> Value {
        Value::new(
            Self::type_of(),
            Data::Complex(f64::from(self.re), f64::from(self.im)),
        )
    }
}

/// Complex number with `f64` parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex128 {
    pub re: f64,
    pub im: f64,
}

impl Typed for Complex128 {
    fn type_of() -> Type {
        Type::new(Kind::Complex128, "Complex128")
    }
}

impl ToValue for Complex128 {
    fn to_value(&self) -> Value {
        Value::new(Self::type_of(), Data::Complex(self.re, self.im))
    }
}

// ========== Absence and open handles ==========

/// The untyped absence, equal to any nil handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nil;

impl Typed for Nil {
    fn type_of() -> Type {
        Type::invalid()
    }
}

impl ToValue for Nil {
    fn to_value(&self) -> Value {
        Value::nil()
    }
}

/// Open handle: either nil or a value of any concrete type.
pub struct Dyn(Option<Box<dyn ToValue>>);

impl Dyn {
    pub fn new(held: impl ToValue + 'static) -> Self {
        Self(Some(Box::new(held)))
    }

    pub fn nil() -> Self {
        Self(None)
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_none()
    }
}

impl Typed for Dyn {
    fn type_of() -> Type {
        Type::new(Kind::Interface, "dyn ToValue")
    }
}

impl ToValue for Dyn {
    fn to_value(&self) -> Value {
        Value::interface("dyn ToValue", self.0.as_ref().map(|held| held.to_value()))
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

// ========== Indirection ==========

impl<T: Typed + ?Sized> Typed for &T {
    fn type_of() -> Type {
        T::type_of()
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: Typed + ?Sized> Typed for &mut T {
    fn type_of() -> Type {
        T::type_of()
    }
}

impl<T: ToValue + ?Sized> ToValue for &mut T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

macro_rules! impl_smart_ptr {
    ($($ptr:ident),*) => {$(
        impl<T: Typed + ?Sized> Typed for $ptr<T> {
            fn type_of() -> Type {
                Type::new(Kind::Ptr, format!("{}<{}>", stringify!($ptr), T::type_of()))
            }
        }

        impl<T: ToValue + Typed + ?Sized> ToValue for $ptr<T> {
            fn to_value(&self) -> Value {
                let target: &T = self;
                ptr(Self::type_of(), addr_of(target), Some(target.to_value()))
            }
        }
    )*};
}

impl_smart_ptr!(Box, Rc, Arc);

impl<T: Typed> Typed for Option<T> {
    fn type_of() -> Type {
        Type::new(Kind::Ptr, format!("Option<{}>", T::type_of()))
    }
}

impl<T: ToValue + Typed> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => ptr(Self::type_of(), addr_of(v), Some(v.to_value())),
            None => ptr(Self::type_of(), 0, None),
        }
    }
}

impl<T: ?Sized> Typed for *const T {
    fn type_of() -> Type {
        Type::new(Kind::Uintptr, std::any::type_name::<*const T>())
    }
}

impl<T: ?Sized> ToValue for *const T {
    fn to_value(&self) -> Value {
        Value::new(Self::type_of(), Data::Uint(self.cast::<()>() as usize as u128))
    }
}

impl<T: ?Sized> Typed for *mut T {
    fn type_of() -> Type {
        Type::new(Kind::Uintptr, std::any::type_name::<*mut T>())
    }
}

impl<T: ?Sized> ToValue for *mut T {
    fn to_value(&self) -> Value {
        Value::new(Self::type_of(), Data::Uint(self.cast::<()>() as usize as u128))
    }
}

// ========== Sequences ==========

impl<T: Typed> Typed for [T] {
    fn type_of() -> Type {
        Type::new(Kind::Slice, format!("[{}]", T::type_of()))
    }
}

impl<T: ToValue + Typed> ToValue for [T] {
    fn to_value(&self) -> Value {
        seq(Self::type_of(), self)
    }
}

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_of() -> Type {
        Type::new(Kind::Array, format!("[{}; {N}]", T::type_of()))
    }
}

impl<T: ToValue + Typed, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        seq(Self::type_of(), self)
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn type_of() -> Type {
        Type::new(Kind::Slice, format!("Vec<{}>", T::type_of()))
    }
}

impl<T: ToValue + Typed> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        seq(Self::type_of(), self)
    }
}

impl<T: Typed> Typed for VecDeque<T> {
    fn type_of() -> Type {
        Type::new(Kind::Slice, format!("VecDeque<{}>", T::type_of()))
    }
}

impl<T: ToValue + Typed> ToValue for VecDeque<T> {
    fn to_value(&self) -> Value {
        seq(Self::type_of(), self)
    }
}

// ========== Maps and sets ==========

impl<K: Typed, V: Typed, S> Typed for HashMap<K, V, S> {
    fn type_of() -> Type {
        Type::new(
            Kind::Map,
            format!("HashMap<{}, {}>", K::type_of(), V::type_of()),
        )
    }
}

impl<K: ToValue + Typed, V: ToValue + Typed, S> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        map(Self::type_of(), self.iter())
    }
}

impl<K: Typed, V: Typed> Typed for BTreeMap<K, V> {
    fn type_of() -> Type {
        Type::new(
            Kind::Map,
            format!("BTreeMap<{}, {}>", K::type_of(), V::type_of()),
        )
    }
}

impl<K: ToValue + Typed, V: ToValue + Typed> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        map(Self::type_of(), self.iter())
    }
}

impl<T: Typed, S> Typed for HashSet<T, S> {
    fn type_of() -> Type {
        Type::new(Kind::Set, format!("HashSet<{}>", T::type_of()))
    }
}

impl<T: ToValue + Typed, S> ToValue for HashSet<T, S> {
    fn to_value(&self) -> Value {
        set(Self::type_of(), self.iter())
    }
}

impl<T: Typed> Typed for BTreeSet<T> {
    fn type_of() -> Type {
        Type::new(Kind::Set, format!("BTreeSet<{}>", T::type_of()))
    }
}

impl<T: ToValue + Typed> ToValue for BTreeSet<T> {
    fn to_value(&self) -> Value {
        set(Self::type_of(), self.iter())
    }
}

// ========== Functions and channels ==========

macro_rules! impl_fn {
    ($($arg:ident),*) => {
        impl<R, $($arg),*> Typed for fn($($arg),*) -> R {
            fn type_of() -> Type {
                Type::new(Kind::Func, std::any::type_name::<fn($($arg),*) -> R>())
            }
        }

        impl<R, $($arg),*> ToValue for fn($($arg),*) -> R {
            fn to_value(&self) -> Value {
                Value::new(Self::type_of(), Data::Handle(Some(*self as usize)))
            }
        }
    };
}

impl_fn!();
impl_fn!(A);
impl_fn!(A, B);
impl_fn!(A, B, C);

macro_rules! impl_chan {
    ($($chan:ident),*) => {$(
        impl<T: Typed> Typed for $chan<T> {
            fn type_of() -> Type {
                Type::new(Kind::Chan, format!("{}<{}>", stringify!($chan), T::type_of()))
            }
        }

        impl<T: Typed> ToValue for $chan<T> {
            fn to_value(&self) -> Value {
                Value::new(Self::type_of(), Data::Handle(Some(addr_of(self))))
            }
        }
    )*};
}

impl_chan!(Sender, SyncSender, Receiver);

// ========== Time ==========

impl<Tz: TimeZone> Typed for DateTime<Tz> {
    fn type_of() -> Type {
        Type::new(Kind::Struct, DATETIME)
    }
}

impl ToValue for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::time(*self, Zone::utc())
    }
}

impl ToValue for DateTime<FixedOffset> {
    fn to_value(&self) -> Value {
        Value::time(self.with_timezone(&Utc), Zone::fixed(*self.offset()))
    }
}

impl ToValue for DateTime<Local> {
    fn to_value(&self) -> Value {
        Value::time(
            self.with_timezone(&Utc),
            Zone::named("Local", self.offset().fix()),
        )
    }
}

impl Typed for NaiveDateTime {
    fn type_of() -> Type {
        Type::new(Kind::Struct, DATETIME)
    }
}

impl ToValue for NaiveDateTime {
    fn to_value(&self) -> Value {
        Value::time(self.and_utc(), Zone::utc())
    }
}

/// An instant observed in a named zone.
#[derive(Debug, Clone, PartialEq)]
pub struct Zoned {
    pub instant: DateTime<Utc>,
    pub zone: Zone,
}

impl Zoned {
    pub fn new(instant: DateTime<Utc>, zone: Zone) -> Self {
        Self { instant, zone }
    }
}

impl Typed for Zoned {
    fn type_of() -> Type {
        Type::new(Kind::Struct, DATETIME)
    }
}

impl ToValue for Zoned {
    fn to_value(&self) -> Value {
        Value::time(self.instant, self.zone.clone())
    }
}

impl Typed for TimeDelta {
    fn type_of() -> Type {
        Type::new(Kind::I64, DURATION)
    }
}

impl ToValue for TimeDelta {
    fn to_value(&self) -> Value {
        Value::duration(*self)
    }
}

impl Typed for std::time::Duration {
    fn type_of() -> Type {
        Type::new(Kind::I64, DURATION)
    }
}

impl ToValue for std::time::Duration {
    fn to_value(&self) -> Value {
        Value::duration(TimeDelta::from_std(*self).unwrap_or(TimeDelta::MAX))
    }
}

macro_rules! impl_zone {
    ($($t:ty => |$z:ident| $conv:expr),* $(,)?) => {$(
        impl Typed for $t {
            fn type_of() -> Type {
                Type::new(Kind::Struct, ZONE)
            }
        }

        impl ToValue for $t {
            fn to_value(&self) -> Value {
                let $z = self;
                Value::zone($conv)
            }
        }
    )*};
}

impl_zone!(
    Zone => |z| z.clone(),
    Utc => |_z| Zone::utc(),
    FixedOffset => |z| Zone::fixed(*z),
);

// ========== JSON ==========

// Numbers decode as f64 so `1` and `1.0` are the same JSON value.
impl Typed for serde_json::Value {
    fn type_of() -> Type {
        Type::new(Kind::Interface, JSON_VALUE)
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value {
        use serde_json::Value as Json;

        let held = match self {
            Json::Null => None,
            Json::Bool(b) => Some(b.to_value()),
            Json::Number(n) => Some(n.as_f64().unwrap_or(f64::NAN).to_value()),
            Json::String(s) => Some(s.to_value()),
            Json::Array(items) => Some(items.to_value()),
            Json::Object(fields) => Some(fields.to_value()),
        };
        Value::interface(JSON_VALUE, held)
    }
}

impl Typed for serde_json::Map<String, serde_json::Value> {
    fn type_of() -> Type {
        Type::new(Kind::Map, format!("Map<String, {JSON_VALUE}>"))
    }
}

impl ToValue for serde_json::Map<String, serde_json::Value> {
    fn to_value(&self) -> Value {
        map(Self::type_of(), self.iter())
    }
}
