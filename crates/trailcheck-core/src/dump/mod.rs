//! Value dumper.
//!
//! [`Dump`] is the render configuration: it turns any [`Value`] into a
//! deterministic, readable string. Formatting dimensions are orthogonal:
//! flat or multi-line, compact or spaced, with or without composite type
//! names. Recursion is bounded by `max_depth`; deeper values render as
//! [`PLACEHOLDER`].
//!
//! ```
//! use trailcheck_core::dump::Dump;
//! use std::collections::HashMap;
//!
//! let m = HashMap::from([("b", 2), ("a", 1)]);
//! let d = Dump::default().with_flat().with_print_type(false);
//! assert_eq!(d.any(&m), r#"{"a": 1, "b": 2}"#);
//! ```

mod kinds;
pub mod well_known;

use crate::errors::DumpError;
use crate::value::{Data, Kind, ToValue, Value, DATETIME, DURATION, ZONE};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Default maximum nesting rendered before [`PLACEHOLDER`] is emitted.
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Default number of spaces per indentation level.
pub const DEFAULT_TAB_WIDTH: usize = 2;

/// Rendered in place of values nested deeper than `max_depth`.
pub const PLACEHOLDER: &str = "<...>";

/// Rendering of nil handles and the untyped absence.
pub const NIL: &str = "nil";

/// Renderer for one value shape, registered by type name.
///
/// Receives the active configuration and the current nesting level so it
/// can render nested values with [`Dump::value_at`].
pub type Renderer = Arc<dyn Fn(&Dump, usize, &Value) -> Result<String, DumpError> + Send + Sync>;

/// Functional option applied to a default [`Dump`].
pub type DumpOption = Box<dyn Fn(&mut Dump) + Send + Sync>;

/// How timestamps render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimeFormat {
    /// Quoted RFC 3339 with trailing zero nanoseconds trimmed.
    #[default]
    Rfc3339,
    /// Unix seconds.
    Unix,
    /// Quoted `strftime` pattern.
    Strftime(String),
}

/// How durations render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationFormat {
    /// Quoted unit string such as `"1h2m3.5s"`.
    #[default]
    String,
    /// Decimal seconds such as `3723.5`.
    Seconds,
}

/// Render configuration.
#[derive(Clone)]
pub struct Dump {
    flat: bool,
    compact: bool,
    print_type: bool,
    ptr_addr: bool,
    max_depth: usize,
    indent: usize,
    tab_width: usize,
    time_format: TimeFormat,
    duration_format: DurationFormat,
    renderers: BTreeMap<String, Renderer>,
}

impl Default for Dump {
    fn default() -> Self {
        let mut renderers: BTreeMap<String, Renderer> = BTreeMap::new();
        renderers.insert(DATETIME.to_string(), Arc::new(well_known::render_time));
        renderers.insert(DURATION.to_string(), Arc::new(well_known::render_duration));
        renderers.insert(ZONE.to_string(), Arc::new(well_known::render_zone));
        Self {
            flat: false,
            compact: false,
            print_type: true,
            ptr_addr: false,
            max_depth: DEFAULT_MAX_DEPTH,
            indent: 0,
            tab_width: DEFAULT_TAB_WIDTH,
            time_format: TimeFormat::default(),
            duration_format: DurationFormat::default(),
            renderers,
        }
    }
}

impl fmt::Debug for Dump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dump")
            .field("flat", &self.flat)
            .field("compact", &self.compact)
            .field("print_type", &self.print_type)
            .field("ptr_addr", &self.ptr_addr)
            .field("max_depth", &self.max_depth)
            .field("indent", &self.indent)
            .field("tab_width", &self.tab_width)
            .field("time_format", &self.time_format)
            .field("duration_format", &self.duration_format)
            .field("renderers", &self.renderers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Dump {
    /// Default configuration with the options applied in order
    pub fn new(options: impl IntoIterator<Item = DumpOption>) -> Self {
        let mut dump = Self::default();
        for option in options {
            option(&mut dump);
        }
        dump
    }

    /// Render everything on a single line
    pub fn with_flat(mut self) -> Self {
        self.flat = true;
        self
    }

    /// Drop incidental whitespace
    pub fn with_compact(mut self) -> Self {
        self.compact = true;
        self
    }

    /// Print composite type names
    pub fn with_print_type(mut self, on: bool) -> Self {
        self.print_type = on;
        self
    }

    /// Render pointers and handles as addresses
    pub fn with_ptr_addr(mut self, on: bool) -> Self {
        self.ptr_addr = on;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Extra indentation levels applied to every nested line
    pub fn with_indent(mut self, levels: usize) -> Self {
        self.indent = levels;
        self
    }

    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    pub fn with_time_format(mut self, format: TimeFormat) -> Self {
        self.time_format = format;
        self
    }

    pub fn with_duration_format(mut self, format: DurationFormat) -> Self {
        self.duration_format = format;
        self
    }

    /// Register a renderer for values of the given type name, replacing any
    /// built-in behavior for that type
    pub fn with_renderer(mut self, type_name: impl Into<String>, renderer: Renderer) -> Self {
        self.renderers.insert(type_name.into(), renderer);
        self
    }

    pub fn is_flat(&self) -> bool {
        self.flat
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn prints_type(&self) -> bool {
        self.print_type
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn time_format(&self) -> &TimeFormat {
        &self.time_format
    }

    pub fn duration_format(&self) -> DurationFormat {
        self.duration_format
    }

    /// Render any convertible value.
    ///
    /// # Panics
    ///
    /// Panics when a registered renderer rejects the value it was given.
    pub fn any<T: ToValue + ?Sized>(&self, v: &T) -> String {
        self.value(&v.to_value())
    }

    /// Render a value.
    ///
    /// # Panics
    ///
    /// Panics when a registered renderer rejects the value it was given;
    /// that is a configuration defect, not a reportable difference.
    pub fn value(&self, v: &Value) -> String {
        match self.try_value(v) {
            Ok(s) => s,
            Err(err) => panic!("dump: {err}"),
        }
    }

    /// Render a value, surfacing renderer failures.
    ///
    /// # Errors
    ///
    /// Returns the [`DumpError`] produced by a registered renderer.
    pub fn try_value(&self, v: &Value) -> Result<String, DumpError> {
        self.value_at(0, v)
    }

    /// Render a value nested `level` levels deep.
    ///
    /// # Errors
    ///
    /// Returns the [`DumpError`] produced by a registered renderer.
    pub fn value_at(&self, level: usize, v: &Value) -> Result<String, DumpError> {
        self.render(level, self.print_type, v)
    }

    fn render(&self, level: usize, print_type: bool, v: &Value) -> Result<String, DumpError> {
        if level > self.max_depth {
            return Ok(PLACEHOLDER.to_string());
        }
        if let Some(renderer) = self.renderers.get(v.type_name()) {
            return renderer(self, level, v);
        }

        let out = match v.data() {
            Data::Invalid => NIL.to_string(),
            Data::Bool(b) => b.to_string(),
            Data::Int(i) => i.to_string(),
            Data::Uint(u) => kinds::unsigned(v.kind(), *u),
            Data::Float(x) => kinds::float(v.kind(), *x),
            Data::Complex(re, im) => kinds::complex(v.kind(), *re, *im),
            Data::Char(c) => format!("{c:?}"),
            Data::Str(s) => format!("{s:?}"),
            Data::Seq { items: None } => NIL.to_string(),
            Data::Seq { items: Some(items) } => self.seq(level, print_type, v, items)?,
            Data::Map { entries: None } => NIL.to_string(),
            Data::Map { entries: Some(entries) } => {
                if v.kind() == Kind::Set {
                    self.set(level, print_type, v, entries)?
                } else {
                    self.map(level, print_type, v, entries)?
                }
            }
            Data::Handle(addr) => self.handle(v, *addr),
            Data::Ptr { target: None, .. } => NIL.to_string(),
            Data::Ptr {
                addr,
                target: Some(target),
            } => {
                if self.ptr_addr {
                    format!("<{addr:#x}>")
                } else {
                    self.render(level, print_type, target)?
                }
            }
            Data::Interface(None) => NIL.to_string(),
            Data::Interface(Some(held)) => self.render(level, print_type, held)?,
            Data::Struct(fields) => self.record(level, print_type, v, fields)?,
            Data::Time(..) => well_known::render_time(self, level, v)?,
            Data::Duration(_) => well_known::render_duration(self, level, v)?,
            Data::Zone(_) => well_known::render_zone(self, level, v)?,
        };
        Ok(out)
    }

    fn pad(&self, level: usize) -> String {
        " ".repeat((self.indent + level) * self.tab_width)
    }

    /// Join rendered entries between the open and close tokens.
    fn wrap(&self, level: usize, prefix: &str, open: char, close: char, entries: &[String]) -> String {
        if entries.is_empty() {
            return format!("{prefix}{open}{close}");
        }
        if self.flat {
            let sep = if self.compact { "," } else { ", " };
            return format!("{prefix}{open}{}{close}", entries.join(sep));
        }
        let mut out = format!("{prefix}{open}\n");
        let pad = self.pad(level + 1);
        for entry in entries {
            out.push_str(&pad);
            out.push_str(entry);
            out.push_str(",\n");
        }
        out.push_str(&self.pad(level));
        out.push(close);
        out
    }

    fn key_sep(&self) -> &'static str {
        if self.compact {
            ":"
        } else {
            ": "
        }
    }
}

/// Option: render everything on a single line
pub fn with_flat() -> DumpOption {
    Box::new(|d: &mut Dump| d.flat = true)
}

/// Option: drop incidental whitespace
pub fn with_compact() -> DumpOption {
    Box::new(|d: &mut Dump| d.compact = true)
}

/// Option: print composite type names
pub fn with_print_type(on: bool) -> DumpOption {
    Box::new(move |d: &mut Dump| d.print_type = on)
}

/// Option: render pointers and handles as addresses
pub fn with_ptr_addr(on: bool) -> DumpOption {
    Box::new(move |d: &mut Dump| d.ptr_addr = on)
}

/// Option: maximum nesting before the placeholder is emitted
pub fn with_max_depth(depth: usize) -> DumpOption {
    Box::new(move |d: &mut Dump| d.max_depth = depth)
}

/// Option: extra indentation levels for nested lines
pub fn with_indent(levels: usize) -> DumpOption {
    Box::new(move |d: &mut Dump| d.indent = levels)
}

/// Option: spaces per indentation level
pub fn with_tab_width(width: usize) -> DumpOption {
    Box::new(move |d: &mut Dump| d.tab_width = width)
}

/// Option: timestamp rendering
pub fn with_time_format(format: TimeFormat) -> DumpOption {
    Box::new(move |d: &mut Dump| d.time_format = format.clone())
}

/// Option: duration rendering
pub fn with_duration_format(format: DurationFormat) -> DumpOption {
    Box::new(move |d: &mut Dump| d.duration_format = format)
}

/// Option: register a renderer for a type name
pub fn with_renderer(type_name: impl Into<String>, renderer: Renderer) -> DumpOption {
    let type_name = type_name.into();
    Box::new(move |d: &mut Dump| {
        d.renderers.insert(type_name.clone(), renderer.clone());
    })
}
