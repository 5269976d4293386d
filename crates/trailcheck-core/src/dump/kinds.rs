//! Per-kind renderers.

use super::{Dump, NIL};
use crate::errors::DumpError;
use crate::value::order::sorted_entries;
use crate::value::{Field, Kind, Value};

pub(super) fn unsigned(kind: Kind, u: u128) -> String {
    match kind {
        Kind::U8 => byte(u as u8),
        Kind::Uintptr => format!("<{u:#x}>"),
        _ => u.to_string(),
    }
}

/// Printable bytes show their character, the rest only hex.
fn byte(b: u8) -> String {
    if (0x20..=0x7e).contains(&b) {
        format!("{b:#04x} ('{}')", b as char)
    } else {
        format!("{b:#04x}")
    }
}

pub(super) fn float(kind: Kind, x: f64) -> String {
    if kind == Kind::F32 {
        (x as f32).to_string()
    } else {
        x.to_string()
    }
}

pub(super) fn complex(kind: Kind, re: f64, im: f64) -> String {
    if kind == Kind::Complex64 {
        format!("({}{:+}i)", re as f32, im as f32)
    } else {
        format!("({re}{im:+}i)")
    }
}

impl Dump {
    fn prefix<'a>(&self, print_type: bool, v: &'a Value) -> &'a str {
        if print_type {
            v.type_name()
        } else {
            ""
        }
    }

    pub(super) fn seq(
        &self,
        level: usize,
        print_type: bool,
        v: &Value,
        items: &[Value],
    ) -> Result<String, DumpError> {
        let entries = items
            .iter()
            .map(|item| self.render(level + 1, false, item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.wrap(level, self.prefix(print_type, v), '[', ']', &entries))
    }

    pub(super) fn map(
        &self,
        level: usize,
        print_type: bool,
        v: &Value,
        entries: &[(Value, Value)],
    ) -> Result<String, DumpError> {
        let sep = self.key_sep();
        let rendered = sorted_entries(entries)
            .into_iter()
            .map(|(k, val)| {
                let key = self.render(level + 1, false, k)?;
                let val = self.render(level + 1, false, val)?;
                Ok(format!("{key}{sep}{val}"))
            })
            .collect::<Result<Vec<_>, DumpError>>()?;
        Ok(self.wrap(level, self.prefix(print_type, v), '{', '}', &rendered))
    }

    pub(super) fn set(
        &self,
        level: usize,
        print_type: bool,
        v: &Value,
        entries: &[(Value, Value)],
    ) -> Result<String, DumpError> {
        let rendered = sorted_entries(entries)
            .into_iter()
            .map(|(k, _)| self.render(level + 1, false, k))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.wrap(level, self.prefix(print_type, v), '{', '}', &rendered))
    }

    /// Exported fields only; field values get type names back.
    pub(super) fn record(
        &self,
        level: usize,
        print_type: bool,
        v: &Value,
        fields: &[Field],
    ) -> Result<String, DumpError> {
        if v.type_name() == "()" {
            return Ok("()".to_string());
        }
        let sep = self.key_sep();
        let rendered = fields
            .iter()
            .filter(|f| f.exported)
            .map(|f| {
                let val = self.render(level + 1, self.print_type, &f.value)?;
                Ok(format!("{}{sep}{val}", f.name))
            })
            .collect::<Result<Vec<_>, DumpError>>()?;
        Ok(self.wrap(level, self.prefix(print_type, v), '{', '}', &rendered))
    }

    pub(super) fn handle(&self, v: &Value, addr: Option<usize>) -> String {
        match (v.kind(), addr) {
            (Kind::Chan, None) => format!("({})({NIL})", v.type_name()),
            (Kind::Chan, Some(addr)) if self.ptr_addr => {
                format!("({})(<{addr:#x}>)", v.type_name())
            }
            (Kind::Chan, Some(_)) => format!("({})", v.type_name()),
            (_, None) => NIL.to_string(),
            (_, Some(addr)) if self.ptr_addr => format!("<func>(<{addr:#x}>)"),
            (_, Some(_)) => "<func>".to_string(),
        }
    }
}
