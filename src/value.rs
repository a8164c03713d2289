//! Values accepted as option arguments and positional parameters.
//!
//! Only values with an unambiguous text form may reach a command line. The
//! [`ArgText`] trait is that capability: it is implemented for text, numbers,
//! paths and dynamic JSON values, and [`Displayed`] opts any `Display` type in.
//! Values whose rendering is ambiguous (JSON objects, non-UTF-8 paths,
//! non-finite floats) report `None` and are rejected when they are set.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::error::CommandError;

/// A value that can be rendered as a single command-line token.
pub trait ArgText {
    /// Returns the text form, or `None` if the value has no unambiguous one.
    fn arg_text(&self) -> Option<String>;

    /// Short description of the value's type, used in error messages.
    fn kind(&self) -> &'static str {
        "text"
    }
}

impl ArgText for str {
    fn arg_text(&self) -> Option<String> {
        Some(self.to_owned())
    }
}

impl ArgText for String {
    fn arg_text(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl ArgText for Cow<'_, str> {
    fn arg_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl ArgText for char {
    fn arg_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

macro_rules! integer_arg_text {
    ($($ty:ty),*) => {
        $(
            impl ArgText for $ty {
                fn arg_text(&self) -> Option<String> {
                    Some(self.to_string())
                }

                fn kind(&self) -> &'static str {
                    "integer"
                }
            }
        )*
    };
}

integer_arg_text!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_arg_text {
    ($($ty:ty),*) => {
        $(
            impl ArgText for $ty {
                fn arg_text(&self) -> Option<String> {
                    self.is_finite().then(|| self.to_string())
                }

                fn kind(&self) -> &'static str {
                    if self.is_finite() { "float" } else { "non-finite float" }
                }
            }
        )*
    };
}

float_arg_text!(f32, f64);

impl ArgText for Path {
    fn arg_text(&self) -> Option<String> {
        self.to_str().map(str::to_owned)
    }

    fn kind(&self) -> &'static str {
        if self.to_str().is_some() { "path" } else { "non-UTF-8 path" }
    }
}

impl ArgText for PathBuf {
    fn arg_text(&self) -> Option<String> {
        self.as_path().arg_text()
    }

    fn kind(&self) -> &'static str {
        self.as_path().kind()
    }
}

impl ArgText for OsStr {
    fn arg_text(&self) -> Option<String> {
        self.to_str().map(str::to_owned)
    }

    fn kind(&self) -> &'static str {
        if self.to_str().is_some() { "os string" } else { "non-UTF-8 os string" }
    }
}

impl ArgText for OsString {
    fn arg_text(&self) -> Option<String> {
        self.as_os_str().arg_text()
    }

    fn kind(&self) -> &'static str {
        self.as_os_str().kind()
    }
}

impl ArgText for serde_json::Value {
    fn arg_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

impl<T: ArgText + ?Sized> ArgText for &T {
    fn arg_text(&self) -> Option<String> {
        (**self).arg_text()
    }

    fn kind(&self) -> &'static str {
        (**self).kind()
    }
}

/// Wraps any `Display` type so its canonical string form can be used as an argument.
///
/// ```
/// use std::net::Ipv4Addr;
/// use toolcmd::value::{ArgText, Displayed};
///
/// let host = Displayed(Ipv4Addr::LOCALHOST);
/// assert_eq!(host.arg_text().as_deref(), Some("127.0.0.1"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Displayed<T>(pub T);

impl<T: Display> ArgText for Displayed<T> {
    fn arg_text(&self) -> Option<String> {
        Some(self.0.to_string())
    }

    fn kind(&self) -> &'static str {
        "display"
    }
}

/// A single argument captured before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    text: Option<String>,
    kind: &'static str,
}

impl Arg {
    /// Captures the text form of `value`, if it has one.
    pub fn new<T: ArgText + ?Sized>(value: &T) -> Self {
        Self { text: value.arg_text(), kind: value.kind() }
    }

    /// The text form, or `None` if the value is not stringable.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub(crate) fn into_text(self, context: &str) -> Result<String, CommandError> {
        self.text.ok_or_else(|| CommandError::NonStringableValue {
            context: context.to_owned(),
            kind: self.kind,
        })
    }
}

/// A value handed to `set_option`.
///
/// Conversions exist from `bool`, every [`ArgText`] scalar, slices, arrays
/// and vectors of them, and `serde_json::Value` (booleans become switches,
/// arrays become lists, everything else a single argument).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Enable (`true`) or remove (`false`) the option.
    Switch(bool),
    /// One argument.
    Single(Arg),
    /// One argument per occurrence, for repeatable options.
    List(Vec<Arg>),
}

impl OptionValue {
    /// Short description of the value's shape, used in logs.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Switch(_) => "switch",
            Self::Single(_) => "single",
            Self::List(_) => "list",
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Switch(value)
    }
}

macro_rules! single_option_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for OptionValue {
                fn from(value: $ty) -> Self {
                    Self::Single(Arg::new(&value))
                }
            }
        )*
    };
}

single_option_value!(
    &str, String, &String, Cow<'_, str>, char, i8, i16, i32, i64, i128, isize, u8, u16, u32,
    u64, u128, usize, f32, f64, &Path, PathBuf, &OsStr, OsString
);

impl<T: Display> From<Displayed<T>> for OptionValue {
    fn from(value: Displayed<T>) -> Self {
        Self::Single(Arg::new(&value))
    }
}

impl<T: ArgText> From<Vec<T>> for OptionValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.iter().map(Arg::new).collect())
    }
}

impl<T: ArgText> From<&[T]> for OptionValue {
    fn from(values: &[T]) -> Self {
        Self::List(values.iter().map(Arg::new).collect())
    }
}

impl<T: ArgText, const N: usize> From<[T; N]> for OptionValue {
    fn from(values: [T; N]) -> Self {
        Self::List(values.iter().map(Arg::new).collect())
    }
}

impl From<&serde_json::Value> for OptionValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => Self::Switch(*b),
            serde_json::Value::Array(items) => Self::List(items.iter().map(Arg::new).collect()),
            other => Self::Single(Arg::new(other)),
        }
    }
}

impl From<serde_json::Value> for OptionValue {
    fn from(value: serde_json::Value) -> Self {
        Self::from(&value)
    }
}
