//! Option store: validated options and positional parameters for one command.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::trace;

use crate::error::CommandError;
use crate::escape::quote;
use crate::schema::{OptionSchema, OptionSpec};
use crate::value::{Arg, ArgText, OptionValue};

/// Current value of a configured option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfiguredValue {
    /// An argument-less option that is set.
    Flag,
    /// A single argument.
    Single(String),
    /// One argument per occurrence.
    List(Vec<String>),
}

/// Configured options and parameters, checked against a shared schema.
///
/// Options keep the order in which they were first set; re-setting an
/// option replaces its value in place. Every mutation is validated and a
/// rejected one leaves the store untouched.
#[derive(Debug, Clone)]
pub struct OptionStore {
    schema: Arc<OptionSchema>,
    options: Vec<(String, ConfiguredValue)>,
    parameters: Vec<String>,
}

impl OptionStore {
    /// An empty store for the given schema.
    #[must_use]
    pub fn new(schema: Arc<OptionSchema>) -> Self {
        Self { schema, options: Vec::new(), parameters: Vec::new() }
    }

    /// The schema every mutation is checked against.
    #[must_use]
    pub fn schema(&self) -> &Arc<OptionSchema> {
        &self.schema
    }

    /// Sets, replaces or (with `false`) removes an option.
    ///
    /// # Errors
    ///
    /// - `UnsupportedOption` if `name` is not in the schema.
    /// - `InvalidOptionArgument` if the option takes no argument and `value` is not a boolean.
    /// - `NotRepeatable` if a list is given to an option that is not repeatable.
    /// - `NonStringableValue` if the argument, or any list element, has no text form.
    pub fn set_option(
        &mut self,
        name: &str,
        value: impl Into<OptionValue>,
    ) -> Result<&mut Self, CommandError> {
        let value = value.into();
        let spec = self
            .schema
            .get(name)
            .ok_or_else(|| CommandError::UnsupportedOption(name.to_owned()))?;
        trace!(option = name, shape = value.shape(), "setting option");

        let Some(configured) = validate(name, spec, value)? else {
            self.options.retain(|(key, _)| key != name);
            return Ok(self);
        };

        match self.options.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = configured,
            None => self.options.push((name.to_owned(), configured)),
        }
        Ok(self)
    }

    /// Shorthand for `set_option(name, true)`.
    ///
    /// # Errors
    ///
    /// Same as [`set_option`](Self::set_option).
    pub fn enable(&mut self, name: &str) -> Result<&mut Self, CommandError> {
        self.set_option(name, true)
    }

    /// Applies `set_option` to every entry in order.
    ///
    /// Stops at the first failure. Entries applied before it stay applied.
    ///
    /// # Errors
    ///
    /// The first error raised by [`set_option`](Self::set_option).
    pub fn set_options<I, K, V>(&mut self, options: I) -> Result<&mut Self, CommandError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<OptionValue>,
    {
        for (name, value) in options {
            self.set_option(name.as_ref(), value)?;
        }
        Ok(self)
    }

    /// Removes every configured option.
    pub fn clear_options(&mut self) -> &mut Self {
        self.options.clear();
        self
    }

    /// Current value of an option, `None` if it is not set.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&ConfiguredValue> {
        self.options.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// Whether the option is currently set.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.option(name).is_some()
    }

    /// Configured options in insertion order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &ConfiguredValue)> {
        self.options.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Renders the configured options.
    ///
    /// Short switches are merged behind one dash, long switches follow, then
    /// every option with an argument, one escaped pair per value. Each part
    /// starts with a space; nothing configured renders as `""`.
    #[must_use]
    pub fn options_string(&self) -> String {
        let mut short = String::new();
        let mut long = String::new();
        let mut with_args = String::new();

        for (name, value) in &self.options {
            // Keys are validated on insertion and the schema is immutable.
            let Some(spec) = self.schema.get(name) else { continue };
            match value {
                ConfiguredValue::Flag if spec.is_short() => short.push_str(&spec.flag),
                ConfiguredValue::Flag => {
                    let _ = write!(long, " --{}", spec.flag);
                }
                ConfiguredValue::Single(arg) => push_pair(&mut with_args, spec, arg),
                ConfiguredValue::List(args) => {
                    for arg in args {
                        push_pair(&mut with_args, spec, arg);
                    }
                }
            }
        }

        let mut rendered = String::new();
        if !short.is_empty() {
            rendered.push_str(" -");
            rendered.push_str(&short);
        }
        rendered.push_str(&long);
        rendered.push_str(&with_args);
        rendered
    }

    /// Appends a positional parameter.
    ///
    /// # Errors
    ///
    /// `NonStringableValue` if the value has no text form.
    pub fn add_parameter<T: ArgText + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<&mut Self, CommandError> {
        let text = Arg::new(value).into_text("parameter")?;
        self.parameters.push(text);
        Ok(self)
    }

    /// Replaces all positional parameters.
    ///
    /// Every value is checked before anything is replaced.
    ///
    /// # Errors
    ///
    /// `NonStringableValue` if any value has no text form.
    pub fn set_parameters<I>(&mut self, values: I) -> Result<&mut Self, CommandError>
    where
        I: IntoIterator,
        I::Item: ArgText,
    {
        let parameters = values
            .into_iter()
            .map(|value| Arg::new(&value).into_text("parameter"))
            .collect::<Result<Vec<_>, _>>()?;
        self.parameters = parameters;
        Ok(self)
    }

    /// Removes every positional parameter.
    pub fn clear_parameters(&mut self) -> &mut Self {
        self.parameters.clear();
        self
    }

    /// Positional parameters in order.
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Renders the parameters, each preceded by a space.
    ///
    /// Parameters are emitted verbatim, without shell escaping. Callers must
    /// only pass values that are already safe shell tokens.
    #[must_use]
    pub fn parameters_string(&self) -> String {
        self.parameters.iter().fold(String::new(), |mut rendered, parameter| {
            rendered.push(' ');
            rendered.push_str(parameter);
            rendered
        })
    }
}

/// Checks `value` against `spec`. `Ok(None)` means the option is removed.
fn validate(
    name: &str,
    spec: &OptionSpec,
    value: OptionValue,
) -> Result<Option<ConfiguredValue>, CommandError> {
    if !spec.has_argument {
        return match value {
            OptionValue::Switch(true) => Ok(Some(ConfiguredValue::Flag)),
            OptionValue::Switch(false) => Ok(None),
            _ => Err(CommandError::InvalidOptionArgument(name.to_owned())),
        };
    }

    match value {
        OptionValue::Switch(false) => Ok(None),
        OptionValue::Switch(true) => {
            Err(CommandError::NonStringableValue { context: name.to_owned(), kind: "boolean" })
        }
        OptionValue::Single(arg) => Ok(Some(ConfiguredValue::Single(arg.into_text(name)?))),
        OptionValue::List(_) if !spec.repeatable => {
            Err(CommandError::NotRepeatable(name.to_owned()))
        }
        OptionValue::List(args) => {
            let values =
                args.into_iter().map(|arg| arg.into_text(name)).collect::<Result<Vec<_>, _>>()?;
            Ok(Some(ConfiguredValue::List(values)))
        }
    }
}

fn push_pair(rendered: &mut String, spec: &OptionSpec, arg: &str) {
    let dashes = if spec.is_short() { "-" } else { "--" };
    let _ = write!(rendered, " {dashes}{} {}", spec.flag, quote(arg));
}
