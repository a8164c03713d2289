//! Option schemas: which options a tool accepts and in what shape.
//!
//! A schema is static data owned by a tool catalog (see [`crate::tools`]) or
//! loaded from YAML, and shared read-only with every command built for it.
//!
//! ```yaml
//! verbose: { flag: v }
//! delete: { flag: delete }
//! exclude: { flag: exclude, has_argument: true, repeatable: true }
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// Shape of a single option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Literal token emitted after the dash(es), e.g. `v` or `delete`.
    pub flag: Cow<'static, str>,
    /// Whether the option carries an argument.
    #[serde(default)]
    pub has_argument: bool,
    /// Whether the option may carry a list of arguments. Ignored without an argument.
    #[serde(default)]
    pub repeatable: bool,
}

impl OptionSpec {
    /// An option that takes no argument.
    #[must_use]
    pub const fn switch(flag: &'static str) -> Self {
        Self { flag: Cow::Borrowed(flag), has_argument: false, repeatable: false }
    }

    /// An option that takes exactly one argument.
    #[must_use]
    pub const fn argument(flag: &'static str) -> Self {
        Self { flag: Cow::Borrowed(flag), has_argument: true, repeatable: false }
    }

    /// An option that takes one or more arguments, one occurrence each.
    #[must_use]
    pub const fn repeatable(flag: &'static str) -> Self {
        Self { flag: Cow::Borrowed(flag), has_argument: true, repeatable: true }
    }

    /// Single-character flags render with one dash, longer ones with two.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.flag.chars().count() == 1
    }

    /// Whether a list of arguments is accepted.
    #[must_use]
    pub fn accepts_list(&self) -> bool {
        self.has_argument && self.repeatable
    }

    fn validate(&self, name: &str) -> Result<(), CommandError> {
        if self.flag.is_empty() {
            return Err(CommandError::InvalidSchema(format!("option {name} has an empty flag")));
        }
        if self.flag.starts_with('-') || self.flag.chars().any(char::is_whitespace) {
            return Err(CommandError::InvalidSchema(format!(
                "option {name} has malformed flag {:?}",
                self.flag
            )));
        }
        Ok(())
    }
}

/// The set of options a tool supports, keyed by option name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSchema {
    options: BTreeMap<String, OptionSpec>,
}

impl OptionSchema {
    /// An empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schema from a static `(name, spec)` table.
    #[must_use]
    pub fn from_table(table: &[(&str, OptionSpec)]) -> Self {
        let options = table.iter().map(|(name, spec)| ((*name).to_owned(), spec.clone())).collect();
        Self { options }
    }

    /// Parses and validates a YAML schema.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchema` if the YAML is malformed or a flag is empty,
    /// starts with a dash or contains whitespace.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CommandError> {
        let schema: Self =
            serde_yaml::from_str(yaml).map_err(|e| CommandError::InvalidSchema(e.to_string()))?;
        for (name, spec) in &schema.options {
            spec.validate(name)?;
        }
        Ok(schema)
    }

    /// Reads a YAML schema from disk.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchema` if the file cannot be read or fails validation.
    pub fn from_yaml_file(path: &Path) -> Result<Self, CommandError> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            CommandError::InvalidSchema(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Adds or replaces an option.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, spec: OptionSpec) -> Self {
        self.options.insert(name.into(), spec);
        self
    }

    /// Adds an option without an argument.
    #[must_use]
    pub fn switch(self, name: impl Into<String>, flag: &'static str) -> Self {
        self.with(name, OptionSpec::switch(flag))
    }

    /// Adds an option with a single argument.
    #[must_use]
    pub fn argument(self, name: impl Into<String>, flag: &'static str) -> Self {
        self.with(name, OptionSpec::argument(flag))
    }

    /// Adds a repeatable option.
    #[must_use]
    pub fn repeatable(self, name: impl Into<String>, flag: &'static str) -> Self {
        self.with(name, OptionSpec::repeatable(flag))
    }

    /// Looks up an option by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.options.get(name)
    }

    /// Whether `name` is a known option.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Option names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the schema has no options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
