// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Named, typed remote-procedure tables.
//!
//! An [`AttributeTable`] is built once per object type. Each entry binds a name
//! to a setter, an optional getter, an optional argument signature and a
//! description. Dispatch validates the arguments against the signature before
//! the setter ever runs, so a malformed call has no side effect.

use lumen_core::value::{Value, ValueKind, Values};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

/// Setter closure: receives the target and the call arguments, reports success.
pub type Setter<T> = Box<dyn Fn(&mut T, &[Value]) -> bool + Send + Sync>;

/// Getter closure: returns the current value of the attribute.
pub type Getter<T> = Box<dyn Fn(&T) -> Values + Send + Sync>;

/// An error returned by attribute dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    /// No attribute of this name is registered.
    #[error("unknown attribute '{0}'")]
    Unknown(String),
    /// The attribute has a getter but no setter.
    #[error("attribute '{0}' is read-only")]
    ReadOnly(String),
    /// Fewer arguments than the signature requires.
    #[error("attribute '{name}' expects at least {expected} argument(s), got {got}")]
    Arity {
        /// The attribute name.
        name: String,
        /// Length of the signature.
        expected: usize,
        /// Number of arguments received.
        got: usize,
    },
    /// An argument of the wrong kind.
    #[error("attribute '{name}': argument {index} should be a {expected}, got a {found}")]
    Kind {
        /// The attribute name.
        name: String,
        /// Zero-based position of the offending argument.
        index: usize,
        /// Kind required by the signature.
        expected: ValueKind,
        /// Kind actually received.
        found: ValueKind,
    },
    /// The setter ran and reported a failure.
    #[error("attribute '{0}' rejected its arguments")]
    Rejected(String),
}

/// A single entry of an [`AttributeTable`].
pub struct Attribute<T> {
    setter: Option<Setter<T>>,
    getter: Option<Getter<T>>,
    signature: Option<Vec<ValueKind>>,
    description: String,
    savable: bool,
}

impl<T> Attribute<T> {
    /// Attaches a getter.
    pub fn with_getter<G>(&mut self, getter: G) -> &mut Self
    where
        G: Fn(&T) -> Values + Send + Sync + 'static,
    {
        self.getter = Some(Box::new(getter));
        self
    }

    /// Sets the human-readable description.
    pub fn describe(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Excludes this attribute from configuration export.
    pub fn not_savable(&mut self) -> &mut Self {
        self.savable = false;
        self
    }

    /// Whether this attribute is written to the configuration document.
    pub fn is_savable(&self) -> bool {
        self.savable && self.getter.is_some()
    }

    /// Returns the argument signature, if one was declared.
    pub fn signature(&self) -> Option<&[ValueKind]> {
        self.signature.as_deref()
    }

    /// Returns the description, empty if none was set.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Checks `args` against the signature. Extra trailing arguments are allowed.
    fn validate(&self, name: &str, args: &[Value]) -> Result<(), AttributeError> {
        let Some(signature) = &self.signature else {
            return Ok(());
        };
        if args.len() < signature.len() {
            return Err(AttributeError::Arity {
                name: name.to_string(),
                expected: signature.len(),
                got: args.len(),
            });
        }
        for (index, (expected, arg)) in signature.iter().zip(args).enumerate() {
            if arg.kind() != *expected {
                return Err(AttributeError::Kind {
                    name: name.to_string(),
                    index,
                    expected: *expected,
                    found: arg.kind(),
                });
            }
        }
        Ok(())
    }
}

/// A table of named attributes dispatching onto targets of type `T`.
pub struct AttributeTable<T> {
    attributes: BTreeMap<String, Attribute<T>>,
}

impl<T> AttributeTable<T> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            attributes: BTreeMap::new(),
        }
    }

    /// Registers a settable attribute.
    ///
    /// `signature` uses one character per leading argument: `n` for numbers,
    /// `s` for strings, `v` for lists. An empty signature disables validation.
    pub fn add<S>(&mut self, name: &str, signature: &str, setter: S) -> &mut Attribute<T>
    where
        S: Fn(&mut T, &[Value]) -> bool + Send + Sync + 'static,
    {
        self.insert(name, signature, Some(Box::new(setter)))
    }

    /// Registers a read-only attribute.
    pub fn add_read_only<G>(&mut self, name: &str, getter: G) -> &mut Attribute<T>
    where
        G: Fn(&T) -> Values + Send + Sync + 'static,
    {
        let attribute = self.insert(name, "", None);
        attribute.getter = Some(Box::new(getter));
        attribute.savable = false;
        attribute
    }

    fn insert(&mut self, name: &str, signature: &str, setter: Option<Setter<T>>) -> &mut Attribute<T> {
        let kinds: Vec<ValueKind> = signature.chars().filter_map(ValueKind::from_char).collect();
        debug_assert_eq!(
            kinds.len(),
            signature.chars().count(),
            "invalid signature for attribute '{name}'"
        );
        let attribute = Attribute {
            setter,
            getter: None,
            signature: (!kinds.is_empty()).then_some(kinds),
            description: String::new(),
            savable: true,
        };
        match self.attributes.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                entry.insert(attribute);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(attribute),
        }
    }

    /// Validates `args` then invokes the setter of `name` on `target`.
    pub fn set(&self, target: &mut T, name: &str, args: &[Value]) -> Result<(), AttributeError> {
        let attribute = self
            .attributes
            .get(name)
            .ok_or_else(|| AttributeError::Unknown(name.to_string()))?;
        let setter = attribute
            .setter
            .as_ref()
            .ok_or_else(|| AttributeError::ReadOnly(name.to_string()))?;
        attribute.validate(name, args)?;
        if setter(target, args) {
            Ok(())
        } else {
            Err(AttributeError::Rejected(name.to_string()))
        }
    }

    /// Returns the current value of `name`, if it has a getter.
    pub fn get(&self, target: &T, name: &str) -> Option<Values> {
        let getter = self.attributes.get(name)?.getter.as_ref()?;
        Some(getter(target))
    }

    /// Returns the entry registered under `name`.
    pub fn attribute(&self, name: &str) -> Option<&Attribute<T>> {
        self.attributes.get(name)
    }

    /// Returns the description of `name`, if registered.
    pub fn description(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|a| a.description.as_str())
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Iterates over the registered names, in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Collects the values of every savable attribute that has a getter.
    pub fn savable_values(&self, target: &T) -> Vec<(String, Values)> {
        self.attributes
            .iter()
            .filter(|(_, a)| a.savable)
            .filter_map(|(name, a)| a.getter.as_ref().map(|g| (name.clone(), g(target))))
            .collect()
    }
}

impl<T> Default for AttributeTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AttributeTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeTable")
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Target {
        interval: i64,
        label: String,
    }

    fn table() -> AttributeTable<Target> {
        let mut table = AttributeTable::new();
        table
            .add("interval", "n", |t: &mut Target, args| {
                t.interval = args[0].as_i64().unwrap_or(0).max(-1);
                true
            })
            .with_getter(|t| vec![Value::from(t.interval)])
            .describe("Frame interval");
        table.add("label", "s", |t: &mut Target, args| {
            t.label = args[0].as_str().unwrap_or_default().to_string();
            !t.label.is_empty()
        });
        table.add_read_only("doubled", |t| vec![Value::from(t.interval * 2)]);
        table
    }

    #[test]
    fn wrong_kind_is_rejected_without_side_effects() {
        let table = table();
        let mut target = Target {
            interval: 1,
            ..Default::default()
        };

        let err = table
            .set(&mut target, "interval", &[Value::from("fast")])
            .unwrap_err();
        assert!(matches!(err, AttributeError::Kind { index: 0, .. }));
        assert_eq!(target.interval, 1);

        table.set(&mut target, "interval", &[Value::from(0)]).unwrap();
        assert_eq!(table.get(&target, "interval"), Some(vec![Value::from(0)]));
    }

    #[test]
    fn missing_arguments_are_an_arity_error() {
        let table = table();
        let mut target = Target::default();
        assert_eq!(
            table.set(&mut target, "label", &[]),
            Err(AttributeError::Arity {
                name: "label".into(),
                expected: 1,
                got: 0
            })
        );
    }

    #[test]
    fn unknown_read_only_and_rejected_calls_fail() {
        let table = table();
        let mut target = Target::default();
        assert_eq!(
            table.set(&mut target, "nope", &[]),
            Err(AttributeError::Unknown("nope".into()))
        );
        assert_eq!(
            table.set(&mut target, "doubled", &[Value::from(1)]),
            Err(AttributeError::ReadOnly("doubled".into()))
        );
        assert_eq!(
            table.set(&mut target, "label", &[Value::from("")]),
            Err(AttributeError::Rejected("label".into()))
        );
    }

    #[test]
    fn savable_values_skip_read_only_and_getterless_entries() {
        let table = table();
        let target = Target {
            interval: 3,
            ..Default::default()
        };
        let saved = table.savable_values(&target);
        assert_eq!(saved, vec![("interval".to_string(), vec![Value::from(3)])]);
        assert_eq!(table.description("interval"), Some("Frame interval"));
    }
}
