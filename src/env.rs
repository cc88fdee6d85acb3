//! Render environments and loop metadata

use std::sync::Arc;

use indexmap::IndexMap;

use crate::value::Value;

/// Reserved binding name for loop metadata
pub const LOOP_KEY: &str = "loop";

/// Per-iteration metadata exposed to templates as `loop`
#[derive(Debug, Clone, PartialEq)]
pub struct LoopMetadata {
    /// 1-based position of the current entry
    pub index: usize,
    pub first: bool,
    pub last: bool,
    /// Metadata of the enclosing loop, if any
    pub parent: Option<Box<LoopMetadata>>,
}

impl LoopMetadata {
    /// Mapping form seen by templates (`loop.index`, `loop.parent.first`, ...)
    pub fn to_value(&self) -> Value {
        let parent = match &self.parent {
            Some(parent) => parent.to_value(),
            None => Value::Null,
        };
        [
            ("index", Value::from(self.index)),
            ("first", Value::from(self.first)),
            ("last", Value::from(self.last)),
            ("parent", parent),
        ]
        .into_iter()
        .collect()
    }
}

/// Variables visible at one point of the render tree
///
/// Each render frame owns its environment. Loop iterations derive a fresh
/// environment with [`Environment::iteration`]; the enclosing one is only read.
/// Bound values are shared between an environment and the scopes derived from
/// it, so deriving a scope costs one entry per binding, not a copy of the data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    vars: IndexMap<String, Arc<Value>>,
    frame: Option<LoopMetadata>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `value`, replacing any previous binding
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.vars.insert(key.into(), Arc::new(value.into()));
        self
    }

    /// Builder form of [`Environment::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name).map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Loop frame of the innermost enclosing loop
    pub fn loop_frame(&self) -> Option<&LoopMetadata> {
        self.frame.as_ref()
    }

    /// Walk a dotted path; `None` when any segment is missing or not traversable
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Resolve a dotted path, yielding `Null` for anything absent
    pub fn resolve(&self, path: &str) -> Value {
        self.lookup(path).cloned().unwrap_or_default()
    }

    /// Derive the environment for entry `position` of a loop over `collection_path`
    pub fn iteration(
        &self,
        item: &str,
        collection_path: &str,
        value: &Value,
        position: usize,
        len: usize,
    ) -> Environment {
        let mut scope = self.clone();
        scope.insert(item, value.clone());

        // keep the collection's owner reachable under its own name
        if let Some((head, _)) = collection_path.split_once('.') {
            if let Some(owner) = self.vars.get(head) {
                scope.vars.insert(head.to_string(), Arc::clone(owner));
            }
        }

        let meta = LoopMetadata {
            index: position + 1,
            first: position == 0,
            last: position + 1 == len,
            parent: self.frame.clone().map(Box::new),
        };
        scope.insert(LOOP_KEY, meta.to_value());
        scope.frame = Some(meta);
        scope
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Environment::new();
        for (k, v) in iter {
            env.insert(k, v);
        }
        env
    }
}

impl From<IndexMap<String, Value>> for Environment {
    fn from(vars: IndexMap<String, Value>) -> Self {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k, Arc::new(v))).collect(),
            frame: None,
        }
    }
}
