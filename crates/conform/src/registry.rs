use crate::{
    annotation,
    error::ConformError,
    transform::BUILTINS,
};
use std::{collections::HashMap, fmt, sync::Arc};

///
/// Transform
///
/// A registered text transform. Total and pure: it must not panic and must
/// not depend on anything but its input.
///

pub type Transform = Arc<dyn Fn(&str) -> String + Send + Sync>;

///
/// Registry
///
/// Identifier → transform mapping. Lookup is exact and case-sensitive; a
/// later registration under an existing identifier replaces the earlier one.
///

#[derive(Clone)]
pub struct Registry {
    transforms: HashMap<String, Transform>,
}

impl Registry {
    /// An empty registry with no transforms at all.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// A registry holding every built-in transform.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (identifier, f) in BUILTINS {
            registry
                .transforms
                .insert((*identifier).to_string(), Arc::new(*f));
        }

        registry
    }

    /// Install or override `identifier`. Returns the transform it replaced.
    pub fn register<F>(
        &mut self,
        identifier: impl Into<String>,
        transform: F,
    ) -> Result<Option<Transform>, ConformError>
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.insert(identifier.into(), Arc::new(transform))
    }

    /// Like `register`, for a transform that is already shared.
    pub fn insert(
        &mut self,
        identifier: String,
        transform: Transform,
    ) -> Result<Option<Transform>, ConformError> {
        annotation::check_identifier(&identifier)
            .map_err(|fault| ConformError::invalid_identifier(&identifier, fault))?;

        let replaced = self.transforms.insert(identifier.clone(), transform);
        tracing::debug!(
            identifier = %identifier,
            replaced = replaced.is_some(),
            "registered transform"
        );

        Ok(replaced)
    }

    pub fn remove(&mut self, identifier: &str) -> Option<Transform> {
        self.transforms.remove(identifier)
    }

    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&Transform> {
        self.transforms.get(identifier)
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.transforms.contains_key(identifier)
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        ids.sort_unstable();

        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    ///
    /// dispatch
    ///
    /// Run `value` through the transforms named by `identifiers`, left to
    /// right, each output feeding the next input. Identifiers with no
    /// registered transform are skipped.
    ///

    #[must_use]
    pub fn dispatch<S: AsRef<str>>(&self, value: &str, identifiers: &[S]) -> String {
        let mut current = value.to_string();

        for identifier in identifiers {
            let identifier = identifier.as_ref();
            match self.transforms.get(identifier) {
                Some(transform) => {
                    current = transform(&current);
                    tracing::trace!(identifier, "applied transform");
                }
                None => {
                    tracing::debug!(identifier, "unknown transform identifier, skipping");
                }
            }
        }

        current
    }

    /// Resolve `identifiers` against this registry into a standalone
    /// pipeline. The first identifier that does not resolve is returned as
    /// the error.
    pub fn resolve<'a, S: AsRef<str>>(
        &self,
        identifiers: &'a [S],
    ) -> Result<Pipeline, &'a str> {
        identifiers
            .iter()
            .map(|id| {
                let id = id.as_ref();
                self.transforms.get(id).cloned().ok_or(id)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|stages| Pipeline { stages })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("identifiers", &self.identifiers())
            .finish()
    }
}

///
/// Pipeline
///
/// An ordered list of transforms detached from any registry. Later changes
/// to the registry it was resolved from do not affect it.
///

#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Transform>,
}

impl Pipeline {
    #[must_use]
    pub fn run(&self, value: &str) -> String {
        self.stages
            .iter()
            .fold(value.to_string(), |current, stage| stage(&current))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    #[must_use]
    pub fn into_transform(self) -> Transform {
        Arc::new(move |value: &str| self.run(value))
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages.len())
            .finish()
    }
}
