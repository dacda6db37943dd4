use crate::{annotation, error::ConformError, registry::Registry};
use serde::Deserialize;
use std::collections::BTreeMap;

///
/// RegistryConfig
///
/// TOML description of a registry:
///
/// ```toml
/// builtins = true
///
/// [aliases]
/// username = ["trim", "lower"]
/// handle = ["username", "slug"]
/// ```
///
/// An alias is registered as a transform running its pipeline. Aliases may
/// reference each other; every referenced identifier must resolve when the
/// config is applied.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default = "default_builtins")]
    pub builtins: bool,

    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,
}

const fn default_builtins() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            builtins: default_builtins(),
            aliases: BTreeMap::new(),
        }
    }
}

impl RegistryConfig {
    pub fn from_toml(config_str: &str) -> Result<Self, ConformError> {
        let config: Self = toml::from_str(config_str)?;
        config.validate()?;

        Ok(config)
    }

    /// Alias names must be usable as identifiers. Whether their targets
    /// resolve depends on the registry, so that is checked by `apply_to`.
    pub fn validate(&self) -> Result<(), ConformError> {
        for alias in self.aliases.keys() {
            annotation::check_identifier(alias)
                .map_err(|fault| ConformError::invalid_identifier(alias, fault))?;
        }

        Ok(())
    }

    /// Build a fresh registry from this config.
    pub fn build(&self) -> Result<Registry, ConformError> {
        let mut registry = if self.builtins {
            Registry::with_builtins()
        } else {
            Registry::new()
        };
        self.apply_to(&mut registry)?;

        Ok(registry)
    }

    /// Register every alias on top of `registry`.
    ///
    /// Aliases are installed in dependency order. An alias whose targets
    /// never resolve (missing identifier or a cycle) fails the whole call
    /// and leaves `registry` unchanged.
    pub fn apply_to(&self, registry: &mut Registry) -> Result<(), ConformError> {
        self.validate()?;

        let mut staged = registry.clone();
        let mut pending: BTreeMap<&str, &[String]> = self
            .aliases
            .iter()
            .map(|(alias, targets)| (alias.as_str(), targets.as_slice()))
            .collect();

        while !pending.is_empty() {
            let ready: Vec<&str> = pending
                .iter()
                .filter(|(_, targets)| {
                    targets
                        .iter()
                        .all(|t| !pending.contains_key(t.as_str()) && staged.contains(t))
                })
                .map(|(alias, _)| *alias)
                .collect();

            if ready.is_empty() {
                return Err(unresolved(&pending, &staged));
            }

            for alias in ready {
                let Some(targets) = pending.remove(alias) else {
                    continue;
                };
                let pipeline =
                    staged
                        .resolve(targets)
                        .map_err(|identifier| ConformError::UnknownIdentifier {
                            alias: alias.to_string(),
                            identifier: identifier.to_string(),
                        })?;
                staged.insert(alias.to_string(), pipeline.into_transform())?;
            }
        }

        *registry = staged;
        tracing::debug!(aliases = self.aliases.len(), "applied registry config");

        Ok(())
    }
}

// Nothing left is installable: report the first target missing from the
// registry, or, when every blocker is another pending alias, the cycle.
fn unresolved(pending: &BTreeMap<&str, &[String]>, staged: &Registry) -> ConformError {
    pending
        .iter()
        .find_map(|(alias, targets)| {
            targets
                .iter()
                .find(|t| !pending.contains_key(t.as_str()) && !staged.contains(t))
                .map(|identifier| ConformError::UnknownIdentifier {
                    alias: (*alias).to_string(),
                    identifier: identifier.clone(),
                })
        })
        .unwrap_or_else(|| ConformError::AliasCycle {
            aliases: pending.keys().map(ToString::to_string).collect(),
        })
}
