use derive_more::Display;
use thiserror::Error as ThisError;

///
/// ConformError
///
/// Usage errors surfaced to the caller. Soft conditions (unknown identifiers
/// at dispatch, nil nested records, annotated non-text fields) never produce
/// one of these.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ConformError {
    #[error("aliases form a cycle: {}", aliases.join(", "))]
    AliasCycle { aliases: Vec<String> },

    #[error("cannot parse registry config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid transform identifier {identifier:?}: {fault}")]
    InvalidIdentifier {
        identifier: String,
        fault: IdentifierFault,
    },

    #[error("transform registry lock is poisoned")]
    RegistryPoisoned,

    #[error("alias '{alias}' references unknown transform '{identifier}'")]
    UnknownIdentifier { alias: String, identifier: String },
}

impl ConformError {
    pub(crate) fn invalid_identifier(identifier: &str, fault: IdentifierFault) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.to_string(),
            fault,
        }
    }
}

///
/// IdentifierFault
///
/// Why a string cannot be used as a transform identifier.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum IdentifierFault {
    #[display("identifier is empty")]
    Empty,

    #[display("identifier contains the ',' delimiter")]
    Delimiter,

    #[display("identifier contains whitespace")]
    Whitespace,
}
