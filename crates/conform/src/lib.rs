//!
//! Conform: tag-driven, in-place sanitizing of text fields.
//!
//! Annotate `String` fields with the transforms to run, derive `Conform`, and
//! call `apply` on a mutable reference:
//!
//! ```
//! use conform::Conform;
//!
//! #[derive(Conform)]
//! struct Signup {
//!     #[conform("name")]
//!     first_name: String,
//!     #[conform("email")]
//!     email: String,
//! }
//!
//! let mut form = Signup {
//!     first_name: " LEE ".into(),
//!     email: "  LEE@LEEbenson.com  ".into(),
//! };
//! conform::apply(&mut form).unwrap();
//!
//! assert_eq!(form.first_name, "Lee");
//! assert_eq!(form.email, "lee@leebenson.com");
//! ```
//!
//! Nested records, `Box`/`Option` pointers to records and sequences of
//! records are walked automatically. Fields of any other type are never
//! touched, annotated or not. Unknown transform identifiers are skipped.
//!

extern crate self as conform;

pub mod annotation;
pub mod config;
pub mod error;
pub mod registry;
pub mod transform;
pub mod walk;

pub use config::RegistryConfig;
pub use conform_macros::Conform;
pub use error::{ConformError, IdentifierFault};
pub use registry::{Pipeline, Registry, Transform};
pub use walk::{Conform, FieldSpec, Record, Text};

use std::sync::{LazyLock, RwLock};

///
/// Crate Version
///

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// REGISTRY
//
// Process-wide, seeded with the built-ins on first use. `apply` holds the
// read lock for a whole traversal, so a `register` issued meanwhile waits
// for in-flight traversals to finish.
//

static REGISTRY: LazyLock<RwLock<Registry>> =
    LazyLock::new(|| RwLock::new(Registry::with_builtins()));

/// Conform `record` in place against the process-wide registry.
pub fn apply<T: Conform + ?Sized>(record: &mut T) -> Result<(), ConformError> {
    let registry = REGISTRY.read().map_err(|_| ConformError::RegistryPoisoned)?;
    tracing::trace!(record = std::any::type_name::<T>(), "conforming record");
    record.conform_with(&registry);

    Ok(())
}

/// Conform `record` in place against a caller-owned registry.
pub fn apply_with<T: Conform + ?Sized>(registry: &Registry, record: &mut T) {
    record.conform_with(registry);
}

/// Install or override a transform in the process-wide registry.
pub fn register<F>(identifier: impl Into<String>, transform: F) -> Result<(), ConformError>
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    let mut registry = REGISTRY
        .write()
        .map_err(|_| ConformError::RegistryPoisoned)?;
    registry.register(identifier, transform)?;

    Ok(())
}

/// Replace the process-wide registry with one built from `config`.
pub fn configure(config: &RegistryConfig) -> Result<(), ConformError> {
    let built = config.build()?;
    let mut registry = REGISTRY
        .write()
        .map_err(|_| ConformError::RegistryPoisoned)?;
    *registry = built;

    Ok(())
}

/// Run `f` with shared access to the process-wide registry.
pub fn with_registry<R>(f: impl FnOnce(&Registry) -> R) -> Result<R, ConformError> {
    let registry = REGISTRY.read().map_err(|_| ConformError::RegistryPoisoned)?;

    Ok(f(&registry))
}

///
/// __private
///
/// Support for generated code. Each field is wrapped in a `Slot` and the
/// method call resolves, through autoref, to the `TextSlot`/`RecordSlot`
/// impl when the field type qualifies, and to the no-op `OtherSlot` impl
/// otherwise. This keeps non-text fields untouched without the derive having
/// to understand field types.
///

#[doc(hidden)]
pub mod __private {
    use crate::{Conform, Registry, Text};

    pub struct Slot<'a, T: ?Sized>(pub &'a mut T);

    pub trait TextSlot {
        fn transform(&mut self, registry: &Registry, transforms: &[&str]);
    }

    impl<T: Text + ?Sized> TextSlot for Slot<'_, T> {
        fn transform(&mut self, registry: &Registry, transforms: &[&str]) {
            self.0.rewrite(registry, transforms);
        }
    }

    pub trait RecordSlot {
        fn descend(&mut self, registry: &Registry);
    }

    impl<T: Conform + ?Sized> RecordSlot for Slot<'_, T> {
        fn descend(&mut self, registry: &Registry) {
            self.0.conform_with(registry);
        }
    }

    pub trait OtherSlot {
        fn transform(&mut self, _registry: &Registry, _transforms: &[&str]) {}
        fn descend(&mut self, _registry: &Registry) {}
    }

    impl<T: ?Sized> OtherSlot for &mut Slot<'_, T> {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Conform)]
    struct Inner {
        #[conform("upper")]
        code: String,
    }

    #[derive(Conform)]
    struct Outer {
        #[conform("trim")]
        label: String,
        #[conform("trim")]
        count: u32,
        inner: Inner,
        tags: Vec<String>,
    }

    #[test]
    fn derive_resolves_inside_the_crate() {
        let registry = Registry::with_builtins();
        let mut outer = Outer {
            label: " a ".into(),
            count: 3,
            inner: Inner { code: "xy".into() },
            tags: vec![" keep ".into()],
        };

        apply_with(&registry, &mut outer);

        assert_eq!(outer.label, "a");
        assert_eq!(outer.count, 3);
        assert_eq!(outer.inner.code, "XY");
        assert_eq!(outer.tags, vec![" keep ".to_string()]);
    }

    #[test]
    fn derive_emits_field_table() {
        assert_eq!(Outer::NAME, "Outer");
        assert_eq!(
            Outer::FIELDS,
            &[
                FieldSpec {
                    name: "label",
                    transforms: &["trim"],
                },
                FieldSpec {
                    name: "count",
                    transforms: &["trim"],
                },
            ]
        );
        assert_eq!(Inner::field("code").map(|f| f.transforms), Some(&["upper"][..]));
        assert!(Inner::field("missing").is_none());
    }

    #[test]
    fn slot_dispatch_falls_back_for_other_types() {
        use __private::{OtherSlot as _, RecordSlot as _, Slot, TextSlot as _};

        let registry = Registry::with_builtins();
        let mut number = 5_u8;
        let mut text = String::from(" t ");

        (&mut Slot(&mut number)).transform(&registry, &["trim"]);
        (&mut Slot(&mut number)).descend(&registry);
        (&mut Slot(&mut text)).transform(&registry, &["trim"]);

        assert_eq!(number, 5);
        assert_eq!(text, "t");
    }
}
