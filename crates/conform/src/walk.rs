//!
//! Traversal engine.
//!
//! A record describes its own shape through `Conform`, normally generated by
//! `#[derive(Conform)]`. Pointer-like and sequence containers forward to their
//! contents, so nested records, `Box`/`&mut`/`Option` pointers and sequences of
//! records are all walked with the same contract. Absent (`None`) values are
//! skipped.
//!

use crate::{annotation, registry::Registry};
use std::collections::VecDeque;

///
/// Conform
///
/// Rewrite, in place, every annotated text field reachable from `self`.
///

pub trait Conform {
    fn conform_with(&mut self, registry: &Registry);
}

///
/// Record
///
/// Static per-type metadata emitted by the derive: one `FieldSpec` for each
/// annotated field, in declaration order.
///

pub trait Record: Conform {
    const NAME: &'static str;
    const FIELDS: &'static [FieldSpec];

    #[must_use]
    fn field(name: &str) -> Option<&'static FieldSpec> {
        Self::FIELDS.iter().find(|spec| spec.name == name)
    }
}

///
/// FieldSpec
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub transforms: &'static [&'static str],
}

///
/// Text
///
/// A value the dispatcher can rewrite. Implemented for `String` and
/// `Option<String>`; newtypes around strings may implement it too.
///

pub trait Text {
    fn rewrite(&mut self, registry: &Registry, transforms: &[&str]);
}

impl Text for String {
    fn rewrite(&mut self, registry: &Registry, transforms: &[&str]) {
        if transforms.is_empty() {
            return;
        }
        *self = registry.dispatch(self, transforms);
    }
}

impl<T: Text + ?Sized> Text for &mut T {
    fn rewrite(&mut self, registry: &Registry, transforms: &[&str]) {
        (**self).rewrite(registry, transforms);
    }
}

impl<T: Text> Text for Option<T> {
    fn rewrite(&mut self, registry: &Registry, transforms: &[&str]) {
        if let Some(text) = self {
            text.rewrite(registry, transforms);
        }
    }
}

//
// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------
//

impl<T: Conform + ?Sized> Conform for Box<T> {
    fn conform_with(&mut self, registry: &Registry) {
        (**self).conform_with(registry);
    }
}

impl<T: Conform + ?Sized> Conform for &mut T {
    fn conform_with(&mut self, registry: &Registry) {
        (**self).conform_with(registry);
    }
}

impl<T: Conform> Conform for Option<T> {
    fn conform_with(&mut self, registry: &Registry) {
        if let Some(inner) = self {
            inner.conform_with(registry);
        }
    }
}

impl<T: Conform> Conform for [T] {
    fn conform_with(&mut self, registry: &Registry) {
        for item in self {
            item.conform_with(registry);
        }
    }
}

impl<T: Conform, const N: usize> Conform for [T; N] {
    fn conform_with(&mut self, registry: &Registry) {
        self.as_mut_slice().conform_with(registry);
    }
}

impl<T: Conform> Conform for Vec<T> {
    fn conform_with(&mut self, registry: &Registry) {
        self.as_mut_slice().conform_with(registry);
    }
}

impl<T: Conform> Conform for VecDeque<T> {
    fn conform_with(&mut self, registry: &Registry) {
        for item in self {
            item.conform_with(registry);
        }
    }
}

//
// ---------------------------------------------------------------------------
// Helpers for hand-written impls
// ---------------------------------------------------------------------------
//

/// Rewrite one text field with an already-split identifier list.
pub fn text<T: Text + ?Sized>(field: &mut T, registry: &Registry, transforms: &[&str]) {
    field.rewrite(registry, transforms);
}

/// Rewrite one text field from a raw annotation such as `"trim, lower"`.
pub fn annotated<T: Text + ?Sized>(field: &mut T, registry: &Registry, annotation: &str) {
    field.rewrite(registry, &annotation::parse(annotation));
}

/// Recurse into a nested record, pointer or sequence.
pub fn nested<T: Conform + ?Sized>(field: &mut T, registry: &Registry) {
    field.conform_with(registry);
}

#[cfg(test)]
mod tests {
    use super::*;

    // hand-written shape, as a derive would produce
    #[derive(Debug, Default, PartialEq)]
    struct Tag {
        label: String,
    }

    impl Conform for Tag {
        fn conform_with(&mut self, registry: &Registry) {
            annotated(&mut self.label, registry, "trim, slug");
        }
    }

    #[derive(Debug, Default)]
    struct Post {
        title: String,
        subtitle: Option<String>,
        views: u64,
        primary: Option<Box<Tag>>,
        tags: Vec<Option<Tag>>,
    }

    impl Conform for Post {
        fn conform_with(&mut self, registry: &Registry) {
            text(&mut self.title, registry, &["trim", "title"]);
            text(&mut self.subtitle, registry, &["trim"]);
            nested(&mut self.primary, registry);
            nested(&mut self.tags, registry);
        }
    }

    fn tag(label: &str) -> Tag {
        Tag {
            label: label.to_string(),
        }
    }

    #[test]
    fn hand_written_shape_is_walked() {
        let registry = Registry::with_builtins();
        let mut post = Post {
            title: "  hello world ".into(),
            subtitle: Some(" sub ".into()),
            views: 7,
            primary: Some(Box::new(tag(" Rust Lang "))),
            tags: vec![Some(tag("Hello World")), None, Some(tag(" A B "))],
        };

        post.conform_with(&registry);

        assert_eq!(post.title, "Hello World");
        assert_eq!(post.subtitle.as_deref(), Some("sub"));
        assert_eq!(post.views, 7);
        assert_eq!(post.primary.as_deref(), Some(&tag("rust-lang")));
        assert_eq!(
            post.tags,
            vec![Some(tag("hello-world")), None, Some(tag("a-b"))]
        );
    }

    #[test]
    fn absent_values_are_skipped() {
        let registry = Registry::with_builtins();
        let mut post = Post::default();

        post.conform_with(&registry);

        assert!(post.subtitle.is_none());
        assert!(post.primary.is_none());
        assert!(post.tags.is_empty());
    }

    #[test]
    fn arrays_and_deques_visit_every_element() {
        let registry = Registry::with_builtins();
        let mut array = [tag(" X Y "), tag("Z")];
        let mut deque: VecDeque<Tag> = VecDeque::from([tag(" Q ")]);

        array.conform_with(&registry);
        deque.conform_with(&registry);

        assert_eq!(array, [tag("x-y"), tag("z")]);
        assert_eq!(deque.front(), Some(&tag("q")));
    }

    #[test]
    fn borrowed_records_and_text_are_walked() {
        let registry = Registry::with_builtins();
        let mut owned = tag(" Borrowed Tag ");
        let mut label = String::from("  loose ");
        let mut borrowed = vec![&mut owned];

        borrowed.conform_with(&registry);
        text(&mut &mut label, &registry, &["trim"]);

        assert_eq!(owned, tag("borrowed-tag"));
        assert_eq!(label, "loose");
    }

    #[test]
    fn empty_transform_list_leaves_text_untouched() {
        let registry = Registry::with_builtins();
        let mut value = String::from("  raw ");

        text(&mut value, &registry, &[]);
        annotated(&mut value, &registry, " , ");

        assert_eq!(value, "  raw ");
    }
}
