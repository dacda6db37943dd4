use crate::derive::validate::{ValidatedField, ValidatedInput};
use proc_macro2::{TokenStream as TokenStream2, TokenTree};
use quote::{ToTokens, quote};
use syn::{Generics, Ident, Type, WherePredicate, parse_quote};

//
// ============================================================================
// expand - code generation only
// ============================================================================
//
// Every field that is not skipped goes through `__private::Slot`. Annotated
// fields get a `transform` call followed by a `descend` call; the rest only
// `descend`. Which impl those calls land on is decided by the field type:
// text types rewrite, record-like types recurse, everything else is a no-op.
//
// A type parameter only reaches the `Text`/`Conform` impls through a bound,
// so parameters used by visited fields are bounded unless the struct spells
// out its own `bound`.
//

pub fn expand(input: ValidatedInput) -> TokenStream2 {
    let ValidatedInput {
        ident,
        generics,
        bound,
        fields,
    } = input;
    let predicates = bound.unwrap_or_else(|| inferred_bounds(&generics, &fields));
    let generics = with_predicates(generics, predicates);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let name = ident.to_string();

    let specs = fields
        .iter()
        .filter(|field| !field.transforms.is_empty())
        .map(field_spec);
    let visits = fields.iter().filter(|field| !field.skip).map(visit);

    quote! {
        #[automatically_derived]
        impl #impl_generics ::conform::Record for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            const FIELDS: &'static [::conform::FieldSpec] = &[#(#specs),*];
        }

        #[automatically_derived]
        impl #impl_generics ::conform::Conform for #ident #ty_generics #where_clause {
            #[allow(unused_imports, clippy::needless_borrow)]
            fn conform_with(&mut self, registry: &::conform::Registry) {
                use ::conform::__private::{OtherSlot as _, RecordSlot as _, TextSlot as _};

                let _ = registry;
                #(#visits)*
            }
        }
    }
}

//
// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------
//

// `T: Text` for parameters in annotated fields, `T: Conform` for parameters
// in any other visited field. `PhantomData<T>` is never visited.
fn inferred_bounds(generics: &Generics, fields: &[ValidatedField]) -> Vec<WherePredicate> {
    let mut predicates = Vec::new();

    for param in generics.type_params() {
        let ident = &param.ident;
        let used = |annotated: bool| {
            fields.iter().any(|field| {
                !field.skip
                    && field.transforms.is_empty() != annotated
                    && !is_phantom(&field.ty)
                    && mentions(field.ty.to_token_stream(), ident)
            })
        };

        if used(true) {
            predicates.push(parse_quote!(#ident: ::conform::Text));
        }
        if used(false) {
            predicates.push(parse_quote!(#ident: ::conform::Conform));
        }
    }

    predicates
}

fn with_predicates(mut generics: Generics, predicates: Vec<WherePredicate>) -> Generics {
    if !predicates.is_empty() {
        generics.make_where_clause().predicates.extend(predicates);
    }

    generics
}

fn mentions(tokens: TokenStream2, ident: &Ident) -> bool {
    tokens.into_iter().any(|tree| match tree {
        TokenTree::Ident(other) => other == *ident,
        TokenTree::Group(group) => mentions(group.stream(), ident),
        TokenTree::Punct(_) | TokenTree::Literal(_) => false,
    })
}

fn is_phantom(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "PhantomData"),
        _ => false,
    }
}

//
// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------
//

fn field_spec(field: &ValidatedField) -> TokenStream2 {
    let name = field.name();
    let transforms = &field.transforms;

    quote! {
        ::conform::FieldSpec {
            name: #name,
            transforms: &[#(#transforms),*],
        }
    }
}

fn visit(field: &ValidatedField) -> TokenStream2 {
    let member = &field.member;
    let descend = quote! {
        (&mut ::conform::__private::Slot(&mut self.#member)).descend(registry);
    };

    if field.transforms.is_empty() {
        return descend;
    }

    let transforms = &field.transforms;
    quote! {
        (&mut ::conform::__private::Slot(&mut self.#member))
            .transform(registry, &[#(#transforms),*]);
        #descend
    }
}
