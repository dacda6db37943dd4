use crate::derive::ATTRIBUTE;
use proc_macro2::Span;
use syn::{
    Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Generics, Ident, Lit, LitStr, Member,
    Meta, Token, Type,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
};

//
// ============================================================================
// parse - attribute grammar only
// ============================================================================
//

//
// ConformArg
//
// One comma-separated item inside `#[conform(...)]`.
//

#[derive(Clone, Debug)]
pub enum ConformArg {
    Annotation(LitStr),
    Flag(Ident),
}

impl Parse for ConformArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            input.parse().map(Self::Annotation)
        } else if input.peek(Ident) {
            input.parse().map(Self::Flag)
        } else {
            Err(input.error("expected a transform list string or `skip`"))
        }
    }
}

//
// ContainerArg
//
// One item inside a struct-level `#[conform(...)]`.
//

#[derive(Clone, Debug)]
pub enum ContainerArg {
    Bound(LitStr),
}

impl Parse for ContainerArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return Err(input.error(
                "transform lists belong on fields; the struct only accepts `bound = \"...\"`",
            ));
        }

        let key: Ident = input.parse()?;
        if key != "bound" {
            return Err(syn::Error::new_spanned(
                &key,
                format!("unknown conform struct option `{key}`; expected `bound`"),
            ));
        }
        input.parse::<Token![=]>()?;

        input.parse().map(Self::Bound)
    }
}

//
// ParsedField
//

#[derive(Debug)]
pub struct ParsedField {
    pub member: Member,
    pub ty: Type,
    pub args: Vec<ConformArg>,
}

//
// ParsedShape
//

#[derive(Debug)]
pub enum ParsedShape {
    Struct(Vec<ParsedField>),
    Enum(Span),
    Union(Span),
}

//
// ParsedInput
//

#[derive(Debug)]
pub struct ParsedInput {
    pub ident: Ident,
    pub generics: Generics,
    pub container_args: Vec<ContainerArg>,
    pub shape: ParsedShape,
}

pub fn parse_input(input: DeriveInput) -> syn::Result<ParsedInput> {
    let shape = match input.data {
        Data::Struct(data) => ParsedShape::Struct(parse_fields(data.fields)?),
        Data::Enum(data) => ParsedShape::Enum(data.enum_token.span),
        Data::Union(data) => ParsedShape::Union(data.union_token.span),
    };

    let mut container_args = Vec::new();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident(ATTRIBUTE)) {
        container_args.extend(parse_container_attr(attr)?);
    }

    Ok(ParsedInput {
        ident: input.ident,
        generics: input.generics,
        container_args,
        shape,
    })
}

fn parse_fields(fields: Fields) -> syn::Result<Vec<ParsedField>> {
    fields
        .into_iter()
        .enumerate()
        .map(|(index, field)| -> syn::Result<ParsedField> {
            let span = field.span();
            let member = match field.ident {
                Some(ident) => Member::Named(ident),
                None => Member::Unnamed(syn::Index {
                    index: u32::try_from(index)
                        .map_err(|_| syn::Error::new(span, "too many fields"))?,
                    span,
                }),
            };

            let mut args = Vec::new();
            for attr in field.attrs.iter().filter(|a| a.path().is_ident(ATTRIBUTE)) {
                args.extend(parse_attr(attr)?);
            }

            Ok(ParsedField {
                member,
                ty: field.ty,
                args,
            })
        })
        .collect()
}

//
// ---------------------------------------------------------------------------
// Attribute forms
// ---------------------------------------------------------------------------
//

fn parse_attr(attr: &Attribute) -> syn::Result<Vec<ConformArg>> {
    match &attr.meta {
        // #[conform("trim, lower", skip)]
        Meta::List(list) => {
            let args = list.parse_args_with(Punctuated::<ConformArg, Token![,]>::parse_terminated)?;
            if args.is_empty() {
                return Err(syn::Error::new_spanned(
                    list,
                    "expected a transform list, e.g. #[conform(\"trim\")]",
                ));
            }

            Ok(args.into_iter().collect())
        }

        // #[conform = "trim, lower"]
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) => Ok(vec![ConformArg::Annotation(lit.clone())]),
            other => Err(syn::Error::new_spanned(
                other,
                "expected a string literal transform list",
            )),
        },

        // #[conform]
        Meta::Path(path) => Err(syn::Error::new_spanned(
            path,
            "expected a transform list, e.g. #[conform(\"trim\")]",
        )),
    }
}

// #[conform(bound = "T: Text")]
fn parse_container_attr(attr: &Attribute) -> syn::Result<Vec<ContainerArg>> {
    match &attr.meta {
        Meta::List(list) => Ok(list
            .parse_args_with(Punctuated::<ContainerArg, Token![,]>::parse_terminated)?
            .into_iter()
            .collect()),
        other => Err(syn::Error::new_spanned(
            other,
            "transform lists belong on fields; the struct only accepts #[conform(bound = \"...\")]",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(input: DeriveInput) -> Vec<ParsedField> {
        match parse_input(input).expect("parse").shape {
            ParsedShape::Struct(fields) => fields,
            other => panic!("expected struct, got {other:?}"),
        }
    }

    fn annotations(field: &ParsedField) -> Vec<String> {
        field
            .args
            .iter()
            .filter_map(|arg| match arg {
                ConformArg::Annotation(lit) => Some(lit.value()),
                ConformArg::Flag(_) => None,
            })
            .collect()
    }

    #[test]
    fn list_and_name_value_forms() {
        let parsed = fields(syn::parse_quote! {
            struct Form {
                #[conform("trim, name")]
                first: String,
                #[conform = "email"]
                email: String,
                age: u8,
            }
        });

        assert_eq!(parsed.len(), 3);
        assert_eq!(annotations(&parsed[0]), vec!["trim, name"]);
        assert_eq!(annotations(&parsed[1]), vec!["email"]);
        assert!(parsed[2].args.is_empty());
    }

    #[test]
    fn repeated_attributes_concatenate_in_order() {
        let parsed = fields(syn::parse_quote! {
            struct Form {
                #[conform("trim")]
                #[serde(rename = "Name")]
                #[conform("lower", "slug")]
                name: String,
            }
        });

        assert_eq!(annotations(&parsed[0]), vec!["trim", "lower", "slug"]);
    }

    #[test]
    fn unrelated_attributes_are_ignored() {
        let parsed = fields(syn::parse_quote! {
            struct Form {
                #[serde(default)]
                #[doc = "conform me"]
                name: String,
            }
        });

        assert!(parsed[0].args.is_empty());
    }

    #[test]
    fn skip_flag_is_parsed() {
        let parsed = fields(syn::parse_quote! {
            struct Form {
                #[conform(skip)]
                raw: String,
            }
        });

        assert!(matches!(&parsed[0].args[..], [ConformArg::Flag(flag)] if flag == "skip"));
    }

    #[test]
    fn tuple_fields_use_index_members() {
        let parsed = fields(syn::parse_quote! {
            struct Pair(#[conform("trim")] String, u32);
        });

        assert!(matches!(&parsed[0].member, Member::Unnamed(index) if index.index == 0));
        assert!(matches!(&parsed[1].member, Member::Unnamed(index) if index.index == 1));
    }

    #[test]
    fn bare_attribute_is_rejected() {
        let input: DeriveInput = syn::parse_quote! {
            struct Form {
                #[conform]
                name: String,
            }
        };

        let err = parse_input(input).unwrap_err();
        assert!(err.to_string().contains("expected a transform list"));
    }

    #[test]
    fn non_string_value_is_rejected() {
        let input: DeriveInput = syn::parse_quote! {
            struct Form {
                #[conform = 3]
                name: String,
            }
        };

        let err = parse_input(input).unwrap_err();
        assert!(err.to_string().contains("string literal"));
    }

    #[test]
    fn container_bound_is_parsed() {
        let input: DeriveInput = syn::parse_quote! {
            #[conform(bound = "T: Text")]
            struct Labelled<T> {
                label: T,
            }
        };

        let parsed = parse_input(input).expect("parse");
        assert!(matches!(
            &parsed.container_args[..],
            [ContainerArg::Bound(lit)] if lit.value() == "T: Text"
        ));
    }

    #[test]
    fn container_transform_list_is_rejected() {
        let input: DeriveInput = syn::parse_quote! {
            #[conform("trim")]
            struct Form {
                name: String,
            }
        };

        let err = parse_input(input).unwrap_err();
        assert!(err.to_string().contains("belong on fields"));
    }

    #[test]
    fn unknown_container_option_is_rejected() {
        let input: DeriveInput = syn::parse_quote! {
            #[conform(rename = "x")]
            struct Form {
                name: String,
            }
        };

        let err = parse_input(input).unwrap_err();
        assert!(err.to_string().contains("unknown conform struct option `rename`"));
    }

    #[test]
    fn enums_are_recorded_for_validation() {
        let input: DeriveInput = syn::parse_quote! {
            enum Choice { A, B }
        };

        assert!(matches!(
            parse_input(input).expect("parse").shape,
            ParsedShape::Enum(_)
        ));
    }
}
