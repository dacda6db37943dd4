use crate::derive::{
    DELIMITER,
    parse::{ConformArg, ContainerArg, ParsedField, ParsedInput, ParsedShape},
};
use syn::{
    Generics, Ident, LitStr, Member, Token, Type, WherePredicate, ext::IdentExt,
    punctuated::Punctuated,
};

///
/// ValidatedInput
///
/// A struct whose `conform` attributes are well-formed: annotations are split
/// into identifier lists and flags are known.
///
/// This phase does NOT check identifiers against any registry.
///

#[derive(Debug)]
pub struct ValidatedInput {
    pub ident: Ident,
    pub generics: Generics,
    /// Explicit `bound = "..."` predicates; `None` means infer them.
    pub bound: Option<Vec<WherePredicate>>,
    pub fields: Vec<ValidatedField>,
}

#[derive(Debug)]
pub struct ValidatedField {
    pub member: Member,
    pub ty: Type,
    pub transforms: Vec<String>,
    pub skip: bool,
}

impl ValidatedField {
    /// Name recorded in the field table; tuple fields use their index and
    /// raw identifiers lose their `r#`.
    pub fn name(&self) -> String {
        match &self.member {
            Member::Named(ident) => ident.unraw().to_string(),
            Member::Unnamed(index) => index.index.to_string(),
        }
    }
}

pub fn validate(parsed: ParsedInput) -> syn::Result<ValidatedInput> {
    let bound = validate_bound(parsed.container_args)?;

    let fields = match parsed.shape {
        ParsedShape::Struct(fields) => fields,
        ParsedShape::Enum(span) | ParsedShape::Union(span) => {
            return Err(syn::Error::new(
                span,
                "Conform can only be derived for structs",
            ));
        }
    };

    let fields = fields
        .into_iter()
        .map(validate_field)
        .collect::<syn::Result<_>>()?;

    Ok(ValidatedInput {
        ident: parsed.ident,
        generics: parsed.generics,
        bound,
        fields,
    })
}

fn validate_bound(args: Vec<ContainerArg>) -> syn::Result<Option<Vec<WherePredicate>>> {
    let mut bound = None;

    for ContainerArg::Bound(lit) in args {
        if bound.is_some() {
            return Err(syn::Error::new_spanned(&lit, "duplicate `bound` option"));
        }
        let predicates =
            lit.parse_with(Punctuated::<WherePredicate, Token![,]>::parse_terminated)?;
        bound = Some(predicates.into_iter().collect());
    }

    Ok(bound)
}

fn validate_field(field: ParsedField) -> syn::Result<ValidatedField> {
    let mut transforms = Vec::new();
    let mut skip: Option<Ident> = None;

    for arg in field.args {
        match arg {
            ConformArg::Annotation(lit) => transforms.extend(split_annotation(&lit)?),
            ConformArg::Flag(flag) if flag == "skip" => skip = Some(flag),
            ConformArg::Flag(flag) => {
                return Err(syn::Error::new_spanned(
                    &flag,
                    format!("unknown conform flag `{flag}`; expected `skip`"),
                ));
            }
        }
    }

    if let Some(flag) = &skip
        && !transforms.is_empty()
    {
        return Err(syn::Error::new_spanned(
            flag,
            "`skip` cannot be combined with transforms",
        ));
    }

    Ok(ValidatedField {
        member: field.member,
        ty: field.ty,
        transforms,
        skip: skip.is_some(),
    })
}

// Same rules as `conform::annotation::parse`: split, trim, drop empties.
fn split_annotation(lit: &LitStr) -> syn::Result<Vec<String>> {
    let value = lit.value();
    let mut identifiers = Vec::new();

    for segment in value.split(DELIMITER).map(str::trim) {
        if segment.is_empty() {
            continue;
        }
        if segment.chars().any(char::is_whitespace) {
            return Err(syn::Error::new_spanned(
                lit,
                format!("transform identifier `{segment}` contains whitespace; separate identifiers with ','"),
            ));
        }
        identifiers.push(segment.to_string());
    }

    Ok(identifiers)
}
