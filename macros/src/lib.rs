use proc_macro::TokenStream;
use quote::quote;
use std::collections::HashMap;
use syn::{Attribute, Data, DeriveInput, Fields, Meta, Token, Type, parse_macro_input};

/// Helper enum for parsed attribute values
enum MetaValue {
    Str(syn::LitStr),
    Flag,
}

const KINDS: [(&str, &str); 5] = [
    ("string", "String"),
    ("number", "Number"),
    ("boolean", "Boolean"),
    ("email", "Email"),
    ("url", "Url"),
];

/// Check if the struct has #[allow(missing_docs)] attribute
fn is_allow_missing_docs(attr: &Attribute) -> bool {
    attr.path().is_ident("allow")
        && attr
            .parse_args::<syn::Ident>()
            .map(|ident| ident == "missing_docs")
            .unwrap_or(false)
}

/// Defines a struct loaded from a schema of environment variables
///
/// ```ignore
/// define_env! {
///     pub struct AppEnv {
///         #[field(env = "PORT", kind = "number", doc = "Server port")]
///         pub port: u16,
///
///         #[field(env = "ADMIN_EMAIL", kind = "email", doc = "Admin contact", optional)]
///         pub admin_email: Option<String>,
///     }
/// }
/// ```
#[proc_macro]
pub fn define_env(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_env(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_env(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let vis = &input.vis;
    let struct_attrs = &input.attrs;

    let allow_missing_docs = struct_attrs.iter().any(is_allow_missing_docs);

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "define_env! only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "define_env! only supports structs",
            ));
        }
    };

    let mut field_defs = Vec::new();
    let mut schema_items = Vec::new();
    let mut take_fields = Vec::new();
    let mut field_names = Vec::new();

    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "fields must be named"))?;
        let field_vis = &field.vis;
        let field_type = &field.ty;

        let config = parse_field_config(&field.attrs, allow_missing_docs)?;

        let is_option = is_option_type(field_type);
        if config.optional && !is_option {
            return Err(syn::Error::new_spanned(
                field_type,
                "optional fields must have type Option<T>",
            ));
        }
        if !config.optional && is_option {
            return Err(syn::Error::new_spanned(
                field_type,
                "fields of type Option<T> must be marked optional",
            ));
        }

        // Keep doc comments and other attributes, drop our #[field(...)]
        let kept_attrs: Vec<&Attribute> = field
            .attrs
            .iter()
            .filter(|attr| !attr.path().is_ident("field"))
            .collect();

        field_defs.push(quote! {
            #(#kept_attrs)*
            #field_vis #field_name: #field_type
        });

        let env_var = &config.env_var;
        let kind = &config.kind;
        let optional = config.optional;
        let allow_empty = config.allow_empty;
        let describe = if config.description.is_empty() {
            quote! {}
        } else {
            let description = &config.description;
            quote! { .describe(#description) }
        };

        schema_items.push(quote! {
            .item(
                ::env_loadr::SchemaItem::new(#env_var, ::env_loadr::Kind::#kind)
                    .set_optional(#optional)
                    .set_allow_empty(#allow_empty)
                    #describe
            )
        });

        take_fields.push(quote! {
            let #field_name = ::env_loadr::macros::take_field::<#field_type>(
                &mut record,
                &mut errors,
                #env_var,
                ::env_loadr::Kind::#kind,
            );
        });

        field_names.push(field_name);
    }

    // Filter out our custom attributes (allow(missing_docs)) from struct definition
    let filtered_attrs: Vec<&Attribute> = struct_attrs
        .iter()
        .filter(|attr| !is_allow_missing_docs(attr))
        .collect();

    let struct_def = quote! {
        #(#filtered_attrs)*
        #vis struct #struct_name {
            #(#field_defs),*
        }
    };

    let load_impl = quote! {
        impl ::env_loadr::Load for #struct_name {
            fn schema() -> ::env_loadr::Schema {
                ::env_loadr::Schema::new()
                    #(#schema_items)*
            }

            #[allow(unused_mut, unreachable_patterns)]
            fn from_record(
                mut record: ::env_loadr::EnvRecord,
            ) -> Result<Self, ::env_loadr::LoadError> {
                let mut errors = Vec::new();

                #(#take_fields)*

                match (#(#field_names,)*) {
                    (#(Some(#field_names),)*) => Ok(Self {
                        #(#field_names),*
                    }),
                    _ => Err(::env_loadr::LoadError::new(errors)),
                }
            }
        }

        impl #struct_name {
            /// Load from the process environment after merging `.env`
            pub fn new() -> Result<Self, ::env_loadr::LoadError> {
                <Self as ::env_loadr::Load>::load_or_error()
            }
        }
    };

    Ok(quote! {
        #struct_def
        #load_impl
    })
}

#[derive(Debug)]
struct FieldConfig {
    env_var: String,
    kind: syn::Ident,
    description: String,
    optional: bool,
    allow_empty: bool,
}

/// Parse #[field(env = "X", kind = "number", doc = "Y", optional, allow_empty)] syntax
fn parse_field_list(meta_list: &syn::MetaList) -> syn::Result<HashMap<String, MetaValue>> {
    let mut values = HashMap::new();

    meta_list.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .ok_or_else(|| meta.error("expected identifier"))?
            .to_string();

        if meta.input.peek(Token![=]) {
            meta.input.parse::<Token![=]>()?;
            let value: syn::LitStr = meta.input.parse()?;
            values.insert(key, MetaValue::Str(value));
        } else {
            values.insert(key, MetaValue::Flag);
        }

        Ok(())
    })?;

    for key in values.keys() {
        if !matches!(key.as_str(), "env" | "kind" | "doc" | "optional" | "allow_empty") {
            return Err(syn::Error::new_spanned(
                meta_list,
                format!("unknown field option `{}`", key),
            ));
        }
    }

    Ok(values)
}

fn parse_field_config(attrs: &[Attribute], allow_missing_docs: bool) -> syn::Result<FieldConfig> {
    let field_attr = attrs
        .iter()
        .find(|attr| attr.path().is_ident("field"))
        .ok_or_else(|| {
            syn::Error::new(
                proc_macro2::Span::call_site(),
                "field must have #[field(...)] attribute with env and kind",
            )
        })?;

    let parsed = match &field_attr.meta {
        Meta::List(list) => parse_field_list(list)?,
        _ => {
            return Err(syn::Error::new_spanned(
                field_attr,
                "field attribute must be a list: #[field(env = \"...\", kind = \"...\")]",
            ));
        }
    };

    let env_var = match parsed.get("env") {
        Some(MetaValue::Str(s)) => s.value(),
        _ => {
            return Err(syn::Error::new_spanned(
                field_attr,
                "field must have env = \"VAR_NAME\"",
            ));
        }
    };

    let kind = match parsed.get("kind") {
        Some(MetaValue::Str(s)) => {
            let text = s.value();
            let variant = KINDS
                .iter()
                .find(|(name, _)| *name == text)
                .map(|(_, variant)| *variant)
                .ok_or_else(|| syn::Error::new_spanned(s, format!("Unsupported type: {}", text)))?;
            syn::Ident::new(variant, s.span())
        }
        _ => {
            return Err(syn::Error::new_spanned(
                field_attr,
                "field must have kind = \"string\" | \"number\" | \"boolean\" | \"email\" | \"url\"",
            ));
        }
    };

    let description = match parsed.get("doc") {
        Some(MetaValue::Str(s)) => s.value().trim().to_string(),
        None if allow_missing_docs => String::new(),
        None => {
            return Err(syn::Error::new_spanned(
                field_attr,
                "field must have doc = \"description\" (or use #[allow(missing_docs)] on struct)",
            ));
        }
        Some(MetaValue::Flag) => {
            return Err(syn::Error::new_spanned(
                field_attr,
                "doc must be a string literal",
            ));
        }
    };

    let optional = matches!(parsed.get("optional"), Some(MetaValue::Flag));
    let allow_empty = matches!(parsed.get("allow_empty"), Some(MetaValue::Flag));

    if allow_empty && kind != "String" {
        return Err(syn::Error::new_spanned(
            field_attr,
            "allow_empty only applies to kind = \"string\"",
        ));
    }

    Ok(FieldConfig {
        env_var,
        kind,
        description,
        optional,
        allow_empty,
    })
}

/// Whether the type is written as Option<T>
fn is_option_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| {
                segment.ident == "Option"
                    && matches!(segment.arguments, syn::PathArguments::AngleBracketed(_))
            })
            .unwrap_or(false),
        _ => false,
    }
}
