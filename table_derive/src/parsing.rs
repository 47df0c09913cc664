//! Parsing utilities for table and field attributes
//!
//! This module handles the parsing of `#[table]` and `#[field]` attributes
//! and validation of table and field names.

use syn::{
    Attribute, Data, Error, Expr, Fields, GenericArgument, Ident, Lit, PathArguments, Result,
    Type, Visibility,
};

/// Validate table name and return syn::Error for better proc macro error handling
pub fn validate_table_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid table name '{}': {}", name, e)))
}

/// Validate field name and return syn::Error for better proc macro error handling
pub fn validate_field_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid field name '{}': {}", name, e)))
}

/// Validation logic that mirrors model_object::validation module
/// This ensures compile-time validation matches runtime validation
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    // MySQL limit
    if name.len() > 64 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 64)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    if is_reserved_keyword(name) {
        return Err(format!("Name '{}' is a reserved SQL keyword", name));
    }

    Ok(())
}

/// Check if a name is a reserved SQL keyword
/// This mirrors the list in model_object::validation
fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        "ADD", "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
        "CONSTRAINT", "CREATE", "CROSS", "DATABASE", "DEFAULT", "DELETE", "DESC", "DISTINCT",
        "DROP", "ELSE", "EXISTS", "FALSE", "FOREIGN", "FROM", "GROUP", "HAVING", "IF", "IN",
        "INDEX", "INNER", "INSERT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "NOT",
        "NULL", "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES", "RIGHT", "SELECT", "SET",
        "TABLE", "THEN", "TO", "TRUE", "UNION", "UNIQUE", "UPDATE", "USING", "VALUES", "WHEN",
        "WHERE", "WITH",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

#[derive(Debug)]
pub struct TableInfo {
    pub name: String,
    /// Extra `key = value` pairs of `#[table(...)]`, in declaration order
    pub options: Vec<(String, Lit)>,
}

#[derive(Debug)]
pub struct FieldInfo {
    pub ident: Ident,
    pub name: String,
    pub vis: Visibility,
    pub ty: Type,
    pub default: Option<Expr>,
    /// The Rust type is `Option<_>` and can hold `NULL`
    pub optional: bool,
    pub nullable: bool,
    pub indexed: bool,
    pub unique: bool,
    pub primary_key: bool,
}

/// Parse `#[table(name = "...", key = value, ...)]`; the name defaults to the struct name
pub fn parse_table_attributes(attrs: &[Attribute], struct_name: &Ident) -> Result<TableInfo> {
    let mut table_name = None;
    let mut options = Vec::new();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("table")) {
        attr.parse_nested_meta(|meta| {
            let key = meta
                .path
                .get_ident()
                .map(Ident::to_string)
                .ok_or_else(|| meta.error("table option keys must be plain identifiers"))?;
            let value: Lit = meta.value()?.parse()?;

            if key == "name" {
                match value {
                    Lit::Str(name) => table_name = Some((name.value(), name.span())),
                    other => return Err(Error::new_spanned(other, "table name must be a string")),
                }
            } else {
                options.push((key, value));
            }
            Ok(())
        })?;
    }

    let (name, span) =
        table_name.unwrap_or_else(|| (struct_name.to_string(), struct_name.span()));

    // Validate table name at compile time with proper error handling
    validate_table_name_syn(&name, span)?;

    Ok(TableInfo { name, options })
}

pub fn parse_field_attributes(data: &Data) -> Result<Vec<FieldInfo>> {
    let fields_named = match data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields_named) => fields_named,
            _ => {
                return Err(Error::new(
                    proc_macro2::Span::call_site(),
                    "model requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                proc_macro2::Span::call_site(),
                "model can only be used on structs",
            ))
        }
    };

    let mut fields = Vec::with_capacity(fields_named.named.len());
    let mut primary_key_seen = false;

    for field in &fields_named.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
        let name = ident.to_string();
        let name = name.strip_prefix("r#").unwrap_or(&name).to_string();

        validate_field_name_syn(&name, ident.span())?;

        let optional = is_option(&field.ty);
        let mut info = FieldInfo {
            ident,
            name,
            vis: field.vis.clone(),
            ty: field.ty.clone(),
            default: None,
            optional,
            nullable: optional,
            indexed: false,
            unique: false,
            primary_key: false,
        };

        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("field")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("default") {
                    info.default = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("nullable") {
                    info.nullable = parse_flag(&meta)?;
                } else if meta.path.is_ident("index") {
                    info.indexed = parse_flag(&meta)?;
                } else if meta.path.is_ident("unique") {
                    info.unique = parse_flag(&meta)?;
                } else if meta.path.is_ident("primary_key") {
                    info.primary_key = parse_flag(&meta)?;
                } else {
                    return Err(meta.error(
                        "unknown field option: expected default, nullable, index, unique or primary_key",
                    ));
                }
                Ok(())
            })?;
        }

        if info.primary_key {
            if primary_key_seen {
                return Err(Error::new(
                    info.ident.span(),
                    "a model can declare at most one primary key",
                ));
            }
            primary_key_seen = true;
        }

        fields.push(info);
    }

    if fields.is_empty() {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "model must declare at least one field",
        ));
    }

    Ok(fields)
}

/// `flag` alone means true; `flag = <bool>` is explicit
fn parse_flag(meta: &syn::meta::ParseNestedMeta) -> Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        let value: syn::LitBool = meta.value()?.parse()?;
        Ok(value.value)
    } else {
        Ok(true)
    }
}

fn is_option(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    type_path.qself.is_none()
        && type_path.path.segments.last().is_some_and(|segment| {
            segment.ident == "Option"
                && matches!(
                    &segment.arguments,
                    PathArguments::AngleBracketed(args)
                        if matches!(args.args.first(), Some(GenericArgument::Type(_)))
                )
        })
}
