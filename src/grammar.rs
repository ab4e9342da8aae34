//! Grammar tables: the declarative description of node families.
//!
//! A grammar is plain text. `-Name-` opens a family, and every following
//! line declares one variant of it:
//!
//! ```text
//! -Expr-
//! Binary   : Expr left, Token operator, Expr right
//! Call     : Expr callee, Token paren, List<Expr> arguments
//! -Stmt-
//! If       : Expr condition, Stmt thenBranch, Stmt? elseBranch
//! ```
//!
//! Type references are kept exactly as written; deciding what a name
//! refers to is the generator's job.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{GenerateError, GrammarError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GrammarSpec {
    pub families: Vec<FamilyDef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyDef {
    pub name: String,
    pub variants: Vec<VariantDef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A scalar, a literal-value type or a family, e.g. `Token` or `Expr`.
    Named(String),
    /// One concrete variant of a family, written `Expr.Variable`.
    Variant { family: String, variant: String },
    /// `List<T>` or `Sequence<T>`.
    Sequence(Box<TypeRef>),
    /// `T?`
    Optional(Box<TypeRef>),
}

impl GrammarSpec {
    pub fn family(&self, name: &str) -> Option<&FamilyDef> {
        self.families.iter().find(|family| family.name == name)
    }
}

impl FamilyDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    pub fn variant(&self, name: &str) -> Option<&VariantDef> {
        self.variants.iter().find(|variant| variant.name == name)
    }
}

impl VariantDef {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

impl FieldDef {
    pub fn new(ty: TypeRef, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn sequence(inner: TypeRef) -> Self {
        Self::Sequence(Box::new(inner))
    }

    pub fn optional(inner: TypeRef) -> Self {
        Self::Optional(Box::new(inner))
    }

    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(inner) = text.strip_suffix('?') {
            return Self::parse(inner).map(Self::optional);
        }
        for prefix in ["List<", "Sequence<"] {
            if let Some(rest) = text.strip_prefix(prefix) {
                let inner = rest.strip_suffix('>')?;
                return Self::parse(inner).map(Self::sequence);
            }
        }
        if let Some((family, variant)) = text.split_once('.') {
            return (is_identifier(family) && is_identifier(variant)).then(|| Self::Variant {
                family: family.to_string(),
                variant: variant.to_string(),
            });
        }
        is_identifier(text).then(|| Self::named(text))
    }
}

/// Loads a grammar table.
///
/// The first malformed line aborts loading; nothing of a partially read
/// grammar is returned.
pub fn load(source: &str) -> Result<GrammarSpec, GrammarError> {
    let mut families: Vec<FamilyDef> = Vec::new();
    // the family being filled, and the line of its header
    let mut current: Option<(FamilyDef, usize)> = None;

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with("//") {
            continue;
        }

        if let Some(name) = family_header(text) {
            if !is_identifier(name) {
                return Err(GrammarError::MalformedLine {
                    line,
                    text: text.to_string(),
                });
            }
            if let Some((family, header)) = current.take() {
                families.push(finish_family(family, header)?);
            }
            if families.iter().any(|family| family.name == name) {
                return Err(GrammarError::DuplicateFamily {
                    line,
                    family: name.to_string(),
                });
            }
            current = Some((FamilyDef::new(name), line));
            continue;
        }

        let variant = parse_variant(text, line)?;
        let Some((family, _)) = current.as_mut() else {
            return Err(GrammarError::VariantOutsideFamily {
                line,
                variant: variant.name,
            });
        };
        if family.variant(&variant.name).is_some() {
            return Err(GrammarError::DuplicateVariant {
                line,
                family: family.name.clone(),
                variant: variant.name,
            });
        }
        family.variants.push(variant);
    }

    if let Some((family, header)) = current {
        families.push(finish_family(family, header)?);
    }
    Ok(GrammarSpec { families })
}

pub fn load_file(path: impl AsRef<Path>) -> crate::error::Result<GrammarSpec> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|err| GenerateError::io(path, err))?;
    Ok(load(&source)?)
}

impl FromStr for GrammarSpec {
    type Err = GrammarError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        load(source)
    }
}

fn family_header(text: &str) -> Option<&str> {
    if text.len() < 2 {
        return None;
    }
    text.strip_prefix('-')?.strip_suffix('-').map(str::trim)
}

fn finish_family(family: FamilyDef, header: usize) -> Result<FamilyDef, GrammarError> {
    if family.variants.is_empty() {
        return Err(GrammarError::EmptyFamily {
            line: header,
            family: family.name,
        });
    }
    Ok(family)
}

fn parse_variant(text: &str, line: usize) -> Result<VariantDef, GrammarError> {
    let malformed = || GrammarError::MalformedLine {
        line,
        text: text.to_string(),
    };
    let (name, field_list) = text.split_once(':').ok_or_else(malformed)?;
    let name = name.trim();
    if !is_identifier(name) {
        return Err(malformed());
    }

    let mut fields: Vec<FieldDef> = Vec::new();
    if !field_list.trim().is_empty() {
        for entry in field_list.split(',') {
            let field = parse_field(entry.trim(), line)?;
            if fields.iter().any(|existing| existing.name == field.name) {
                return Err(GrammarError::DuplicateField {
                    line,
                    variant: name.to_string(),
                    field: field.name,
                });
            }
            fields.push(field);
        }
    }
    Ok(VariantDef::new(name, fields))
}

fn parse_field(entry: &str, line: usize) -> Result<FieldDef, GrammarError> {
    let malformed = |reason| GrammarError::MalformedField {
        line,
        entry: entry.to_string(),
        reason,
    };
    let (ty, name) = entry
        .rsplit_once(char::is_whitespace)
        .ok_or_else(|| malformed("expected 'Type name'"))?;
    if !is_identifier(name) {
        return Err(malformed("invalid field name"));
    }
    let ty = TypeRef::parse(ty).ok_or_else(|| malformed("invalid type reference"))?;
    Ok(FieldDef::new(ty, name))
}

pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl fmt::Display for GrammarSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for family in &self.families {
            write!(f, "{family}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FamilyDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-{}-", self.name)?;
        for variant in &self.variants {
            writeln!(f, "{variant}")?;
        }
        Ok(())
    }
}

impl fmt::Display for VariantDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for (i, field) in self.fields.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{} {}", field.ty, field.name)?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Variant { family, variant } => write!(f, "{family}.{variant}"),
            Self::Sequence(inner) => write!(f, "List<{inner}>"),
            Self::Optional(inner) => write!(f, "{inner}?"),
        }
    }
}
