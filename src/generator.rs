//! Turns a [`GrammarSpec`] into Rust source, one unit per family.
//!
//! Each unit holds the family enum, its `Visit` trait and one struct per
//! variant. Everything is rendered in memory first; [`publish`] only
//! touches the filesystem once every unit rendered cleanly.
//!
//! Units are written as child modules: they `use super::{...}` for
//! `Token`, `Value`, the other families and the modules of those
//! families, so the parent module has to bring all of them into scope.

use std::collections::BTreeSet;
use std::fmt::{self, Write as _};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::error::{GenerateError, Result};
use crate::grammar::{FamilyDef, GrammarSpec, TypeRef, VariantDef};

/// Grammar scalar name, Rust type, and whether the parent module provides it.
const SCALARS: &[(&str, &str, bool)] = &[
    ("Token", "Token", true),
    ("Value", "Value", true),
    ("Object", "Value", true),
    ("String", "String", false),
    ("Number", "f64", false),
    ("Boolean", "bool", false),
];

/// Names a variant may not take because the generated module already uses them.
const TAKEN_TYPE_NAMES: &[(&str, &str)] = &[
    ("Visit", "dispatch trait"),
    ("R", "dispatch type parameter"),
    ("From", "conversion trait"),
    ("Box", "prelude type"),
    ("Vec", "prelude type"),
    ("Option", "prelude type"),
    ("String", "prelude type"),
];

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Keywords that cannot even be written as raw identifiers.
const UNESCAPABLE: &[&str] = &["_", "crate", "self", "Self", "super"];

/// The rendered source of one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub family: String,
    pub file_name: String,
    pub source: String,
}

/// Renders every family of `spec`.
///
/// Fails on the first family that cannot be rendered, before anything is
/// returned, so callers never see a partial set of units.
pub fn generate(spec: &GrammarSpec, config: &GeneratorConfig) -> Result<Vec<GeneratedUnit>> {
    let mut modules: Vec<String> = Vec::with_capacity(spec.families.len());
    let mut units = Vec::with_capacity(spec.families.len());
    for family in &spec.families {
        let file_stem = snake_case(&family.name);
        if modules.contains(&file_stem) {
            return Err(GenerateError::NameCollision {
                family: family.name.clone(),
                name: file_stem,
                kind: "module of another family",
            });
        }
        units.push(GeneratedUnit {
            family: family.name.clone(),
            file_name: format!("{file_stem}.rs"),
            source: render_family(spec, family, config)?,
        });
        modules.push(file_stem);
    }
    Ok(units)
}

pub fn render_family(spec: &GrammarSpec, family: &FamilyDef, config: &GeneratorConfig) -> Result<String> {
    let mut source = String::new();
    emit_family(&mut source, spec, family, config)?;
    Ok(source)
}

/// Writes the module for `family` into `out`.
///
/// The family is validated completely before the first byte is written.
pub fn emit_family<W>(out: &mut W, spec: &GrammarSpec, family: &FamilyDef, config: &GeneratorConfig) -> Result<()>
where
    W: fmt::Write + ?Sized,
{
    let plan = FamilyPlan::new(spec, family, config)?;
    plan.write(out, config)?;
    Ok(())
}

/// Atomically writes `units` into `dir` as `<dir>/<file_name>`.
///
/// Every unit is first staged in a temporary file inside `dir`; the staged
/// files are renamed into place only once all of them were written and
/// flushed. Staged files are removed when staging fails. The directory
/// must already exist. Units are named `<family_snake>.rs` (`TypeExpr`
/// lands in `type_expr.rs`) so that they can be declared as modules.
pub fn publish(units: &[GeneratedUnit], dir: &Path) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(dir).map_err(|err| GenerateError::io(dir, err))?;
    if !metadata.is_dir() {
        return Err(GenerateError::io(
            dir,
            io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    let mut staged = Vec::with_capacity(units.len());
    for unit in units {
        let target = dir.join(&unit.file_name);
        let mut file = tempfile::Builder::new()
            .prefix(".loxgen-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|err| GenerateError::io(&target, err))?;
        file.write_all(unit.source.as_bytes())
            .and_then(|()| file.as_file().sync_all())
            .map_err(|err| GenerateError::io(&target, err))?;
        staged.push((file, target));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (file, target) in staged {
        file.persist(&target)
            .map_err(|err| GenerateError::io(&target, err.error))?;
        written.push(target);
    }
    Ok(written)
}

/// `thenBranch` -> `then_branch`, `HTTPRequest` -> `http_request`.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut snake = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_uppercase() {
            snake.push(c);
            continue;
        }
        let boundary = match i.checked_sub(1).map(|prev| chars[prev]) {
            Some(prev) if prev.is_ascii_lowercase() || prev.is_ascii_digit() => true,
            Some(prev) if prev.is_ascii_uppercase() => {
                chars.get(i + 1).is_some_and(|next| next.is_ascii_lowercase())
            }
            _ => false,
        };
        if boundary {
            snake.push('_');
        }
        snake.push(c.to_ascii_lowercase());
    }
    snake
}

/// `visit_<variant>_<family>`, e.g. `visit_binary_expr`.
pub fn visit_method(family: &str, variant: &str) -> String {
    format!("visit_{}_{}", snake_case(variant), snake_case(family))
}

/// The identifier as Rust source, or `None` when no spelling of it is legal.
fn rust_ident(name: &str) -> Option<String> {
    if UNESCAPABLE.contains(&name) {
        None
    } else if KEYWORDS.contains(&name) {
        Some(format!("r#{name}"))
    } else {
        Some(name.to_string())
    }
}

/// How a constructor argument becomes the stored field.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Conversion {
    Move,
    Boxed,
    OptionMap(Box<Conversion>),
}

impl Conversion {
    fn apply(&self, value: &str) -> String {
        match self {
            Conversion::Move => value.to_string(),
            Conversion::Boxed => format!("Box::new({value})"),
            Conversion::OptionMap(inner) if **inner == Conversion::Boxed => {
                format!("{value}.map(Box::new)")
            }
            Conversion::OptionMap(inner) => {
                format!("{value}.map(|inner| {})", inner.apply("inner"))
            }
        }
    }
}

#[derive(Debug, Clone)]
struct FieldType {
    /// Type stored in the struct.
    stored: String,
    /// Type taken by the constructor.
    param: String,
    conversion: Conversion,
}

impl FieldType {
    fn plain(ty: impl Into<String>) -> Self {
        let ty = ty.into();
        Self {
            stored: ty.clone(),
            param: ty,
            conversion: Conversion::Move,
        }
    }

    fn boxed(ty: String) -> Self {
        Self {
            stored: format!("Box<{ty}>"),
            param: ty,
            conversion: Conversion::Boxed,
        }
    }
}

struct FieldPlan {
    name: String,
    ty: FieldType,
}

struct VariantPlan<'a> {
    name: &'a str,
    visit: String,
    fields: Vec<FieldPlan>,
}

struct FamilyPlan<'a> {
    family: &'a FamilyDef,
    /// Parameter name in `Visit` methods.
    param: String,
    imports: BTreeSet<String>,
    variants: Vec<VariantPlan<'a>>,
}

impl<'a> FamilyPlan<'a> {
    fn new(spec: &'a GrammarSpec, family: &'a FamilyDef, config: &GeneratorConfig) -> Result<Self> {
        let param = family_module(&family.name)?;
        check_type_name(&family.name, &family.name)?;
        check_taken_name(&family.name, &family.name)?;

        let mut plan = FamilyPlan {
            family,
            param,
            imports: BTreeSet::new(),
            variants: Vec::with_capacity(family.variants.len()),
        };
        for variant in &family.variants {
            check_variant_name(spec, family, variant)?;
            let fields = plan.plan_fields(spec, variant, config)?;
            plan.variants.push(VariantPlan {
                name: &variant.name,
                visit: visit_method(&family.name, &variant.name),
                fields,
            });
        }
        Ok(plan)
    }

    fn plan_fields(
        &mut self,
        spec: &GrammarSpec,
        variant: &VariantDef,
        config: &GeneratorConfig,
    ) -> Result<Vec<FieldPlan>> {
        let family = self.family;
        let mut fields: Vec<FieldPlan> = Vec::with_capacity(variant.fields.len());
        for field in &variant.fields {
            let snake = snake_case(&field.name);
            let name = rust_ident(&snake).ok_or_else(|| GenerateError::ReservedName {
                location: format!("{}.{}", family.name, variant.name),
                name: field.name.clone(),
            })?;
            if fields.iter().any(|existing| existing.name == name) {
                return Err(GenerateError::FieldCollision {
                    family: family.name.clone(),
                    variant: variant.name.clone(),
                    field: field.name.clone(),
                });
            }
            let site = Site {
                family: &family.name,
                variant: &variant.name,
                field: &field.name,
            };
            let ty = self.field_type(spec, &field.ty, &site, config)?;
            fields.push(FieldPlan { name, ty });
        }
        Ok(fields)
    }

    fn field_type(
        &mut self,
        spec: &GrammarSpec,
        ty: &TypeRef,
        site: &Site<'_>,
        config: &GeneratorConfig,
    ) -> Result<FieldType> {
        match ty {
            TypeRef::Named(name) => {
                if spec.family(name).is_some() {
                    if name != &self.family.name {
                        self.imports.insert(name.clone());
                    }
                    return Ok(FieldType::boxed(name.clone()));
                }
                if let Some(&(_, rust, imported)) = SCALARS.iter().find(|&&(grammar, ..)| grammar == name.as_str()) {
                    if imported {
                        self.imports.insert(rust.to_string());
                    }
                    return Ok(FieldType::plain(rust));
                }
                if config.allow_opaque_types {
                    if self.family.variant(name).is_some() {
                        return Err(GenerateError::NameCollision {
                            family: self.family.name.clone(),
                            name: name.clone(),
                            kind: "opaque type",
                        });
                    }
                    self.imports.insert(name.clone());
                    return Ok(FieldType::plain(name.clone()));
                }
                Err(site.unknown(name))
            }
            TypeRef::Variant { family, variant } => {
                let target = spec
                    .family(family)
                    .ok_or_else(|| site.unknown(&format!("{family}.{variant}")))?;
                if target.variant(variant).is_none() {
                    return Err(GenerateError::UnknownVariant {
                        family: site.family.to_string(),
                        variant: site.variant.to_string(),
                        target: family.clone(),
                        missing: variant.clone(),
                    });
                }
                if target.name == self.family.name {
                    return Ok(FieldType::boxed(variant.clone()));
                }
                let module = family_module(family)?;
                let path = format!("{module}::{variant}");
                self.imports.insert(module);
                Ok(FieldType::boxed(path))
            }
            TypeRef::Sequence(inner) => {
                let inner = self.field_type(spec, inner, site, config)?;
                Ok(FieldType::plain(format!("Vec<{}>", inner.param)))
            }
            TypeRef::Optional(inner) => {
                let inner = self.field_type(spec, inner, site, config)?;
                let conversion = match inner.conversion {
                    Conversion::Move => Conversion::Move,
                    other => Conversion::OptionMap(Box::new(other)),
                };
                Ok(FieldType {
                    stored: format!("Option<{}>", inner.stored),
                    param: format!("Option<{}>", inner.param),
                    conversion,
                })
            }
        }
    }

    fn write<W>(&self, out: &mut W, config: &GeneratorConfig) -> fmt::Result
    where
        W: fmt::Write + ?Sized,
    {
        let family = &self.family.name;
        let derive = config.derive_attribute();

        writeln!(out, "// @generated by generate_ast from the `{family}` family.")?;
        writeln!(out, "// Regenerate from the grammar instead of editing this file.")?;
        let imports: Vec<&str> = self.imports.iter().map(String::as_str).collect();
        match imports.as_slice() {
            [] => {}
            [single] => {
                writeln!(out)?;
                writeln!(out, "use super::{single};")?;
            }
            many => {
                writeln!(out)?;
                writeln!(out, "use super::{{{}}};", many.join(", "))?;
            }
        }

        // the closed variant set
        writeln!(out)?;
        if let Some(derive) = &derive {
            writeln!(out, "{derive}")?;
        }
        writeln!(out, "pub enum {family} {{")?;
        for variant in &self.variants {
            writeln!(out, "    {0}({0}),", variant.name)?;
        }
        writeln!(out, "}}")?;

        writeln!(out)?;
        writeln!(out, "impl {family} {{")?;
        writeln!(out, "    pub fn accept<R>(&self, visitor: &mut dyn Visit<R>) -> R {{")?;
        writeln!(out, "        match self {{")?;
        for variant in &self.variants {
            writeln!(
                out,
                "            Self::{}(node) => visitor.{}(node),",
                variant.name, variant.visit
            )?;
        }
        writeln!(out, "        }}")?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;

        // the dispatch protocol
        writeln!(out)?;
        writeln!(out, "pub trait Visit<R> {{")?;
        for variant in &self.variants {
            writeln!(
                out,
                "    fn {}(&mut self, {}: &{}) -> R;",
                variant.visit, self.param, variant.name
            )?;
        }
        writeln!(out, "}}")?;

        for variant in &self.variants {
            self.write_variant(out, variant, derive.as_deref())?;
        }
        Ok(())
    }

    fn write_variant<W>(&self, out: &mut W, variant: &VariantPlan<'_>, derive: Option<&str>) -> fmt::Result
    where
        W: fmt::Write + ?Sized,
    {
        let family = &self.family.name;
        let name = variant.name;

        writeln!(out)?;
        if let Some(derive) = derive {
            writeln!(out, "{derive}")?;
        }
        if variant.fields.is_empty() {
            writeln!(out, "pub struct {name} {{}}")?;
        } else {
            writeln!(out, "pub struct {name} {{")?;
            for field in &variant.fields {
                writeln!(out, "    pub {}: {},", field.name, field.ty.stored)?;
            }
            writeln!(out, "}}")?;
        }

        let params: Vec<String> = variant
            .fields
            .iter()
            .map(|field| format!("{}: {}", field.name, field.ty.param))
            .collect();
        writeln!(out)?;
        writeln!(out, "impl {name} {{")?;
        writeln!(out, "    pub fn new({}) -> Self {{", params.join(", "))?;
        if variant.fields.is_empty() {
            writeln!(out, "        Self {{}}")?;
        } else {
            writeln!(out, "        Self {{")?;
            for field in &variant.fields {
                match field.ty.conversion {
                    Conversion::Move => writeln!(out, "            {},", field.name)?,
                    ref conversion => writeln!(
                        out,
                        "            {}: {},",
                        field.name,
                        conversion.apply(&field.name)
                    )?,
                }
            }
            writeln!(out, "        }}")?;
        }
        writeln!(out, "    }}")?;
        writeln!(out)?;
        writeln!(out, "    pub fn accept<R>(&self, visitor: &mut dyn Visit<R>) -> R {{")?;
        writeln!(out, "        visitor.{}(self)", variant.visit)?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;

        writeln!(out)?;
        writeln!(out, "impl From<{name}> for {family} {{")?;
        writeln!(out, "    fn from(node: {name}) -> Self {{")?;
        writeln!(out, "        Self::{name}(node)")?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
        Ok(())
    }
}

/// Where a type reference appears, for error reporting.
struct Site<'a> {
    family: &'a str,
    variant: &'a str,
    field: &'a str,
}

impl Site<'_> {
    fn unknown(&self, reference: &str) -> GenerateError {
        GenerateError::UnknownTypeReference {
            family: self.family.to_string(),
            variant: self.variant.to_string(),
            field: self.field.to_string(),
            reference: reference.to_string(),
        }
    }
}

/// The module (and `Visit` parameter) name of a family.
fn family_module(family: &str) -> Result<String> {
    rust_ident(&snake_case(family)).ok_or_else(|| GenerateError::ReservedName {
        location: family.to_string(),
        name: family.to_string(),
    })
}

fn check_type_name(location: &str, name: &str) -> Result<()> {
    if KEYWORDS.contains(&name) || UNESCAPABLE.contains(&name) {
        return Err(GenerateError::ReservedName {
            location: location.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

fn check_variant_name(spec: &GrammarSpec, family: &FamilyDef, variant: &VariantDef) -> Result<()> {
    check_type_name(&format!("{}.{}", family.name, variant.name), &variant.name)?;

    if spec.family(&variant.name).is_some() {
        return Err(GenerateError::NameCollision {
            family: family.name.clone(),
            name: variant.name.clone(),
            kind: "family",
        });
    }
    check_taken_name(&family.name, &variant.name)
}

/// Rejects names the generated module already binds: imported scalars, the
/// dispatch trait and its type parameter, and prelude items it relies on.
fn check_taken_name(family: &str, name: &str) -> Result<()> {
    let collision = |kind| {
        Err(GenerateError::NameCollision {
            family: family.to_string(),
            name: name.to_string(),
            kind,
        })
    };
    if SCALARS.iter().any(|&(_, rust, imported)| imported && rust == name) {
        return collision("scalar type");
    }
    if let Some(&(_, kind)) = TAKEN_TYPE_NAMES.iter().find(|(taken, _)| *taken == name) {
        return collision(kind);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;
    use rstest::rstest;

    fn render(source: &str) -> String {
        let spec = grammar::load(source).unwrap();
        let units = generate(&spec, &GeneratorConfig::default()).unwrap();
        units.into_iter().map(|unit| unit.source).collect()
    }

    fn generate_err(source: &str) -> GenerateError {
        let spec = grammar::load(source).unwrap();
        generate(&spec, &GeneratorConfig::default()).unwrap_err()
    }

    #[test]
    fn test_single_literal_family() {
        let expected = "\
// @generated by generate_ast from the `Expr` family.
// Regenerate from the grammar instead of editing this file.

use super::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(Literal),
}

impl Expr {
    pub fn accept<R>(&self, visitor: &mut dyn Visit<R>) -> R {
        match self {
            Self::Literal(node) => visitor.visit_literal_expr(node),
        }
    }
}

pub trait Visit<R> {
    fn visit_literal_expr(&mut self, expr: &Literal) -> R;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub value: Value,
}

impl Literal {
    pub fn new(value: Value) -> Self {
        Self {
            value,
        }
    }

    pub fn accept<R>(&self, visitor: &mut dyn Visit<R>) -> R {
        visitor.visit_literal_expr(self)
    }
}

impl From<Literal> for Expr {
    fn from(node: Literal) -> Self {
        Self::Literal(node)
    }
}
";
        assert_eq!(render("-Expr-\nLiteral: Value value"), expected);
    }

    #[test]
    fn test_recursive_fields_are_boxed() {
        let source = render("-Stmt-\nIf: Expr condition, Stmt thenBranch, Stmt? elseBranch\n-Expr-\nThis: Token keyword");
        assert!(source.contains("    pub condition: Box<Expr>,\n"));
        assert!(source.contains("    pub then_branch: Box<Stmt>,\n"));
        assert!(source.contains("    pub else_branch: Option<Box<Stmt>>,\n"));
        assert!(source.contains(
            "    pub fn new(condition: Expr, then_branch: Stmt, else_branch: Option<Stmt>) -> Self {\n"
        ));
        assert!(source.contains("            condition: Box::new(condition),\n"));
        assert!(source.contains("            else_branch: else_branch.map(Box::new),\n"));
    }

    #[test]
    fn test_sequences_hold_unboxed_members() {
        let source = render(
            "-Expr-\nVariable: Token name\n-Stmt-\nFunction: Token name, List<Token> params, List<Stmt> body\nClass: Token name, Expr.Variable? superclass, List<Stmt.Function> methods",
        );
        assert!(source.contains("use super::Token;\n"));
        assert!(source.contains("use super::{Token, expr};\n"));
        assert!(source.contains("    pub body: Vec<Stmt>,\n"));
        assert!(source.contains("    pub superclass: Option<Box<expr::Variable>>,\n"));
        assert!(source.contains("    pub methods: Vec<Function>,\n"));
        assert!(source.contains("            superclass: superclass.map(Box::new),\n"));
        assert!(source.contains("            methods,\n"));
    }

    #[test]
    fn test_fieldless_variant() {
        let source = render("-Expr-\nNil:");
        assert!(source.contains("pub struct Nil {}\n"));
        assert!(source.contains("    pub fn new() -> Self {\n        Self {}\n    }\n"));
        assert!(!source.contains("use super::"));
    }

    #[test]
    fn test_keyword_fields_are_escaped() {
        let source = render("-Expr-\nCast: Token type, Expr value");
        assert!(source.contains("    pub r#type: Token,\n"));
        assert!(source.contains("    pub fn new(r#type: Token, value: Expr) -> Self {\n"));
    }

    #[test]
    fn test_nested_optional_conversion() {
        let source = render("-Expr-\nMaybe: Expr?? inner");
        assert!(source.contains("    pub inner: Option<Option<Box<Expr>>>,\n"));
        assert!(source.contains("            inner: inner.map(|inner| inner.map(Box::new)),\n"));
    }

    #[test]
    fn test_opaque_types_when_allowed() {
        let spec = grammar::load("-Expr-\nLiteral: Mystery value").unwrap();
        let config = GeneratorConfig::default().allow_opaque_types(true);
        let units = generate(&spec, &config).unwrap();
        assert!(units[0].source.contains("    pub value: Mystery,\n"));
        assert!(units[0].source.contains("\nuse super::Mystery;\n"));

        let spec = grammar::load("-Expr-\nNative: Callable function, Token name").unwrap();
        let units = generate(&spec, &config).unwrap();
        assert!(units[0].source.contains("\nuse super::{Callable, Token};\n"));
    }

    #[test]
    fn test_opaque_type_named_like_a_variant() {
        let spec = grammar::load("-Expr-\nNative: Callable function\nCallable: Token name").unwrap();
        let config = GeneratorConfig::default().allow_opaque_types(true);
        let err = generate(&spec, &config).unwrap_err();
        assert!(err.to_string().contains("collides with the opaque type"), "{err}");
    }

    #[test]
    fn test_custom_derives() {
        let spec = grammar::load("-Expr-\nThis: Token keyword").unwrap();
        let config = GeneratorConfig::default().derives(["Debug"]);
        let units = generate(&spec, &config).unwrap();
        assert!(units[0].source.contains("#[derive(Debug)]\npub enum Expr {"));
        assert!(units[0].source.contains("#[derive(Debug)]\npub struct This {"));
    }

    #[test]
    fn test_unit_file_names() {
        let spec = grammar::load("-Expr-\nThis: Token keyword\n-TypeExpr-\nName: Token name").unwrap();
        let units = generate(&spec, &GeneratorConfig::default()).unwrap();
        let names: Vec<_> = units.iter().map(|unit| unit.file_name.as_str()).collect();
        assert_eq!(names, ["expr.rs", "type_expr.rs"]);
    }

    #[rstest]
    #[case::unknown("-Expr-\nLiteral: Mystery value", "unknown type reference 'Mystery'")]
    #[case::unknown_family_variant("-Expr-\nGet: Obj.Field value", "unknown type reference 'Obj.Field'")]
    #[case::missing_variant("-Expr-\nThis: Token keyword\n-Stmt-\nClass: Expr.Variable superclass", "has no variant 'Variable'")]
    #[case::variant_is_family("-Expr-\nStmt: Token keyword\n-Stmt-\nPrint: Expr expression", "collides with the family")]
    #[case::variant_is_scalar("-Expr-\nToken: Token keyword", "collides with the scalar type")]
    #[case::variant_is_trait("-Expr-\nVisit: Token keyword", "collides with the dispatch trait")]
    #[case::variant_is_type_parameter("-Expr-\nR: Token keyword", "collides with the dispatch type parameter")]
    #[case::variant_is_from("-Expr-\nFrom: Token keyword", "collides with the conversion trait")]
    #[case::family_is_trait("-Visit-\nCall: Token keyword", "collides with the dispatch trait")]
    #[case::family_is_scalar("-Token-\nCall: Token keyword", "collides with the scalar type")]
    #[case::family_is_prelude("-Box-\nCall: Token keyword", "collides with the prelude type")]
    #[case::variant_is_prelude("-Expr-\nOption: Token keyword", "collides with the prelude type")]
    #[case::family_is_keyword("-Super-\nCall: Token keyword", "'Super' cannot be used")]
    #[case::field_is_self("-Expr-\nGet: Expr self", "'self' cannot be used")]
    #[case::snake_collision("-Expr-\nGet: Token fooBar, Token foo_bar", "maps onto the same Rust name")]
    #[case::module_collision("-Expr-\nThis: Token keyword\n-EXPR-\nName: Token name", "module of another family")]
    fn test_generate_errors(#[case] source: &str, #[case] message: &str) {
        let err = generate_err(source);
        assert!(err.is_specification_error());
        assert!(
            err.to_string().contains(message),
            "'{err}' does not mention '{message}'"
        );
    }

    #[rstest]
    #[case("thenBranch", "then_branch")]
    #[case("Expr", "expr")]
    #[case("TypeExpr", "type_expr")]
    #[case("HTTPRequest", "http_request")]
    #[case("param2Name", "param2_name")]
    #[case("already_snake", "already_snake")]
    fn test_snake_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(snake_case(input), expected);
    }

    #[test]
    fn test_visit_method() {
        assert_eq!(visit_method("Stmt", "Expression"), "visit_expression_stmt");
        assert_eq!(visit_method("Expr", "Binary"), "visit_binary_expr");
    }

    #[test]
    fn test_publish_writes_every_unit() {
        let dir = tempfile::tempdir().unwrap();
        let units = vec![
            GeneratedUnit {
                family: "Expr".into(),
                file_name: "expr.rs".into(),
                source: "// expr\n".into(),
            },
            GeneratedUnit {
                family: "Stmt".into(),
                file_name: "stmt.rs".into(),
                source: "// stmt\n".into(),
            },
        ];
        let written = publish(&units, dir.path()).unwrap();
        assert_eq!(written, [dir.path().join("expr.rs"), dir.path().join("stmt.rs")]);
        assert_eq!(std::fs::read_to_string(&written[1]).unwrap(), "// stmt\n");

        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|entry| {
                entry.as_ref().unwrap().file_name().to_string_lossy().ends_with(".tmp")
            })
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_publish_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = publish(&[], &missing).unwrap_err();
        assert!(matches!(err, GenerateError::Io { .. }));
        assert!(!missing.exists());
    }
}
