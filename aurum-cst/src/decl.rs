use crate::expr::Expression;
use crate::ident::QualifiedIdent;
use crate::stmt::Block;
use crate::ty::Type;
use aurum_diagnostics::SourceRange;
use bitflags::bitflags;

bitflags! {
    /// Syntactic qualifiers written directly on a variable declaration's
    /// spec (`const def a : i32;`), distinct from qualifiers carried on the
    /// declared *type* itself.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DeclSpec: u8 {
        const CONST  = 0b0001;
        const STATIC = 0b0010;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportKind {
    Named,
    Namespace { alias: String },
    Module,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub kind: ImportKind,
    pub items: Vec<String>,
    pub module: String,
    pub range: SourceRange,
}

/// Top-level declaration an `aurum_cst::File` holds, mirroring §4.4's
/// per-kind handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Class(ClassDecl),
    Adt(AdtDecl),
    Enum(EnumDecl),
    Using(UsingDecl),
    Var(VarDecl),
    Func(FuncDecl),
    Forward(ForwardDecl),
    Templated(TemplatedDecl),
}

impl Item {
    pub fn range(&self) -> SourceRange {
        match self {
            Item::Class(d) => d.range,
            Item::Adt(d) => d.range,
            Item::Enum(d) => d.range,
            Item::Using(d) => d.range,
            Item::Var(d) => d.range,
            Item::Func(d) => d.range,
            Item::Forward(d) => d.range,
            Item::Templated(d) => d.range,
        }
    }
}

/// The whole-program CST root a parser hands to Phase-0.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub imports: Vec<Import>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub name_range: SourceRange,
    pub members: Vec<Item>,
    pub range: SourceRange,
}

/// One `class`/`struct`-like variant of an algebraic data type, e.g. the
/// `Some(T)` in a `Some`/`None` ADT.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCtorDecl {
    pub name: String,
    pub name_range: SourceRange,
    pub underlying: Type,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdtDecl {
    pub name: String,
    pub name_range: SourceRange,
    pub constructors: Vec<ValueCtorDecl>,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumeratorDecl {
    pub name: String,
    pub name_range: SourceRange,
    /// Explicit `= N` initializer; absent means "previous + 1".
    pub init: Option<Expression>,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub name_range: SourceRange,
    pub enumerators: Vec<EnumeratorDecl>,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsingDecl {
    pub name: String,
    pub name_range: SourceRange,
    pub aliasee: Type,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub spec: DeclSpec,
    pub name: String,
    pub name_range: SourceRange,
    pub declared_type: Type,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: String,
    pub name_range: SourceRange,
    pub declared_type: Type,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub name_range: SourceRange,
    pub params: Vec<ParamDecl>,
    pub return_type: Type,
    pub body: Option<Block>,
    pub range: SourceRange,
}

/// CST shape kept for input-contract completeness (§4.4); Phase-0 rejects
/// this with `SemaError::Unsupported`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardDecl {
    pub name: QualifiedIdent,
    pub range: SourceRange,
}

/// CST shape kept for input-contract completeness (§4.4); Phase-0 rejects
/// this with `SemaError::Unsupported`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatedDecl {
    pub name: String,
    pub name_range: SourceRange,
    pub type_params: Vec<String>,
    pub range: SourceRange,
}
