use crate::ident::QualifiedIdent;
use aurum_diagnostics::SourceRange;

/// Builtin type names the lexer/parser recognize directly; every other type
/// reference goes through `Type::Named`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTypeId {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    R32,
    R64,
    R128,
    Bool,
    Void,
}

impl BuiltinTypeId {
    /// Matches the keyword spelling a parser would have consumed.
    pub fn from_keyword(kw: &str) -> Option<Self> {
        Some(match kw {
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "r32" => Self::R32,
            "r64" => Self::R64,
            "r128" => Self::R128,
            "bool" => Self::Bool,
            "void" => Self::Void,
            _ => return None,
        })
    }

    pub fn is_unsigned(self) -> bool {
        matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64)
    }
}

/// A single specifier in a composed type's syntactic chain, e.g. the `*` in
/// `Node*` or the `const` in `const i32`. Order matters: specifiers apply
/// left to right onto the root type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    Pointer,
    LValueRef,
    RValueRef,
    Const,
    Volatile,
    Restrict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specifier {
    pub kind: SpecifierKind,
    pub range: SourceRange,
}

impl Specifier {
    pub fn new(kind: SpecifierKind, range: SourceRange) -> Self {
        Self { kind, range }
    }
}

/// A type as written in source, before any resolution. Phase-0 walks this
/// shape and produces a `QualType` (or defers via `Dependency`).
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Builtin {
        id: BuiltinTypeId,
        range: SourceRange,
    },
    /// A possibly-qualified user-defined name: `A`, `A::C`.
    Named(QualifiedIdent),
    /// A root type followed by a left-to-right chain of specifiers.
    Composed {
        root: Box<Type>,
        specifiers: Vec<Specifier>,
    },
    Array {
        element: Box<Type>,
        size: Option<u64>,
        range: SourceRange,
    },
    Tuple {
        elements: Vec<Type>,
        range: SourceRange,
    },
    /// CST shape kept for input-contract completeness; Phase-0 rejects this
    /// with `SemaError::Unsupported`.
    Templated {
        base: QualifiedIdent,
        args: Vec<Type>,
        range: SourceRange,
    },
}

impl Type {
    pub fn range(&self) -> SourceRange {
        match self {
            Type::Builtin { range, .. } => *range,
            Type::Named(ident) => ident.range(),
            Type::Composed { root, specifiers } => match specifiers.last() {
                Some(last) => root.range().join(&last.range),
                None => root.range(),
            },
            Type::Array { range, .. } => *range,
            Type::Tuple { range, .. } => *range,
            Type::Templated { range, .. } => *range,
        }
    }
}
