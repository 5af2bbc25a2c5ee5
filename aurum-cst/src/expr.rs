use crate::ident::QualifiedIdent;
use crate::ty::Type;
use aurum_diagnostics::SourceRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
    AddrOf,
    Deref,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

/// Explicit cast forms the parser can produce. `Static` carries a target
/// type and is subject to the full implicit-conversion chain in Phase-1;
/// `Const` and `Bit` are narrower reinterpretations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    Static,
    Const,
    Bit,
}

/// An expression as written in source. Phase-1 assigns every node a
/// `(QualType, ValueCategory)` pair; this shape carries none of that itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    IntLiteral {
        value: i64,
        range: SourceRange,
    },
    /// Kept distinct from `IntLiteral` from the start — see REDESIGN FLAGS:
    /// the reference implementation misrouted these through a
    /// floating-point literal node.
    UIntLiteral {
        value: u64,
        range: SourceRange,
    },
    FloatLiteral {
        value: f64,
        width: FloatWidth,
        range: SourceRange,
    },
    BoolLiteral {
        value: bool,
        range: SourceRange,
    },
    CharLiteral {
        value: char,
        range: SourceRange,
    },
    StringLiteral {
        value: String,
        range: SourceRange,
    },
    NullLiteral {
        range: SourceRange,
    },
    IdRef(QualifiedIdent),
    Paren {
        inner: Box<Expression>,
        range: SourceRange,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        range: SourceRange,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
        range: SourceRange,
    },
    Assign {
        lhs: Box<Expression>,
        rhs: Box<Expression>,
        range: SourceRange,
    },
    Cond {
        cond: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
        range: SourceRange,
    },
    Cast {
        kind: CastKind,
        target: Type,
        operand: Box<Expression>,
        range: SourceRange,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    R32,
    R64,
    R128,
}

impl Expression {
    pub fn range(&self) -> SourceRange {
        match self {
            Expression::IntLiteral { range, .. }
            | Expression::UIntLiteral { range, .. }
            | Expression::FloatLiteral { range, .. }
            | Expression::BoolLiteral { range, .. }
            | Expression::CharLiteral { range, .. }
            | Expression::StringLiteral { range, .. }
            | Expression::NullLiteral { range }
            | Expression::Paren { range, .. }
            | Expression::Unary { range, .. }
            | Expression::Binary { range, .. }
            | Expression::Assign { range, .. }
            | Expression::Cond { range, .. }
            | Expression::Cast { range, .. } => *range,
            Expression::IdRef(ident) => ident.range(),
        }
    }
}
