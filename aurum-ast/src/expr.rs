use crate::ids::DeclId;
use crate::types::QualType;
pub use aurum_cst::{BinaryOp, CastKind, UnaryOp};

/// Whether a typed expression denotes an addressable location or a
/// temporary (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCategory {
    LValue,
    RValue,
}

/// One atomic conversion in a cast chain (§4.6). Implicit chains only ever
/// contain the "implicit" and "either" steps; explicit `static` casts may
/// additionally contain the explicit-only steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastStep {
    IntPromote,
    UIntPromote,
    FloatPromote,
    LValueToRValue,
    AdjustQual,
    NullToPointer,
    IntDowngrade,
    UIntDowngrade,
    FloatDowngrade,
    SignedToUnsigned,
    UnsignedToSigned,
    IntToFloat,
    FloatToInt,
    AdjustPointerQual,
    AdjustRefQual,
}

/// A fully typed expression, the Phase-1 output for a function body. Every
/// node carries its resolved `QualType` and `ValueCategory`.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedExpr {
    IntLiteral {
        value: i64,
        ty: QualType,
    },
    UIntLiteral {
        value: u64,
        ty: QualType,
    },
    FloatLiteral {
        value: f64,
        ty: QualType,
    },
    BoolLiteral {
        value: bool,
        ty: QualType,
    },
    CharLiteral {
        value: char,
        ty: QualType,
    },
    StringLiteral {
        value: String,
        ty: QualType,
    },
    NullLiteral {
        ty: QualType,
    },
    /// Resolved to a variable declaration; category is always `LValue`.
    IdRef {
        decl: DeclId,
        ty: QualType,
    },
    Paren {
        inner: Box<TypedExpr>,
        ty: QualType,
        category: ValueCategory,
    },
    Unary {
        op: UnaryOp,
        operand: Box<TypedExpr>,
        ty: QualType,
        category: ValueCategory,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<TypedExpr>,
        rhs: Box<TypedExpr>,
        ty: QualType,
    },
    Assign {
        lhs: Box<TypedExpr>,
        rhs: Box<TypedExpr>,
        ty: QualType,
    },
    Cond {
        cond: Box<TypedExpr>,
        then_branch: Box<TypedExpr>,
        else_branch: Box<TypedExpr>,
        ty: QualType,
        category: ValueCategory,
    },
    /// An implicit or explicit cast: the operand plus the chain of steps
    /// applied to reach `ty`. Non-static explicit casts (`const`, `bit`)
    /// carry an empty chain — a single-step reinterpretation.
    Cast {
        kind: CastKind,
        steps: Vec<CastStep>,
        operand: Box<TypedExpr>,
        ty: QualType,
    },
}

impl TypedExpr {
    pub fn ty(&self) -> QualType {
        match self {
            TypedExpr::IntLiteral { ty, .. }
            | TypedExpr::UIntLiteral { ty, .. }
            | TypedExpr::FloatLiteral { ty, .. }
            | TypedExpr::BoolLiteral { ty, .. }
            | TypedExpr::CharLiteral { ty, .. }
            | TypedExpr::StringLiteral { ty, .. }
            | TypedExpr::NullLiteral { ty, .. }
            | TypedExpr::IdRef { ty, .. }
            | TypedExpr::Paren { ty, .. }
            | TypedExpr::Unary { ty, .. }
            | TypedExpr::Binary { ty, .. }
            | TypedExpr::Assign { ty, .. }
            | TypedExpr::Cond { ty, .. }
            | TypedExpr::Cast { ty, .. } => *ty,
        }
    }

    pub fn category(&self) -> ValueCategory {
        match self {
            TypedExpr::IdRef { .. } => ValueCategory::LValue,
            TypedExpr::Paren { category, .. }
            | TypedExpr::Unary { category, .. }
            | TypedExpr::Cond { category, .. } => *category,
            _ => ValueCategory::RValue,
        }
    }
}
