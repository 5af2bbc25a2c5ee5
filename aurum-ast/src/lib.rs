//! Owns the canonical type representation and the fully (or partially)
//! resolved declaration tree produced by the two-phase resolver. Types and
//! declarations reference each other only through stable arena indices
//! (`TypeId`, `DeclId`) — see `ids` — which is how the decl↔type reference
//! cycle the original design flagged is avoided entirely.

pub mod context;
pub mod decl;
pub mod expr;
pub mod ids;
pub mod stmt;
pub mod types;

pub use context::AstContext;
pub use decl::{
    AdtDecl, AliasDecl, ClassDecl, Decl, EnumDecl, EnumeratorDecl, FunctionDecl, LabelDecl,
    ParamDecl, TransUnitDecl, ValueCtorDecl, VariableDecl,
};
pub use expr::{CastStep, TypedExpr, ValueCategory};
pub use ids::{DeclId, TypeId};
pub use stmt::{TypedBlock, TypedStmt};
pub use types::{BuiltinTypeId, QualType, QualTypeList, Qualifiers, Type, UserDefinedType};
