//! Plain data types mirroring what a parser would emit for Aurum: imports,
//! declarations, types, statements, expressions, each carrying a
//! `SourceRange`. No lexing or parsing happens here; test fixtures build
//! these nodes by hand the way a parser would.

pub mod decl;
pub mod expr;
pub mod ident;
pub mod stmt;
pub mod ty;

pub use decl::{
    AdtDecl, ClassDecl, DeclSpec, EnumDecl, EnumeratorDecl, File, ForwardDecl, FuncDecl, Import,
    ImportKind, Item, ParamDecl, TemplatedDecl, UsingDecl, ValueCtorDecl, VarDecl,
};
pub use expr::{BinaryOp, CastKind, Expression, FloatWidth, UnaryOp};
pub use ident::{IdentSegment, QualifiedIdent};
pub use stmt::{Block, Statement};
pub use ty::{BuiltinTypeId, Specifier, SpecifierKind, Type};
