use crate::ids::{DeclId, TypeId};
use crate::stmt::TypedBlock;
use crate::types::QualType;

#[derive(Debug, Clone, PartialEq)]
pub struct TransUnitDecl {
    pub children: Vec<DeclId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelDecl {
    pub name: String,
    pub owner: DeclId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub owner: DeclId,
    pub children: Vec<DeclId>,
    /// Installed atomically with the user-defined `Type` registered in the
    /// `AstContext` (§3 invariants).
    pub self_type: TypeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumeratorDecl {
    pub name: String,
    pub owner: DeclId,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub owner: DeclId,
    pub enumerators: Vec<DeclId>,
    pub self_type: TypeId,
}

/// One constructor of an algebraic data type, analogous to a `VariableDecl`
/// but owned by an `AdtDecl` rather than a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCtorDecl {
    pub name: String,
    pub owner: DeclId,
    /// `None` until `AstContext::set_value_ctor_type` installs it (Phase-0
    /// partial / Phase-1 final).
    pub ty: Option<QualType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdtDecl {
    pub name: String,
    pub owner: DeclId,
    pub constructors: Vec<DeclId>,
    pub self_type: TypeId,
}

/// A `using` alias. `aliasee` starts `None`; `fill_aliasee` asserts it was
/// `None` before installing the resolved type (§4.6, mirroring the
/// original's "assert prior null" semantics).
#[derive(Debug, Clone, PartialEq)]
pub struct AliasDecl {
    pub name: String,
    pub owner: DeclId,
    pub aliasee: Option<QualType>,
    pub self_type: TypeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub name: String,
    pub owner: DeclId,
    pub ty: Option<QualType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: QualType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub owner: DeclId,
    pub params: Vec<ParamDecl>,
    pub return_type: QualType,
    /// Still a declaration context in principle (nested declarations in a
    /// body), though this crate only ever populates it for top-level
    /// parameters the caller chooses to register there.
    pub children: Vec<DeclId>,
    pub body: Option<TypedBlock>,
}

/// Tagged variant over every declaration kind (§3). Declaration-context
/// capability is an explicit accessor, not inheritance — see
/// `as_decl_context`.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    TransUnit(TransUnitDecl),
    Label(LabelDecl),
    Class(ClassDecl),
    Enum(EnumDecl),
    Enumerator(EnumeratorDecl),
    Adt(AdtDecl),
    ValueCtor(ValueCtorDecl),
    Alias(AliasDecl),
    Function(FunctionDecl),
    Variable(VariableDecl),
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::TransUnit(_) => "<translation-unit>",
            Decl::Label(d) => &d.name,
            Decl::Class(d) => &d.name,
            Decl::Enum(d) => &d.name,
            Decl::Enumerator(d) => &d.name,
            Decl::Adt(d) => &d.name,
            Decl::ValueCtor(d) => &d.name,
            Decl::Alias(d) => &d.name,
            Decl::Function(d) => &d.name,
            Decl::Variable(d) => &d.name,
        }
    }

    /// Exposes the ordered child-declaration sequence for declarations that
    /// carry the declaration-context capability (translation-unit, class,
    /// adt, enum, function); `None` for every other kind (§9 design notes).
    pub fn as_decl_context(&self) -> Option<&[DeclId]> {
        match self {
            Decl::TransUnit(d) => Some(&d.children),
            Decl::Class(d) => Some(&d.children),
            Decl::Adt(d) => Some(&d.constructors),
            Decl::Enum(d) => Some(&d.enumerators),
            Decl::Function(d) => Some(&d.children),
            _ => None,
        }
    }

    pub fn self_type(&self) -> Option<TypeId> {
        match self {
            Decl::Class(d) => Some(d.self_type),
            Decl::Adt(d) => Some(d.self_type),
            Decl::Enum(d) => Some(d.self_type),
            Decl::Alias(d) => Some(d.self_type),
            _ => None,
        }
    }
}
