use crate::ids::{DeclId, TypeId};
use bitflags::bitflags;
use smallvec::SmallVec;

/// Most tuples in practice have a handful of elements; inline storage
/// avoids a heap allocation for the common case.
pub type QualTypeList = SmallVec<[QualType; 4]>;

pub use aurum_cst::BuiltinTypeId;

bitflags! {
    /// The const/volatile/restrict bitset a `QualType` carries alongside its
    /// unqualified type reference.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Qualifiers: u8 {
        const CONST    = 0b0001;
        const VOLATILE = 0b0010;
        const RESTRICT = 0b0100;
    }
}

/// An unqualified type reference plus its qualifier bitset. Equality is
/// structural on both fields (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualType {
    pub ty: TypeId,
    pub quals: Qualifiers,
}

impl QualType {
    pub fn unqualified(ty: TypeId) -> Self {
        Self {
            ty,
            quals: Qualifiers::empty(),
        }
    }

    pub fn new(ty: TypeId, quals: Qualifiers) -> Self {
        Self { ty, quals }
    }

    pub fn is_const(&self) -> bool {
        self.quals.contains(Qualifiers::CONST)
    }

    pub fn is_volatile(&self) -> bool {
        self.quals.contains(Qualifiers::VOLATILE)
    }

    pub fn is_restrict(&self) -> bool {
        self.quals.contains(Qualifiers::RESTRICT)
    }

    /// Returns `true` if the qualifier was already set (the caller's signal
    /// to diagnose a syntactic duplicate, per §4.4's composed-type rule).
    /// Idempotent: applying twice never changes the structural result.
    pub fn add_const(&mut self) -> bool {
        let had = self.is_const();
        self.quals.insert(Qualifiers::CONST);
        had
    }

    pub fn add_volatile(&mut self) -> bool {
        let had = self.is_volatile();
        self.quals.insert(Qualifiers::VOLATILE);
        had
    }

    pub fn add_restrict(&mut self) -> bool {
        let had = self.is_restrict();
        self.quals.insert(Qualifiers::RESTRICT);
        had
    }
}

/// The declaration-kind a user-defined type's back-reference targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserDefinedType {
    Class(DeclId),
    Adt(DeclId),
    Enum(DeclId),
    /// A `using` alias. Resolves to this type itself, not the aliasee —
    /// see SPEC_FULL's resolved Open Question on transparent aliasing.
    Alias(DeclId),
}

/// The canonical type representation the `AstContext` hash-conses (§3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Builtin(BuiltinTypeId),
    Pointer(QualType),
    LValueRef(QualType),
    RValueRef(QualType),
    Array(QualType, Option<u64>),
    Tuple(QualTypeList),
    /// Never deduplicated: each `add_user_defined` call yields a fresh
    /// `TypeId` keyed by declaration identity (§4.1).
    UserDefined(UserDefinedType),
}

/// Structural key used to memoize everything except `UserDefined` variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum TypeKey {
    Builtin(BuiltinTypeId),
    Pointer(QualType),
    LValueRef(QualType),
    RValueRef(QualType),
    Array(QualType, Option<u64>),
    Tuple(QualTypeList),
}

impl TypeKey {
    pub(crate) fn from_type(ty: &Type) -> Option<Self> {
        Some(match ty {
            Type::Builtin(id) => TypeKey::Builtin(*id),
            Type::Pointer(q) => TypeKey::Pointer(*q),
            Type::LValueRef(q) => TypeKey::LValueRef(*q),
            Type::RValueRef(q) => TypeKey::RValueRef(*q),
            Type::Array(q, n) => TypeKey::Array(*q, *n),
            Type::Tuple(qs) => TypeKey::Tuple(qs.clone()),
            Type::UserDefined(_) => return None,
        })
    }
}
