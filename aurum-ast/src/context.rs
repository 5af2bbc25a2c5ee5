use indexmap::IndexMap;

use crate::decl::Decl;
use crate::ids::{Arena, DeclId, TypeId};
use crate::types::{BuiltinTypeId, QualType, QualTypeList, Type, TypeKey, UserDefinedType};

/// Owns every declaration and canonical type for one compilation unit
/// (§4.1). Builtin, pointer, reference, array, and tuple types are
/// structurally hash-consed through `memo`; user-defined types are never
/// deduplicated — each `add_user_defined` call returns a fresh `TypeId`.
pub struct AstContext {
    decls: Arena<Decl>,
    types: Arena<Type>,
    memo: IndexMap<TypeKey, TypeId>,
}

impl AstContext {
    pub fn new() -> Self {
        Self {
            decls: Arena::new(),
            types: Arena::new(),
            memo: IndexMap::new(),
        }
    }

    // -- Declarations ----------------------------------------------------

    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        DeclId(self.decls.alloc(decl))
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        self.decls.get(id.0)
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        self.decls.get_mut(id.0)
    }

    pub fn decls(&self) -> impl Iterator<Item = (DeclId, &Decl)> {
        self.decls.iter_with_ids().map(|(i, d)| (DeclId(i), d))
    }

    /// Installs a var-decl's type. Phase-0 calls this for immediately
    /// resolvable declarations; Phase-1 calls it when re-resolving a
    /// previously incomplete one.
    pub fn set_var_type(&mut self, id: DeclId, ty: QualType) {
        match self.decl_mut(id) {
            Decl::Variable(v) => v.ty = Some(ty),
            other => panic!("set_var_type called on non-variable decl: {other:?}"),
        }
    }

    pub fn set_value_ctor_type(&mut self, id: DeclId, ty: QualType) {
        match self.decl_mut(id) {
            Decl::ValueCtor(v) => v.ty = Some(ty),
            other => panic!("set_value_ctor_type called on non-value-ctor decl: {other:?}"),
        }
    }

    /// Installs an alias's aliasee type. Asserts the field was still
    /// unset, mirroring the original's "assert prior null" invariant
    /// (§4.6).
    pub fn fill_aliasee(&mut self, id: DeclId, aliasee: QualType) {
        match self.decl_mut(id) {
            Decl::Alias(a) => {
                assert!(a.aliasee.is_none(), "fill_aliasee called twice on `{}`", a.name);
                a.aliasee = Some(aliasee);
            }
            other => panic!("fill_aliasee called on non-alias decl: {other:?}"),
        }
    }

    /// Appends `child` to `owner`'s ordered child sequence. Functions are
    /// deferred past the rest of Phase-0 (§4.4), so unlike every other
    /// declaration kind their owner's child list isn't populated until
    /// Phase-1 builds the final `FunctionDecl` and calls this.
    pub fn push_child(&mut self, owner: DeclId, child: DeclId) {
        match self.decl_mut(owner) {
            Decl::TransUnit(d) => d.children.push(child),
            Decl::Class(d) => d.children.push(child),
            Decl::Function(d) => d.children.push(child),
            other => panic!("push_child: decl kind `{other:?}` is not a declaration context that holds functions"),
        }
    }

    // -- Types -------------------------------------------------------------

    pub fn type_of(&self, id: TypeId) -> &Type {
        self.types.get(id.0)
    }

    fn intern(&mut self, ty: Type) -> TypeId {
        match TypeKey::from_type(&ty) {
            Some(key) => {
                if let Some(&id) = self.memo.get(&key) {
                    return id;
                }
                let id = TypeId(self.types.alloc(ty));
                self.memo.insert(key, id);
                id
            }
            None => TypeId(self.types.alloc(ty)),
        }
    }

    pub fn get_builtin(&mut self, id: BuiltinTypeId) -> TypeId {
        self.intern(Type::Builtin(id))
    }

    pub fn create_pointer(&mut self, pointee: QualType) -> TypeId {
        self.intern(Type::Pointer(pointee))
    }

    pub fn create_lvalue_ref(&mut self, referent: QualType) -> TypeId {
        self.intern(Type::LValueRef(referent))
    }

    pub fn create_rvalue_ref(&mut self, referent: QualType) -> TypeId {
        self.intern(Type::RValueRef(referent))
    }

    pub fn create_array(&mut self, element: QualType, size: Option<u64>) -> TypeId {
        self.intern(Type::Array(element, size))
    }

    pub fn create_tuple(&mut self, elements: impl Into<QualTypeList>) -> TypeId {
        self.intern(Type::Tuple(elements.into()))
    }

    /// Always allocates a fresh id; user-defined types are keyed by
    /// declaration identity, never deduplicated structurally (§4.1).
    pub fn add_user_defined(&mut self, user_defined: UserDefinedType) -> TypeId {
        TypeId(self.types.alloc(Type::UserDefined(user_defined)))
    }

    /// Follows `Alias` chains down to the first non-alias type. Phase-1
    /// never calls this implicitly — aliases resolve to themselves by
    /// default (see SPEC_FULL's resolved Open Question); callers that want
    /// the underlying type opt in explicitly.
    pub fn strip_aliases(&self, mut id: TypeId) -> TypeId {
        loop {
            match self.type_of(id) {
                Type::UserDefined(UserDefinedType::Alias(decl_id)) => match self.decl(*decl_id) {
                    Decl::Alias(a) => match a.aliasee {
                        Some(next) => id = next.ty,
                        None => return id,
                    },
                    _ => return id,
                },
                _ => return id,
            }
        }
    }
}

impl Default for AstContext {
    fn default() -> Self {
        Self::new()
    }
}
