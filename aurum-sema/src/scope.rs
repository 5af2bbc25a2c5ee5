//! Nested lexical scopes (§4.2). Mirrors the original `Scope` exactly:
//! three bindings maps per scope, self-then-parents lookup, and an
//! enclosing function/loop scope recorded once at construction.

use aurum_ast::DeclId;
use bitflags::bitflags;
use indexmap::{IndexMap, IndexSet};

/// A stable index into `ScopeStack`'s arena. Stored by `IncompleteDecl` as
/// an enclosing-scope snapshot instead of a ref-counted pointer (see
/// REDESIGN FLAGS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ScopeFlags: u8 {
        const FILE     = 0b0_0001;
        const CLASS    = 0b0_0010;
        const ADT      = 0b0_0100;
        const ENUM     = 0b0_1000;
        const FUNCTION = 0b1_0000;
        const LOOP     = 0b10_0000;
    }
}

#[derive(Debug)]
pub struct Scope {
    pub flags: ScopeFlags,
    pub parent: Option<ScopeId>,
    pub enclosing_function: Option<ScopeId>,
    pub enclosing_loop: Option<ScopeId>,
    vars: IndexMap<String, DeclId>,
    types: IndexMap<String, aurum_ast::TypeId>,
    funcs: IndexMap<String, IndexSet<DeclId>>,
}

impl Scope {
    fn new(flags: ScopeFlags, parent: Option<ScopeId>, enclosing_function: Option<ScopeId>, enclosing_loop: Option<ScopeId>) -> Self {
        Self {
            flags,
            parent,
            enclosing_function,
            enclosing_loop,
            vars: IndexMap::new(),
            types: IndexMap::new(),
            funcs: IndexMap::new(),
        }
    }
}

/// Owns every `Scope` for one compilation unit and provides chain-walking
/// lookup. Scopes are never removed; `pop_scope` just moves the "current"
/// pointer back to the parent, the way the original's scope stack discards
/// its `shared_ptr` but the chain above stays alive through other owners.
pub struct ScopeStack {
    scopes: Vec<Scope>,
    current: Option<ScopeId>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            scopes: Vec::new(),
            current: None,
        }
    }

    pub fn current(&self) -> ScopeId {
        self.current.expect("no scope pushed")
    }

    /// Pushes a new scope, recording its enclosing function/loop scope by
    /// walking the parent chain once (§4.2).
    pub fn push(&mut self, flags: ScopeFlags) -> ScopeId {
        let parent = self.current;
        self.push_child_of(parent, flags)
    }

    /// Pushes a new scope under an explicit parent rather than whatever is
    /// currently "current" (Phase-1 re-enters a declaration's *recorded*
    /// scope — §4.6 — which is rarely the scope Phase-0 left `current`
    /// pointing at after popping back out of the translation unit).
    pub fn push_at(&mut self, parent: ScopeId, flags: ScopeFlags) -> ScopeId {
        self.push_child_of(Some(parent), flags)
    }

    fn push_child_of(&mut self, parent: Option<ScopeId>, flags: ScopeFlags) -> ScopeId {
        let enclosing_function = if flags.contains(ScopeFlags::FUNCTION) {
            parent
        } else {
            parent.and_then(|p| self.scope(p).enclosing_function)
        };
        let enclosing_loop = if flags.contains(ScopeFlags::LOOP) {
            parent
        } else {
            parent.and_then(|p| self.scope(p).enclosing_loop)
        };

        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(flags, parent, enclosing_function, enclosing_loop));
        self.current = Some(id);
        id
    }

    /// Restores the current pointer to the popped scope's parent. The
    /// scope itself remains addressable by its `ScopeId` (other
    /// declarations may still reference it as their enclosing scope).
    pub fn pop(&mut self) {
        let current = self.current();
        self.current = self.scope(current).parent;
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    pub fn add_var(&mut self, scope: ScopeId, name: impl Into<String>, decl: DeclId) {
        self.scope_mut(scope).vars.insert(name.into(), decl);
    }

    pub fn replace_var(&mut self, scope: ScopeId, name: &str, decl: DeclId) {
        let entry = self
            .scope_mut(scope)
            .vars
            .get_mut(name)
            .unwrap_or_else(|| panic!("replace_var: `{name}` not bound in scope"));
        *entry = decl;
    }

    pub fn add_type(&mut self, scope: ScopeId, name: impl Into<String>, ty: aurum_ast::TypeId) {
        self.scope_mut(scope).types.insert(name.into(), ty);
    }

    pub fn add_function(&mut self, scope: ScopeId, name: impl Into<String>, decl: DeclId) {
        self.scope_mut(scope).funcs.entry(name.into()).or_default().insert(decl);
    }

    pub fn lookup_var_local(&self, scope: ScopeId, name: &str) -> Option<DeclId> {
        self.scope(scope).vars.get(name).copied()
    }

    pub fn lookup_var(&self, scope: ScopeId, name: &str) -> Option<DeclId> {
        let mut cur = Some(scope);
        while let Some(id) = cur {
            if let Some(decl) = self.lookup_var_local(id, name) {
                return Some(decl);
            }
            cur = self.scope(id).parent;
        }
        None
    }

    pub fn lookup_type_local(&self, scope: ScopeId, name: &str) -> Option<aurum_ast::TypeId> {
        self.scope(scope).types.get(name).copied()
    }

    pub fn lookup_type(&self, scope: ScopeId, name: &str) -> Option<aurum_ast::TypeId> {
        let mut cur = Some(scope);
        while let Some(id) = cur {
            if let Some(ty) = self.lookup_type_local(id, name) {
                return Some(ty);
            }
            cur = self.scope(id).parent;
        }
        None
    }

    /// Every variable name visible from `scope`, chain-wide. Used only to
    /// build "did you mean?" suggestions for an unresolved `IdRef` (§7) —
    /// not on any resolution hot path.
    pub fn all_var_names(&self, scope: ScopeId) -> Vec<String> {
        let mut names = Vec::new();
        let mut cur = Some(scope);
        while let Some(id) = cur {
            names.extend(self.scope(id).vars.keys().cloned());
            cur = self.scope(id).parent;
        }
        names
    }

    /// Every type name visible from `scope`, chain-wide. Used only to build
    /// "did you mean?" suggestions for an unresolved type reference (§7).
    pub fn all_type_names(&self, scope: ScopeId) -> Vec<String> {
        let mut names = Vec::new();
        let mut cur = Some(scope);
        while let Some(id) = cur {
            names.extend(self.scope(id).types.keys().cloned());
            cur = self.scope(id).parent;
        }
        names
    }

    pub fn all_funcs_local(&self, scope: ScopeId, name: &str) -> Vec<DeclId> {
        self.scope(scope)
            .funcs
            .get(name)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Union across the chain; falls back to the parent only when the
    /// local set is empty, matching `GetAllFuncs`'s multimap range lookup.
    pub fn all_funcs(&self, scope: ScopeId, name: &str) -> Vec<DeclId> {
        let mut cur = Some(scope);
        while let Some(id) = cur {
            let local = self.all_funcs_local(id, name);
            if !local.is_empty() {
                return local;
            }
            cur = self.scope(id).parent;
        }
        Vec::new()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
