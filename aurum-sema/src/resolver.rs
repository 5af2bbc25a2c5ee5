//! Shared state for both resolver phases: the `AstContext` (C1) and
//! `ScopeStack` (C2) are shared by Phase-0 and Phase-1 (§2); the
//! `IncompleteRegistry` (C4) is built by Phase-0 and drained by the
//! scheduler (C6) and Phase-1 (C7).

use aurum_ast::{AstContext, DeclId};
use aurum_diagnostics::DiagnosticSink;
use indexmap::IndexMap;

use crate::registry::IncompleteRegistry;
use crate::scope::{ScopeFlags, ScopeId, ScopeStack};

pub struct Resolver<'sink> {
    pub ast: AstContext,
    pub scopes: ScopeStack,
    pub registry: IncompleteRegistry,
    pub sink: &'sink dyn DiagnosticSink,
    decl_context_stack: Vec<DeclId>,
    /// Maps a class/adt/enum's `DeclId` to the `ScopeId` holding its
    /// members, so nested-name lookup (`A::B`) can descend into `A`'s
    /// member scope after `A`'s own scope has been popped (§4.2). Lives
    /// here rather than on the decl itself since `ScopeId` is a sema-layer
    /// concept `aurum-ast` must not depend on.
    type_scopes: IndexMap<DeclId, ScopeId>,
}

impl<'sink> Resolver<'sink> {
    pub fn new(sink: &'sink dyn DiagnosticSink) -> Self {
        Self {
            ast: AstContext::new(),
            scopes: ScopeStack::new(),
            registry: IncompleteRegistry::new(),
            sink,
            decl_context_stack: Vec::new(),
            type_scopes: IndexMap::new(),
        }
    }

    pub fn register_type_scope(&mut self, decl: DeclId, scope: ScopeId) {
        self.type_scopes.insert(decl, scope);
    }

    pub fn type_scope_of(&self, decl: DeclId) -> Option<ScopeId> {
        self.type_scopes.get(&decl).copied()
    }

    pub fn push_decl_context(&mut self, decl: DeclId) {
        self.decl_context_stack.push(decl);
    }

    pub fn pop_decl_context(&mut self) {
        self.decl_context_stack.pop().expect("decl context stack underflow");
    }

    pub fn current_decl_context(&self) -> DeclId {
        *self.decl_context_stack.last().expect("no decl context pushed")
    }

    pub fn push_scope(&mut self, flags: ScopeFlags) -> ScopeId {
        self.scopes.push(flags)
    }

    /// Re-enters a declaration's recorded scope rather than whatever is
    /// currently current (§4.6 — Phase-1 resumes from a snapshot, not from
    /// wherever Phase-0 happened to leave the scope pointer).
    pub fn push_scope_at(&mut self, parent: ScopeId, flags: ScopeFlags) -> ScopeId {
        self.scopes.push_at(parent, flags)
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn current_scope(&self) -> ScopeId {
        self.scopes.current()
    }
}
