//! Keyed maps of incomplete declarations awaiting resolution (§4.3). Five
//! categories mirror the original: var, tag (class/adt/enum), value-ctor,
//! using, and function — functions are always deferred and carry no
//! dependency vector at all.

use aurum_ast::DeclId;
use aurum_diagnostics::SourceRange;
use indexmap::IndexMap;

use crate::dependency::Dependency;
use crate::scope::ScopeId;

/// Identifies one incomplete-declaration entry across the four dependency-
/// bearing categories, for the scheduler's unified traversal (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncompleteDeclId {
    Var(DeclId),
    Tag(DeclId),
    ValueCtor(DeclId),
    Using(DeclId),
}

#[derive(Debug)]
pub struct IncompleteVarDecl {
    pub decl: DeclId,
    pub cst: aurum_cst::VarDecl,
    pub dependencies: Vec<Dependency>,
    pub scope: ScopeId,
}

#[derive(Debug)]
pub struct IncompleteTagDecl {
    pub decl: DeclId,
    pub dependencies: Vec<Dependency>,
    pub scope: ScopeId,
    /// The tag's own name range, used to anchor a circular-dependency
    /// diagnostic when the cycle is discovered re-entering this node (§4.5).
    pub name_range: SourceRange,
}

#[derive(Debug)]
pub struct IncompleteValueCtorDecl {
    pub decl: DeclId,
    pub cst: aurum_cst::ValueCtorDecl,
    pub dependencies: Vec<Dependency>,
    pub scope: ScopeId,
}

#[derive(Debug)]
pub struct IncompleteUsingDecl {
    pub decl: DeclId,
    pub cst: aurum_cst::UsingDecl,
    pub dependencies: Vec<Dependency>,
    pub scope: ScopeId,
}

/// Functions are always deferred to Phase-1 and never carry a dependency
/// list — see `ActOnFuncDecl` in the reference implementation.
#[derive(Debug)]
pub struct IncompleteFuncDecl {
    pub cst: aurum_cst::FuncDecl,
    pub owner: DeclId,
    pub scope: ScopeId,
}

#[derive(Debug, Default)]
pub struct IncompleteRegistry {
    pub vars: IndexMap<DeclId, IncompleteVarDecl>,
    pub tags: IndexMap<DeclId, IncompleteTagDecl>,
    pub value_ctors: IndexMap<DeclId, IncompleteValueCtorDecl>,
    pub usings: IndexMap<DeclId, IncompleteUsingDecl>,
    pub funcs: Vec<IncompleteFuncDecl>,
}

impl IncompleteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_var(&mut self, entry: IncompleteVarDecl) {
        self.vars.insert(entry.decl, entry);
    }

    pub fn insert_tag(&mut self, entry: IncompleteTagDecl) {
        self.tags.insert(entry.decl, entry);
    }

    pub fn insert_value_ctor(&mut self, entry: IncompleteValueCtorDecl) {
        self.value_ctors.insert(entry.decl, entry);
    }

    pub fn insert_using(&mut self, entry: IncompleteUsingDecl) {
        self.usings.insert(entry.decl, entry);
    }

    pub fn push_func(&mut self, entry: IncompleteFuncDecl) {
        self.funcs.push(entry);
    }

    /// Dispatches on the declaration's kind, mirroring `SearchInUnfinished`.
    /// `Adt` decls route through the tag map alongside `Class`/`Enum`: the
    /// original's switch only listed `Class`/`Enum` because an ADT decl
    /// itself is never the *target* of another declaration's dependency
    /// (only its value-constructors are), but routing it here too costs
    /// nothing and avoids an unreachable path if that ever changes.
    pub fn search_unfinished(&self, ast: &aurum_ast::AstContext, decl: DeclId) -> Option<IncompleteDeclId> {
        use aurum_ast::Decl;
        match ast.decl(decl) {
            Decl::Variable(_) => self.vars.contains_key(&decl).then_some(IncompleteDeclId::Var(decl)),
            Decl::Class(_) | Decl::Enum(_) | Decl::Adt(_) => {
                self.tags.contains_key(&decl).then_some(IncompleteDeclId::Tag(decl))
            }
            Decl::ValueCtor(_) => self
                .value_ctors
                .contains_key(&decl)
                .then_some(IncompleteDeclId::ValueCtor(decl)),
            Decl::Alias(_) => self.usings.contains_key(&decl).then_some(IncompleteDeclId::Using(decl)),
            other => panic!("search_unfinished: unexpected decl kind {other:?}"),
        }
    }

    /// All dependency-bearing entries, in a stable order, for the
    /// substitute-names pass and the scheduler's initial worklist (§4.5).
    pub fn all_incomplete_ids(&self) -> Vec<IncompleteDeclId> {
        let mut ids = Vec::with_capacity(self.vars.len() + self.tags.len() + self.value_ctors.len() + self.usings.len());
        ids.extend(self.vars.keys().copied().map(IncompleteDeclId::Var));
        ids.extend(self.tags.keys().copied().map(IncompleteDeclId::Tag));
        ids.extend(self.usings.keys().copied().map(IncompleteDeclId::Using));
        ids.extend(self.value_ctors.keys().copied().map(IncompleteDeclId::ValueCtor));
        ids
    }

    pub fn dependencies(&self, id: IncompleteDeclId) -> &[Dependency] {
        match id {
            IncompleteDeclId::Var(d) => &self.vars[&d].dependencies,
            IncompleteDeclId::Tag(d) => &self.tags[&d].dependencies,
            IncompleteDeclId::ValueCtor(d) => &self.value_ctors[&d].dependencies,
            IncompleteDeclId::Using(d) => &self.usings[&d].dependencies,
        }
    }

    pub fn dependencies_mut(&mut self, id: IncompleteDeclId) -> &mut Vec<Dependency> {
        match id {
            IncompleteDeclId::Var(d) => &mut self.vars.get_mut(&d).unwrap().dependencies,
            IncompleteDeclId::Tag(d) => &mut self.tags.get_mut(&d).unwrap().dependencies,
            IncompleteDeclId::ValueCtor(d) => &mut self.value_ctors.get_mut(&d).unwrap().dependencies,
            IncompleteDeclId::Using(d) => &mut self.usings.get_mut(&d).unwrap().dependencies,
        }
    }

    pub fn scope_of(&self, id: IncompleteDeclId) -> ScopeId {
        match id {
            IncompleteDeclId::Var(d) => self.vars[&d].scope,
            IncompleteDeclId::Tag(d) => self.tags[&d].scope,
            IncompleteDeclId::ValueCtor(d) => self.value_ctors[&d].scope,
            IncompleteDeclId::Using(d) => self.usings[&d].scope,
        }
    }

    pub fn decl_of(&self, id: IncompleteDeclId) -> DeclId {
        match id {
            IncompleteDeclId::Var(d) | IncompleteDeclId::Tag(d) | IncompleteDeclId::ValueCtor(d) | IncompleteDeclId::Using(d) => d,
        }
    }

    /// The most specific source range available for this entry, used to
    /// anchor a circular-dependency diagnostic (§4.5, §7).
    pub fn name_range(&self, id: IncompleteDeclId) -> SourceRange {
        match id {
            IncompleteDeclId::Var(d) => self.vars[&d].cst.name_range,
            IncompleteDeclId::Tag(d) => self.tags[&d].name_range,
            IncompleteDeclId::ValueCtor(d) => self.value_ctors[&d].cst.name_range,
            IncompleteDeclId::Using(d) => self.usings[&d].cst.name_range,
        }
    }
}
