//! Phase-0 resolver (§4.4): walks the CST, creates partial AST nodes,
//! resolves what it immediately can, and records dependencies for the
//! rest.

use aurum_ast::{
    AdtDecl, AliasDecl, ClassDecl, Decl, DeclId, EnumDecl, EnumeratorDecl, QualType, TransUnitDecl,
    TypeId, UserDefinedType, ValueCtorDecl, VariableDecl,
};
use aurum_cst::{QualifiedIdent, SpecifierKind};

use crate::dependency::{weaken_all, Dependency};
use crate::errors::SemaError;
use crate::registry::{IncompleteFuncDecl, IncompleteTagDecl, IncompleteUsingDecl, IncompleteValueCtorDecl, IncompleteVarDecl};
use crate::resolver::Resolver;
use crate::scope::{ScopeFlags, ScopeId};

impl<'sink> Resolver<'sink> {
    pub fn act_on_trans_unit(&mut self, file: &aurum_cst::File) -> DeclId {
        let trans_unit = self.ast.alloc_decl(Decl::TransUnit(TransUnitDecl { children: Vec::new() }));
        self.push_decl_context(trans_unit);
        self.push_scope(ScopeFlags::FILE);
        log::debug!(target: "phase0", "entering translation unit");

        let mut children = Vec::new();
        for item in &file.items {
            let (decl, _complete) = self.act_on_decl(item);
            if let Some(d) = decl {
                children.push(d);
            }
        }

        self.pop_scope();
        self.pop_decl_context();

        if let Decl::TransUnit(tu) = self.ast.decl_mut(trans_unit) {
            tu.children = children;
        }
        trans_unit
    }

    pub fn act_on_decl(&mut self, item: &aurum_cst::Item) -> (Option<DeclId>, bool) {
        use aurum_cst::Item;
        match item {
            Item::Var(v) => self.act_on_var_decl(v),
            Item::Class(c) => self.act_on_class_decl(c),
            Item::Adt(a) => self.act_on_adt_decl(a),
            Item::Enum(e) => self.act_on_enum_decl(e),
            Item::Using(u) => self.act_on_using_decl(u),
            Item::Func(f) => self.act_on_func_decl(f),
            Item::Forward(f) => {
                SemaError::Unsupported { range: f.range }.report(self.sink);
                (None, false)
            }
            Item::Templated(t) => {
                SemaError::Unsupported { range: t.range }.report(self.sink);
                (None, false)
            }
        }
    }

    // -- Type resolution ---------------------------------------------------

    pub fn resolve_type(&mut self, ty: &aurum_cst::Type) -> Result<QualType, Vec<Dependency>> {
        use aurum_cst::Type as CstType;
        match ty {
            CstType::Builtin { id, .. } => {
                let tid = self.ast.get_builtin(*id);
                Ok(QualType::unqualified(tid))
            }
            CstType::Named(ident) => self.resolve_named_type(ident),
            CstType::Composed { root, specifiers } => self.resolve_composed_type(root, specifiers),
            CstType::Array { element, size, .. } => self.resolve_array_type(element, *size),
            CstType::Tuple { elements, .. } => self.resolve_tuple_type(elements),
            CstType::Templated { range, .. } => {
                SemaError::Unsupported { range: *range }.report(self.sink);
                Err(Vec::new())
            }
        }
    }

    fn resolve_named_type(&mut self, ident: &QualifiedIdent) -> Result<QualType, Vec<Dependency>> {
        match self.lookup_named_type(self.current_scope(), ident) {
            Some(ty_id) => {
                if self.type_is_complete(ty_id) {
                    Ok(QualType::unqualified(ty_id))
                } else {
                    let decl_id = self
                        .user_defined_decl_id(ty_id)
                        .expect("an incomplete named type is always user-defined");
                    Err(vec![Dependency::by_decl(decl_id, true)])
                }
            }
            None => Err(vec![Dependency::by_name(ident.clone(), true)]),
        }
    }

    fn resolve_composed_type(&mut self, root: &aurum_cst::Type, specifiers: &[aurum_cst::Specifier]) -> Result<QualType, Vec<Dependency>> {
        match self.resolve_type(root) {
            Ok(mut qt) => {
                for spec in specifiers {
                    self.apply_specifier(&mut qt, spec);
                }
                Ok(qt)
            }
            Err(mut deps) => {
                if is_ptr_or_ref(specifiers) {
                    weaken_all(&mut deps);
                }
                Err(deps)
            }
        }
    }

    fn apply_specifier(&mut self, qt: &mut QualType, spec: &aurum_cst::Specifier) {
        match spec.kind {
            SpecifierKind::Pointer => *qt = QualType::unqualified(self.ast.create_pointer(*qt)),
            SpecifierKind::LValueRef => *qt = QualType::unqualified(self.ast.create_lvalue_ref(*qt)),
            SpecifierKind::RValueRef => *qt = QualType::unqualified(self.ast.create_rvalue_ref(*qt)),
            SpecifierKind::Const => {
                if qt.add_const() {
                    SemaError::DuplicateQual { qualifier: "const", range: spec.range }.report(self.sink);
                }
            }
            SpecifierKind::Volatile => {
                if qt.add_volatile() {
                    SemaError::DuplicateQual { qualifier: "volatile", range: spec.range }.report(self.sink);
                }
            }
            SpecifierKind::Restrict => {
                if qt.add_restrict() {
                    SemaError::DuplicateQual { qualifier: "restrict", range: spec.range }.report(self.sink);
                }
            }
        }
    }

    fn resolve_array_type(&mut self, element: &aurum_cst::Type, size: Option<u64>) -> Result<QualType, Vec<Dependency>> {
        match self.resolve_type(element) {
            Ok(elem_qt) => {
                let tid = self.ast.create_array(elem_qt, size);
                Ok(QualType::unqualified(tid))
            }
            Err(deps) => Err(deps),
        }
    }

    fn resolve_tuple_type(&mut self, elements: &[aurum_cst::Type]) -> Result<QualType, Vec<Dependency>> {
        let mut resolved = Vec::with_capacity(elements.len());
        let mut deps = Vec::new();
        for el in elements {
            match self.resolve_type(el) {
                Ok(qt) => resolved.push(qt),
                Err(d) => deps.extend(d),
            }
        }
        if deps.is_empty() {
            let tid = self.ast.create_tuple(resolved);
            Ok(QualType::unqualified(tid))
        } else {
            Err(deps)
        }
    }

    /// §4.2: consumes `ident` left to right, looking up the first segment
    /// in the current scope chain and descending into each subsequent
    /// segment's declaration-context type bindings.
    pub(crate) fn lookup_named_type(&self, scope: ScopeId, ident: &QualifiedIdent) -> Option<TypeId> {
        let mut segments = ident.segments.iter();
        let first = segments.next()?;
        let mut ty = self.scopes.lookup_type(scope, &first.name)?;
        for seg in segments {
            let decl_id = self.user_defined_decl_id(ty)?;
            let member_scope = self.type_scope_of(decl_id)?;
            ty = self.scopes.lookup_type_local(member_scope, &seg.name)?;
        }
        Some(ty)
    }

    pub(crate) fn user_defined_decl_id(&self, ty: TypeId) -> Option<DeclId> {
        match self.ast.type_of(ty) {
            aurum_ast::Type::UserDefined(ud) => Some(match ud {
                UserDefinedType::Class(d) | UserDefinedType::Adt(d) | UserDefinedType::Enum(d) | UserDefinedType::Alias(d) => *d,
            }),
            _ => None,
        }
    }

    pub(crate) fn type_is_complete(&self, ty_id: TypeId) -> bool {
        match self.ast.type_of(ty_id) {
            aurum_ast::Type::Builtin(_) | aurum_ast::Type::Pointer(_) | aurum_ast::Type::LValueRef(_) | aurum_ast::Type::RValueRef(_) => true,
            aurum_ast::Type::Array(elem, _) => self.type_is_complete(elem.ty),
            aurum_ast::Type::Tuple(elems) => elems.iter().all(|q| self.type_is_complete(q.ty)),
            aurum_ast::Type::UserDefined(ud) => self.user_defined_type_is_complete(*ud),
        }
    }

    pub(crate) fn user_defined_type_is_complete(&self, ud: UserDefinedType) -> bool {
        match ud {
            UserDefinedType::Alias(decl_id) => !self.registry.usings.contains_key(&decl_id),
            UserDefinedType::Class(decl_id) | UserDefinedType::Adt(decl_id) | UserDefinedType::Enum(decl_id) => {
                !self.registry.tags.contains_key(&decl_id)
            }
        }
    }

    // -- Declarations -------------------------------------------------------

    fn act_on_var_decl(&mut self, cst: &aurum_cst::VarDecl) -> (Option<DeclId>, bool) {
        let scope = self.current_scope();
        if self.scopes.lookup_type_local(scope, &cst.name).is_some() {
            SemaError::Redefinition { name: cst.name.clone(), range: cst.name_range }.report(self.sink);
            return (None, false);
        }

        let owner = self.current_decl_context();
        let type_result = self.resolve_type(&cst.declared_type);
        match type_result {
            Ok(qt) => {
                let decl = self.ast.alloc_decl(Decl::Variable(VariableDecl {
                    name: cst.name.clone(),
                    owner,
                    ty: Some(qt),
                }));
                self.scopes.add_var(scope, cst.name.clone(), decl);
                log::debug!(target: "phase0", "var `{}` resolved immediately", cst.name);
                (Some(decl), true)
            }
            Err(deps) => {
                let decl = self.ast.alloc_decl(Decl::Variable(VariableDecl { name: cst.name.clone(), owner, ty: None }));
                self.scopes.add_var(scope, cst.name.clone(), decl);
                self.registry.insert_var(IncompleteVarDecl {
                    decl,
                    cst: cst.clone(),
                    dependencies: deps,
                    scope,
                });
                log::debug!(target: "phase0", "var `{}` deferred", cst.name);
                (Some(decl), false)
            }
        }
    }

    fn act_on_class_decl(&mut self, cst: &aurum_cst::ClassDecl) -> (Option<DeclId>, bool) {
        let outer_scope = self.current_scope();
        if self.scopes.lookup_type_local(outer_scope, &cst.name).is_some() {
            SemaError::Redefinition { name: cst.name.clone(), range: cst.name_range }.report(self.sink);
            return (None, false);
        }

        let owner = self.current_decl_context();
        let class_decl = self.ast.alloc_decl(Decl::Class(ClassDecl {
            name: cst.name.clone(),
            owner,
            children: Vec::new(),
            self_type: TypeId(u32::MAX),
        }));

        self.push_decl_context(class_decl);
        let member_scope = self.push_scope(ScopeFlags::CLASS);
        self.register_type_scope(class_decl, member_scope);

        let mut children = Vec::new();
        let mut collected_deps = Vec::new();
        for sub in &cst.members {
            let (decl, complete) = self.act_on_decl(sub);
            if let Some(d) = decl {
                if !complete {
                    collected_deps.push(Dependency::by_decl(d, true));
                }
                children.push(d);
            }
        }

        self.pop_scope();
        self.pop_decl_context();

        let self_type = self.ast.add_user_defined(UserDefinedType::Class(class_decl));
        if let Decl::Class(c) = self.ast.decl_mut(class_decl) {
            c.children = children;
            c.self_type = self_type;
        }
        self.scopes.add_type(outer_scope, cst.name.clone(), self_type);

        let is_complete = collected_deps.is_empty();
        if !is_complete {
            self.registry.insert_tag(IncompleteTagDecl {
                decl: class_decl,
                dependencies: collected_deps,
                scope: outer_scope,
                name_range: cst.name_range,
            });
        }
        log::debug!(target: "phase0", "class `{}` complete={}", cst.name, is_complete);
        (Some(class_decl), is_complete)
    }

    fn act_on_adt_decl(&mut self, cst: &aurum_cst::AdtDecl) -> (Option<DeclId>, bool) {
        let outer_scope = self.current_scope();
        if self.scopes.lookup_type_local(outer_scope, &cst.name).is_some() {
            SemaError::Redefinition { name: cst.name.clone(), range: cst.name_range }.report(self.sink);
            return (None, false);
        }

        let owner = self.current_decl_context();
        let adt_decl = self.ast.alloc_decl(Decl::Adt(AdtDecl {
            name: cst.name.clone(),
            owner,
            constructors: Vec::new(),
            self_type: TypeId(u32::MAX),
        }));

        self.push_decl_context(adt_decl);
        let member_scope = self.push_scope(ScopeFlags::ADT);
        self.register_type_scope(adt_decl, member_scope);

        let mut ctors = Vec::new();
        let mut collected_deps = Vec::new();
        for ctor in &cst.constructors {
            let (decl, complete) = self.act_on_value_ctor(ctor);
            if !complete {
                collected_deps.push(Dependency::by_decl(decl, true));
            }
            ctors.push(decl);
        }

        self.pop_scope();
        self.pop_decl_context();

        let self_type = self.ast.add_user_defined(UserDefinedType::Adt(adt_decl));
        if let Decl::Adt(a) = self.ast.decl_mut(adt_decl) {
            a.constructors = ctors;
            a.self_type = self_type;
        }
        self.scopes.add_type(outer_scope, cst.name.clone(), self_type);

        let is_complete = collected_deps.is_empty();
        if !is_complete {
            self.registry.insert_tag(IncompleteTagDecl {
                decl: adt_decl,
                dependencies: collected_deps,
                scope: outer_scope,
                name_range: cst.name_range,
            });
        }
        log::debug!(target: "phase0", "adt `{}` complete={}", cst.name, is_complete);
        (Some(adt_decl), is_complete)
    }

    fn act_on_value_ctor(&mut self, cst: &aurum_cst::ValueCtorDecl) -> (DeclId, bool) {
        let owner = self.current_decl_context();
        let type_result = self.resolve_type(&cst.underlying);
        match type_result {
            Ok(qt) => {
                let decl = self.ast.alloc_decl(Decl::ValueCtor(ValueCtorDecl { name: cst.name.clone(), owner, ty: Some(qt) }));
                (decl, true)
            }
            Err(deps) => {
                let decl = self.ast.alloc_decl(Decl::ValueCtor(ValueCtorDecl { name: cst.name.clone(), owner, ty: None }));
                let scope = self.current_scope();
                self.registry.insert_value_ctor(IncompleteValueCtorDecl { decl, cst: cst.clone(), dependencies: deps, scope });
                (decl, false)
            }
        }
    }

    fn act_on_enum_decl(&mut self, cst: &aurum_cst::EnumDecl) -> (Option<DeclId>, bool) {
        let outer_scope = self.current_scope();
        if self.scopes.lookup_type_local(outer_scope, &cst.name).is_some() {
            SemaError::Redefinition { name: cst.name.clone(), range: cst.name_range }.report(self.sink);
            return (None, false);
        }

        let owner = self.current_decl_context();
        let enum_decl = self.ast.alloc_decl(Decl::Enum(EnumDecl {
            name: cst.name.clone(),
            owner,
            enumerators: Vec::new(),
            self_type: TypeId(u32::MAX),
        }));

        self.push_decl_context(enum_decl);
        let member_scope = self.push_scope(ScopeFlags::ENUM);
        self.register_type_scope(enum_decl, member_scope);

        let mut value: i64 = 0;
        let mut seen = std::collections::HashSet::new();
        let mut enumerators = Vec::new();
        for e in &cst.enumerators {
            if !seen.insert(e.name.clone()) {
                SemaError::Redeclaration { name: e.name.clone(), range: e.name_range }.report(self.sink);
                continue;
            }
            if let Some(init) = &e.init {
                value = const_eval_integral(init).unwrap_or(value);
            }
            let enumerator = self.ast.alloc_decl(Decl::Enumerator(EnumeratorDecl { name: e.name.clone(), owner: enum_decl, value }));
            enumerators.push(enumerator);
            value += 1;
        }

        self.pop_scope();
        self.pop_decl_context();

        let self_type = self.ast.add_user_defined(UserDefinedType::Enum(enum_decl));
        if let Decl::Enum(en) = self.ast.decl_mut(enum_decl) {
            en.enumerators = enumerators;
            en.self_type = self_type;
        }
        self.scopes.add_type(outer_scope, cst.name.clone(), self_type);

        log::debug!(target: "phase0", "enum `{}` complete", cst.name);
        (Some(enum_decl), true)
    }

    fn act_on_using_decl(&mut self, cst: &aurum_cst::UsingDecl) -> (Option<DeclId>, bool) {
        let scope = self.current_scope();
        if self.scopes.lookup_type_local(scope, &cst.name).is_some() {
            SemaError::Redefinition { name: cst.name.clone(), range: cst.name_range }.report(self.sink);
            return (None, false);
        }

        let owner = self.current_decl_context();
        let type_result = self.resolve_type(&cst.aliasee);
        let (aliasee, is_complete) = match &type_result {
            Ok(qt) => (Some(*qt), true),
            Err(_) => (None, false),
        };

        let alias_decl = self.ast.alloc_decl(Decl::Alias(AliasDecl {
            name: cst.name.clone(),
            owner,
            aliasee,
            self_type: TypeId(u32::MAX),
        }));
        let self_type = self.ast.add_user_defined(UserDefinedType::Alias(alias_decl));
        if let Decl::Alias(a) = self.ast.decl_mut(alias_decl) {
            a.self_type = self_type;
        }
        self.scopes.add_type(scope, cst.name.clone(), self_type);

        if let Err(deps) = type_result {
            self.registry.insert_using(IncompleteUsingDecl { decl: alias_decl, cst: cst.clone(), dependencies: deps, scope });
        }

        log::debug!(target: "phase0", "using `{}` complete={}", cst.name, is_complete);
        (Some(alias_decl), is_complete)
    }

    fn act_on_func_decl(&mut self, cst: &aurum_cst::FuncDecl) -> (Option<DeclId>, bool) {
        let owner = self.current_decl_context();
        let scope = self.current_scope();
        self.registry.push_func(IncompleteFuncDecl { cst: cst.clone(), owner, scope });
        (None, false)
    }
}

fn is_ptr_or_ref(specifiers: &[aurum_cst::Specifier]) -> bool {
    specifiers
        .iter()
        .any(|s| matches!(s.kind, SpecifierKind::Pointer | SpecifierKind::LValueRef | SpecifierKind::RValueRef))
}

/// Enumerator initializers only ever need to be a plain integer literal in
/// this implementation (§4.4's "Non-goals" excludes general constant-
/// expression evaluation beyond this).
fn const_eval_integral(expr: &aurum_cst::Expression) -> Option<i64> {
    match expr {
        aurum_cst::Expression::IntLiteral { value, .. } => Some(*value),
        aurum_cst::Expression::UIntLiteral { value, .. } => Some(*value as i64),
        _ => None,
    }
}
