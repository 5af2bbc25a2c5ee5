//! Phase-1 resolver (§4.6): re-enters every incomplete declaration now
//! that every name in the translation unit binds, finalizes the AST
//! nodes Phase-0 left partial, and types every deferred function body.

use aurum_ast::{
    BuiltinTypeId, CastStep, Decl, DeclId, FunctionDecl, ParamDecl, QualType, TypedBlock,
    TypedExpr, TypedStmt, Type as AstType, ValueCategory, VariableDecl,
};
use aurum_cst::{BinaryOp, CastKind, FloatWidth, QualifiedIdent, SpecifierKind, UnaryOp};

use crate::errors::SemaError;
use crate::registry::IncompleteDeclId;
use crate::resolver::Resolver;
use crate::scope::{ScopeFlags, ScopeId};

impl<'sink> Resolver<'sink> {
    /// Dispatches each scheduled incomplete declaration to its finisher
    /// (§4.6). `order` is the scheduler's output — already excludes
    /// declarations left on a reported cycle, which therefore stay
    /// `Unresolved` forever (§7).
    pub fn post_translate(&mut self, order: &[IncompleteDeclId]) {
        for &id in order {
            match id {
                IncompleteDeclId::Var(decl) => self.post_translate_var(decl),
                IncompleteDeclId::Tag(_) => {
                    // A tag's completeness follows entirely from its
                    // members completing; there is nothing to fill in here.
                }
                IncompleteDeclId::ValueCtor(decl) => self.post_translate_value_ctor(decl),
                IncompleteDeclId::Using(decl) => self.post_translate_using(decl),
            }
        }
    }

    fn post_translate_var(&mut self, decl: DeclId) {
        let entry = &self.registry.vars[&decl];
        let scope = entry.scope;
        let cst_ty = entry.cst.declared_type.clone();
        let ty = self.resolve_type_complete(scope, &cst_ty);
        self.ast.set_var_type(decl, ty);
        log::debug!(target: "phase1", "var `{}` finalized", self.ast.decl(decl).name());
    }

    fn post_translate_value_ctor(&mut self, decl: DeclId) {
        let entry = &self.registry.value_ctors[&decl];
        let scope = entry.scope;
        let cst_ty = entry.cst.underlying.clone();
        let ty = self.resolve_type_complete(scope, &cst_ty);
        self.ast.set_value_ctor_type(decl, ty);
        log::debug!(target: "phase1", "value-ctor `{}` finalized", self.ast.decl(decl).name());
    }

    fn post_translate_using(&mut self, decl: DeclId) {
        let entry = &self.registry.usings[&decl];
        let scope = entry.scope;
        let cst_ty = entry.cst.aliasee.clone();
        let aliasee = self.resolve_type_complete(scope, &cst_ty);
        self.ast.fill_aliasee(decl, aliasee);
        log::debug!(target: "phase1", "using `{}` finalized", self.ast.decl(decl).name());
    }

    // -- Phase-1 type resolution --------------------------------------------

    /// Mirrors Phase-0's `resolve_type` but asserts resolvability instead
    /// of deferring: every name it touches now binds, because this only
    /// ever runs on declarations the scheduler placed after their strong
    /// prerequisites (§4.6).
    pub(crate) fn resolve_type_complete(&mut self, scope: ScopeId, ty: &aurum_cst::Type) -> QualType {
        use aurum_cst::Type as CstType;
        match ty {
            CstType::Builtin { id, .. } => QualType::unqualified(self.ast.get_builtin(*id)),
            CstType::Named(ident) => {
                let ty_id = self
                    .lookup_named_type(scope, ident)
                    .unwrap_or_else(|| panic!("Phase-1: `{}` still unresolved", ident.display_name()));
                QualType::unqualified(ty_id)
            }
            CstType::Composed { root, specifiers } => {
                let mut qt = self.resolve_type_complete(scope, root);
                for spec in specifiers {
                    self.apply_specifier_silent(&mut qt, spec);
                }
                qt
            }
            CstType::Array { element, size, .. } => {
                let elem = self.resolve_type_complete(scope, element);
                QualType::unqualified(self.ast.create_array(elem, *size))
            }
            CstType::Tuple { elements, .. } => {
                let resolved: Vec<QualType> = elements.iter().map(|e| self.resolve_type_complete(scope, e)).collect();
                QualType::unqualified(self.ast.create_tuple(resolved))
            }
            CstType::Templated { .. } => panic!("Phase-1: templated types are not implemented"),
        }
    }

    /// Identical to Phase-0's `apply_specifier` except it never diagnoses
    /// a duplicate qualifier — that was already reported once, at the
    /// syntactic position, in Phase-0 (§4.6).
    fn apply_specifier_silent(&mut self, qt: &mut QualType, spec: &aurum_cst::Specifier) {
        match spec.kind {
            SpecifierKind::Pointer => *qt = QualType::unqualified(self.ast.create_pointer(*qt)),
            SpecifierKind::LValueRef => *qt = QualType::unqualified(self.ast.create_lvalue_ref(*qt)),
            SpecifierKind::RValueRef => *qt = QualType::unqualified(self.ast.create_rvalue_ref(*qt)),
            SpecifierKind::Const => {
                qt.add_const();
            }
            SpecifierKind::Volatile => {
                qt.add_volatile();
            }
            SpecifierKind::Restrict => {
                qt.add_restrict();
            }
        }
    }

    // -- Functions ------------------------------------------------------------

    /// Builds the final `FunctionDecl` for every function Phase-0 deferred
    /// and attaches it to its owning declaration context (§4.6). Functions
    /// are never on the dependency graph the scheduler orders — every name
    /// they could reference is already visible by the time Phase-0 finishes
    /// the translation unit — so this always runs after `post_translate`.
    pub fn translate_functions(&mut self, funcs: &[crate::registry::IncompleteFuncDecl]) -> Vec<DeclId> {
        funcs
            .iter()
            .map(|entry| {
                let decl = self.translate_function(entry);
                self.ast.push_child(entry.owner, decl);
                decl
            })
            .collect()
    }

    fn translate_function(&mut self, entry: &crate::registry::IncompleteFuncDecl) -> DeclId {
        let params: Vec<ParamDecl> = entry
            .cst
            .params
            .iter()
            .map(|p| ParamDecl {
                name: p.name.clone(),
                ty: self.resolve_type_complete(entry.scope, &p.declared_type),
            })
            .collect();
        let return_type = self.resolve_type_complete(entry.scope, &entry.cst.return_type);

        let decl = self.ast.alloc_decl(Decl::Function(FunctionDecl {
            name: entry.cst.name.clone(),
            owner: entry.owner,
            params: params.clone(),
            return_type,
            children: Vec::new(),
            body: None,
        }));
        self.scopes.add_function(entry.scope, entry.cst.name.clone(), decl);

        let func_scope = self.push_scope_at(entry.scope, ScopeFlags::FUNCTION);
        self.push_decl_context(decl);

        for p in &params {
            let param_decl = self.ast.alloc_decl(Decl::Variable(VariableDecl {
                name: p.name.clone(),
                owner: decl,
                ty: Some(p.ty),
            }));
            self.scopes.add_var(func_scope, p.name.clone(), param_decl);
            if let Decl::Function(f) = self.ast.decl_mut(decl) {
                f.children.push(param_decl);
            }
        }

        let body = entry.cst.body.as_ref().map(|b| self.type_block(b, ScopeFlags::empty()));

        self.pop_decl_context();
        self.pop_scope();

        if let Decl::Function(f) = self.ast.decl_mut(decl) {
            f.body = body;
        }
        log::debug!(target: "phase1", "function `{}` typed", entry.cst.name);
        decl
    }

    // -- Statements -------------------------------------------------------------

    fn type_block(&mut self, block: &aurum_cst::Block, flags: ScopeFlags) -> TypedBlock {
        self.push_scope(flags);
        let statements = block.statements.iter().map(|s| self.type_stmt(s)).collect();
        self.pop_scope();
        TypedBlock { statements }
    }

    fn type_stmt(&mut self, stmt: &aurum_cst::Statement) -> TypedStmt {
        use aurum_cst::Statement;
        match stmt {
            Statement::Var(v) => TypedStmt::Var(self.type_local_var(v)),
            Statement::Expr { expr, .. } => TypedStmt::Expr(self.type_expr(expr)),
            Statement::Return { value, .. } => TypedStmt::Return(value.as_ref().map(|e| self.type_expr(e))),
            Statement::If { cond, then_branch, else_branch, .. } => TypedStmt::If {
                cond: self.type_expr(cond),
                then_branch: self.type_block(then_branch, ScopeFlags::empty()),
                else_branch: else_branch.as_ref().map(|b| self.type_block(b, ScopeFlags::empty())),
            },
            Statement::While { cond, body, .. } => TypedStmt::While {
                cond: self.type_expr(cond),
                body: self.type_block(body, ScopeFlags::LOOP),
            },
            Statement::Break { .. } => TypedStmt::Break,
            Statement::Continue { .. } => TypedStmt::Continue,
            Statement::Block(b) => TypedStmt::Block(self.type_block(b, ScopeFlags::empty())),
        }
    }

    fn type_local_var(&mut self, v: &aurum_cst::VarDecl) -> DeclId {
        let scope = self.current_scope();
        if self.scopes.lookup_type_local(scope, &v.name).is_some() {
            SemaError::Redefinition { name: v.name.clone(), range: v.name_range }.report(self.sink);
        }
        let owner = self.current_decl_context();
        let ty = self.resolve_type_complete(scope, &v.declared_type);
        let decl = self.ast.alloc_decl(Decl::Variable(VariableDecl { name: v.name.clone(), owner, ty: Some(ty) }));
        self.scopes.add_var(scope, v.name.clone(), decl);
        decl
    }

    // -- Expressions --------------------------------------------------------

    fn type_expr(&mut self, expr: &aurum_cst::Expression) -> TypedExpr {
        use aurum_cst::Expression;
        match expr {
            Expression::IntLiteral { value, .. } => TypedExpr::IntLiteral {
                value: *value,
                ty: QualType::unqualified(self.ast.get_builtin(BuiltinTypeId::I32)),
            },
            Expression::UIntLiteral { value, .. } => TypedExpr::UIntLiteral {
                value: *value,
                ty: QualType::unqualified(self.ast.get_builtin(BuiltinTypeId::U32)),
            },
            Expression::FloatLiteral { value, width, .. } => TypedExpr::FloatLiteral {
                value: *value,
                ty: QualType::unqualified(self.ast.get_builtin(float_builtin(*width))),
            },
            Expression::BoolLiteral { value, .. } => TypedExpr::BoolLiteral {
                value: *value,
                ty: QualType::unqualified(self.ast.get_builtin(BuiltinTypeId::Bool)),
            },
            Expression::CharLiteral { value, .. } => TypedExpr::CharLiteral {
                value: *value,
                ty: QualType::unqualified(self.ast.get_builtin(BuiltinTypeId::I8)),
            },
            Expression::StringLiteral { value, .. } => {
                let char_ty = QualType::new(self.ast.get_builtin(BuiltinTypeId::I8), aurum_ast::Qualifiers::CONST);
                TypedExpr::StringLiteral {
                    value: value.clone(),
                    ty: QualType::unqualified(self.ast.create_pointer(char_ty)),
                }
            }
            Expression::NullLiteral { .. } => {
                let void_ty = QualType::unqualified(self.ast.get_builtin(BuiltinTypeId::Void));
                TypedExpr::NullLiteral { ty: QualType::unqualified(self.ast.create_pointer(void_ty)) }
            }
            Expression::IdRef(ident) => self.type_id_ref(ident),
            Expression::Paren { inner, .. } => {
                let inner = self.type_expr(inner);
                let ty = inner.ty();
                let category = inner.category();
                TypedExpr::Paren { inner: Box::new(inner), ty, category }
            }
            Expression::Unary { op, operand, range } => self.type_unary(*op, operand, *range),
            Expression::Binary { op, lhs, rhs, range } => self.type_binary(*op, lhs, rhs, *range),
            Expression::Assign { lhs, rhs, range } => self.type_assign(lhs, rhs, *range),
            Expression::Cond { cond, then_branch, else_branch, .. } => self.type_cond(cond, then_branch, else_branch),
            Expression::Cast { kind, target, operand, .. } => self.type_cast(*kind, target, operand),
        }
    }

    fn type_id_ref(&mut self, ident: &QualifiedIdent) -> TypedExpr {
        let scope = self.current_scope();
        let name = ident.segments.last().expect("a qualified identifier always has at least one segment");
        match self.scopes.lookup_var(scope, &name.name) {
            Some(decl) => {
                let ty = match self.ast.decl(decl) {
                    Decl::Variable(v) => v.ty.expect("every variable is typed by the time a function body is translated"),
                    other => panic!("IdRef resolved to non-variable decl: {other:?}"),
                };
                TypedExpr::IdRef { decl, ty }
            }
            None => {
                let candidates = self.scopes.all_var_names(scope);
                let suggestion = aurum_diagnostics::fuzzy::find_similar_names(&name.name, &candidates, 0.7, 1)
                    .into_iter()
                    .next();
                SemaError::NotDeclared { name: ident.display_name(), range: ident.range(), suggestion }.report(self.sink);
                TypedExpr::NullLiteral { ty: QualType::unqualified(self.ast.get_builtin(BuiltinTypeId::Void)) }
            }
        }
    }

    fn type_unary(&mut self, op: UnaryOp, operand: &aurum_cst::Expression, range: aurum_diagnostics::SourceRange) -> TypedExpr {
        let _ = range;
        let operand = self.type_expr(operand);
        match op {
            UnaryOp::AddrOf => {
                debug_assert_eq!(operand.category(), ValueCategory::LValue, "`&` requires an addressable operand");
                let ty = QualType::unqualified(self.ast.create_pointer(operand.ty()));
                TypedExpr::Unary { op, operand: Box::new(operand), ty, category: ValueCategory::RValue }
            }
            UnaryOp::Deref => {
                let pointee = match self.ast.type_of(operand.ty().ty) {
                    AstType::Pointer(q) => *q,
                    other => panic!("`*` applied to non-pointer type: {other:?}"),
                };
                TypedExpr::Unary { op, operand: Box::new(operand), ty: pointee, category: ValueCategory::LValue }
            }
            UnaryOp::Neg | UnaryOp::BitNot | UnaryOp::Not => {
                let ty = operand.ty();
                TypedExpr::Unary { op, operand: Box::new(operand), ty, category: ValueCategory::RValue }
            }
        }
    }

    fn type_binary(
        &mut self,
        op: BinaryOp,
        lhs: &aurum_cst::Expression,
        rhs: &aurum_cst::Expression,
        range: aurum_diagnostics::SourceRange,
    ) -> TypedExpr {
        let _ = range;
        let lhs = self.type_expr(lhs);
        let rhs = self.type_expr(rhs);
        let ty = match op {
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge
            | BinaryOp::And
            | BinaryOp::Or => QualType::unqualified(self.ast.get_builtin(BuiltinTypeId::Bool)),
            _ => {
                debug_assert_eq!(lhs.ty(), rhs.ty(), "binary operands must agree in type");
                lhs.ty()
            }
        };
        TypedExpr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), ty }
    }

    fn type_assign(&mut self, lhs: &aurum_cst::Expression, rhs: &aurum_cst::Expression, range: aurum_diagnostics::SourceRange) -> TypedExpr {
        let _ = range;
        let lhs = self.type_expr(lhs);
        let rhs = self.type_expr(rhs);
        debug_assert_eq!(lhs.category(), ValueCategory::LValue, "assignment requires an addressable left-hand side");
        debug_assert_eq!(lhs.ty(), rhs.ty(), "assignment requires compatible operand types");
        let ty = lhs.ty();
        TypedExpr::Assign { lhs: Box::new(lhs), rhs: Box::new(rhs), ty }
    }

    fn type_cond(&mut self, cond: &aurum_cst::Expression, then_branch: &aurum_cst::Expression, else_branch: &aurum_cst::Expression) -> TypedExpr {
        let cond = self.type_expr(cond);
        let then_branch = self.type_expr(then_branch);
        let else_branch = self.type_expr(else_branch);
        debug_assert_eq!(then_branch.ty(), else_branch.ty(), "both branches of `?:` must agree in type");
        let ty = then_branch.ty();
        let category = if then_branch.category() == ValueCategory::LValue && else_branch.category() == ValueCategory::LValue {
            ValueCategory::LValue
        } else {
            ValueCategory::RValue
        };
        TypedExpr::Cond {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
            ty,
            category,
        }
    }

    fn type_cast(&mut self, kind: CastKind, target: &aurum_cst::Type, operand: &aurum_cst::Expression) -> TypedExpr {
        let scope = self.current_scope();
        let operand = self.type_expr(operand);
        let target_ty = self.resolve_type_complete(scope, target);
        let steps = match kind {
            CastKind::Static => static_cast_steps(self.ast.type_of(operand.ty().ty), self.ast.type_of(target_ty.ty), operand.ty(), target_ty),
            CastKind::Const | CastKind::Bit => Vec::new(),
        };
        TypedExpr::Cast { kind, steps, operand: Box::new(operand), ty: target_ty }
    }
}

fn float_builtin(width: FloatWidth) -> BuiltinTypeId {
    match width {
        FloatWidth::R32 => BuiltinTypeId::R32,
        FloatWidth::R64 => BuiltinTypeId::R64,
        FloatWidth::R128 => BuiltinTypeId::R128,
    }
}

fn int_rank(id: BuiltinTypeId) -> Option<u8> {
    match id {
        BuiltinTypeId::I8 => Some(1),
        BuiltinTypeId::I16 => Some(2),
        BuiltinTypeId::I32 => Some(3),
        BuiltinTypeId::I64 => Some(4),
        _ => None,
    }
}

fn uint_rank(id: BuiltinTypeId) -> Option<u8> {
    match id {
        BuiltinTypeId::U8 => Some(1),
        BuiltinTypeId::U16 => Some(2),
        BuiltinTypeId::U32 => Some(3),
        BuiltinTypeId::U64 => Some(4),
        _ => None,
    }
}

fn float_rank(id: BuiltinTypeId) -> Option<u8> {
    match id {
        BuiltinTypeId::R32 => Some(1),
        BuiltinTypeId::R64 => Some(2),
        BuiltinTypeId::R128 => Some(3),
        _ => None,
    }
}

/// Classifies a `static` cast between two resolved types into its step
/// chain (§4.6). Pointer/reference-qualifier-only adjustments and
/// cross-kind numeric conversions each get their own step; anything this
/// implementation can't classify more precisely falls back to a plain
/// qualifier adjustment, since a `static` cast always carries a non-empty
/// chain.
fn static_cast_steps(from: &AstType, to: &AstType, from_qt: QualType, to_qt: QualType) -> Vec<CastStep> {
    if from_qt.ty == to_qt.ty {
        return vec![CastStep::AdjustQual];
    }
    match (from, to) {
        (AstType::Builtin(f), AstType::Builtin(t)) => {
            if let (Some(fr), Some(tr)) = (int_rank(*f), int_rank(*t)) {
                return vec![if tr > fr { CastStep::IntPromote } else { CastStep::IntDowngrade }];
            }
            if let (Some(fr), Some(tr)) = (uint_rank(*f), uint_rank(*t)) {
                return vec![if tr > fr { CastStep::UIntPromote } else { CastStep::UIntDowngrade }];
            }
            if let (Some(fr), Some(tr)) = (float_rank(*f), float_rank(*t)) {
                return vec![if tr > fr { CastStep::FloatPromote } else { CastStep::FloatDowngrade }];
            }
            if int_rank(*f).is_some() && uint_rank(*t).is_some() {
                return vec![CastStep::SignedToUnsigned];
            }
            if uint_rank(*f).is_some() && int_rank(*t).is_some() {
                return vec![CastStep::UnsignedToSigned];
            }
            if (int_rank(*f).is_some() || uint_rank(*f).is_some()) && float_rank(*t).is_some() {
                return vec![CastStep::IntToFloat];
            }
            if float_rank(*f).is_some() && (int_rank(*t).is_some() || uint_rank(*t).is_some()) {
                return vec![CastStep::FloatToInt];
            }
            vec![CastStep::AdjustQual]
        }
        (AstType::Pointer(_), AstType::Pointer(_)) => vec![CastStep::AdjustPointerQual],
        (AstType::LValueRef(_), AstType::LValueRef(_)) | (AstType::RValueRef(_), AstType::RValueRef(_)) => vec![CastStep::AdjustRefQual],
        _ => vec![CastStep::AdjustQual],
    }
}
