//! End-to-end coverage for the six scenarios the resolver's design is built
//! around: nested-name lookup, linear and cyclic strong dependencies, a
//! weak edge through a pointer, enumerator defaulting, and qualifier
//! deduplication.

use aurum_ast::{BuiltinTypeId, Decl, Type as AstType};
use aurum_cst::{
    ClassDecl, DeclSpec, EnumDecl, EnumeratorDecl, File, Item, QualifiedIdent, Specifier,
    SpecifierKind, Type as CstType, VarDecl,
};
use aurum_diagnostics::{codes, CollectingSink, SourceRange};
use aurum_sema::{IncompleteDeclId, Options, Resolver};

/// Lets `RUST_LOG=aurum_sema=debug cargo test -- --nocapture` show the
/// `phase0`/`schedule`/`phase1` trace lines (§7); harmless no-op otherwise.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn r() -> SourceRange {
    SourceRange::new(0, 0, 1)
}

fn ident(name: &str) -> QualifiedIdent {
    QualifiedIdent::single(name, r())
}

fn builtin(id: BuiltinTypeId) -> CstType {
    CstType::Builtin { id, range: r() }
}

fn named(name: &str) -> CstType {
    CstType::Named(ident(name))
}

fn var(name: &str, declared_type: CstType) -> VarDecl {
    VarDecl {
        spec: DeclSpec::empty(),
        name: name.to_string(),
        name_range: r(),
        declared_type,
        range: r(),
    }
}

fn class(name: &str, members: Vec<Item>) -> ClassDecl {
    ClassDecl {
        name: name.to_string(),
        name_range: r(),
        members,
        range: r(),
    }
}

// -- Scenario 1: nested name lookup ------------------------------------------

#[test]
fn nested_name_lookup_resolves_distinct_types() {
    init_logging();
    let a = class("A", vec![Item::Class(class("C", vec![Item::Var(var("a", builtin(BuiltinTypeId::I8)))]))]);
    let b = class("B", vec![Item::Class(class("C", vec![Item::Var(var("b", builtin(BuiltinTypeId::I16)))]))]);
    let file = File { imports: vec![], items: vec![Item::Class(a), Item::Class(b)] };

    let sink = CollectingSink::new();
    let analysis = aurum_sema::analyze(&file, &sink, Options::default());
    assert!(!sink.has_errors());

    let top: Vec<_> = match analysis.ast.decl(analysis.trans_unit) {
        Decl::TransUnit(tu) => tu.children.clone(),
        _ => panic!("translation unit decl was not a TransUnit"),
    };
    assert_eq!(top.len(), 2);

    let mut nested_var_type = Vec::new();
    let mut self_types = Vec::new();
    for outer in &top {
        let Decl::Class(outer_class) = analysis.ast.decl(*outer) else {
            panic!("expected class decl");
        };
        let nested_id = outer_class.children[0];
        let Decl::Class(nested_class) = analysis.ast.decl(nested_id) else {
            panic!("expected nested class decl");
        };
        self_types.push(nested_class.self_type);
        let field_id = nested_class.children[0];
        let Decl::Variable(field) = analysis.ast.decl(field_id) else {
            panic!("expected variable decl");
        };
        let ty = field.ty.expect("field type resolved");
        nested_var_type.push(analysis.ast.type_of(ty.ty).clone());
    }

    assert_ne!(self_types[0], self_types[1], "A::C and B::C must be distinct user-defined types");
    assert_eq!(nested_var_type[0], AstType::Builtin(BuiltinTypeId::I8));
    assert_eq!(nested_var_type[1], AstType::Builtin(BuiltinTypeId::I16));
}

// -- Scenario 2: linear strong dependencies ----------------------------------

#[test]
fn linear_strong_dependencies_schedule_prerequisites_first() {
    init_logging();
    let hadoop = class(
        "hadoop",
        vec![
            Item::Var(var("dep_chrono", named("chrono"))),
            Item::Var(var("dep_container", named("container"))),
            Item::Var(var("dep_filesystem", named("filesystem"))),
        ],
    );
    let chrono = class("chrono", vec![Item::Var(var("dep_support", named("support")))]);
    let filesystem = class(
        "filesystem",
        vec![
            Item::Var(var("dep_chrono", named("chrono"))),
            Item::Var(var("dep_container", named("container"))),
        ],
    );
    let container = class("container", vec![Item::Var(var("dep_support", named("support")))]);
    let support = class("support", vec![]);

    let file = File {
        imports: vec![],
        items: vec![
            Item::Class(hadoop),
            Item::Class(chrono),
            Item::Class(filesystem),
            Item::Class(container),
            Item::Class(support),
        ],
    };

    let sink = CollectingSink::new();
    let mut resolver = Resolver::new(&sink);
    resolver.act_on_trans_unit(&file);
    resolver.substitute_names();
    let order = resolver.schedule();
    assert!(!sink.has_errors());

    let tag_order: Vec<String> = order
        .into_iter()
        .filter_map(|id| match id {
            IncompleteDeclId::Tag(d) => Some(resolver.ast.decl(d).name().to_string()),
            _ => None,
        })
        .collect();

    let pos = |name: &str| tag_order.iter().position(|n| n == name).unwrap_or_else(|| panic!("`{name}` missing from schedule"));

    assert!(pos("chrono") < pos("hadoop"));
    assert!(pos("container") < pos("hadoop"));
    assert!(pos("filesystem") < pos("hadoop"));
    assert!(pos("chrono") < pos("filesystem"));
    assert!(pos("container") < pos("filesystem"));
    // support has no incomplete field and resolves entirely in phase 0, so it
    // never enters the schedule at all — trivially "first".
    assert!(!tag_order.contains(&"support".to_string()));
}

// -- Scenario 3: cyclic strong dependencies -----------------------------------

#[test]
fn cyclic_strong_dependencies_report_once_and_exclude_the_cycle() {
    init_logging();
    let fork = class("fork", vec![Item::Var(var("dep_knife", named("knife")))]);
    let knife = class("knife", vec![Item::Var(var("dep_fork", named("fork")))]);
    let file = File { imports: vec![], items: vec![Item::Class(fork), Item::Class(knife)] };

    let sink = CollectingSink::new();
    let mut resolver = Resolver::new(&sink);
    resolver.act_on_trans_unit(&file);
    resolver.substitute_names();
    let order = resolver.schedule();

    let circular_count = sink.diagnostics().iter().filter(|d| d.code == codes::CIRCULAR_DEPEND).count();
    assert_eq!(circular_count, 1);

    let tag_names: Vec<String> = order
        .into_iter()
        .filter_map(|id| match id {
            IncompleteDeclId::Tag(d) => Some(resolver.ast.decl(d).name().to_string()),
            _ => None,
        })
        .collect();
    assert!(!tag_names.contains(&"fork".to_string()));
    assert!(!tag_names.contains(&"knife".to_string()));
}

// -- Scenario 4: weak edge through a pointer ----------------------------------

#[test]
fn self_referential_pointer_field_is_a_weak_edge() {
    init_logging();
    let node = class(
        "Node",
        vec![Item::Var(var(
            "next",
            CstType::Composed {
                root: Box::new(named("Node")),
                specifiers: vec![Specifier::new(SpecifierKind::Pointer, r())],
            },
        ))],
    );
    let file = File { imports: vec![], items: vec![Item::Class(node)] };

    let sink = CollectingSink::new();
    let analysis = aurum_sema::analyze(&file, &sink, Options::default());
    assert!(!sink.has_errors());

    let top = match analysis.ast.decl(analysis.trans_unit) {
        Decl::TransUnit(tu) => tu.children.clone(),
        _ => panic!("translation unit decl was not a TransUnit"),
    };
    let Decl::Class(node_class) = analysis.ast.decl(top[0]) else {
        panic!("expected class decl");
    };
    let Decl::Variable(next_field) = analysis.ast.decl(node_class.children[0]) else {
        panic!("expected variable decl");
    };
    let ty = next_field.ty.expect("pointer field resolved by phase 1");
    match analysis.ast.type_of(ty.ty) {
        AstType::Pointer(pointee) => match analysis.ast.type_of(pointee.ty) {
            AstType::UserDefined(aurum_ast::UserDefinedType::Class(decl_id)) => {
                assert_eq!(*decl_id, top[0]);
            }
            other => panic!("expected pointer to point at Node, got {other:?}"),
        },
        other => panic!("expected a pointer type, got {other:?}"),
    }
}

// -- Scenario 5: enumerator defaulting ----------------------------------------

#[test]
fn enumerator_values_default_from_previous_plus_one() {
    init_logging();
    fn enumerator(name: &str, init: Option<i64>) -> EnumeratorDecl {
        EnumeratorDecl {
            name: name.to_string(),
            name_range: r(),
            init: init.map(|v| aurum_cst::Expression::IntLiteral { value: v, range: r() }),
            range: r(),
        }
    }

    let e = EnumDecl {
        name: "E".to_string(),
        name_range: r(),
        enumerators: vec![
            enumerator("A", None),
            enumerator("B", Some(5)),
            enumerator("C", None),
            enumerator("D", None),
        ],
        range: r(),
    };
    let file = File { imports: vec![], items: vec![Item::Enum(e)] };

    let sink = CollectingSink::new();
    let analysis = aurum_sema::analyze(&file, &sink, Options::default());
    assert!(!sink.has_errors());

    let top = match analysis.ast.decl(analysis.trans_unit) {
        Decl::TransUnit(tu) => tu.children.clone(),
        _ => panic!("translation unit decl was not a TransUnit"),
    };
    let Decl::Enum(enum_decl) = analysis.ast.decl(top[0]) else {
        panic!("expected enum decl");
    };
    let values: Vec<i64> = enum_decl
        .enumerators
        .iter()
        .map(|id| match analysis.ast.decl(*id) {
            Decl::Enumerator(e) => e.value,
            _ => panic!("expected enumerator decl"),
        })
        .collect();
    assert_eq!(values, vec![0, 5, 6, 7]);
}

#[test]
fn duplicate_enumerator_name_reports_one_redeclaration() {
    init_logging();
    fn enumerator(name: &str) -> EnumeratorDecl {
        EnumeratorDecl { name: name.to_string(), name_range: r(), init: None, range: r() }
    }

    let e = EnumDecl {
        name: "E".to_string(),
        name_range: r(),
        enumerators: vec![enumerator("A"), enumerator("A")],
        range: r(),
    };
    let file = File { imports: vec![], items: vec![Item::Enum(e)] };

    let sink = CollectingSink::new();
    let _ = aurum_sema::analyze(&file, &sink, Options::default());

    let redecl_count = sink.diagnostics().iter().filter(|d| d.code == codes::REDECLARATION).count();
    assert_eq!(redecl_count, 1);
}

// -- Scenario 6: duplicate qualifier ------------------------------------------

#[test]
fn duplicate_const_qualifier_reports_once_and_stays_idempotent() {
    init_logging();
    let declared_type = CstType::Composed {
        root: Box::new(builtin(BuiltinTypeId::I32)),
        specifiers: vec![
            Specifier::new(SpecifierKind::Const, SourceRange::new(0, 10, 15)),
            Specifier::new(SpecifierKind::Const, SourceRange::new(0, 16, 21)),
        ],
    };
    let file = File { imports: vec![], items: vec![Item::Var(var("x", declared_type))] };

    let sink = CollectingSink::new();
    let analysis = aurum_sema::analyze(&file, &sink, Options::default());

    let dup_diags: Vec<_> = sink.diagnostics().iter().filter(|d| d.code == codes::DUPLICATE_QUAL).cloned().collect();
    assert_eq!(dup_diags.len(), 1);
    assert_eq!(dup_diags[0].range, SourceRange::new(0, 16, 21));

    let top = match analysis.ast.decl(analysis.trans_unit) {
        Decl::TransUnit(tu) => tu.children.clone(),
        _ => panic!("translation unit decl was not a TransUnit"),
    };
    let Decl::Variable(x) = analysis.ast.decl(top[0]) else {
        panic!("expected variable decl");
    };
    let ty = x.ty.expect("builtin type resolves immediately");
    assert!(ty.is_const());
    assert!(!ty.is_volatile());
    assert_eq!(*analysis.ast.type_of(ty.ty), AstType::Builtin(BuiltinTypeId::I32));
}
