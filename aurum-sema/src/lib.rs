//! The Aurum semantic analyzer: a two-phase declaration resolver that turns
//! a parsed `aurum_cst::File` into a fully typed `aurum_ast::AstContext`
//! (§2). Phase-0 (`resolver0`) walks the CST and resolves whatever it
//! immediately can, recording a `Dependency` for everything else in the
//! `IncompleteRegistry`; the scheduler (`scheduler`) topologically orders
//! what's left and reports cycles; Phase-1 (`resolver1`) re-enters every
//! remaining declaration now that all names bind, then types every
//! deferred function body.

pub mod dependency;
pub mod errors;
pub mod registry;
pub mod resolver;
pub mod resolver0;
pub mod resolver1;
pub mod scheduler;
pub mod scope;

pub use dependency::{weaken_all, Dependency, DependencyTarget};
pub use errors::SemaError;
pub use registry::{
    IncompleteDeclId, IncompleteFuncDecl, IncompleteRegistry, IncompleteTagDecl,
    IncompleteUsingDecl, IncompleteValueCtorDecl, IncompleteVarDecl,
};
pub use resolver::Resolver;
pub use scope::{Scope, ScopeFlags, ScopeId, ScopeStack};

use aurum_ast::{AstContext, DeclId};
use aurum_diagnostics::DiagnosticSink;

/// Configuration for a single analysis run. Currently just toggles whether
/// Phase-1 translates deferred function bodies at all, so a caller that only
/// cares about declaration shapes (e.g. a symbol browser) can skip expression
/// typing entirely.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub translate_function_bodies: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            translate_function_bodies: true,
        }
    }
}

/// The fully resolved output of one analysis run: the AST context every
/// declaration and type now lives in, the translation unit's own `DeclId`,
/// and the `DeclId`s of every function Phase-1 translated (in registration
/// order, not source order — §4.6).
pub struct Analysis {
    pub ast: AstContext,
    pub trans_unit: DeclId,
    pub functions: Vec<DeclId>,
}

/// Runs the full pipeline (§2's data-flow: CST → C5 → C6 → C7) over one
/// translation unit and returns the resulting AST. Diagnostics are reported
/// to `sink` as they're found; a caller checks `sink.has_errors()` (on a
/// `CollectingSink`) to decide whether the analysis is usable.
pub fn analyze(file: &aurum_cst::File, sink: &dyn DiagnosticSink, options: Options) -> Analysis {
    let mut resolver = Resolver::new(sink);

    log::info!(target: "phase0", "starting phase 0");
    let trans_unit = resolver.act_on_trans_unit(file);

    log::info!(target: "schedule", "substituting names and scheduling");
    resolver.substitute_names();
    let order = resolver.schedule();

    log::info!(target: "phase1", "starting phase 1 over {} finished declarations", order.len());
    resolver.post_translate(&order);

    let functions = if options.translate_function_bodies {
        let funcs = std::mem::take(&mut resolver.registry.funcs);
        resolver.translate_functions(&funcs)
    } else {
        Vec::new()
    };

    Analysis {
        ast: resolver.ast,
        trans_unit,
        functions,
    }
}
