//! Dependency scheduler (§4.5): two passes over every incomplete
//! declaration collected by Phase-0 — substitute by-name dependencies to
//! by-decl ones, then topologically sort the strong-edge graph with a
//! DFS three-coloring cycle detector (§4.7).

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::errors::SemaError;
use crate::registry::IncompleteDeclId;
use crate::resolver::Resolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Grey,
    Black,
}

impl<'sink> Resolver<'sink> {
    /// For every by-name dependency still held by an incomplete
    /// declaration, looks the name up against the declaration's recorded
    /// scope and rewrites it to a by-decl dependency. A name that still
    /// doesn't resolve is reported `NotDeclared` and dropped — it can
    /// never become schedulable, so keeping it around would only make the
    /// topological sort chase a dead end.
    pub fn substitute_names(&mut self) {
        for id in self.registry.all_incomplete_ids() {
            let scope = self.registry.scope_of(id);
            let deps = self.registry.dependencies(id).to_vec();
            let mut resolved = Vec::with_capacity(deps.len());
            for mut dep in deps {
                if let Some(name) = dep.name().cloned() {
                    match self.lookup_named_type(scope, &name) {
                        Some(ty_id) => {
                            let decl_id = self
                                .user_defined_decl_id(ty_id)
                                .expect("a by-name dependency always resolves to a user-defined type");
                            dep.replace_name_with_decl(decl_id);
                            resolved.push(dep);
                        }
                        None => {
                            let candidates = self.scopes.all_type_names(scope);
                            let suggestion = aurum_diagnostics::fuzzy::find_similar_names(&name.display_name(), &candidates, 0.7, 1)
                                .into_iter()
                                .next();
                            SemaError::NotDeclared {
                                name: name.display_name(),
                                range: name.range(),
                                suggestion,
                            }
                            .report(self.sink);
                        }
                    }
                } else {
                    resolved.push(dep);
                }
            }
            *self.registry.dependencies_mut(id) = resolved;
            log::debug!(target: "schedule", "substituted names for {id:?}");
        }
    }

    /// Topologically orders every incomplete declaration by its strong,
    /// by-decl edges, using a DFS with the classic white/grey/black
    /// coloring (§4.7). A strong edge whose target is already complete
    /// (no longer present in the registry) imposes no ordering constraint
    /// and is skipped. The first cycle found is reported once and the
    /// scheduler halts (§7: "terminates the scheduler early"); every
    /// declaration completed before the halt is still returned in order,
    /// but the cycle's own members are left out — Phase-1 must leave them
    /// `Unresolved`.
    pub fn schedule(&mut self) -> Vec<IncompleteDeclId> {
        let all = self.registry.all_incomplete_ids();
        let mut colors: IndexMap<IncompleteDeclId, Color> = all.iter().map(|&id| (id, Color::White)).collect();
        let mut order = Vec::with_capacity(all.len());
        let mut path = Vec::new();
        let mut cyclic = HashSet::new();
        let mut halted = false;

        for id in all {
            if halted {
                break;
            }
            if colors[&id] == Color::White {
                self.visit(id, &mut colors, &mut order, &mut path, &mut cyclic, &mut halted);
            }
        }
        order
    }

    #[allow(clippy::too_many_arguments)]
    fn visit(
        &mut self,
        id: IncompleteDeclId,
        colors: &mut IndexMap<IncompleteDeclId, Color>,
        order: &mut Vec<IncompleteDeclId>,
        path: &mut Vec<IncompleteDeclId>,
        cyclic: &mut HashSet<IncompleteDeclId>,
        halted: &mut bool,
    ) {
        colors.insert(id, Color::Grey);
        path.push(id);

        let targets: Vec<IncompleteDeclId> = self
            .registry
            .dependencies(id)
            .iter()
            .filter(|d| d.is_strong())
            .filter_map(|d| d.decl())
            .filter_map(|d| self.registry.search_unfinished(&self.ast, d))
            .collect();

        for target in targets {
            if *halted {
                break;
            }
            match colors.get(&target).copied().unwrap_or(Color::Black) {
                Color::Black => continue,
                Color::Grey => {
                    let name = self.ast.decl(self.registry.decl_of(id)).name().to_string();
                    let range = self.registry.name_range(id);
                    SemaError::CircularDepend { name, range }.report(self.sink);

                    let start = path.iter().position(|&n| n == target).unwrap_or(0);
                    cyclic.extend(path[start..].iter().copied());
                    *halted = true;
                }
                Color::White => self.visit(target, colors, order, path, cyclic, halted),
            }
        }

        colors.insert(id, Color::Black);
        path.pop();
        if !cyclic.contains(&id) {
            order.push(id);
        }
        log::debug!(target: "schedule", "scheduled {id:?}");
    }
}
