//! A dependency edge recorded against an incomplete declaration (§3, §4.3).

use aurum_ast::DeclId;
use aurum_cst::QualifiedIdent;

#[derive(Debug, Clone, PartialEq)]
pub enum DependencyTarget {
    /// Not yet resolved to a declaration; holds the identifier as written.
    Name(QualifiedIdent),
    /// Resolved; the scheduler follows these edges directly.
    Decl(DeclId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dependency {
    target: DependencyTarget,
    strong: bool,
}

impl Dependency {
    pub fn by_name(name: QualifiedIdent, strong: bool) -> Self {
        Self {
            target: DependencyTarget::Name(name),
            strong,
        }
    }

    pub fn by_decl(decl: DeclId, strong: bool) -> Self {
        Self {
            target: DependencyTarget::Decl(decl),
            strong,
        }
    }

    pub fn is_strong(&self) -> bool {
        self.strong
    }

    pub fn set_strong(&mut self, strong: bool) {
        self.strong = strong;
    }

    pub fn name(&self) -> Option<&QualifiedIdent> {
        match &self.target {
            DependencyTarget::Name(n) => Some(n),
            DependencyTarget::Decl(_) => None,
        }
    }

    pub fn decl(&self) -> Option<DeclId> {
        match &self.target {
            DependencyTarget::Decl(d) => Some(*d),
            DependencyTarget::Name(_) => None,
        }
    }

    /// Converts a by-name dependency into a by-decl one after the
    /// scheduler's name-substitution pass resolves it.
    pub fn replace_name_with_decl(&mut self, decl: DeclId) {
        self.target = DependencyTarget::Decl(decl);
    }
}

/// Weakens every dependency in `deps` — used when a composed type's
/// specifier chain passes through a pointer or reference, making an
/// otherwise-strong prerequisite a legal forward reference (§4.4).
pub fn weaken_all(deps: &mut [Dependency]) {
    for dep in deps {
        dep.set_strong(false);
    }
}
