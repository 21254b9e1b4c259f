//! Import planning.
//!
//! The planner turns the names collected by a discovery render into one
//! abbreviation level per name and the import section that makes those
//! abbreviations valid. Every name can always fall back to its full form, so
//! planning never fails: a collision only costs brevity.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use quill_core::{AbbreviationLevel, QualifiedName};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::{NamingPolicy, RenderConfig, imports::ImportTable, naming::NameResolver};

/// Result of planning: final levels and imports for the second render.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportPlan {
    levels: BTreeMap<QualifiedName, AbbreviationLevel>,
    imports: ImportTable,
    shadowed: Vec<QualifiedName>,
    dropped: Vec<QualifiedName>,
    pruned: Vec<QualifiedName>,
}

impl ImportPlan {
    /// A plan that prints every name in full and keeps `imports` as declared.
    pub fn canonical(imports: &ImportTable) -> Self {
        Self {
            imports: imports.clone(),
            ..Self::default()
        }
    }

    /// Level assigned to `name`; unknown names print in full.
    pub fn level(&self, name: &QualifiedName) -> AbbreviationLevel {
        self.levels
            .get(name)
            .copied()
            .unwrap_or(AbbreviationLevel::Full)
    }

    /// Every planned name with its level, ordered by canonical name.
    pub fn levels(&self) -> impl Iterator<Item = (&QualifiedName, AbbreviationLevel)> {
        self.levels.iter().map(|(name, level)| (name, *level))
    }

    /// The final import section.
    pub fn imports(&self) -> &ImportTable {
        &self.imports
    }

    /// Names forced to full qualification because another name owns their slot.
    pub fn shadowed(&self) -> &[QualifiedName] {
        &self.shadowed
    }

    /// Declared single imports dropped because another import owns their simple name.
    pub fn dropped(&self) -> &[QualifiedName] {
        &self.dropped
    }

    /// Declared single imports removed because no reference uses them.
    pub fn pruned(&self) -> &[QualifiedName] {
        &self.pruned
    }

    /// Whether an abbreviated reference relies on the single import `import`.
    fn uses(&self, import: &QualifiedName) -> bool {
        self.levels.iter().any(|(name, level)| match level {
            AbbreviationLevel::Full => false,
            AbbreviationLevel::Bare => name == import,
            AbbreviationLevel::Relative => name.top_level().as_ref() == Some(import),
        })
    }

    fn assign(&mut self, name: &QualifiedName, level: AbbreviationLevel) {
        trace!(name = %name, %level, "assigned");
        self.levels.insert(name.clone(), level);
    }

    fn shadow(&mut self, name: &QualifiedName) {
        trace!(name = %name, "shadowed");
        self.levels.insert(name.clone(), AbbreviationLevel::Full);
        self.shadowed.push(name.clone());
    }
}

impl NameResolver for ImportPlan {
    fn level(&self, name: &QualifiedName) -> AbbreviationLevel {
        ImportPlan::level(self, name)
    }
}

/// How a claimant would make its simple name visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// Wildcard import or the implicit namespace.
    OnDemand,
    /// A new single import.
    Import,
    /// Same package as the document, or the default package.
    Local,
}

impl Access {
    /// Package members shadow every on-demand import, so they outrank the
    /// other claimants. Everything else is decided by slot order.
    fn rank(&self) -> u8 {
        match self {
            Self::OnDemand | Self::Import => 0,
            Self::Local => 1,
        }
    }
}

/// A discovered name competing for a simple-name slot.
struct Candidate<'n> {
    name: &'n QualifiedName,
    /// The name that actually owns the slot: the top-level type for type
    /// references, the name itself for members and wildcard-covered nested types.
    holder: QualifiedName,
    access: Access,
    /// Level printed when the holder wins.
    level: AbbreviationLevel,
}

/// Computes an [`ImportPlan`] for one document.
///
/// # Example
///
/// ```
/// use quill_codegen::{AbbreviationLevel, ImportPlanner, ImportTable, RenderConfig};
/// use quill_core::QualifiedName;
///
/// let config = RenderConfig::default();
/// let explicit = ImportTable::new();
/// let util = QualifiedName::parse("java.util.List").unwrap();
/// let awt = QualifiedName::parse("java.awt.List").unwrap();
///
/// let plan = ImportPlanner::new("com.example", &explicit, &config).plan([&util, &awt]);
/// assert_eq!(plan.level(&awt), AbbreviationLevel::Relative);
/// assert_eq!(plan.level(&util), AbbreviationLevel::Full);
/// assert!(plan.imports().contains_type(&awt));
/// ```
pub struct ImportPlanner<'a> {
    package: &'a str,
    explicit: &'a ImportTable,
    config: &'a RenderConfig,
    reserved: Vec<QualifiedName>,
}

impl<'a> ImportPlanner<'a> {
    pub fn new(package: &'a str, explicit: &'a ImportTable, config: &'a RenderConfig) -> Self {
        Self {
            package,
            explicit,
            config,
            reserved: Vec::new(),
        }
    }

    /// Reserve the simple names of types declared by the document itself.
    pub fn reserve(mut self, declared: impl IntoIterator<Item = QualifiedName>) -> Self {
        self.reserved.extend(declared);
        self
    }

    /// Plan levels and imports for the discovered names.
    ///
    /// With pruning on, declared single imports that no abbreviated reference
    /// relies on are removed and the names are planned again, until every
    /// remaining declared import is used.
    pub fn plan<'n, I>(&self, discovered: I) -> ImportPlan
    where
        I: IntoIterator<Item = &'n QualifiedName>,
    {
        if !self.config.naming.is_planned() {
            return ImportPlan::canonical(self.explicit);
        }

        let mut sorted: Vec<&QualifiedName> = discovered.into_iter().collect();
        sorted.sort_by(|a, b| by_slot(a, b));
        sorted.dedup();

        let mut explicit = self.explicit.clone();
        let mut pruned = Vec::new();
        let mut plan = loop {
            let plan = self.plan_pass(&sorted, &explicit);
            if !self.config.prune_unused_imports {
                break plan;
            }
            let unused: Vec<QualifiedName> = explicit
                .types()
                .chain(explicit.statics())
                .filter(|import| {
                    plan.imports.contains_type(import) || plan.imports.contains_static(import)
                })
                .filter(|import| !plan.uses(import))
                .cloned()
                .collect();
            if unused.is_empty() {
                break plan;
            }
            for import in unused {
                debug!(import = %import, "pruning unused import");
                explicit.remove_type(&import);
                explicit.remove_static(&import);
                pruned.push(import);
            }
        };
        plan.pruned = pruned;

        for import in &plan.dropped {
            warn!(import = %import, "import collides with another one on its simple name, dropping it");
        }
        debug!(
            names = plan.levels.len(),
            imports = plan.imports.len(),
            shadowed = plan.shadowed.len(),
            dropped = plan.dropped.len(),
            pruned = plan.pruned.len(),
            "planned imports"
        );
        plan
    }

    /// One planning pass against a fixed set of declared imports.
    fn plan_pass<'n>(&self, sorted: &[&'n QualifiedName], explicit: &ImportTable) -> ImportPlan {
        let mut plan = ImportPlan {
            imports: explicit.wildcards_only(),
            ..ImportPlan::default()
        };
        let mut type_claims: HashMap<String, QualifiedName> = HashMap::new();
        let mut member_claims: HashMap<String, QualifiedName> = HashMap::new();

        for name in &self.reserved {
            type_claims
                .entry(name.last_segment().to_string())
                .or_insert_with(|| name.clone());
        }
        claim_explicit(explicit, &mut type_claims, &mut member_claims, &mut plan);

        let mut type_slots: IndexMap<String, Vec<Candidate<'n>>> = IndexMap::new();
        let mut member_slots: IndexMap<String, Vec<Candidate<'n>>> = IndexMap::new();

        for &name in sorted {
            if name.is_package() {
                plan.assign(name, AbbreviationLevel::Full);
            } else if name.is_member() {
                if plan.imports.contains_static(name) {
                    plan.assign(name, AbbreviationLevel::Bare);
                    continue;
                }
                let key = name.last_segment();
                if member_claims.contains_key(key) {
                    plan.shadow(name);
                    continue;
                }
                match self.member_access(name, &plan.imports) {
                    Some(access) => member_slots.entry(key.to_string()).or_default().push(
                        Candidate {
                            name,
                            holder: name.clone(),
                            access,
                            level: AbbreviationLevel::Bare,
                        },
                    ),
                    None => plan.assign(name, AbbreviationLevel::Full),
                }
            } else {
                if plan.imports.contains_type(name) {
                    plan.assign(name, AbbreviationLevel::Bare);
                    continue;
                }
                // `import java.util.Map.*;` makes `Entry` visible on its own
                let key = name.last_segment();
                if !name.is_top_level()
                    && plan.imports.covers_type(name)
                    && !type_claims.contains_key(key)
                {
                    type_slots.entry(key.to_string()).or_default().push(Candidate {
                        name,
                        holder: name.clone(),
                        access: Access::OnDemand,
                        level: AbbreviationLevel::Bare,
                    });
                    continue;
                }
                let Some(top) = name.top_level() else {
                    plan.assign(name, AbbreviationLevel::Full);
                    continue;
                };
                let key = top.last_segment().to_string();
                if let Some(holder) = type_claims.get(&key) {
                    if *holder == top {
                        plan.assign(name, AbbreviationLevel::Relative);
                    } else {
                        plan.shadow(name);
                    }
                    continue;
                }
                match self.type_access(&top, &plan.imports) {
                    Some(access) => type_slots.entry(key).or_default().push(Candidate {
                        name,
                        holder: top,
                        access,
                        level: AbbreviationLevel::Relative,
                    }),
                    None => plan.assign(name, AbbreviationLevel::Full),
                }
            }
        }

        for candidates in type_slots.into_values() {
            self.settle(candidates, false, &mut plan);
        }
        for candidates in member_slots.into_values() {
            self.settle(candidates, true, &mut plan);
        }
        plan
    }

    fn type_access(&self, top: &QualifiedName, imports: &ImportTable) -> Option<Access> {
        if top.in_package(self.package) || top.package_name().is_empty() {
            Some(Access::Local)
        } else if self.config.is_implicit(top) || imports.covers_type(top) {
            Some(Access::OnDemand)
        } else if self.config.naming == NamingPolicy::AutoImport {
            Some(Access::Import)
        } else {
            None
        }
    }

    fn member_access(&self, member: &QualifiedName, imports: &ImportTable) -> Option<Access> {
        if imports.covers_static(member) {
            Some(Access::OnDemand)
        } else if self.config.naming == NamingPolicy::AutoImport {
            Some(Access::Import)
        } else {
            None
        }
    }

    /// Pick the owner of one slot and assign levels to all its claimants.
    ///
    /// The strongest access wins; ties go to the holder that sorts first. Two distinct on-demand claimants are ambiguous, so the winner
    /// needs a single import to stay abbreviated.
    fn settle(&self, candidates: Vec<Candidate<'_>>, member: bool, plan: &mut ImportPlan) {
        let Some(best) = candidates.iter().map(|c| c.access.rank()).max() else {
            return;
        };
        let Some(winner) = candidates
            .iter()
            .filter(|c| c.access.rank() == best)
            .min_by(|a, b| by_slot(&a.holder, &b.holder))
        else {
            return;
        };
        let holder = winner.holder.clone();
        let mut access = winner.access;

        let ambiguous = candidates
            .iter()
            .any(|c| c.holder != holder && c.access == Access::OnDemand);
        if access == Access::OnDemand && ambiguous {
            if self.config.naming == NamingPolicy::AutoImport {
                access = Access::Import;
            } else {
                for c in &candidates {
                    plan.shadow(c.name);
                }
                return;
            }
        }

        if access == Access::Import {
            if member {
                plan.imports.add_static(holder.clone());
            } else {
                plan.imports.add_type(holder.clone());
            }
        }

        for c in &candidates {
            if c.holder == holder {
                plan.assign(c.name, c.level);
            } else {
                plan.shadow(c.name);
            }
        }
    }
}

/// Register the declared single imports; they own their slots first.
fn claim_explicit(
    explicit: &ImportTable,
    type_claims: &mut HashMap<String, QualifiedName>,
    member_claims: &mut HashMap<String, QualifiedName>,
    plan: &mut ImportPlan,
) {
    let mut types: Vec<&QualifiedName> = explicit.types().collect();
    types.sort_by(|a, b| by_slot(a, b));
    for import in types {
        if claim(type_claims, import) {
            plan.imports.add_type(import.clone());
        } else {
            plan.dropped.push(import.clone());
        }
    }

    let mut statics: Vec<&QualifiedName> = explicit.statics().collect();
    statics.sort_by(|a, b| by_slot(a, b));
    for import in statics {
        if claim(member_claims, import) {
            plan.imports.add_static(import.clone());
        } else {
            plan.dropped.push(import.clone());
        }
    }
}

/// Claim the simple name of `import` unless a different name holds it.
fn claim(claims: &mut HashMap<String, QualifiedName>, import: &QualifiedName) -> bool {
    match claims.get(import.last_segment()) {
        Some(holder) => holder == import,
        None => {
            claims.insert(import.last_segment().to_string(), import.clone());
            true
        }
    }
}

/// Deterministic slot order: simple name first, then canonical name.
fn by_slot(a: &QualifiedName, b: &QualifiedName) -> std::cmp::Ordering {
    a.last_segment()
        .cmp(b.last_segment())
        .then_with(|| a.canonical().cmp(b.canonical()))
}
