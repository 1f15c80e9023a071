//! Relationship analysis: cycle detection, per-table degrees and fill order.
//!
//! Cycles are detected per relation rather than per table pair, so only the
//! edges that actually lie on a cycle are marked. Self relations are never
//! cyclic; they are handled by the self-relation generator instead.

use crate::error::SeedError;
use seed_core::{Relation, SeedSchema};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use tracing::debug;

/// Relationship facts of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRelations {
    /// Relations pointing at this table
    pub in_degree: usize,
    /// Relations leaving this table
    pub out_degree: usize,
    /// Relations from this table to itself
    pub self_relations: usize,
    /// Tables this table references, excluding itself
    pub required: BTreeSet<String>,
    /// Tables referencing this table, excluding itself
    pub dependants: BTreeSet<String>,
}

impl TableRelations {
    pub fn has_self_relation(&self) -> bool {
        self.self_relations > 0
    }
}

/// Mark every relation that lies on a directed cycle back to its source table.
///
/// For a relation `A -> B` a breadth-first walk starts at `B` over outgoing
/// relations; reaching a relation into `A` makes the original edge cyclic.
pub fn mark_cyclic(relations: &mut [Relation]) {
    let mut outgoing: BTreeMap<&str, Vec<&Relation>> = BTreeMap::new();
    for relation in relations.iter() {
        if !relation.is_self_relation() {
            outgoing.entry(relation.table.as_str()).or_default().push(relation);
        }
    }

    let cyclic: Vec<bool> = relations
        .iter()
        .map(|relation| {
            if relation.is_self_relation() {
                return false;
            }
            let source = relation.table.as_str();
            let mut visited: HashSet<&str> = HashSet::new();
            let mut queue: VecDeque<&str> = VecDeque::from([relation.ref_table.as_str()]);
            while let Some(table) = queue.pop_front() {
                if !visited.insert(table) {
                    continue;
                }
                for next in outgoing.get(table).into_iter().flatten() {
                    if next.ref_table == source {
                        return true;
                    }
                    queue.push_back(next.ref_table.as_str());
                }
            }
            false
        })
        .collect();

    for (relation, is_cyclic) in relations.iter_mut().zip(cyclic) {
        relation.is_cyclic = is_cyclic;
    }
}

/// Degrees and dependency sets of the visible tables.
#[derive(Debug, Clone)]
pub struct RelationGraph {
    tables: BTreeMap<String, TableRelations>,
    declared: Vec<String>,
}

impl RelationGraph {
    /// Analyze `relations` among `tables`; edges touching other tables are ignored.
    pub fn analyze(tables: &[String], relations: &[Relation]) -> Self {
        let mut graph: BTreeMap<String, TableRelations> = tables
            .iter()
            .map(|t| (t.clone(), TableRelations::default()))
            .collect();

        for relation in relations {
            if !graph.contains_key(&relation.table) || !graph.contains_key(&relation.ref_table) {
                continue;
            }
            if relation.is_self_relation() {
                if let Some(entry) = graph.get_mut(&relation.table) {
                    entry.self_relations += 1;
                    entry.out_degree += 1;
                    entry.in_degree += 1;
                }
                continue;
            }
            if let Some(source) = graph.get_mut(&relation.table) {
                source.out_degree += 1;
                source.required.insert(relation.ref_table.clone());
            }
            if let Some(target) = graph.get_mut(&relation.ref_table) {
                target.in_degree += 1;
                target.dependants.insert(relation.table.clone());
            }
        }

        Self {
            tables: graph,
            declared: tables.to_vec(),
        }
    }

    pub fn table(&self, name: &str) -> Option<&TableRelations> {
        self.tables.get(name)
    }

    /// Linear fill order: referenced tables before the tables referencing them.
    ///
    /// Leaves (no required tables) seed a work queue. A popped table is
    /// appended once its outstanding requirements are empty, or equal to its
    /// outstanding dependants (a mutual pair resolved together); otherwise it
    /// is deferred behind its requirements and its dependants are queued for
    /// re-evaluation. When no leaf exists the cycle is broken by forcing one
    /// table, see `least_blocked`.
    pub fn fill_order(&self) -> Vec<String> {
        let mut order: Vec<String> = Vec::with_capacity(self.declared.len());
        let mut ordered: BTreeSet<String> = BTreeSet::new();
        let mut queue: VecDeque<String> = self
            .declared
            .iter()
            .filter(|t| self.tables.get(*t).is_some_and(|r| r.required.is_empty()))
            .cloned()
            .collect();
        let budget = 4 * self.declared.len() * self.declared.len() + 16;
        let mut steps = 0;

        while order.len() < self.declared.len() {
            let Some(table) = queue.pop_front() else {
                // no leaf left: break the cycle deterministically
                let Some(forced) = self.least_blocked(&ordered) else {
                    break;
                };
                debug!(table = %forced, "breaking dependency cycle");
                self.append(&forced, &mut order, &mut ordered, &mut queue);
                continue;
            };
            steps += 1;
            if steps > budget {
                queue.clear();
                continue;
            }
            if ordered.contains(&table) {
                continue;
            }
            let Some(entry) = self.tables.get(&table) else {
                continue;
            };
            let required: BTreeSet<&String> = entry.required.difference(&ordered).collect();
            let dependants: BTreeSet<&String> = entry.dependants.difference(&ordered).collect();
            if required.is_empty() || required == dependants {
                self.append(&table, &mut order, &mut ordered, &mut queue);
            } else {
                queue.extend(required.into_iter().cloned());
                queue.push_back(table.clone());
                queue.extend(dependants.into_iter().cloned());
            }
        }
        order
    }

    fn append(
        &self,
        table: &str,
        order: &mut Vec<String>,
        ordered: &mut BTreeSet<String>,
        queue: &mut VecDeque<String>,
    ) {
        order.push(table.to_string());
        ordered.insert(table.to_string());
        if let Some(entry) = self.tables.get(table) {
            queue.extend(entry.dependants.iter().filter(|d| !ordered.contains(*d)).cloned());
        }
    }

    /// Mutual pairs first, then the table with the fewest outstanding requirements.
    fn least_blocked(&self, ordered: &BTreeSet<String>) -> Option<String> {
        self.declared
            .iter()
            .filter(|t| !ordered.contains(*t))
            .min_by_key(|t| {
                self.tables.get(*t).map_or((false, 0), |r| {
                    let required: BTreeSet<&String> = r.required.difference(ordered).collect();
                    let dependants: BTreeSet<&String> = r.dependants.difference(ordered).collect();
                    (required != dependants, required.len())
                })
            })
            .cloned()
    }
}

/// Order two tables joined by cyclic relations.
///
/// The side whose cyclic foreign key is not-null goes after its counterpart,
/// because a not-null key cannot be left for the second pass. Both sides
/// not-null cannot be seeded.
pub fn cyclic_compare(
    a: &str,
    b: &str,
    relations: &[Relation],
    schema: &SeedSchema,
) -> Result<Ordering, SeedError> {
    let leg_not_null = |from: &str, to: &str| {
        relations
            .iter()
            .filter(|r| r.is_cyclic && r.table == from && r.ref_table == to)
            .any(|r| {
                r.columns
                    .iter()
                    .any(|c| schema.get_column(from, c).is_ok_and(|col| col.not_null))
            })
    };
    match (leg_not_null(a, b), leg_not_null(b, a)) {
        (true, true) => Err(SeedError::Infeasible(format!(
            "cyclic relation between '{a}' and '{b}' has not-null foreign keys on both sides"
        ))),
        (true, false) => Ok(Ordering::Greater),
        (false, true) => Ok(Ordering::Less),
        (false, false) => Ok(Ordering::Equal),
    }
}

/// Whether `relation` must be filled from rows generated earlier.
///
/// Every non-self edge is binding except a nullable cyclic one, which the
/// second pass can fill instead.
fn is_binding(relation: &Relation, schema: &SeedSchema) -> bool {
    if relation.is_self_relation() {
        return false;
    }
    !relation.is_cyclic
        || relation
            .columns
            .iter()
            .any(|c| schema.get_column(&relation.table, c).is_ok_and(|col| col.not_null))
}

/// Check every cyclic pair with [`cyclic_compare`], then reorder `order` so
/// that each table follows the tables it is bound to.
///
/// Tables keep their relative position wherever the binding edges allow it:
/// at each step the earliest table whose bound parents are all placed goes
/// next. A table that is moved therefore drags its dependants along.
pub fn order_cyclic_pairs(
    order: Vec<String>,
    relations: &[Relation],
    schema: &SeedSchema,
) -> Result<Vec<String>, SeedError> {
    let pairs: BTreeSet<(&str, &str)> = relations
        .iter()
        .filter(|r| r.is_cyclic)
        .map(|r| {
            let (a, b) = (r.table.as_str(), r.ref_table.as_str());
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        })
        .collect();
    for (a, b) in pairs {
        cyclic_compare(a, b, relations, schema)?;
    }

    let mut bound: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for relation in relations.iter().filter(|r| is_binding(r, schema)) {
        if order.contains(&relation.ref_table) {
            bound
                .entry(relation.table.as_str())
                .or_default()
                .insert(relation.ref_table.as_str());
        }
    }

    let mut pending = order.clone();
    let mut settled: Vec<String> = Vec::with_capacity(order.len());
    while !pending.is_empty() {
        let ready = pending.iter().position(|table| {
            bound
                .get(table.as_str())
                .map_or(true, |parents| parents.iter().all(|p| settled.iter().any(|s| s == p)))
        });
        let Some(ready) = ready else {
            return Err(SeedError::Infeasible(format!(
                "not-null foreign keys form a cycle among: {}",
                pending.join(", ")
            )));
        };
        settled.push(pending.remove(ready));
    }
    Ok(settled)
}
