//! Generator-plan builder.
//!
//! Turns a schema plus refinements into a [`SeedPlan`]: the fill order and,
//! per table, the row count and a source for every column. Each column is
//! decided in a fixed order:
//!
//! 1. refined to `false`: the database default, or null
//! 2. refined with a generator: that generator
//! 3. foreign key: self reference, deferred cyclic key, parent rows, or null
//!    when the referenced table is not part of the run
//! 4. anything else: dialect dispatch (integer primary keys are sequential)
//!
//! Composite unique constraints are consolidated afterwards, and every
//! resulting generator is resolved once through the registry so that
//! configuration errors surface before any row is written.

use crate::config::{SeedContext, SeedOptions};
use crate::dispatch::{is_integer_type, GeneratorSelector};
use crate::error::SeedError;
use crate::relations::{mark_cyclic, order_cyclic_pairs, RelationGraph};
use seed_core::{
    Column, ColumnRefinement, GeneratorConfig, Refinements, Relation, SeedSchema, Table,
    WithCount,
};
use seed_generator::generators::weighted_indices;
use seed_generator::{registry, GeneratorError, GeneratorParams, Prng};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Where a column's values come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSource {
    /// Registry-resolved generator
    Generated(GeneratorConfig),
    /// Left out of inserts so the database applies its default
    Omitted,
    /// Foreign key filled from the retained rows of the referenced table
    Reference(usize),
    /// Foreign key into the same table
    SelfReference(usize),
    /// Cyclic foreign key: null in the first pass, updated in the second
    Deferred(usize),
    /// Member of a composite unique key
    Composite(usize),
}

/// Plan of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPlan {
    pub name: String,
    pub params: GeneratorParams,
    pub source: ColumnSource,
    /// The user supplied a generator or `false`
    pub was_refined: bool,
    /// Nulled because the referenced table is not part of the run
    pub was_defined_before: bool,
}

impl ColumnPlan {
    pub fn is_cyclic(&self) -> bool {
        matches!(self.source, ColumnSource::Deferred(_))
    }

    /// Whether every row gets null in this column.
    pub fn emits_null(&self) -> bool {
        matches!(
            &self.source,
            ColumnSource::Generated(GeneratorConfig::Default { value }) if value.is_null()
        )
    }
}

/// Member of a composite unique key.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositeMember {
    Generated(GeneratorConfig),
    /// Single-column foreign key drawn from the parent's distinct keys
    Reference(usize),
}

/// Columns sharing one multi-column unique constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositePlan {
    pub columns: Vec<String>,
    pub members: Vec<CompositeMember>,
    pub params: Vec<GeneratorParams>,
}

impl CompositePlan {
    /// Seed key of the group; independent of unrelated column names.
    pub fn seed_key(&self, table: &str) -> String {
        format!("{table}.unique({})", self.columns.join(","))
    }
}

/// Child rows spread over the rows of a parent table.
#[derive(Debug, Clone, PartialEq)]
pub struct WithPlan {
    pub parent: String,
    /// Relation from the child to the parent
    pub relation: usize,
    /// Child rows per parent row, in parent row order
    pub repeats: Vec<u64>,
}

impl WithPlan {
    pub fn total(&self) -> u64 {
        self.repeats.iter().sum()
    }
}

/// Plan of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePlan {
    pub table: Table,
    pub count: u64,
    pub with: Option<WithPlan>,
    pub columns: Vec<ColumnPlan>,
    pub composites: Vec<CompositePlan>,
    /// Rows stay in memory for dependants or the second pass
    pub retain: bool,
}

impl TablePlan {
    pub fn name(&self) -> &str {
        &self.table.name
    }

    pub fn column(&self, name: &str) -> Option<&ColumnPlan> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Relations deferred to the second pass, in column order.
    pub fn deferred_relations(&self) -> Vec<usize> {
        let mut relations = Vec::new();
        for column in &self.columns {
            if let ColumnSource::Deferred(idx) = column.source {
                if !relations.contains(&idx) {
                    relations.push(idx);
                }
            }
        }
        relations
    }

    pub fn has_deferred(&self) -> bool {
        self.columns.iter().any(ColumnPlan::is_cyclic)
    }

    /// Column used to key second-pass updates.
    pub fn key_column(&self) -> Option<&Column> {
        self.table.identifying_column()
    }
}

/// Complete plan of a run.
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub context: SeedContext,
    /// Relations among the visible tables, with cyclic edges marked
    pub relations: Vec<Relation>,
    /// Tables in fill order
    pub tables: Vec<TablePlan>,
}

impl SeedPlan {
    pub fn table(&self, name: &str) -> Option<&TablePlan> {
        self.tables.iter().find(|t| t.table.name == name)
    }

    pub fn order(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.table.name.as_str()).collect()
    }
}

/// Builds a [`SeedPlan`].
pub struct PlanBuilder<'a> {
    schema: &'a SeedSchema,
    refinements: &'a Refinements,
    options: &'a SeedOptions,
    selector: &'a dyn GeneratorSelector,
    tables: Option<&'a [String]>,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(
        schema: &'a SeedSchema,
        refinements: &'a Refinements,
        options: &'a SeedOptions,
        selector: &'a dyn GeneratorSelector,
    ) -> Self {
        Self {
            schema,
            refinements,
            options,
            selector,
            tables: None,
        }
    }

    /// Restrict the run to `tables`.
    pub fn with_tables(mut self, tables: &'a [String]) -> Self {
        self.tables = Some(tables);
        self
    }

    pub fn build(&self) -> Result<SeedPlan, SeedError> {
        let context = SeedContext::new(self.options);
        registry::validate_api_version(context.api_version)
            .map_err(|e| SeedError::Config(e.to_string()))?;

        let visible = self.visible_tables()?;
        self.validate_refinements(&visible)?;

        let mut relations: Vec<Relation> = self
            .schema
            .relations
            .iter()
            .filter(|r| visible.contains(&r.table))
            .cloned()
            .collect();
        mark_cyclic(&mut relations);

        let graph = RelationGraph::analyze(&visible, &relations);
        let order = order_cyclic_pairs(graph.fill_order(), &relations, self.schema)?;
        info!(tables = order.len(), "Fill order: {}", order.join(" -> "));

        let positions: BTreeMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();
        let mut counts = self.resolve_counts(&order, &relations, &context)?;

        let mut tables = Vec::with_capacity(order.len());
        for name in &order {
            let (count, with) = counts.remove(name).unwrap_or((self.options.count, None));
            tables.push(self.plan_table(name, count, with, &relations, &positions)?);
        }

        let mut retained: BTreeSet<String> = BTreeSet::new();
        for plan in &tables {
            for column in &plan.columns {
                if let ColumnSource::Reference(idx) | ColumnSource::Deferred(idx) = column.source {
                    retained.insert(relations[idx].ref_table.clone());
                }
            }
            for group in &plan.composites {
                for member in &group.members {
                    if let CompositeMember::Reference(idx) = member {
                        retained.insert(relations[*idx].ref_table.clone());
                    }
                }
            }
            if plan.has_deferred() {
                retained.insert(plan.table.name.clone());
            }
        }
        for plan in &mut tables {
            plan.retain = retained.contains(&plan.table.name);
        }
        check_reference_capacity(&tables, &relations)?;

        Ok(SeedPlan {
            context,
            relations,
            tables,
        })
    }

    fn visible_tables(&self) -> Result<Vec<String>, SeedError> {
        let Some(filter) = self.tables else {
            return Ok(self.schema.tables.iter().map(|t| t.name.clone()).collect());
        };
        for name in filter {
            if self.schema.get_table(name).is_none() {
                return Err(SeedError::Config(format!("unknown table '{name}' in table filter")));
            }
        }
        Ok(self
            .schema
            .tables
            .iter()
            .filter(|t| filter.contains(&t.name))
            .map(|t| t.name.clone())
            .collect())
    }

    fn validate_refinements(&self, visible: &[String]) -> Result<(), SeedError> {
        for (name, refinement) in self.refinements {
            let table = self.schema.get_table(name).ok_or_else(|| {
                SeedError::Config(format!("refinement references unknown table '{name}'"))
            })?;
            if !visible.contains(name) {
                debug!(table = %name, "ignoring refinement of a table outside the run");
                continue;
            }
            for (column, value) in &refinement.columns {
                if table.get_column(column).is_none() {
                    return Err(SeedError::Config(format!(
                        "refinement references unknown column '{name}.{column}'"
                    )));
                }
                if value == &ColumnRefinement::Enabled(true) {
                    return Err(SeedError::Config(format!(
                        "'{name}.{column}' is refined to true; use false or a generator"
                    )));
                }
            }
            for child in refinement.with.keys() {
                if self.schema.get_table(child).is_none() {
                    return Err(SeedError::Config(format!(
                        "'{name}.with' references unknown table '{child}'"
                    )));
                }
            }
        }
        Ok(())
    }

    fn base_count(&self, table: &str) -> u64 {
        self.refinements
            .get(table)
            .and_then(|r| r.count)
            .unwrap_or(self.options.count)
    }

    /// Row counts in fill order: "with" ratios over table counts over the
    /// global count. The largest "with" total wins when several parents name
    /// the same child.
    fn resolve_counts(
        &self,
        order: &[String],
        relations: &[Relation],
        context: &SeedContext,
    ) -> Result<BTreeMap<String, (u64, Option<WithPlan>)>, SeedError> {
        let mut resolved: BTreeMap<String, (u64, Option<WithPlan>)> = BTreeMap::new();
        for child in order {
            let mut with: Option<WithPlan> = None;
            for (parent, refinement) in self.refinements {
                let Some(ratio) = refinement.with.get(child) else {
                    continue;
                };
                if !order.contains(parent) {
                    continue;
                }
                let relation = relations
                    .iter()
                    .position(|r| r.table == *child && r.ref_table == *parent && !r.is_self_relation())
                    .ok_or_else(|| {
                        SeedError::Config(format!(
                            "'{parent}.with' names '{child}', which does not reference '{parent}'"
                        ))
                    })?;
                let parent_count = resolved
                    .get(parent)
                    .map_or_else(|| self.base_count(parent), |(count, _)| *count);
                let seed = context.group_seed(&format!("{parent}.with.{child}"));
                let repeats = expand_with(ratio, parent_count, seed)?;
                let candidate = WithPlan {
                    parent: parent.clone(),
                    relation,
                    repeats,
                };
                if with.as_ref().map_or(true, |w| candidate.total() > w.total()) {
                    with = Some(candidate);
                }
            }
            let count = with.as_ref().map_or_else(|| self.base_count(child), WithPlan::total);
            resolved.insert(child.clone(), (count, with));
        }
        Ok(resolved)
    }

    fn plan_table(
        &self,
        name: &str,
        count: u64,
        with: Option<WithPlan>,
        relations: &[Relation],
        positions: &BTreeMap<&str, usize>,
    ) -> Result<TablePlan, SeedError> {
        let table = self
            .schema
            .get_table(name)
            .ok_or_else(|| seed_core::SchemaError::TableNotFound(name.to_string()))?
            .clone();
        let refinement = self.refinements.get(name);

        let mut foreign_keys: BTreeMap<&str, usize> = BTreeMap::new();
        for (idx, relation) in relations.iter().enumerate() {
            if relation.table == name {
                for column in &relation.columns {
                    foreign_keys.entry(column.as_str()).or_insert(idx);
                }
            }
        }
        let composite_primary = table.primary_keys.len() > 1;

        let mut columns = Vec::with_capacity(table.columns.len());
        for column in &table.columns {
            let refined = refinement.and_then(|r| r.columns.get(&column.name));
            let mut params = GeneratorParams::for_column(column);
            if composite_primary && column.primary {
                // the key is unique as a whole, not per column
                params.is_unique = column.is_unique;
            }
            let mut plan = ColumnPlan {
                name: column.name.clone(),
                params,
                source: ColumnSource::Omitted,
                was_refined: refined.is_some(),
                was_defined_before: false,
            };
            plan.source = match refined {
                Some(ColumnRefinement::Enabled(_)) => disabled_source(name, column)?,
                Some(ColumnRefinement::Generator(config)) => {
                    if column.type_params.dimensions.unwrap_or(0) > 1 {
                        return Err(SeedError::Config(format!(
                            "'{name}.{}' is a multi-dimensional array and cannot be refined",
                            column.name
                        )));
                    }
                    ColumnSource::Generated(config.clone())
                }
                None => match foreign_keys.get(column.name.as_str()) {
                    Some(&idx) => {
                        self.foreign_key_source(name, column, idx, relations, positions, &mut plan)?
                    }
                    None => self.dispatch(&table, column)?,
                },
            };
            if plan.emits_null() {
                // nulls never collide
                plan.params.is_unique = false;
            }
            columns.push(plan);
        }

        let composites = composite_groups(&table, &mut columns, relations)?;

        // resolve every generator now so that bad configurations and
        // exhausted unique domains fail before any row is written
        let version = self.options.version;
        for column in &columns {
            if let ColumnSource::Generated(config) = &column.source {
                let generator = registry::instantiate(config, &column.params, version)
                    .map_err(SeedError::at(name, &column.name))?;
                if generator.is_unique() {
                    generator
                        .max_unique_count()
                        .check(generator.name(), count)
                        .map_err(SeedError::at(name, &column.name))?;
                }
            }
        }
        for group in &composites {
            for ((column, member), params) in group.columns.iter().zip(&group.members).zip(&group.params) {
                if let CompositeMember::Generated(config) = member {
                    registry::instantiate(config, params, version)
                        .map_err(SeedError::at(name, column))?;
                }
            }
        }

        let has_deferred = columns.iter().any(ColumnPlan::is_cyclic);
        if has_deferred && table.identifying_column().is_none() {
            return Err(SeedError::Infeasible(format!(
                "'{name}' has cyclic foreign keys but no primary or unique not-null column to key updates on"
            )));
        }

        debug!(table = %name, count, columns = columns.len(), "Planned table");
        Ok(TablePlan {
            table,
            count,
            with,
            columns,
            composites,
            retain: false,
        })
    }

    fn foreign_key_source(
        &self,
        table: &str,
        column: &Column,
        idx: usize,
        relations: &[Relation],
        positions: &BTreeMap<&str, usize>,
        plan: &mut ColumnPlan,
    ) -> Result<ColumnSource, SeedError> {
        let relation = &relations[idx];
        let Some(&ref_position) = positions.get(relation.ref_table.as_str()) else {
            if column.not_null {
                return Err(SeedError::Infeasible(format!(
                    "'{table}.{}' is not-null but references '{}', which is not part of this run",
                    column.name, relation.ref_table
                )));
            }
            warn!(
                table = %table,
                column = %column.name,
                references = %relation.ref_table,
                "Referenced table is not part of this run; filling with null"
            );
            plan.was_defined_before = true;
            return Ok(ColumnSource::Generated(GeneratorConfig::null()));
        };

        if let Some(ref_column) = relation.ref_column_for(&column.name) {
            self.schema.get_column(&relation.ref_table, ref_column)?;
        }
        if relation.is_self_relation() {
            return Ok(ColumnSource::SelfReference(idx));
        }
        let position = positions.get(table).copied().unwrap_or_default();
        if relation.is_cyclic && ref_position > position {
            if column.not_null {
                return Err(SeedError::Infeasible(format!(
                    "'{table}.{}' is a not-null cyclic foreign key generated before '{}'",
                    column.name, relation.ref_table
                )));
            }
            return Ok(ColumnSource::Deferred(idx));
        }
        Ok(ColumnSource::Reference(idx))
    }

    fn dispatch(&self, table: &Table, column: &Column) -> Result<ColumnSource, SeedError> {
        let integer_key = column.primary
            && table.primary_keys.len() == 1
            && column.data_type.is_numeric()
            && is_integer_type(&column.column_type);
        if integer_key {
            return Ok(ColumnSource::Generated(GeneratorConfig::Sequential { start: 1 }));
        }
        self.selector
            .select(table, column)
            .map(ColumnSource::Generated)
            .ok_or_else(|| {
                SeedError::Config(format!(
                    "no generator for '{}.{}' of type '{}'",
                    table.name, column.name, column.column_type
                ))
            })
    }
}

/// Unique not-null foreign keys need at least as many parent rows as
/// child rows.
fn check_reference_capacity(tables: &[TablePlan], relations: &[Relation]) -> Result<(), SeedError> {
    for plan in tables {
        for column in &plan.columns {
            let ColumnSource::Reference(idx) = column.source else {
                continue;
            };
            if !(column.params.is_unique && column.params.not_null) {
                continue;
            }
            let parent = &relations[idx].ref_table;
            let available = tables
                .iter()
                .find(|t| t.table.name == *parent)
                .map_or(0, |t| t.count);
            if available < plan.count {
                return Err(SeedError::at(plan.name(), &column.name)(
                    GeneratorError::NotEnoughUniqueValues {
                        generator: "values_from_array",
                        requested: plan.count,
                        available,
                    },
                ));
            }
        }
    }
    Ok(())
}

/// Source of a column refined to `false`.
fn disabled_source(table: &str, column: &Column) -> Result<ColumnSource, SeedError> {
    match (&column.default, column.has_default) {
        (Some(value), _) => Ok(ColumnSource::Generated(GeneratorConfig::Default {
            value: value.clone(),
        })),
        (None, true) => Ok(ColumnSource::Omitted),
        (None, false) if column.not_null => Err(SeedError::Config(format!(
            "'{table}.{}' is refined to false but is not-null without a default",
            column.name
        ))),
        (None, false) => Ok(ColumnSource::Generated(GeneratorConfig::null())),
    }
}

/// Child rows per parent row for a "with" ratio.
fn expand_with(ratio: &WithCount, parents: u64, seed: i64) -> Result<Vec<u64>, SeedError> {
    match ratio {
        WithCount::Fixed(n) => Ok(vec![*n; parents as usize]),
        WithCount::Weighted(branches) => {
            let weights: Vec<f64> = branches.iter().map(|b| b.weight).collect();
            let pool = weighted_indices(&weights)?;
            let mut prng = Prng::new(seed);
            (0..parents)
                .map(|_| {
                    let branch = &branches[pool[prng.index(pool.len())]];
                    let counts = branch.count.values();
                    if counts.is_empty() {
                        return Err(SeedError::Config(
                            "weighted child count has an empty count list".to_string(),
                        ));
                    }
                    Ok(counts[prng.index(counts.len())])
                })
                .collect()
        }
    }
}

/// Consolidate multi-column unique constraints.
///
/// Members must be generated columns or single-column foreign keys; other
/// columns drop out of the group. A group left with one member degenerates
/// to a unique column. A column may belong to one composite group only.
fn composite_groups(
    table: &Table,
    columns: &mut [ColumnPlan],
    relations: &[Relation],
) -> Result<Vec<CompositePlan>, SeedError> {
    let mut groups: Vec<Vec<String>> = table.unique_constraints.clone();
    if table.primary_keys.len() > 1 {
        groups.push(table.primary_keys.clone());
    }

    let mut claimed: BTreeSet<String> = BTreeSet::new();
    let mut plans = Vec::new();
    for group in groups {
        let always_null = group
            .iter()
            .any(|name| columns.iter().any(|c| c.name == *name && c.emits_null()));
        if always_null {
            continue;
        }
        let mut members: Vec<String> = Vec::new();
        for name in group {
            let eligible = columns.iter().any(|c| {
                c.name == name
                    && match &c.source {
                        ColumnSource::Generated(_) => true,
                        ColumnSource::Reference(idx) => relations[*idx].columns.len() == 1,
                        _ => false,
                    }
            });
            if eligible && !members.contains(&name) {
                members.push(name);
            }
        }

        if members.len() == 1 {
            if let Some(column) = columns.iter_mut().find(|c| c.name == members[0]) {
                column.params.is_unique = true;
            }
            continue;
        }
        if members.is_empty() {
            continue;
        }

        let group_idx = plans.len();
        let mut plan = CompositePlan {
            columns: Vec::new(),
            members: Vec::new(),
            params: Vec::new(),
        };
        for name in members {
            if !claimed.insert(name.clone()) {
                return Err(SeedError::Config(format!(
                    "'{}.{name}' belongs to more than one composite unique key",
                    table.name
                )));
            }
            let Some(column) = columns.iter_mut().find(|c| c.name == name) else {
                continue;
            };
            let member = match std::mem::replace(&mut column.source, ColumnSource::Composite(group_idx)) {
                ColumnSource::Generated(config) => {
                    if !registry::supports_unique(config.kind()) {
                        return Err(SeedError::at(&table.name, &name)(
                            GeneratorError::UniqueUnsupported(config.kind()),
                        ));
                    }
                    CompositeMember::Generated(config)
                }
                ColumnSource::Reference(idx) => CompositeMember::Reference(idx),
                other => {
                    column.source = other;
                    continue;
                }
            };
            plan.columns.push(name);
            plan.members.push(member);
            plan.params.push(column.params.clone().unique());
        }
        plans.push(plan);
    }
    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DefaultSelector;
    use seed_core::{DataType, GeneratorKind, TableRefinement};

    fn id() -> Column {
        Column::new("id", DataType::Number, "serial").primary()
    }

    fn fk(name: &str) -> Column {
        Column::new(name, DataType::Number, "integer")
    }

    fn build(
        schema: &SeedSchema,
        refinements: &Refinements,
        options: &SeedOptions,
    ) -> Result<SeedPlan, SeedError> {
        PlanBuilder::new(schema, refinements, options, &DefaultSelector).build()
    }

    fn blog() -> SeedSchema {
        SeedSchema::new(
            vec![
                Table::new(
                    "posts",
                    vec![id(), fk("author_id").not_null(), Column::new("title", DataType::String, "text")],
                ),
                Table::new(
                    "users",
                    vec![id(), Column::new("email", DataType::String, "varchar(256)").unique()],
                ),
            ],
            vec![Relation::new("posts", &["author_id"], "users", &["id"])],
        )
        .unwrap()
    }

    #[test]
    fn test_parents_first_and_retained() {
        let plan = build(&blog(), &Refinements::new(), &SeedOptions::default()).unwrap();
        assert_eq!(plan.order(), vec!["users", "posts"]);
        let users = plan.table("users").unwrap();
        assert!(users.retain);
        assert_eq!(
            users.column("id").unwrap().source,
            ColumnSource::Generated(GeneratorConfig::Sequential { start: 1 })
        );
        let posts = plan.table("posts").unwrap();
        assert!(!posts.retain);
        assert_eq!(posts.column("author_id").unwrap().source, ColumnSource::Reference(0));
        assert_eq!(posts.count, 10);
    }

    #[test]
    fn test_refined_generator_wins() {
        let refinements = Refinements::from([(
            "posts".to_string(),
            TableRefinement::default().with_count(3).with_column(
                "title",
                GeneratorConfig::LoremIpsum { sentences_count: 1 }.into(),
            ),
        )]);
        let plan = build(&blog(), &refinements, &SeedOptions::default()).unwrap();
        let posts = plan.table("posts").unwrap();
        assert_eq!(posts.count, 3);
        let title = posts.column("title").unwrap();
        assert!(title.was_refined);
        assert!(matches!(&title.source, ColumnSource::Generated(c) if c.kind() == GeneratorKind::LoremIpsum));
    }

    #[test]
    fn test_disabled_not_null_column_rejected() {
        let refinements = Refinements::from([(
            "posts".to_string(),
            TableRefinement::default().with_column("author_id", ColumnRefinement::disabled()),
        )]);
        let err = build(&blog(), &refinements, &SeedOptions::default()).unwrap_err();
        assert!(matches!(err, SeedError::Config(_)));

        let refinements = Refinements::from([(
            "posts".to_string(),
            TableRefinement::default().with_column("title", ColumnRefinement::disabled()),
        )]);
        let plan = build(&blog(), &refinements, &SeedOptions::default()).unwrap();
        assert_eq!(
            plan.table("posts").unwrap().column("title").unwrap().source,
            ColumnSource::Generated(GeneratorConfig::null())
        );
    }

    #[test]
    fn test_disabled_unique_column_is_null() {
        let refinements = Refinements::from([(
            "users".to_string(),
            TableRefinement::default().with_column("email", ColumnRefinement::disabled()),
        )]);
        let plan = build(&blog(), &refinements, &SeedOptions::default()).unwrap();
        let email = plan.table("users").unwrap().column("email").unwrap();
        assert!(email.emits_null());
        assert!(!email.params.is_unique);
    }

    #[test]
    fn test_orphan_unique_key_is_null() {
        let mut schema = blog();
        schema.tables[0].columns[1].not_null = false;
        schema.tables[0].columns[1].is_unique = true;
        let tables = vec!["posts".to_string()];
        let plan = PlanBuilder::new(&schema, &Refinements::new(), &SeedOptions::default(), &DefaultSelector)
            .with_tables(&tables)
            .build()
            .unwrap();
        let author = plan.table("posts").unwrap().column("author_id").unwrap();
        assert!(author.emits_null());
        assert!(!author.params.is_unique);
    }

    #[test]
    fn test_null_member_drops_composite_key() {
        let schema = SeedSchema::new(
            vec![Table::new(
                "slots",
                vec![
                    Column::new("day", DataType::Number, "smallint"),
                    Column::new("room", DataType::String, "text"),
                ],
            )
            .with_unique_constraint(&["day", "room"])],
            vec![],
        )
        .unwrap();
        let refinements = Refinements::from([(
            "slots".to_string(),
            TableRefinement::default().with_column("room", ColumnRefinement::disabled()),
        )]);
        let plan = build(&schema, &refinements, &SeedOptions::default()).unwrap();
        let slots = plan.table("slots").unwrap();
        assert!(slots.composites.is_empty());
        assert!(matches!(slots.column("day").unwrap().source, ColumnSource::Generated(_)));
    }

    #[test]
    fn test_unknown_refinement_targets() {
        let refinements = Refinements::from([("nope".to_string(), TableRefinement::default())]);
        assert!(matches!(
            build(&blog(), &refinements, &SeedOptions::default()),
            Err(SeedError::Config(_))
        ));
        let refinements = Refinements::from([(
            "posts".to_string(),
            TableRefinement::default().with_column("nope", ColumnRefinement::disabled()),
        )]);
        assert!(build(&blog(), &refinements, &SeedOptions::default()).is_err());
        let refinements = Refinements::from([(
            "posts".to_string(),
            TableRefinement::default().with_column("title", ColumnRefinement::Enabled(true)),
        )]);
        assert!(build(&blog(), &refinements, &SeedOptions::default()).is_err());
    }

    #[test]
    fn test_invalid_version() {
        let options = SeedOptions::default().with_version(99);
        assert!(matches!(
            build(&blog(), &Refinements::new(), &options),
            Err(SeedError::Config(_))
        ));
    }

    #[test]
    fn test_table_filter_orphans() {
        let tables = vec!["posts".to_string()];
        let refinements = Refinements::new();
        let options = SeedOptions::default();
        let err = PlanBuilder::new(&blog(), &refinements, &options, &DefaultSelector)
            .with_tables(&tables)
            .build()
            .unwrap_err();
        assert!(matches!(err, SeedError::Infeasible(_)));

        let mut schema = blog();
        schema.tables[0].columns[1].not_null = false;
        let plan = PlanBuilder::new(&schema, &refinements, &options, &DefaultSelector)
            .with_tables(&tables)
            .build()
            .unwrap();
        let author = plan.table("posts").unwrap().column("author_id").unwrap();
        assert!(author.was_defined_before);
        assert_eq!(author.source, ColumnSource::Generated(GeneratorConfig::null()));
    }

    #[test]
    fn test_with_ratio_sets_child_count() {
        let refinements = Refinements::from([(
            "users".to_string(),
            TableRefinement::default()
                .with_count(3)
                .with_children("posts", WithCount::Fixed(2)),
        )]);
        let plan = build(&blog(), &refinements, &SeedOptions::default()).unwrap();
        let posts = plan.table("posts").unwrap();
        assert_eq!(posts.count, 6);
        let with = posts.with.as_ref().unwrap();
        assert_eq!(with.parent, "users");
        assert_eq!(with.repeats, vec![2, 2, 2]);
    }

    #[test]
    fn test_with_requires_relation() {
        let refinements = Refinements::from([(
            "posts".to_string(),
            TableRefinement::default().with_children("users", WithCount::Fixed(2)),
        )]);
        assert!(matches!(
            build(&blog(), &refinements, &SeedOptions::default()),
            Err(SeedError::Config(_))
        ));
    }

    #[test]
    fn test_weighted_with_is_deterministic() {
        let ratio: WithCount =
            serde_yaml::from_str("[{ weight: 0.5, count: [1, 2] }, { weight: 0.5, count: 5 }]")
                .unwrap();
        let first = expand_with(&ratio, 20, 9).unwrap();
        assert_eq!(first, expand_with(&ratio, 20, 9).unwrap());
        assert!(first.iter().all(|n| [1, 2, 5].contains(n)));
    }

    fn cyclic(a_not_null: bool) -> SeedSchema {
        let a_fk = if a_not_null { fk("b_id").not_null() } else { fk("b_id") };
        SeedSchema::new(
            vec![
                Table::new("a", vec![id(), a_fk]),
                Table::new("b", vec![id(), fk("a_id")]),
            ],
            vec![
                Relation::new("a", &["b_id"], "b", &["id"]),
                Relation::new("b", &["a_id"], "a", &["id"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_cyclic_nullable_leg_is_deferred() {
        let plan = build(&cyclic(true), &Refinements::new(), &SeedOptions::default()).unwrap();
        assert_eq!(plan.order(), vec!["b", "a"]);
        let b = plan.table("b").unwrap();
        assert!(b.has_deferred());
        assert!(b.retain);
        assert_eq!(b.deferred_relations(), vec![1]);
        let a = plan.table("a").unwrap();
        assert_eq!(a.column("b_id").unwrap().source, ColumnSource::Reference(0));
    }

    #[test]
    fn test_cyclic_table_needs_key() {
        let schema = SeedSchema::new(
            vec![
                Table::new("a", vec![id(), fk("b_code").not_null()]),
                Table::new("b", vec![fk("code"), fk("a_id")]),
            ],
            vec![
                Relation::new("a", &["b_code"], "b", &["code"]),
                Relation::new("b", &["a_id"], "a", &["id"]),
            ],
        )
        .unwrap();
        // "b" goes first and has nothing to key its second-pass updates on
        let err = build(&schema, &Refinements::new(), &SeedOptions::default()).unwrap_err();
        assert!(matches!(err, SeedError::Infeasible(_)));
    }

    #[test]
    fn test_composite_unique_groups() {
        let schema = SeedSchema::new(
            vec![
                Table::new("users", vec![id()]),
                Table::new("tags", vec![id()]),
                Table::new(
                    "user_tags",
                    vec![fk("user_id").primary(), fk("tag_id").primary()],
                ),
                Table::new(
                    "slots",
                    vec![
                        id(),
                        Column::new("day", DataType::Number, "integer"),
                        Column::new("room", DataType::String, "text"),
                        Column::new("code", DataType::String, "text"),
                    ],
                )
                .with_unique_constraint(&["day", "room"])
                .with_unique_constraint(&["code"]),
            ],
            vec![
                Relation::new("user_tags", &["user_id"], "users", &["id"]),
                Relation::new("user_tags", &["tag_id"], "tags", &["id"]),
            ],
        )
        .unwrap();
        let plan = build(&schema, &Refinements::new(), &SeedOptions::default()).unwrap();

        let join = plan.table("user_tags").unwrap();
        assert_eq!(join.composites.len(), 1);
        assert_eq!(
            join.composites[0].members,
            vec![CompositeMember::Reference(0), CompositeMember::Reference(1)]
        );
        assert!(plan.table("tags").unwrap().retain);

        let slots = plan.table("slots").unwrap();
        assert_eq!(slots.composites[0].columns, vec!["day", "room"]);
        assert_eq!(slots.column("day").unwrap().source, ColumnSource::Composite(0));
        // single-column group degenerates to a unique column
        assert!(slots.column("code").unwrap().params.is_unique);
    }

    #[test]
    fn test_shared_composite_column_rejected() {
        let schema = SeedSchema::new(
            vec![Table::new(
                "t",
                vec![
                    id(),
                    Column::new("a", DataType::Number, "integer"),
                    Column::new("b", DataType::Number, "integer"),
                    Column::new("c", DataType::Number, "integer"),
                ],
            )
            .with_unique_constraint(&["a", "b"])
            .with_unique_constraint(&["b", "c"])],
            vec![],
        )
        .unwrap();
        assert!(matches!(
            build(&schema, &Refinements::new(), &SeedOptions::default()),
            Err(SeedError::Config(_))
        ));
    }

    #[test]
    fn test_composite_member_must_support_unique() {
        let schema = SeedSchema::new(
            vec![Table::new(
                "t",
                vec![
                    id(),
                    Column::new("flag", DataType::Boolean, "boolean"),
                    Column::new("n", DataType::Number, "integer"),
                ],
            )
            .with_unique_constraint(&["flag", "n"])],
            vec![],
        )
        .unwrap();
        let err = build(&schema, &Refinements::new(), &SeedOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            SeedError::Capacity {
                source: GeneratorError::UniqueUnsupported(GeneratorKind::Boolean),
                ..
            }
        ));
    }

    #[test]
    fn test_unique_domain_exhausted_before_rows() {
        let refinements = Refinements::from([(
            "users".to_string(),
            TableRefinement::default()
                .with_count(10_000)
                .with_column("email", GeneratorConfig::Country { is_unique: true }.into()),
        )]);
        let err = build(&blog(), &refinements, &SeedOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            SeedError::Capacity {
                source: GeneratorError::Exhausted { requested: 10_000, .. },
                ..
            }
        ));
        assert!(err.to_string().starts_with("users.email: "));
    }

    #[test]
    fn test_unique_reference_needs_enough_parents() {
        let mut schema = blog();
        schema.tables[0].columns[1].is_unique = true;
        let refinements = Refinements::from([
            ("users".to_string(), TableRefinement::default().with_count(2)),
            ("posts".to_string(), TableRefinement::default().with_count(3)),
        ]);
        let err = build(&schema, &refinements, &SeedOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            SeedError::Capacity {
                source: GeneratorError::NotEnoughUniqueValues {
                    requested: 3,
                    available: 2,
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn test_unsupported_column_type() {
        let schema = SeedSchema::new(
            vec![Table::new("t", vec![Column::new("g", DataType::Custom, "geometry")])],
            vec![],
        )
        .unwrap();
        assert!(matches!(
            build(&schema, &Refinements::new(), &SeedOptions::default()),
            Err(SeedError::Config(_))
        ));
    }
}
