//! Row production.
//!
//! The first pass walks the plan in fill order, generating each table's
//! rows and handing them to the store in dialect-sized batches. Rows of
//! tables that others reference are retained in memory. The second pass
//! fills the deferred cyclic foreign keys with one keyed update per row.

use crate::config::SeedOptions;
use crate::dispatch::is_auto_increment;
use crate::error::SeedError;
use crate::plan::{ColumnSource, CompositeMember, SeedPlan, TablePlan};
use crate::store::SeedStore;
use seed_core::{GeneratedRow, GeneratedValue, IdentityKind, Relation};
use seed_generator::generators::{
    CompositeUniqueGenerator, SelfRelationGenerator, ValuesFromArrayGenerator,
};
use seed_generator::{registry, BoxedGenerator, InitOptions};
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Metrics of one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableMetrics {
    pub table: String,
    pub rows_inserted: u64,
    /// Rows touched by the cyclic second pass
    pub rows_updated: u64,
    pub batch_count: u64,
    pub generation_duration: Duration,
    pub insert_duration: Duration,
}

/// Metrics of a run, tables in fill order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    pub tables: Vec<TableMetrics>,
    pub total_duration: Duration,
}

impl SeedReport {
    pub fn table(&self, name: &str) -> Option<&TableMetrics> {
        self.tables.iter().find(|t| t.table == name)
    }

    pub fn rows_inserted(&self) -> u64 {
        self.tables.iter().map(|t| t.rows_inserted).sum()
    }

    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_inserted() as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    fn table_mut(&mut self, name: &str) -> Option<&mut TableMetrics> {
        self.tables.iter_mut().find(|t| t.table == name)
    }
}

/// Produce every table of `plan` into `store`.
pub async fn run(
    plan: &SeedPlan,
    options: &SeedOptions,
    store: &mut dyn SeedStore,
) -> Result<SeedReport, SeedError> {
    let start_time = Instant::now();
    let mut report = SeedReport::default();
    let mut retained: BTreeMap<String, Vec<GeneratedRow>> = BTreeMap::new();

    for table in &plan.tables {
        let metrics = populate(plan, table, options, store, &mut retained).await?;
        report.tables.push(metrics);
    }

    for table in plan.tables.iter().filter(|t| t.has_deferred()) {
        let updated = fill_deferred(plan, table, store, &mut retained).await?;
        if let Some(metrics) = report.table_mut(table.name()) {
            metrics.rows_updated = updated;
        }
    }

    report.total_duration = start_time.elapsed();
    info!(
        "Seeding complete: {} rows in {} tables in {:?} ({:.2} rows/sec)",
        report.rows_inserted(),
        report.tables.len(),
        report.total_duration,
        report.rows_per_second()
    );
    Ok(report)
}

/// First pass over one table.
async fn populate(
    plan: &SeedPlan,
    table: &TablePlan,
    options: &SeedOptions,
    store: &mut dyn SeedStore,
    retained: &mut BTreeMap<String, Vec<GeneratedRow>>,
) -> Result<TableMetrics, SeedError> {
    let name = table.name();
    let mut metrics = TableMetrics {
        table: name.to_string(),
        ..Default::default()
    };
    let mut kept = Vec::new();
    if table.count == 0 {
        debug!(table = %name, "Skipping table with no rows");
        if table.retain {
            retained.insert(name.to_string(), kept);
        }
        return Ok(metrics);
    }

    let gen_start = Instant::now();
    let mut producer = RowProducer::new(plan, table, retained)?;
    let mut generation_time = gen_start.elapsed();
    let mut insert_time = Duration::ZERO;

    let written: Vec<&str> = table
        .columns
        .iter()
        .filter(|c| c.source != ColumnSource::Omitted)
        .map(|c| c.name.as_str())
        .collect();
    let dialect = store.dialect();
    let batch_size = dialect.max_batch_size(options.batch_size, written.len());
    let override_identity = table.table.columns.iter().any(|c| {
        c.identity == Some(IdentityKind::Always) && written.contains(&c.name.as_str())
    });
    let sequences: Vec<&str> = table
        .table
        .columns
        .iter()
        .filter(|c| is_auto_increment(c) && written.contains(&c.name.as_str()))
        .map(|c| c.name.as_str())
        .collect();
    let mut maxima: BTreeMap<&str, i128> = BTreeMap::new();

    info!(
        "Populating table '{}' with {} rows (batch size: {})",
        name, table.count, batch_size
    );

    let mut batch: Vec<GeneratedRow> = Vec::with_capacity(batch_size.min(table.count as usize));
    for index in 0..table.count {
        let row_start = Instant::now();
        let row = producer.next_row(index)?;
        generation_time += row_start.elapsed();

        for column in &sequences {
            if let Some(value) = row.get(column).and_then(GeneratedValue::as_i128) {
                let max = maxima.entry(*column).or_insert(value);
                *max = (*max).max(value);
            }
        }
        batch.push(row);

        if batch.len() >= batch_size || index + 1 == table.count {
            let insert_start = Instant::now();
            let inserted = store.insert(&table.table, &batch, override_identity).await?;
            insert_time += insert_start.elapsed();
            metrics.rows_inserted += inserted;
            metrics.batch_count += 1;
            debug!(
                "Batch {} of '{}' complete: {} rows inserted",
                metrics.batch_count, name, inserted
            );
            if table.retain {
                kept.append(&mut batch);
            } else {
                batch.clear();
            }
        }
    }

    if dialect.needs_sequence_advance() {
        for (column, value) in maxima {
            debug!(table = %name, column, value, "Advancing sequence");
            store.advance_sequence(&table.table, column, value).await?;
        }
    }
    if table.retain {
        retained.insert(name.to_string(), kept);
    }

    metrics.generation_duration = generation_time;
    metrics.insert_duration = insert_time;
    Ok(metrics)
}

/// Second pass: one keyed update per row carrying its cyclic foreign keys.
async fn fill_deferred(
    plan: &SeedPlan,
    table: &TablePlan,
    store: &mut dyn SeedStore,
    retained: &mut BTreeMap<String, Vec<GeneratedRow>>,
) -> Result<u64, SeedError> {
    let name = table.name();
    let key = table
        .key_column()
        .map(|c| c.name.clone())
        .ok_or_else(|| SeedError::Infeasible(format!("'{name}' has no column to key updates on")))?;
    let rows = retained.get(name).map(Vec::as_slice).unwrap_or_default();
    let count = rows.len() as u64;

    let mut references = Vec::new();
    for idx in table.deferred_relations() {
        let relation = &plan.relations[idx];
        let with = table.with.as_ref().filter(|w| w.relation == idx);
        references.push(ReferenceSlot::new(
            plan,
            table,
            relation,
            retained,
            with.map(|w| w.repeats.clone()),
            count,
        )?);
    }

    let mut patches = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let value = row.get(&key).filter(|v| !v.is_null()).ok_or_else(|| {
            SeedError::Infeasible(format!("row {index} of '{name}' has no value for key '{key}'"))
        })?;
        let mut patch = GeneratedRow::new(index as u64).with_field(key.clone(), value.clone());
        for reference in &mut references {
            reference.fill(index as u64, &mut patch)?;
        }
        patches.push(patch);
    }

    info!("Updating {} rows of '{}' with cyclic references", patches.len(), name);
    let mut updated = 0;
    for patch in &patches {
        updated += store.update(&table.table, patch, &key).await?;
    }
    if let Some(rows) = retained.get_mut(name) {
        for (row, patch) in rows.iter_mut().zip(patches) {
            for (column, value) in patch.fields {
                row.set(column, value);
            }
        }
    }
    Ok(updated)
}

/// Parent rows chosen through an index generator.
#[derive(Debug)]
struct ReferenceSlot {
    table: String,
    /// (child column, parent column)
    columns: Vec<(String, String)>,
    parents: Vec<GeneratedRow>,
    index: BoxedGenerator,
}

impl ReferenceSlot {
    fn new(
        plan: &SeedPlan,
        table: &TablePlan,
        relation: &Relation,
        retained: &BTreeMap<String, Vec<GeneratedRow>>,
        repeats: Option<Vec<u64>>,
        count: u64,
    ) -> Result<Self, SeedError> {
        let parents = retained.get(&relation.ref_table).cloned().ok_or_else(|| {
            SeedError::Config(format!(
                "rows of '{}' were not kept for '{}'",
                relation.ref_table, relation.table
            ))
        })?;
        let members = relation.columns.iter().filter_map(|c| table.column(c));
        let (mut unique, mut not_null) = (false, false);
        for member in members {
            unique |= member.params.is_unique;
            not_null |= member.params.not_null;
        }
        let positions = (0..parents.len() as i64).map(GeneratedValue::Int).collect();
        let mut generator = ValuesFromArrayGenerator::new(positions)
            .unique(unique)
            .not_null(not_null);
        if let Some(repeats) = repeats {
            generator = generator.with_repeats(repeats);
        }
        let column = relation.columns.join(",");
        let mut index: BoxedGenerator = Box::new(generator);
        index
            .init(InitOptions::new(count, plan.context.group_seed(&relation.signature())))
            .map_err(SeedError::at(table.name(), &column))?;
        Ok(Self {
            table: table.name().to_string(),
            columns: relation
                .columns
                .iter()
                .cloned()
                .zip(relation.ref_columns.iter().cloned())
                .collect(),
            parents,
            index,
        })
    }

    fn fill(&mut self, row: u64, target: &mut GeneratedRow) -> Result<(), SeedError> {
        let picked = self.index.generate(row).map_err(|e| {
            let column = self.columns.first().map(|(c, _)| c.as_str()).unwrap_or_default();
            SeedError::at(&self.table, column)(e)
        })?;
        let parent = picked
            .as_i128()
            .and_then(|i| self.parents.get(usize::try_from(i).ok()?));
        for (column, ref_column) in &self.columns {
            let value = parent
                .and_then(|p| p.get(ref_column))
                .cloned()
                .unwrap_or(GeneratedValue::Null);
            target.set(column.clone(), value);
        }
        Ok(())
    }
}

#[derive(Debug)]
enum Slot {
    Value {
        column: String,
        generator: BoxedGenerator,
    },
    /// Generated up front because a self reference points at it
    Precomputed {
        column: String,
        values: Vec<GeneratedValue>,
    },
    Reference(ReferenceSlot),
    SelfReference {
        columns: Vec<(String, String)>,
        generator: BoxedGenerator,
    },
    Composite(CompositeUniqueGenerator),
    /// Null until the second pass
    Deferred { column: String },
}

/// Generators of one table, initialised for its row count.
#[derive(Debug)]
struct RowProducer {
    table: String,
    slots: Vec<Slot>,
}

impl RowProducer {
    fn new(
        plan: &SeedPlan,
        table: &TablePlan,
        retained: &BTreeMap<String, Vec<GeneratedRow>>,
    ) -> Result<Self, SeedError> {
        let name = table.name();
        let count = table.count;
        let version = plan.context.api_version;
        let mut slots = Vec::new();
        let mut seen_relations: BTreeSet<usize> = BTreeSet::new();
        let mut self_relations = Vec::new();

        for column in &table.columns {
            match &column.source {
                ColumnSource::Omitted | ColumnSource::Composite(_) => {}
                ColumnSource::Generated(config) => {
                    let mut generator = registry::instantiate(config, &column.params, version)
                        .map_err(SeedError::at(name, &column.name))?;
                    generator
                        .init(InitOptions::new(count, plan.context.column_seed(name, &column.name)))
                        .map_err(SeedError::at(name, &column.name))?;
                    slots.push(Slot::Value {
                        column: column.name.clone(),
                        generator,
                    });
                }
                ColumnSource::Reference(idx) => {
                    if seen_relations.insert(*idx) {
                        let with = table.with.as_ref().filter(|w| w.relation == *idx);
                        slots.push(Slot::Reference(ReferenceSlot::new(
                            plan,
                            table,
                            &plan.relations[*idx],
                            retained,
                            with.map(|w| w.repeats.clone()),
                            count,
                        )?));
                    }
                }
                ColumnSource::SelfReference(idx) => {
                    if seen_relations.insert(*idx) {
                        self_relations.push(*idx);
                    }
                }
                ColumnSource::Deferred(_) => slots.push(Slot::Deferred {
                    column: column.name.clone(),
                }),
            }
        }

        for (idx, group) in table.composites.iter().enumerate() {
            let mut members = Vec::with_capacity(group.members.len());
            for ((column, member), params) in
                group.columns.iter().zip(&group.members).zip(&group.params)
            {
                let generator: BoxedGenerator = match member {
                    CompositeMember::Generated(config) => registry::instantiate(config, params, version)
                        .map_err(SeedError::at(name, column))?,
                    CompositeMember::Reference(rel) => {
                        let relation = &plan.relations[*rel];
                        Box::new(distinct_parent_keys(relation, retained)?)
                    }
                };
                members.push((column.clone(), generator));
            }
            let mut generator = CompositeUniqueGenerator::new(members);
            generator
                .init(InitOptions::new(count, plan.context.group_seed(&group.seed_key(name))))
                .map_err(SeedError::at(name, &group.columns.join(",")))?;
            debug!(table = %name, group = idx, columns = ?group.columns, "Composite unique key");
            slots.push(Slot::Composite(generator));
        }

        for idx in self_relations {
            let relation = &plan.relations[idx];
            let not_null = relation
                .columns
                .iter()
                .filter_map(|c| table.column(c))
                .any(|c| c.params.not_null);
            for ref_column in &relation.ref_columns {
                precompute(&mut slots, name, ref_column, count)?;
            }
            let rows = (0..count as i64).map(GeneratedValue::Int).collect();
            let mut generator: BoxedGenerator = Box::new(SelfRelationGenerator::new(rows, not_null));
            generator
                .init(InitOptions::new(count, plan.context.group_seed(&relation.signature())))
                .map_err(SeedError::at(name, &relation.columns.join(",")))?;
            slots.push(Slot::SelfReference {
                columns: relation
                    .columns
                    .iter()
                    .cloned()
                    .zip(relation.ref_columns.iter().cloned())
                    .collect(),
                generator,
            });
        }

        Ok(Self {
            table: name.to_string(),
            slots,
        })
    }

    fn next_row(&mut self, index: u64) -> Result<GeneratedRow, SeedError> {
        let mut row = GeneratedRow::new(index);
        let mut self_references = Vec::new();
        let table = self.table.as_str();
        for (pos, slot) in self.slots.iter_mut().enumerate() {
            match slot {
                Slot::Value { column, generator } => {
                    let value = generator
                        .generate(index)
                        .map_err(SeedError::at(table, column))?;
                    row.set(column.clone(), value);
                }
                Slot::Precomputed { column, values } => {
                    let value = values.get(index as usize).cloned().unwrap_or(GeneratedValue::Null);
                    row.set(column.clone(), value);
                }
                Slot::Reference(reference) => reference.fill(index, &mut row)?,
                Slot::SelfReference { generator, .. } => {
                    let target = generator.generate(index)?;
                    self_references.push((pos, target));
                }
                Slot::Composite(generator) => {
                    let tuple = generator
                        .generate_tuple()
                        .map_err(|e| SeedError::at(table, &generator.columns().join(","))(e))?;
                    for (column, value) in tuple {
                        row.set(column, value);
                    }
                }
                Slot::Deferred { column } => row.set(column.clone(), GeneratedValue::Null),
            }
        }

        // self references copy the key columns of an earlier or later row
        for (pos, target) in self_references {
            let Slot::SelfReference { columns, .. } = &self.slots[pos] else {
                continue;
            };
            let target = target.as_i128().and_then(|i| usize::try_from(i).ok());
            for (column, ref_column) in columns {
                let value = match target {
                    Some(target) => self.precomputed(ref_column, target),
                    None => GeneratedValue::Null,
                };
                row.set(column.clone(), value);
            }
        }
        Ok(row)
    }

    fn precomputed(&self, column: &str, row: usize) -> GeneratedValue {
        self.slots
            .iter()
            .find_map(|slot| match slot {
                Slot::Precomputed { column: c, values } if c == column => values.get(row).cloned(),
                _ => None,
            })
            .unwrap_or(GeneratedValue::Null)
    }
}

/// Replace the value slot of `column` with all of its values.
fn precompute(slots: &mut [Slot], table: &str, column: &str, count: u64) -> Result<(), SeedError> {
    let slot = slots
        .iter_mut()
        .find(|s| matches!(s, Slot::Value { column: c, .. } | Slot::Precomputed { column: c, .. } if c == column))
        .ok_or_else(|| {
            SeedError::Infeasible(format!(
                "self reference of '{table}' points at '{column}', which is not a generated column"
            ))
        })?;
    if let Slot::Value { generator, .. } = slot {
        let values = (0..count)
            .map(|i| generator.generate(i))
            .collect::<Result<Vec<_>, _>>()
            .map_err(SeedError::at(table, column))?;
        *slot = Slot::Precomputed {
            column: column.to_string(),
            values,
        };
    }
    Ok(())
}

/// Unique draw over the distinct keys of a single-column parent.
fn distinct_parent_keys(
    relation: &Relation,
    retained: &BTreeMap<String, Vec<GeneratedRow>>,
) -> Result<ValuesFromArrayGenerator, SeedError> {
    let parents = retained.get(&relation.ref_table).ok_or_else(|| {
        SeedError::Config(format!(
            "rows of '{}' were not kept for '{}'",
            relation.ref_table, relation.table
        ))
    })?;
    let ref_column = relation.ref_columns.first().map(String::as_str).unwrap_or_default();
    let mut seen = BTreeSet::new();
    let keys = parents
        .iter()
        .filter_map(|row| row.get(ref_column))
        .filter(|value| !value.is_null() && seen.insert(value.unique_key()))
        .cloned()
        .collect();
    Ok(ValuesFromArrayGenerator::new(keys).unique(true).not_null(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DefaultSelector;
    use crate::plan::PlanBuilder;
    use crate::store::MemoryStore;
    use crate::DialectKind;
    use seed_core::{Column, DataType, Refinements, SeedSchema, Table, TableRefinement, WithCount};
    use std::collections::HashSet;

    fn users() -> SeedSchema {
        SeedSchema::new(
            vec![Table::new(
                "users",
                vec![
                    Column::new("id", DataType::Number, "serial").primary(),
                    Column::new("manager_id", DataType::Number, "integer"),
                ],
            )],
            vec![Relation::new("users", &["manager_id"], "users", &["id"])],
        )
        .unwrap()
    }

    async fn seed(
        schema: &SeedSchema,
        refinements: &Refinements,
        options: &SeedOptions,
        store: &mut MemoryStore,
    ) -> Result<SeedReport, SeedError> {
        let plan = PlanBuilder::new(schema, refinements, options, &DefaultSelector).build()?;
        run(&plan, options, store).await
    }

    #[tokio::test]
    async fn test_self_relation_points_at_existing_rows() {
        let options = SeedOptions::default().with_count(5).with_seed(42);
        let mut store = MemoryStore::new();
        seed(&users(), &Refinements::new(), &options, &mut store).await.unwrap();

        let rows = store.rows("users").unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.get("id").cloned().unwrap()).collect();
        assert_eq!(ids, (1..=5).map(GeneratedValue::Int).collect::<Vec<_>>());
        assert!(rows[0].get("manager_id").unwrap().is_null());
        for row in rows {
            let manager = row.get("manager_id").unwrap();
            assert!(manager.is_null() || ids.contains(manager));
        }
        assert_eq!(store.sequence("users", "id"), Some(5));
    }

    #[tokio::test]
    async fn test_batches_respect_parameter_limit() {
        let options = SeedOptions::default().with_count(25).with_batch_size(10);
        let mut store = MemoryStore::with_dialect(DialectKind::MySQL);
        let report = seed(&users(), &Refinements::new(), &options, &mut store).await.unwrap();
        let metrics = report.table("users").unwrap();
        assert_eq!(metrics.rows_inserted, 25);
        assert_eq!(metrics.batch_count, 3);
        // only the postgres family tracks sequences
        assert_eq!(store.sequence("users", "id"), None);
    }

    fn authors() -> SeedSchema {
        SeedSchema::new(
            vec![
                Table::new("a", vec![Column::new("id", DataType::Number, "integer").primary()]),
                Table::new(
                    "b",
                    vec![
                        Column::new("id", DataType::Number, "integer").primary(),
                        Column::new("a_id", DataType::Number, "integer").not_null(),
                    ],
                ),
            ],
            vec![Relation::new("b", &["a_id"], "a", &["id"])],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_with_spreads_children_over_parents() {
        let refinements = Refinements::from([(
            "a".to_string(),
            TableRefinement::default()
                .with_count(3)
                .with_children("b", WithCount::Fixed(2)),
        )]);
        let mut store = MemoryStore::new();
        seed(&authors(), &refinements, &SeedOptions::default(), &mut store)
            .await
            .unwrap();

        let children: Vec<_> = store
            .rows("b")
            .unwrap()
            .iter()
            .map(|r| r.get("a_id").cloned().unwrap())
            .collect();
        let expected: Vec<_> = [1, 1, 2, 2, 3, 3].into_iter().map(GeneratedValue::Int).collect();
        assert_eq!(children, expected);
    }

    #[tokio::test]
    async fn test_unique_foreign_key_exhausts_parents() {
        let mut schema = authors();
        schema.tables[1].columns[1].is_unique = true;
        let refinements = Refinements::from([
            ("a".to_string(), TableRefinement::default().with_count(3)),
            ("b".to_string(), TableRefinement::default().with_count(5)),
        ]);
        let err = seed(&schema, &refinements, &SeedOptions::default(), &mut MemoryStore::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Capacity { .. }));
    }

    #[tokio::test]
    async fn test_cyclic_keys_filled_in_second_pass() {
        let schema = SeedSchema::new(
            vec![
                Table::new(
                    "a",
                    vec![
                        Column::new("id", DataType::Number, "integer").primary(),
                        Column::new("b_id", DataType::Number, "integer").not_null(),
                    ],
                ),
                Table::new(
                    "b",
                    vec![
                        Column::new("id", DataType::Number, "integer").primary(),
                        Column::new("a_id", DataType::Number, "integer"),
                    ],
                ),
            ],
            vec![
                Relation::new("a", &["b_id"], "b", &["id"]),
                Relation::new("b", &["a_id"], "a", &["id"]),
            ],
        )
        .unwrap();
        let mut store = MemoryStore::new();
        let report = seed(&schema, &Refinements::new(), &SeedOptions::default(), &mut store)
            .await
            .unwrap();

        assert_eq!(report.table("b").unwrap().rows_updated, 10);
        let a_ids: Vec<_> = store.rows("a").unwrap().iter().map(|r| r.get("id").cloned().unwrap()).collect();
        for row in store.rows("b").unwrap() {
            assert!(a_ids.contains(row.get("a_id").unwrap()));
        }
    }

    #[tokio::test]
    async fn test_join_table_pairs_are_distinct() {
        let schema = SeedSchema::new(
            vec![
                Table::new("users", vec![Column::new("id", DataType::Number, "integer").primary()]),
                Table::new("tags", vec![Column::new("id", DataType::Number, "integer").primary()]),
                Table::new(
                    "user_tags",
                    vec![
                        Column::new("user_id", DataType::Number, "integer").primary(),
                        Column::new("tag_id", DataType::Number, "integer").primary(),
                    ],
                ),
            ],
            vec![
                Relation::new("user_tags", &["user_id"], "users", &["id"]),
                Relation::new("user_tags", &["tag_id"], "tags", &["id"]),
            ],
        )
        .unwrap();
        let refinements = Refinements::from([(
            "user_tags".to_string(),
            TableRefinement::default().with_count(60),
        )]);
        let mut store = MemoryStore::new();
        seed(&schema, &refinements, &SeedOptions::default(), &mut store)
            .await
            .unwrap();

        let pairs: HashSet<_> = store
            .rows("user_tags")
            .unwrap()
            .iter()
            .map(|r| (r.get("user_id").cloned().unwrap().unique_key(), r.get("tag_id").cloned().unwrap().unique_key()))
            .collect();
        assert_eq!(pairs.len(), 60);

        let refinements = Refinements::from([(
            "user_tags".to_string(),
            TableRefinement::default().with_count(101),
        )]);
        assert!(seed(&schema, &refinements, &SeedOptions::default(), &mut MemoryStore::new())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_same_seed_same_rows() {
        let options = SeedOptions::default().with_count(20).with_seed(7);
        let mut first = MemoryStore::new();
        let mut second = MemoryStore::new();
        seed(&users(), &Refinements::new(), &options, &mut first).await.unwrap();
        seed(&users(), &Refinements::new(), &options, &mut second).await.unwrap();
        assert_eq!(first.into_tables(), second.into_tables());
    }

    #[tokio::test]
    async fn test_cycle_with_outside_dependants() {
        let id = || Column::new("id", DataType::Number, "integer").primary();
        let fk = |name: &str| Column::new(name, DataType::Number, "integer");
        let schema = SeedSchema::new(
            vec![
                Table::new("x", vec![id(), fk("z_id").not_null()]),
                Table::new("z", vec![id(), fk("x_id")]),
                Table::new("c", vec![id(), fk("x_id").not_null()]),
                Table::new("f", vec![id(), fk("z_id").not_null()]),
            ],
            vec![
                Relation::new("x", &["z_id"], "z", &["id"]),
                Relation::new("z", &["x_id"], "x", &["id"]),
                Relation::new("c", &["x_id"], "x", &["id"]),
                Relation::new("f", &["z_id"], "z", &["id"]),
            ],
        )
        .unwrap();
        let mut store = MemoryStore::new();
        let report = seed(&schema, &Refinements::new(), &SeedOptions::default(), &mut store)
            .await
            .unwrap();

        assert_eq!(report.rows_inserted(), 40);
        let ids = |table: &str| -> HashSet<_> {
            store
                .rows(table)
                .unwrap()
                .iter()
                .map(|r| r.get("id").cloned().unwrap().unique_key())
                .collect()
        };
        let (x_ids, z_ids) = (ids("x"), ids("z"));
        for row in store.rows("c").unwrap() {
            assert!(x_ids.contains(&row.get("x_id").unwrap().unique_key()));
        }
        for row in store.rows("f").unwrap() {
            assert!(z_ids.contains(&row.get("z_id").unwrap().unique_key()));
        }
    }
}
