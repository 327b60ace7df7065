//! Bulk mode: one side-effecting operation applied to every selected table,
//! in the order chosen by an [`OrderingPolicy`].

use crate::{
    connection::Connection,
    error::EngineError,
    ordering::{self, OrderingPolicy},
};
use chrono::Utc;
use engine_config::{
    report::{
        step::{StepRecord, StepSubject},
        summary::{ExecutionReport, RunMode},
    },
    settings::ExecutionSettings,
};
use model::{
    catalog::{
        Catalog,
        table::{Table, TableType},
    },
    core::identifiers::RunId,
};
use planner::{
    operation::Operation,
    statement::{
        dialect::{Ansi, Dialect},
        renderer::StatementRenderer,
    },
};
use tracing::{error, info, warn};

/// A table selected for the operation, with its rendered statement.
#[derive(Debug, Clone)]
pub struct BulkTarget<'c> {
    pub table: Table<'c>,
    pub statement: String,
}

impl BulkTarget<'_> {
    fn subject(&self) -> StepSubject {
        StepSubject::Target {
            table: self.table.full_name(),
            statement: self.statement.clone(),
        }
    }
}

pub struct BulkPlan {
    operation: Operation,
    dialect: Box<dyn Dialect>,
    schema: Option<String>,
    table_types: Vec<TableType>,
    policy: Box<dyn OrderingPolicy>,
    /// Set by [`BulkPlan::with_policy`]; settings no longer pick the order.
    explicit_policy: bool,
    settings: ExecutionSettings,
}

impl BulkPlan {
    /// Fails if the operation's statement template is empty or uses an
    /// unknown variable.
    pub fn new(operation: Operation) -> Result<Self, EngineError> {
        StatementRenderer::check(operation.template())?;
        let settings = ExecutionSettings::default();

        Ok(Self {
            operation,
            dialect: Box::new(Ansi),
            schema: None,
            table_types: Vec::new(),
            policy: ordering::for_kind(settings.ordering),
            explicit_policy: false,
            settings,
        })
    }

    pub fn with_dialect(mut self, dialect: Box<dyn Dialect>) -> Self {
        self.dialect = dialect;
        self
    }

    /// Only tables in this schema, matched by full or short schema name.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Only tables of these types. Empty means every type.
    pub fn with_table_types(mut self, table_types: Vec<TableType>) -> Self {
        self.table_types = table_types;
        self
    }

    /// Takes precedence over `settings.ordering`, whichever is set first.
    pub fn with_policy(mut self, policy: Box<dyn OrderingPolicy>) -> Self {
        self.policy = policy;
        self.explicit_policy = true;
        self
    }

    /// Replaces the settings. Unless a policy was set explicitly, the ordering
    /// policy follows `settings.ordering`.
    pub fn with_settings(mut self, settings: ExecutionSettings) -> Self {
        if !self.explicit_policy {
            self.policy = ordering::for_kind(settings.ordering);
        }
        self.settings = settings;
        self
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn policy(&self) -> &dyn OrderingPolicy {
        self.policy.as_ref()
    }

    /// Selected tables in visiting order, with their statements. Nothing is executed.
    pub fn targets<'c>(&self, catalog: &'c Catalog) -> Result<Vec<BulkTarget<'c>>, EngineError> {
        let selected: Vec<Table<'c>> = catalog
            .tables(None)
            .into_iter()
            .filter(|table| self.selects(*table) && self.operation.applies_to(*table))
            .collect();

        let ordered = self.policy.order(selected)?;
        let renderer = StatementRenderer::new(self.dialect.as_ref());

        Ok(ordered
            .into_iter()
            .map(|table| BulkTarget {
                table,
                statement: renderer.render(self.operation.template(), table),
            })
            .collect())
    }

    /// The statements a run would execute, in order.
    pub fn preview(&self, catalog: &Catalog) -> Result<Vec<String>, EngineError> {
        Ok(self
            .targets(catalog)?
            .into_iter()
            .map(|target| target.statement)
            .collect())
    }

    fn selects(&self, table: Table<'_>) -> bool {
        let schema_matches = self.schema.as_deref().is_none_or(|wanted| {
            let schema = table.schema();
            schema.full_name() == wanted || schema.name() == Some(wanted)
        });
        let type_matches =
            self.table_types.is_empty() || self.table_types.contains(table.table_type());

        schema_matches && type_matches
    }

    /// Applies the operation to every target.
    ///
    /// Returns `Err` only when no target sequence can be computed, e.g. a
    /// dependency cycle; nothing has been executed in that case. Per-target
    /// failures are recorded in the report. Under the default `stop` policy
    /// the first failure leaves every later target skipped.
    pub fn execute(
        &self,
        catalog: &Catalog,
        connection: &mut dyn Connection,
    ) -> Result<ExecutionReport, EngineError> {
        let targets = self.targets(catalog)?;
        let run_id = RunId::generate();
        let started_at = Utc::now();

        info!(
            "Bulk {} `{}` over {} table(s), {} order",
            run_id,
            self.operation.description(),
            targets.len(),
            self.policy.name()
        );
        if self.operation.is_destructive() {
            warn!("`{}` is destructive", self.operation.name());
        }

        let mut steps = Vec::with_capacity(targets.len());
        let mut halted = false;

        for target in &targets {
            if halted {
                steps.push(StepRecord::skipped(target.subject()));
                continue;
            }

            match self.apply(target, connection) {
                Ok(detail) => {
                    info!("{:<40} {}", target.table.full_name(), detail);
                    steps.push(StepRecord::succeeded(target.subject(), Some(detail)));
                }
                Err(err) => {
                    error!("{}: {}", target.table.full_name(), err);
                    steps.push(StepRecord::failed(target.subject(), err.to_step_error()));
                    halted = self.settings.stops_on_failure();
                }
            }
        }

        let report = ExecutionReport::finish(run_id, RunMode::Bulk, started_at, steps);
        info!("Bulk {} finished: {:?}", report.run_id, report.status);
        Ok(report)
    }

    fn apply(
        &self,
        target: &BulkTarget<'_>,
        connection: &mut dyn Connection,
    ) -> Result<String, EngineError> {
        let rows = match self.operation {
            Operation::Count => connection.query_count(&target.statement)?,
            Operation::Dump => connection.query(&target.statement)?.len() as u64,
            Operation::Drop | Operation::Truncate | Operation::QueryOver { .. } => {
                connection.execute(&target.statement)?
            }
        };
        Ok(self.operation.describe_result(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        connection::DryRunConnection,
        ordering::{CrawlOrder, DependencyOrder},
        test_support::{ScriptedConnection, books_catalog},
    };
    use engine_config::{
        report::{
            step::{ErrorKind, StepOutcome},
            summary::RunStatus,
        },
        settings::{FailurePolicy, OrderingKind},
    };
    use model::catalog::{
        column::Column,
        relationship::{ColumnPair, RelationshipKind},
    };
    use planner::statement::{dialect::MySql, error::TemplateError};

    /// A, B, C discovered in that order; C references B and B references A.
    fn abc() -> Catalog {
        let mut b = Catalog::builder();
        let s = b.add_schema(None, Some("shop")).unwrap();
        let a = b.add_table(s, "A", TableType::Table).unwrap();
        let bt = b.add_table(s, "B", TableType::Table).unwrap();
        let c = b.add_table(s, "C", TableType::Table).unwrap();
        b.add_relationship("fk_b_a", a, bt, RelationshipKind::ForeignKey, vec![ColumnPair::new("id", "a_id")])
            .unwrap();
        b.add_relationship("fk_c_b", bt, c, RelationshipKind::ForeignKey, vec![ColumnPair::new("id", "b_id")])
            .unwrap();
        b.build()
    }

    fn tables(report: &ExecutionReport) -> Vec<String> {
        report.steps.iter().map(|s| s.subject.to_string()).collect()
    }

    #[test]
    fn default_order_is_reverse_crawl() {
        let catalog = abc();
        let plan = BulkPlan::new(Operation::Drop).unwrap();

        assert_eq!(
            plan.preview(&catalog).unwrap(),
            vec![
                r#"DROP TABLE "shop"."C""#,
                r#"DROP TABLE "shop"."B""#,
                r#"DROP TABLE "shop"."A""#,
            ]
        );
    }

    #[test]
    fn failure_skips_the_remaining_targets() {
        let catalog = abc();
        let mut conn = ScriptedConnection::failing_on(r#""shop"."B""#);

        let report = BulkPlan::new(Operation::Drop)
            .unwrap()
            .execute(&catalog, &mut conn)
            .unwrap();

        assert_eq!(tables(&report), vec!["shop.C", "shop.B", "shop.A"]);
        assert_eq!(
            report.outcomes(),
            vec![StepOutcome::Succeeded, StepOutcome::Failed, StepOutcome::Skipped]
        );
        assert_eq!(report.status, RunStatus::Failed);
        assert_eq!(report.steps[1].error.as_ref().unwrap().kind, ErrorKind::Action);
        assert_eq!(report.steps[0].detail.as_deref(), Some("dropped"));
        assert_eq!(conn.executed.len(), 2);
    }

    #[test]
    fn continue_policy_visits_every_target() {
        let catalog = abc();
        let mut conn = ScriptedConnection::failing_on(r#""shop"."B""#);

        let report = BulkPlan::new(Operation::Truncate)
            .unwrap()
            .with_settings(ExecutionSettings::default().with_failure_policy(FailurePolicy::Continue))
            .execute(&catalog, &mut conn)
            .unwrap();

        assert_eq!(
            report.outcomes(),
            vec![StepOutcome::Succeeded, StepOutcome::Failed, StepOutcome::Succeeded]
        );
        assert_eq!(conn.executed.len(), 3);
    }

    #[test]
    fn counts_through_the_connection() {
        let catalog = abc();
        let mut conn = ScriptedConnection::returning(vec![vec!["12".into()]]);

        let report = BulkPlan::new(Operation::Count)
            .unwrap()
            .execute(&catalog, &mut conn)
            .unwrap();

        assert!(report.is_success());
        assert!(report.steps.iter().all(|s| s.detail.as_deref() == Some("12 rows")));
    }

    #[test]
    fn cycle_is_reported_before_anything_runs() {
        let mut b = Catalog::builder();
        let s = b.add_schema(None, Some("shop")).unwrap();
        let x = b.add_table(s, "X", TableType::Table).unwrap();
        let y = b.add_table(s, "Y", TableType::Table).unwrap();
        b.add_relationship("fk_x_y", y, x, RelationshipKind::ForeignKey, vec![])
            .unwrap();
        b.add_relationship("fk_y_x", x, y, RelationshipKind::ForeignKey, vec![])
            .unwrap();
        let catalog = b.build();
        let mut conn = DryRunConnection::new();

        let result = BulkPlan::new(Operation::Drop)
            .unwrap()
            .with_policy(Box::new(DependencyOrder))
            .execute(&catalog, &mut conn);

        assert!(matches!(result, Err(EngineError::DependencyCycle(_))));
        assert!(conn.statements().is_empty());
    }

    #[test]
    fn filters_by_schema_and_type() {
        let catalog = books_catalog();
        let plan = BulkPlan::new(Operation::Count)
            .unwrap()
            .with_schema("BOOKS")
            .with_table_types(vec![TableType::View]);

        let targets = plan.targets(&catalog).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].table.name(), "AUTHORSLIST");

        let none = BulkPlan::new(Operation::Count)
            .unwrap()
            .with_schema("OTHER")
            .targets(&catalog)
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn settings_select_the_ordering_policy() {
        let catalog = books_catalog();
        let plan = BulkPlan::new(Operation::Drop)
            .unwrap()
            .with_dialect(Box::new(MySql))
            .with_settings(ExecutionSettings::default().with_ordering(OrderingKind::Dependency));

        assert_eq!(plan.policy().name(), "dependency");
        let preview = plan.preview(&catalog).unwrap();
        assert_eq!(preview[0], "DROP VIEW `PUBLIC`.`BOOKS`.`AUTHORSLIST`");
        assert_eq!(preview[4], "DROP TABLE `PUBLIC`.`BOOKS`.`AUTHORS`");
    }

    #[test]
    fn explicit_policy_survives_later_settings() {
        let catalog = abc();
        let plan = BulkPlan::new(Operation::Truncate)
            .unwrap()
            .with_policy(Box::new(CrawlOrder))
            .with_settings(ExecutionSettings::default().with_failure_policy(FailurePolicy::Continue));

        assert_eq!(plan.policy().name(), "crawl");
        assert_eq!(
            plan.preview(&catalog).unwrap(),
            vec![
                r#"DELETE FROM "shop"."A""#,
                r#"DELETE FROM "shop"."B""#,
                r#"DELETE FROM "shop"."C""#,
            ]
        );
    }

    #[test]
    fn dump_skips_tables_without_orderable_columns() {
        let mut b = Catalog::builder();
        let s = b.add_schema(None, Some("shop")).unwrap();
        b.add_table(s, "EMPTY", TableType::Table).unwrap();
        let docs = b.add_table(s, "DOCS", TableType::Table).unwrap();
        b.add_column(docs, Column::new("ID", 1, "INTEGER")).unwrap();
        b.add_column(docs, Column::new("BODY", 2, "CLOB")).unwrap();
        let catalog = b.build();

        let preview = BulkPlan::new(Operation::Dump)
            .unwrap()
            .preview(&catalog)
            .unwrap();

        assert_eq!(
            preview,
            vec![r#"SELECT "ID", "BODY" FROM "shop"."DOCS" ORDER BY "ID""#]
        );
    }

    #[test]
    fn custom_templates_are_checked_up_front() {
        assert!(matches!(
            BulkPlan::new(Operation::query_over("analyze", "ANALYZE ${tbl}")),
            Err(EngineError::Template(TemplateError::UnknownVariable(var))) if var == "tbl"
        ));

        let catalog = abc();
        let mut conn = DryRunConnection::new();
        let report = BulkPlan::new(Operation::query_over("analyze", "ANALYZE ${tablename}"))
            .unwrap()
            .execute(&catalog, &mut conn)
            .unwrap();

        assert!(report.is_success());
        assert_eq!(conn.script(), "ANALYZE \"C\";\nANALYZE \"B\";\nANALYZE \"A\";\n");
    }
}
