//! Policies that decide the order in which bulk targets are visited.

use crate::error::EngineError;
use engine_config::settings::OrderingKind;
use model::catalog::{relationship::Direction, table::Table};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

pub trait OrderingPolicy: Send + Sync {
    fn name(&self) -> &str;

    /// Reorders `targets`, given in crawl order.
    fn order<'c>(&self, targets: Vec<Table<'c>>) -> Result<Vec<Table<'c>>, EngineError>;
}

/// Tables in the order the crawler discovered them.
#[derive(Debug, Default, Clone)]
pub struct CrawlOrder;

impl OrderingPolicy for CrawlOrder {
    fn name(&self) -> &str {
        "crawl"
    }

    fn order<'c>(&self, targets: Vec<Table<'c>>) -> Result<Vec<Table<'c>>, EngineError> {
        Ok(targets)
    }
}

/// Last discovered table first. Children are usually discovered after the
/// parents they reference, so this drops most children before their parents,
/// but it is a heuristic and gives no guarantee for arbitrary graphs.
#[derive(Debug, Default, Clone)]
pub struct ReverseCrawlOrder;

impl OrderingPolicy for ReverseCrawlOrder {
    fn name(&self) -> &str {
        "reverse-crawl"
    }

    fn order<'c>(&self, mut targets: Vec<Table<'c>>) -> Result<Vec<Table<'c>>, EngineError> {
        targets.reverse();
        Ok(targets)
    }
}

/// Topological order over relationship edges: every table comes before the
/// tables it references. Ties go to the latest discovered table, so acyclic
/// graphs that reverse crawl order already handles keep that order.
/// Self-references are ignored and edges to tables outside the target set are
/// not considered. Any other cycle is a [`EngineError::DependencyCycle`].
#[derive(Debug, Default, Clone)]
pub struct DependencyOrder;

impl OrderingPolicy for DependencyOrder {
    fn name(&self) -> &str {
        "dependency"
    }

    fn order<'c>(&self, targets: Vec<Table<'c>>) -> Result<Vec<Table<'c>>, EngineError> {
        let positions: HashMap<String, usize> = targets
            .iter()
            .enumerate()
            .map(|(pos, table)| (table.full_name(), pos))
            .collect();

        // parents[i]: targets that table i references
        let parents: Vec<Vec<usize>> = targets
            .iter()
            .enumerate()
            .map(|(pos, table)| {
                table
                    .related_tables(Direction::Parent)
                    .into_iter()
                    .filter_map(|parent| positions.get(&parent.full_name()).copied())
                    .filter(|&parent| parent != pos)
                    .collect()
            })
            .collect();

        let mut pending_children = vec![0usize; targets.len()];
        for refs in &parents {
            for &parent in refs {
                pending_children[parent] += 1;
            }
        }

        let mut ready: BTreeSet<usize> = (0..targets.len())
            .filter(|&pos| pending_children[pos] == 0)
            .collect();
        let mut ordered = Vec::with_capacity(targets.len());
        let mut emitted = vec![false; targets.len()];

        while let Some(pos) = ready.pop_last() {
            ordered.push(pos);
            emitted[pos] = true;
            for &parent in &parents[pos] {
                pending_children[parent] -= 1;
                if pending_children[parent] == 0 {
                    ready.insert(parent);
                }
            }
        }

        if ordered.len() < targets.len() {
            let remaining: Vec<bool> = emitted.iter().map(|done| !done).collect();
            let cycle = find_cycle(&parents, &remaining)
                .unwrap_or_else(|| (0..targets.len()).filter(|&pos| remaining[pos]).collect());
            let names = cycle.iter().map(|&pos| targets[pos].full_name()).collect();
            return Err(EngineError::DependencyCycle(names));
        }

        debug!("Dependency order computed for {} tables", ordered.len());
        Ok(ordered.into_iter().map(|pos| targets[pos]).collect())
    }
}

/// A closed reference path among `remaining` tables, first table repeated at the end.
/// Depth-first with an explicit stack of `(table, next parent edge)` frames.
fn find_cycle(parents: &[Vec<usize>], remaining: &[bool]) -> Option<Vec<usize>> {
    let mut visited = vec![false; parents.len()];
    let mut on_path = vec![false; parents.len()];

    for start in (0..parents.len()).filter(|&pos| remaining[pos]) {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        on_path[start] = true;
        let mut stack = vec![(start, 0usize)];

        while let Some(frame) = stack.last_mut() {
            let (current, next) = *frame;
            let Some(&parent) = parents[current].get(next) else {
                on_path[current] = false;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            if !remaining[parent] {
                continue;
            }
            if on_path[parent] {
                let begin = stack.iter().position(|&(pos, _)| pos == parent)?;
                let mut cycle: Vec<usize> = stack[begin..].iter().map(|&(pos, _)| pos).collect();
                cycle.push(parent);
                return Some(cycle);
            }
            if visited[parent] {
                continue;
            }

            visited[parent] = true;
            on_path[parent] = true;
            stack.push((parent, 0));
        }
    }
    None
}

pub fn for_kind(kind: OrderingKind) -> Box<dyn OrderingPolicy> {
    match kind {
        OrderingKind::Crawl => Box::new(CrawlOrder),
        OrderingKind::ReverseCrawl => Box::new(ReverseCrawlOrder),
        OrderingKind::Dependency => Box::new(DependencyOrder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::books_catalog;
    use model::catalog::{
        Catalog,
        relationship::{ColumnPair, RelationshipKind},
        table::TableType,
    };

    /// Tables discovered in `names` order; each `(child, parent)` pair is a foreign key.
    fn catalog(names: &[&str], edges: &[(&str, &str)]) -> Catalog {
        let mut b = Catalog::builder();
        let s = b.add_schema(None, Some("app")).unwrap();
        for name in names {
            b.add_table(s, name, TableType::Table).unwrap();
        }
        for (i, (child, parent)) in edges.iter().enumerate() {
            let child = b.find_table(&format!("app.{child}")).unwrap();
            let parent = b.find_table(&format!("app.{parent}")).unwrap();
            b.add_relationship(
                &format!("fk_{i}"),
                parent,
                child,
                RelationshipKind::ForeignKey,
                vec![ColumnPair::new("id", "parent_id")],
            )
            .unwrap();
        }
        b.build()
    }

    fn names(tables: &[Table<'_>]) -> Vec<String> {
        tables.iter().map(|t| t.name().to_string()).collect()
    }

    #[test]
    fn reverse_crawl_is_the_reversed_discovery_order() {
        let catalog = catalog(&["A", "B", "C"], &[("C", "B"), ("B", "A")]);
        let ordered = ReverseCrawlOrder.order(catalog.tables(None)).unwrap();
        assert_eq!(names(&ordered), vec!["C", "B", "A"]);

        let crawl = CrawlOrder.order(catalog.tables(None)).unwrap();
        assert_eq!(names(&crawl), vec!["A", "B", "C"]);
    }

    #[test]
    fn dependency_order_fixes_children_discovered_first() {
        // ORDERS references CUSTOMERS but was crawled first
        let catalog = catalog(
            &["ORDERS", "CUSTOMERS", "AUDIT"],
            &[("ORDERS", "CUSTOMERS")],
        );

        let heuristic = ReverseCrawlOrder.order(catalog.tables(None)).unwrap();
        assert_eq!(names(&heuristic), vec!["AUDIT", "CUSTOMERS", "ORDERS"]);

        let ordered = DependencyOrder.order(catalog.tables(None)).unwrap();
        assert_eq!(names(&ordered), vec!["AUDIT", "ORDERS", "CUSTOMERS"]);
    }

    #[test]
    fn dependency_order_handles_diamonds() {
        let catalog = catalog(
            &["ROOT", "LEFT", "RIGHT", "LEAF"],
            &[("LEFT", "ROOT"), ("RIGHT", "ROOT"), ("LEAF", "LEFT"), ("LEAF", "RIGHT")],
        );
        let ordered = DependencyOrder.order(catalog.tables(None)).unwrap();
        assert_eq!(names(&ordered), vec!["LEAF", "RIGHT", "LEFT", "ROOT"]);
    }

    #[test]
    fn self_references_are_not_cycles() {
        let catalog = books_catalog();
        let ordered = DependencyOrder.order(catalog.tables(None)).unwrap();

        assert_eq!(
            names(&ordered),
            vec!["AUTHORSLIST", "EMPLOYEES", "BOOKAUTHORS", "BOOKS", "AUTHORS"]
        );
    }

    #[test]
    fn cycles_are_reported_with_their_path() {
        let catalog = catalog(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("B", "C"), ("C", "A"), ("D", "A")],
        );

        match DependencyOrder.order(catalog.tables(None)) {
            Err(EngineError::DependencyCycle(path)) => {
                assert_eq!(path, vec!["app.A", "app.B", "app.C", "app.A"]);
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn long_reference_rings_are_reported_without_recursion() {
        const RING: usize = 8_000;
        let mut b = Catalog::builder();
        let s = b.add_schema(None, Some("app")).unwrap();
        let tables: Vec<_> = (0..RING)
            .map(|i| b.add_table(s, &format!("T{i}"), TableType::Table).unwrap())
            .collect();
        for i in 0..RING {
            b.add_relationship(
                &format!("fk_{i}"),
                tables[(i + 1) % RING],
                tables[i],
                RelationshipKind::ForeignKey,
                vec![ColumnPair::new("id", "next_id")],
            )
            .unwrap();
        }
        let catalog = b.build();

        match DependencyOrder.order(catalog.tables(None)) {
            Err(EngineError::DependencyCycle(path)) => {
                assert_eq!(path.len(), RING + 1);
                assert_eq!(path.first().map(String::as_str), Some("app.T0"));
                assert_eq!(path[1], "app.T1");
                assert_eq!(path.last(), path.first());
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn edges_outside_the_targets_are_ignored() {
        let catalog = catalog(&["A", "B", "C"], &[("A", "C")]);
        let targets: Vec<_> = catalog
            .tables(None)
            .into_iter()
            .filter(|t| t.name() != "C")
            .collect();

        let ordered = DependencyOrder.order(targets).unwrap();
        assert_eq!(names(&ordered), vec!["B", "A"]);
    }

    #[test]
    fn policies_by_kind() {
        assert_eq!(for_kind(OrderingKind::Crawl).name(), "crawl");
        assert_eq!(for_kind(OrderingKind::default()).name(), "reverse-crawl");
        assert_eq!(for_kind(OrderingKind::Dependency).name(), "dependency");
    }
}
