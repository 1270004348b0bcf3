use super::{DependencyGraph, TaskNode};
use crate::error::{AnalysisError, AnalysisResult};
use crate::record::TaskRecord;
use petgraph::graph::{DiGraph, NodeIndex};
use polars::prelude::*;
use std::collections::HashMap;

/// Builds one `DependencyGraph` from a source-grouped subset of the record
/// set. Resolution is scoped to the subset: a dependency identifier only
/// binds to a sibling node of the same build pass.
pub struct DependencyGraphBuilder<'a> {
    df: &'a DataFrame,
}

impl<'a> DependencyGraphBuilder<'a> {
    pub fn new(df: &'a DataFrame) -> Self {
        Self { df }
    }

    /// Materializes nodes in row order, then resolves each row's
    /// semicolon-separated dependency list. Unknown and self-referential
    /// identifiers are dropped with a warning, never errored: the chart
    /// degrades to a missing arrow.
    pub fn build(&self, color: &str) -> AnalysisResult<DependencyGraph> {
        // Surface an unreadable dependency column as a graph error before
        // any node work happens.
        self.df
            .column("depends_on_raw")?
            .str()
            .map_err(|source| AnalysisError::GraphBuild {
                column: "depends_on_raw".to_string(),
                source,
            })?;

        let mut graph: DiGraph<TaskNode, ()> = DiGraph::new();
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::new();
        let mut raw_lists: Vec<(String, Vec<String>)> = Vec::with_capacity(self.df.height());

        for row_idx in 0..self.df.height() {
            let record = TaskRecord::from_dataframe_row(self.df, row_idx)?;
            let node = TaskNode {
                id: record.id.clone(),
                name: record.task.clone(),
                full_name: record.qualified_name(),
                start: record.start_date,
                duration_days: record.days,
                percent_done: record.pct_progress,
                color: color.to_string(),
                resource: record.external_owner.clone(),
                depends_on: Vec::new(),
            };
            let node_ix = graph.add_node(node);
            id_to_index.insert(record.id.clone(), node_ix);
            raw_lists.push((record.id, split_dependency_list(&record.depends_on_raw)));
        }

        for (task_id, deps) in raw_lists {
            let task_ix = id_to_index[&task_id];
            for dep_id in deps {
                if dep_id == task_id {
                    log::warn!("task '{task_id}' depends on itself, dropping the reference");
                    continue;
                }
                match id_to_index.get(&dep_id) {
                    Some(&dep_ix) => {
                        graph.add_edge(dep_ix, task_ix, ());
                        graph[task_ix].depends_on.push(dep_id);
                    }
                    None => {
                        log::warn!(
                            "task '{task_id}' depends on unknown id '{dep_id}', dropping the reference"
                        );
                    }
                }
            }
        }

        log::debug!(
            "dependency graph built: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(DependencyGraph { graph, id_to_index })
    }
}

fn split_dependency_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
