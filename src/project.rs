use crate::context::AnalysisContext;
use crate::error::{AnalysisError, AnalysisResult};
use crate::graph::{DependencyGraph, DependencyGraphBuilder};
use crate::table::TaskTable;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use rayon::prelude::*;

/// Display palette for sub-projects. Chosen at random per group; two
/// groups sharing a color is acceptable.
pub const COLOR_PALETTE: [&str; 7] = [
    "yellow", "lime", "red", "orange", "green", "gray", "aqua",
];

/// One source group materialized for rendering: its dependency graph, the
/// group's date bounds, and the color every bar in the group shares.
#[derive(Debug)]
pub struct SubProject {
    pub name: String,
    pub color: String,
    /// Minimum start date across the group, regardless of status.
    pub start_date: NaiveDate,
    /// Maximum accomplished date across the group. Unfinished tasks never
    /// advance this bound; "today" applies only when nothing is finished.
    pub end_date: NaiveDate,
    pub graph: DependencyGraph,
}

impl SubProject {
    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }
}

/// The umbrella project: sub-projects in first-appearance order of their
/// source value. Carries no dates of its own.
pub struct Project {
    pub name: String,
    pub sub_projects: Vec<SubProject>,
}

/// Groups the table by source and assembles the two-level hierarchy. Each
/// group's inputs are disjoint, so groups build in parallel and collect in
/// source order.
pub struct ProjectAggregator<'a> {
    table: &'a TaskTable,
    ctx: &'a AnalysisContext,
}

impl<'a> ProjectAggregator<'a> {
    pub fn new(table: &'a TaskTable, ctx: &'a AnalysisContext) -> Self {
        Self { table, ctx }
    }

    pub fn build(&self, project_name: &str) -> AnalysisResult<Project> {
        let sources = self.table.distinct_sources()?;
        let sub_projects = sources
            .par_iter()
            .map(|source| self.build_sub_project(source))
            .collect::<AnalysisResult<Vec<SubProject>>>()?;

        Ok(Project {
            name: project_name.to_string(),
            sub_projects,
        })
    }

    /// Grouping is derived from values that exist, so an empty subset
    /// signals a caller bug; it fails rather than producing a dateless
    /// group.
    pub fn build_sub_project(&self, source: &str) -> AnalysisResult<SubProject> {
        let subset = self.table.source_subset(source)?;
        if subset.height() == 0 {
            return Err(AnalysisError::EmptyGroup {
                source: source.to_string(),
            });
        }

        let color = pick_color();
        let graph = DependencyGraphBuilder::new(&subset).build(color)?;
        let (start_date, end_date) = self.group_bounds(&subset)?;

        log::debug!(
            "sub-project '{source}': {} tasks, {start_date} -> {end_date}",
            graph.node_count()
        );

        Ok(SubProject {
            name: source.to_string(),
            color: color.to_string(),
            start_date,
            end_date,
            graph,
        })
    }

    fn group_bounds(&self, subset: &DataFrame) -> AnalysisResult<(NaiveDate, NaiveDate)> {
        let starts = subset.column("start_date")?.date()?;
        let accomplished = subset.column("accomplished_date")?.date()?;

        let mut start_bound: Option<i32> = None;
        let mut end_bound: Option<i32> = None;
        for idx in 0..subset.height() {
            if let Some(days) = starts.get(idx) {
                start_bound = Some(start_bound.map_or(days, |cur: i32| cur.min(days)));
            }
            if let Some(days) = accomplished.get(idx) {
                end_bound = Some(end_bound.map_or(days, |cur: i32| cur.max(days)));
            }
        }

        let start_date = start_bound
            .map(crate::record::date_from_i32)
            .unwrap_or(self.ctx.today);
        let end_date = end_bound
            .map(crate::record::date_from_i32)
            .unwrap_or(self.ctx.today);
        Ok((start_date, end_date))
    }
}

fn pick_color() -> &'static str {
    let mut rng = fastrand::Rng::new();
    COLOR_PALETTE[rng.usize(..COLOR_PALETTE.len())]
}

/// Per-group SVG filename: lowercased slug of the group name plus a
/// compact timestamp.
pub fn chart_filename(name: &str, now: NaiveDateTime) -> String {
    let slug = name.to_lowercase().replace([' ', '.'], "_");
    format!("{slug}_{}.svg", now.format("%Y%m%d%H%M%S"))
}
