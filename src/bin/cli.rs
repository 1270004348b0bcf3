use chrono::{Duration, NaiveDate};
use gantt_analyzer::loader::{self, LoadError};
use gantt_analyzer::{
    summary, AnalysisContext, Classifier, DateField, ProjectAggregator, ScheduleMetrics, TaskTable,
};
use polars::prelude::{AnyValue, DataFrame};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::process;

fn render_df_as_text_table(df: &DataFrame) -> String {
    // Compute column widths
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    // Widths in characters, not bytes, so non-ASCII names stay aligned.
    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for (ci, col) in columns.iter().enumerate() {
        for row_idx in 0..df.height() {
            if let Ok(ref av) = col.get(row_idx) {
                let w = render_value(av).chars().count();
                if w > widths[ci] {
                    widths[ci] = w;
                }
            }
        }
    }

    // Build horizontal separator
    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    // Build output
    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    // Header
    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.chars().count();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    // Rows
    for row_idx in 0..df.height() {
        out.push('|');
        for (ci, col) in columns.iter().enumerate() {
            let mut s = String::new();
            if let Ok(ref av) = col.get(row_idx) {
                s = render_value(av);
            }
            out.push(' ');
            out.push_str(&s);
            let pad = widths[ci].saturating_sub(s.chars().count());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_value(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Float64(v) => format!("{v:.1}"),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Date(days) => {
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
            (epoch + Duration::days(*days as i64))
                .format("%Y-%m-%d")
                .to_string()
        }
        _ => av.to_string(),
    }
}

fn print_usage() {
    eprintln!(
        "Usage:\n  cli <tasks.csv> <holidays.csv> [project-name]\n  cli --snapshot <snapshot.json> [project-name]"
    );
}

fn load_inputs(args: &[String]) -> Result<(TaskTable, Vec<NaiveDate>, String), LoadError> {
    if args.first().map(String::as_str) == Some("--snapshot") {
        let path = args
            .get(1)
            .ok_or_else(|| LoadError::InvalidData("--snapshot needs a path".into()))?;
        let name = args.get(2).cloned().unwrap_or_else(|| "Project".to_string());
        let (table, holidays) = loader::load_snapshot_from_json(path)?;
        Ok((table, holidays, name))
    } else {
        let tasks_path = args
            .first()
            .ok_or_else(|| LoadError::InvalidData("missing tasks csv path".into()))?;
        let holidays_path = args
            .get(1)
            .ok_or_else(|| LoadError::InvalidData("missing holidays csv path".into()))?;
        let name = args.get(2).cloned().unwrap_or_else(|| "Project".to_string());
        let table = loader::load_tasks_from_csv(tasks_path)?;
        let holidays = loader::load_holidays_from_csv(holidays_path)?;
        Ok((table, holidays, name))
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let (table, holidays, project_name) = load_inputs(args)?;
    let ctx = AnalysisContext::for_today(holidays);
    log::debug!("analysis reference date: {}", ctx.today);

    let owners = table.distinct_external_owners()?;
    if !owners.is_empty() {
        println!("External owners (chart resources): {}\n", owners.join(", "));
    }

    let metrics = ScheduleMetrics::new(&ctx);
    let annotated = metrics.annotate(&table)?;

    println!("Annotated tasks (diff/delay in business days):");
    println!("{}", render_df_as_text_table(&annotated));

    let classifier = Classifier::new(&annotated, &ctx)?;
    let partitions = [
        ("Delayed", classifier.delayed()?),
        ("Accomplished", classifier.accomplished()?),
        ("In progress", classifier.in_progress()?),
        ("Inconsistent", classifier.inconsistent()?),
        ("Completion mismatches", classifier.completion_mismatches()?),
        ("Forecast before today", classifier.before(DateField::Forecast)?),
        ("Forecast on or after today", classifier.after(DateField::Forecast)?),
    ];
    for (title, subset) in &partitions {
        println!("{title}: {} task(s)", subset.height());
        if subset.height() > 0 {
            println!("{}", render_df_as_text_table(subset));
        }
    }

    let project = ProjectAggregator::new(&table, &ctx).build(&project_name)?;
    println!("Project '{}':", project.name);
    for sub in &project.sub_projects {
        println!(
            "  {} [{}]: {} task(s), {} -> {}",
            sub.name,
            sub.color,
            sub.task_count(),
            sub.start_date,
            sub.end_date
        );
        for node in sub.graph.nodes() {
            if node.depends_on.is_empty() {
                println!("    {}", node.full_name);
            } else {
                println!("    {} (depends on {})", node.full_name, node.depends_on.join(", "));
            }
        }
    }

    println!("\nMean progress by source:");
    println!("{}", render_df_as_text_table(&summary::mean_progress_by(&annotated, "source")?));
    println!("Tasks by progress phase:");
    println!("{}", render_df_as_text_table(&summary::counts_by_progress_phase(&annotated)?));
    println!("Pending tasks by span class:");
    println!("{}", render_df_as_text_table(&summary::pending_counts_by_span(&annotated)?));
    println!("Tasks by internal owner:");
    println!(
        "{}",
        render_df_as_text_table(&summary::task_counts_by_internal_owner(&annotated)?)
    );

    Ok(())
}

fn main() {
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        process::exit(2);
    }

    if let Err(err) = run(&args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
