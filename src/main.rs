//! CLI shell: load (or seed) the workspace, print portfolio health, and
//! export the collections.

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use chrono::Utc;

use pmodesk::export;
use pmodesk::services::{dashboard, goals};
use pmodesk::state;
use pmodesk::{StoreError, Workspace};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), StoreError> {
    let config = state::load_config()?;
    let root = config.resolved_data_dir()?;
    let workspace = Workspace::open_or_seed(&root)?;

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("summary") => print_summary(&workspace),
        Some("export") => {
            let out_dir = args.get(1).map(String::as_str).unwrap_or(".");
            export_all(&workspace, Path::new(out_dir))
        }
        Some("import") => match args.get(1) {
            Some(file) => import_snapshot(&workspace, Path::new(file)),
            None => {
                eprintln!("Usage: pmodesk import <file.json>");
                process::exit(2);
            }
        },
        Some("reset") => {
            workspace.reset_to_seed()?;
            println!("Workspace reset to seed data at {}", workspace.root().display());
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown command '{}'.", other);
            eprintln!("Usage: pmodesk [summary | export <dir> | import <file> | reset]");
            process::exit(2);
        }
    }
}

fn print_summary(workspace: &Workspace) -> Result<(), StoreError> {
    let now = Utc::now();
    let (snapshot, goal_summaries) = workspace.read(|store| {
        (
            dashboard::portfolio_snapshot(store, now),
            goals::goal_summaries(store),
        )
    });

    println!(
        "Portfolio: {} initiatives ({} active), {} tasks",
        snapshot.initiative_count, snapshot.active_initiative_count, snapshot.task_count
    );
    println!(
        "Open work: {} overdue, {} due this week, {} completed",
        snapshot.overdue_count, snapshot.due_this_week_count, snapshot.completed_task_count
    );

    println!("\nInitiatives:");
    for health in &snapshot.initiatives {
        println!(
            "  [{:>15}] {:<40} {:>3}%  {} ({}/{} open)",
            health.status.as_str(),
            health.name,
            health.progress,
            health.department.as_str(),
            health.open_task_count,
            health.task_count,
        );
    }

    println!("\nDepartments:");
    for rollup in snapshot.departments.iter().filter(|r| r.initiative_count > 0) {
        println!(
            "  {:<22} {} initiatives, {} tasks, avg {}%, worst {}",
            rollup.department.as_str(),
            rollup.initiative_count,
            rollup.task_count,
            rollup.average_progress,
            rollup.worst_status.as_str(),
        );
    }

    if !goal_summaries.is_empty() {
        println!("\nGoals:");
        for goal in &goal_summaries {
            println!(
                "  {:<40} {:>3}%  {} KRs, {} linked initiatives",
                goal.name,
                goal.progress,
                goal.key_results.len(),
                goal.linked_initiative_count,
            );
        }
    }

    Ok(())
}

fn import_snapshot(workspace: &Workspace, file: &Path) -> Result<(), StoreError> {
    let payload = fs::read_to_string(file)?;
    let snapshot = export::parse_import(&payload)?;
    workspace.replace(snapshot.into_store())?;

    let (initiatives, tasks) =
        workspace.read(|store| (store.initiatives().len(), store.tasks().len()));
    println!(
        "Imported {} initiatives and {} tasks from {}",
        initiatives,
        tasks,
        file.display()
    );
    Ok(())
}

fn export_all(workspace: &Workspace, out_dir: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(out_dir)?;

    let (csv_files, json) = workspace.read(|store| {
        (export::export_csv(store), export::export_json(store))
    });
    let json = json?;

    for file in &csv_files {
        let path = out_dir.join(&file.filename);
        fs::write(&path, &file.data)?;
        println!("Wrote {}", path.display());
    }

    let stamp = Utc::now().date_naive().format("%Y-%m-%d");
    let json_path = out_dir.join(format!("pmo-workspace-{}.json", stamp));
    fs::write(&json_path, json)?;
    println!("Wrote {}", json_path.display());

    Ok(())
}
