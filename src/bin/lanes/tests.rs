//! Unit tests for argument parsing and command dispatch.

use super::cli::{self, Cli, CliError, Command, ProjectCommand, TaskCommand};
use super::output::task_line;
use camino::Utf8PathBuf;
use clap::Parser;
use eyre::{Result, bail, ensure, eyre};
use lanes::workflow::domain::{TaskPriority, TaskStatus, TaskType};
use rstest::{fixture, rstest};
use serde_json::Value;
use tempfile::TempDir;

struct Sandbox {
    _dir: TempDir,
    config: Utf8PathBuf,
    database: Utf8PathBuf,
}

impl Sandbox {
    fn run(&self, args: &[&str]) -> Result<String, CliError> {
        let mut argv = vec![
            "lanes",
            "--config",
            self.config.as_str(),
            "--database",
            self.database.as_str(),
        ];
        argv.extend_from_slice(args);
        let parsed = Cli::try_parse_from(argv).expect("arguments should parse");
        let mut out = Vec::new();
        cli::run(parsed, &mut out)?;
        Ok(String::from_utf8(out).expect("output should be UTF-8"))
    }

    fn run_json(&self, args: &[&str]) -> Result<Value> {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let text = self.run(&full)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[fixture]
fn sandbox() -> Sandbox {
    let dir = TempDir::new().expect("temp dir should be created");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp dir is UTF-8");
    let config = root.join("config.toml");
    std::fs::write(&config, "[limits]\nmax_name_chars = 20\n").expect("config should be written");
    Sandbox {
        database: root.join("data").join("lanes.db"),
        config,
        _dir: dir,
    }
}

fn id_of(value: &Value) -> Result<String> {
    value
        .get("id")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| eyre!("missing id in {value}"))
}

#[rstest]
fn parses_task_add_options() -> Result<()> {
    let parsed = Cli::try_parse_from([
        "lanes",
        "task",
        "add",
        "6f1c7d2e-8a4b-4c39-9f0e-2d5b7a1c3e84",
        "Fix the gate",
        "--priority",
        "high",
        "--type",
        "bug",
        "--blocked-by",
        "3",
    ])?;
    let Command::Task {
        command:
            TaskCommand::Add {
                name,
                priority,
                task_type,
                blocked_by,
                ..
            },
    } = parsed.command
    else {
        bail!("expected task add");
    };
    ensure!(name == "Fix the gate");
    ensure!(priority == Some(TaskPriority::High));
    ensure!(task_type == Some(TaskType::Bug));
    ensure!(blocked_by == Some(3));
    Ok(())
}

#[rstest]
#[case("not-started", TaskStatus::NotStarted)]
#[case("in_progress", TaskStatus::InProgress)]
#[case("done", TaskStatus::Done)]
#[case("todo", TaskStatus::NotStarted)]
#[case("Doing", TaskStatus::InProgress)]
#[case("in progress", TaskStatus::InProgress)]
fn parses_status_argument(#[case] raw: &str, #[case] expected: TaskStatus) -> Result<()> {
    let parsed = Cli::try_parse_from([
        "lanes",
        "tasks",
        "6f1c7d2e-8a4b-4c39-9f0e-2d5b7a1c3e84",
        raw,
    ])?;
    let Command::Tasks { status, .. } = parsed.command else {
        bail!("expected tasks command");
    };
    ensure!(status == expected);
    Ok(())
}

#[rstest]
#[case(&["lanes", "task", "add", "not-a-uuid", "name"])]
#[case(&["lanes", "task", "add", "6f1c7d2e-8a4b-4c39-9f0e-2d5b7a1c3e84", "x", "--priority", "urgent"])]
#[case(&["lanes", "tasks", "6f1c7d2e-8a4b-4c39-9f0e-2d5b7a1c3e84", "blocked"])]
#[case(&["lanes", "tasks", "6f1c7d2e-8a4b-4c39-9f0e-2d5b7a1c3e84", "finished"])]
#[case(&["lanes", "project"])]
fn rejects_malformed_arguments(#[case] argv: &[&str]) {
    assert!(Cli::try_parse_from(argv).is_err());
}

#[rstest]
fn global_flags_follow_subcommands() -> Result<()> {
    let parsed = Cli::try_parse_from(["lanes", "project", "list", "--json", "--database", ":memory:"])?;
    ensure!(parsed.json);
    ensure!(parsed.database == Some(Utf8PathBuf::from(":memory:")));
    ensure!(matches!(
        parsed.command,
        Command::Project {
            command: ProjectCommand::List
        }
    ));
    Ok(())
}

#[rstest]
fn completing_a_blocker_reports_released_dependents(sandbox: Sandbox) -> Result<()> {
    let project = sandbox.run_json(&["project", "add", "Home"])?;
    let project_id = id_of(&project)?;
    let blocker = sandbox.run_json(&["task", "add", &project_id, "Buy paint"])?;
    let blocker_id = id_of(&blocker)?;
    let dependent = sandbox.run_json(&["task", "add", &project_id, "Paint fence", "--blocked-by", "1"])?;
    let dependent_id = id_of(&dependent)?;

    sandbox.run(&["task", "next", &blocker_id])?;
    let change = sandbox.run_json(&["task", "next", &blocker_id])?;

    ensure!(change["task"]["status"] == "done");
    ensure!(change["released"] == Value::Array(vec![Value::String(dependent_id.clone())]));
    let shown = sandbox.run_json(&["task", "show", &dependent_id])?;
    ensure!(shown["blocked_by"].is_null());
    Ok(())
}

#[rstest]
fn board_text_lists_columns_in_order(sandbox: Sandbox) -> Result<()> {
    let project = sandbox.run_json(&["project", "add", "Home"])?;
    let project_id = id_of(&project)?;
    sandbox.run(&["task", "add", &project_id, "Sweep", "--priority", "low"])?;
    sandbox.run(&["task", "add", &project_id, "Mop", "--priority", "high"])?;

    let text = sandbox.run(&["board", &project_id])?;
    let not_started = text.find("Not Started (2)").ok_or_else(|| eyre!("no column in {text}"))?;
    let in_progress = text.find("In Progress (0)").ok_or_else(|| eyre!("no column in {text}"))?;
    let mop = text.find("Mop").ok_or_else(|| eyre!("no task in {text}"))?;
    let sweep = text.find("Sweep").ok_or_else(|| eyre!("no task in {text}"))?;
    ensure!(not_started < mop && mop < sweep && sweep < in_progress);
    Ok(())
}

#[rstest]
fn config_limits_apply_to_commands(sandbox: Sandbox) -> Result<()> {
    let project = sandbox.run_json(&["project", "add", "Home"])?;
    let project_id = id_of(&project)?;
    let result = sandbox.run(&["task", "add", &project_id, "a name longer than twenty"]);
    ensure!(matches!(result, Err(CliError::Workflow(ref err)) if err.is_validation()));
    Ok(())
}

#[rstest]
fn zero_blocker_sequence_is_rejected(sandbox: Sandbox) -> Result<()> {
    let project = sandbox.run_json(&["project", "add", "Home"])?;
    let project_id = id_of(&project)?;
    let result = sandbox.run(&["task", "add", &project_id, "Sweep", "--blocked-by", "0"]);
    ensure!(matches!(result, Err(CliError::Invalid(_))));
    Ok(())
}

#[rstest]
fn missing_project_is_reported(sandbox: Sandbox) -> Result<()> {
    let result = sandbox.run(&["board", "6f1c7d2e-8a4b-4c39-9f0e-2d5b7a1c3e84"]);
    ensure!(matches!(result, Err(CliError::Workflow(ref err)) if err.is_not_found()));
    Ok(())
}

#[rstest]
fn task_line_shows_blocker(sandbox: Sandbox) -> Result<()> {
    let project = sandbox.run_json(&["project", "add", "Home"])?;
    let project_id = id_of(&project)?;
    sandbox.run(&["task", "add", &project_id, "Buy paint"])?;
    let dependent = sandbox.run_json(&[
        "task",
        "add",
        &project_id,
        "Paint fence",
        "--blocked-by",
        "1",
        "--type",
        "feature",
    ])?;
    let task = serde_json::from_value(dependent)?;
    ensure!(task_line(&task) == "#2 [Not Started] Paint fence (low feature) blocked by #1");
    Ok(())
}

#[rstest]
fn task_add_to_missing_project_is_invalid(sandbox: Sandbox) -> Result<()> {
    let result = sandbox.run(&["task", "add", "6f1c7d2e-8a4b-4c39-9f0e-2d5b7a1c3e84", "Orphan"]);
    ensure!(matches!(result, Err(CliError::Workflow(ref err)) if err.is_validation()));
    Ok(())
}
