// tests/integration/project_files.rs

use std::fs;
use std::path::Path;

use mycelium::config::load_and_validate;
use mycelium::dag::DagFormat;
use mycelium::engine::Project;
use mycelium::types::{DependencyCondition, DependencyOperator, TaskStatus};
use mycelium_test_utils::{init_tracing, with_timeout};

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

/// A nightly project: ingest, then two parallel transforms, then a publish
/// step gated on both, plus an alert that only fires if ingest fails.
fn nightly(dir: &Path, ingest_cmd: &str) {
    fs::create_dir_all(dir.join("conf")).unwrap();
    write(
        dir,
        "mycelium.yaml",
        r#"
project:
  name: nightly
  directory: conf
  maxParallel: 2
  pipelines: [pipelines.yaml]
  tasks: [tasks.yaml]
  patterns: [patterns.yaml]
"#,
    );
    write(
        &dir.join("conf"),
        "pipelines.yaml",
        r#"
pipelines:
  - ingest
  - name: transforms
    dependsOn:
      - task: ingest
        condition: success
        operator: and
    tasks:
      - clean
      - enrich
  - name: publishing
    dependsOn:
      - task: transforms
        condition: SUCCESS
        operator: AND
    tasks: [publish]
  - name: alerting
    dependsOn:
      - task: ingest
        condition: failure
    tasks: [alert]
"#,
    );
    write(
        &dir.join("conf"),
        "tasks.yaml",
        &format!(
            r#"
tasks:
  - name: ingest
    type: command
    cmd: "{ingest_cmd}"
  - name: clean
    type: command
    pattern: quick
    cmd: "true"
  - name: enrich
    type: databricksNotebook
    path: /etl/enrich
  - name: publish
    type: library
    library: "org.example:publisher:1.0"
  - name: alert
    type: command
    pattern: quick
    cmd: "echo alert"
"#
        ),
    );
    write(
        &dir.join("conf"),
        "patterns.yaml",
        "patterns:\n  - name: Quick\n    timeout: 30\n",
    );
}

#[test]
fn loads_and_links_project_files() {
    let dir = tempfile::tempdir().unwrap();
    nightly(dir.path(), "true");

    let cfg = load_and_validate(dir.path().join("mycelium.yaml")).unwrap();
    assert_eq!(cfg.name, "nightly");
    assert_eq!(cfg.max_parallel, 2);

    let project = Project::new(&cfg).unwrap();
    let dag = project.dag();
    assert_eq!(dag.len(), 6);

    let publish = dag.get("publish").unwrap();
    let targets: Vec<_> = publish
        .dependencies()
        .iter()
        .map(|d| (dag.task(d.target()).name(), d.condition(), d.operator()))
        .collect();
    assert_eq!(
        targets,
        vec![
            ("clean", DependencyCondition::Success, DependencyOperator::And),
            ("enrich", DependencyCondition::Success, DependencyOperator::And),
        ]
    );

    let mut ingest_dependents = dag.dependent_names("ingest");
    ingest_dependents.sort_unstable();
    assert_eq!(ingest_dependents, vec!["alert", "clean", "enrich"]);
}

#[test]
fn dry_run_view_renders_every_task() {
    let dir = tempfile::tempdir().unwrap();
    nightly(dir.path(), "true");

    let cfg = load_and_validate(dir.path().join("mycelium.yaml")).unwrap();
    let project = Project::new(&cfg).unwrap();
    let json = project.view().render(DagFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["clean"]["timeout"], 30);
    assert_eq!(value["enrich"]["type"], "notebook");
    assert_eq!(value["publish"]["library"], "org.example:publisher:1.0");
    assert_eq!(value["nightly"]["type"], "origin");
    assert_eq!(value["alert"]["dependencies"][0]["condition"], "FAILURE");
    assert_eq!(value["alert"]["dependencies"][0]["operator"], "OR");
}

#[cfg(unix)]
#[tokio::test]
async fn runs_project_with_local_executor() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    nightly(dir.path(), "echo ingest");

    let cfg = load_and_validate(dir.path().join("mycelium.yaml")).unwrap();
    let project = Project::new(&cfg).unwrap();
    let report = with_timeout(project.execute(None)).await;

    assert!(report.is_success(), "failed: {:?}", report.failed());
    for task in ["ingest", "clean", "enrich", "publish"] {
        assert_eq!(report.status(task), Some(TaskStatus::Succeeded), "{task}");
    }
    assert_eq!(report.execution_order.first().map(String::as_str), Some("ingest"));
    assert_eq!(report.execution_order.last().map(String::as_str), Some("publish"));
    assert!(!report.execution_order.iter().any(|t| t == "alert"));
}

#[cfg(unix)]
#[tokio::test]
async fn failing_command_routes_to_failure_branch() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    nightly(dir.path(), "exit 2");

    let cfg = load_and_validate(dir.path().join("mycelium.yaml")).unwrap();
    let project = Project::new(&cfg).unwrap();
    let report = with_timeout(project.execute(Some(1))).await;

    assert_eq!(report.status("ingest"), Some(TaskStatus::Failed));
    assert_eq!(report.status("alert"), Some(TaskStatus::Succeeded));
    assert_eq!(report.failed(), vec!["ingest"]);
    for task in ["clean", "enrich", "publish"] {
        assert!(report.status(task).unwrap().is_unclaimed(), "{task} should not run");
    }
}

#[test]
fn toml_project_file_is_supported() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "mycelium.toml",
        r#"
[project]
name = "tomlproj"
pipelines = ["pipelines.toml"]
tasks = ["tasks.toml"]
"#,
    );
    write(
        dir.path(),
        "pipelines.toml",
        r#"
maxParallel = 3
pipelines = ["first", { name = "then", dependsOn = [{ task = "first" }], tasks = ["second"] }]
"#,
    );
    write(
        dir.path(),
        "tasks.toml",
        r#"
[[tasks]]
name = "first"
type = "command"
cmd = "true"

[[tasks]]
name = "second"
type = "notebook"
"#,
    );

    let cfg = load_and_validate(dir.path().join("mycelium.toml")).unwrap();
    assert_eq!(cfg.max_parallel, 3);

    let project = Project::new(&cfg).unwrap();
    let second = project.dag().get("second").unwrap();
    assert_eq!(second.dependencies().len(), 1);
    assert_eq!(second.dependencies()[0].condition(), DependencyCondition::Completion);
    assert_eq!(second.dependencies()[0].operator(), DependencyOperator::Or);
}
