// src/dag/builder.rs

//! Expands the pipeline/group tree into a linked [`Dag`].
//!
//! Construction is two passes over the tree:
//!
//! 1. **Indexing** instantiates every referenced task and records it under
//!    each enclosing group, so a group's member list is the transitive set
//!    of tasks below it. The project name acts as the outermost group.
//! 2. **Linking** walks the tree again carrying the accumulated dependency
//!    list and enabled flag down. Each group forks the inherited list before
//!    appending its own `dependsOn` edges, so siblings never see each other's
//!    dependencies. Leaves receive the carried list (or a single edge on the
//!    origin when it is empty) and are registered as dependents of every
//!    edge target.
//!
//! Any failure aborts the build; there is no partial graph.

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

use crate::config::model::{GroupNode, PipelineNode, ProjectConfig, TaskDefinition};
use crate::config::validate::validate_task_names;
use crate::dag::dependency::Dependency;
use crate::dag::graph::Dag;
use crate::dag::task::{Task, TaskId};
use crate::errors::{MyceliumError, Result};

/// Build the linked DAG for a project.
///
/// This is a pure function of the configuration: building the same input
/// twice yields structurally identical graphs.
pub fn build_dag(config: &ProjectConfig) -> Result<Dag> {
    validate_task_names(config)?;
    DagBuilder::new(config).build(&config.pipelines)
}

struct DagBuilder<'a> {
    project: &'a str,
    definitions: HashMap<&'a str, &'a TaskDefinition>,
    origin: TaskId,
    tasks: Vec<Task>,
    index: HashMap<String, TaskId>,
    /// Group name -> transitive member tasks, in first-seen order.
    groups: HashMap<String, Vec<TaskId>>,
    linked: HashSet<TaskId>,
}

impl<'a> DagBuilder<'a> {
    fn new(config: &'a ProjectConfig) -> Self {
        let origin = TaskId::from_index(0);
        let definitions = config
            .tasks
            .iter()
            .map(|def| (def.name.as_str(), def))
            .collect();

        let mut index = HashMap::new();
        index.insert(config.name.clone(), origin);

        let mut groups = HashMap::new();
        groups.insert(config.name.clone(), Vec::new());

        Self {
            project: &config.name,
            definitions,
            origin,
            tasks: vec![Task::origin(origin, &config.name)],
            index,
            groups,
            linked: HashSet::new(),
        }
    }

    fn build(mut self, pipelines: &[PipelineNode]) -> Result<Dag> {
        let mut group_keys = vec![self.project.to_string()];
        self.index_groups(&mut group_keys, pipelines)?;
        self.link(pipelines, &[], true)?;

        self.warn_unreferenced();
        self.ensure_acyclic()?;

        debug!(
            project = %self.project,
            tasks = self.tasks.len(),
            groups = self.groups.len(),
            "built task DAG"
        );

        Ok(Dag::new(self.project.to_string(), self.origin, self.tasks))
    }

    // ---- pass 1: indexing ------------------------------------------------

    fn index_groups(&mut self, group_keys: &mut Vec<String>, nodes: &[PipelineNode]) -> Result<()> {
        for node in nodes {
            match node {
                PipelineNode::Task(name) => {
                    let id = self.instantiate(name)?;
                    for key in group_keys.iter() {
                        let members = self.groups.entry(key.clone()).or_default();
                        if !members.contains(&id) {
                            members.push(id);
                        }
                    }
                }
                PipelineNode::Group(group) => {
                    let name = group_name(group)?;
                    self.groups.entry(name.to_string()).or_default();

                    group_keys.push(name.to_string());
                    self.index_groups(group_keys, &group.tasks)?;
                    group_keys.pop();
                }
                PipelineNode::Invalid(value) => return Err(malformed(value)),
            }
        }
        Ok(())
    }

    /// Get or create the arena entry for a task referenced by the tree.
    fn instantiate(&mut self, name: &str) -> Result<TaskId> {
        let def = self
            .definitions
            .get(name)
            .copied()
            .ok_or_else(|| MyceliumError::TaskNotFound(name.to_string()))?;

        if let Some(id) = self.index.get(name) {
            return Ok(*id);
        }

        let id = TaskId::from_index(self.tasks.len());
        self.tasks.push(Task::from_definition(id, def)?);
        self.index.insert(name.to_string(), id);
        Ok(id)
    }

    // ---- pass 2: linking -------------------------------------------------

    fn link(&mut self, nodes: &[PipelineNode], inherited: &[Dependency], enabled: bool) -> Result<()> {
        for node in nodes {
            match node {
                PipelineNode::Task(name) => self.link_task(name, inherited, enabled)?,
                PipelineNode::Group(group) => {
                    let name = group_name(group)?;
                    let group_enabled = group.enabled.unwrap_or(enabled);
                    let dependencies = self.group_dependencies(name, group, inherited)?;

                    debug!(
                        group = %name,
                        enabled = group_enabled,
                        dependencies = dependencies.len(),
                        "linking task group"
                    );
                    self.link(&group.tasks, &dependencies, group_enabled)?;
                }
                PipelineNode::Invalid(value) => return Err(malformed(value)),
            }
        }
        Ok(())
    }

    fn link_task(&mut self, name: &str, inherited: &[Dependency], enabled: bool) -> Result<()> {
        let id = *self
            .index
            .get(name)
            .ok_or_else(|| MyceliumError::TaskNotFound(name.to_string()))?;

        if !self.linked.insert(id) {
            return Err(MyceliumError::DuplicateTaskReference(name.to_string()));
        }

        let dependencies = if inherited.is_empty() {
            vec![Dependency::on_origin(self.origin)]
        } else {
            inherited.to_vec()
        };

        for dep in dependencies.iter() {
            self.tasks[dep.target().index()].add_dependent(id);
        }

        let task = &mut self.tasks[id.index()];
        task.set_enabled(enabled);
        task.set_dependencies(dependencies);

        debug!(
            task = %name,
            enabled,
            dependencies = task.dependencies().len(),
            "linked task"
        );
        Ok(())
    }

    /// Resolve a group's `dependsOn` on top of a copy of the inherited list.
    ///
    /// An entry naming a task adds one edge; an entry naming a group adds one
    /// edge per transitive member, all sharing the entry's condition and
    /// operator.
    fn group_dependencies(
        &self,
        group: &str,
        node: &GroupNode,
        inherited: &[Dependency],
    ) -> Result<Vec<Dependency>> {
        let mut dependencies = inherited.to_vec();

        for entry in node.depends_on.iter() {
            let mut resolved = false;

            if let Some(id) = self.index.get(&entry.task) {
                dependencies.push(Dependency::new(*id, entry.condition, entry.operator));
                resolved = true;
            }

            if let Some(members) = self.groups.get(&entry.task) {
                dependencies.extend(
                    members
                        .iter()
                        .map(|id| Dependency::new(*id, entry.condition, entry.operator)),
                );
                resolved = true;
            }

            if !resolved {
                return Err(MyceliumError::UnknownDependency {
                    group: group.to_string(),
                    dependency: entry.task.clone(),
                });
            }
        }

        Ok(dependencies)
    }

    // ---- checks ------------------------------------------------------------

    fn warn_unreferenced(&self) {
        for name in self.definitions.keys() {
            if !self.index.contains_key(*name) {
                warn!(task = %name, "task is defined but not part of any pipeline; skipping");
            }
        }
    }

    fn ensure_acyclic(&self) -> Result<()> {
        // Edge direction: prerequisite -> dependent.
        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();

        for task in self.tasks.iter() {
            graph.add_node(task.id().index());
            for dep in task.dependencies() {
                graph.add_edge(dep.target().index(), task.id().index(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(_order) => Ok(()),
            Err(cycle) => Err(MyceliumError::DagCycle(format!(
                "cycle detected in task DAG involving task '{}'",
                self.tasks[cycle.node_id()].name()
            ))),
        }
    }
}

fn group_name(group: &GroupNode) -> Result<&str> {
    match group.name.as_deref() {
        Some(name) if !group.tasks.is_empty() => Ok(name),
        Some(name) => Err(MyceliumError::MalformedPipeline(format!(
            "group '{name}' has no tasks"
        ))),
        None => Err(MyceliumError::MalformedPipeline(
            "group without a name; DAG nodes must be a task name or a named group with a tasks list"
                .to_string(),
        )),
    }
}

fn malformed(value: &serde_json::Value) -> MyceliumError {
    MyceliumError::MalformedPipeline(format!(
        "unexpected node {value}; DAG nodes must be a task name or a named group with a tasks list"
    ))
}
