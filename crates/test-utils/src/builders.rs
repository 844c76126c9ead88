#![allow(dead_code)]

use mycelium::config::{DependsOn, GroupNode, PipelineNode, ProjectConfig, TaskDefinition};
use mycelium::types::{DependencyCondition, DependencyOperator};

/// Builder for `ProjectConfig` to simplify test setup.
pub struct ProjectBuilder {
    config: ProjectConfig,
}

impl ProjectBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            config: ProjectConfig::new(name),
        }
    }

    pub fn max_parallel(mut self, n: usize) -> Self {
        self.config.max_parallel = n;
        self
    }

    /// Register a `command` task definition.
    pub fn command(self, name: &str, cmd: &str) -> Self {
        self.definition(TaskDefinition::new(name, "command").with("cmd", cmd))
    }

    /// Register a `notebook` task definition.
    pub fn notebook(self, name: &str) -> Self {
        self.definition(TaskDefinition::new(name, "notebook").with("path", format!("/{name}")))
    }

    pub fn definition(mut self, def: TaskDefinition) -> Self {
        self.config.tasks.push(def);
        self
    }

    /// Append a bare task reference at the top level.
    pub fn task(mut self, name: &str) -> Self {
        self.config.pipelines.push(PipelineNode::task(name));
        self
    }

    /// Append a group at the top level.
    pub fn group(mut self, group: GroupBuilder) -> Self {
        self.config.pipelines.push(group.build());
        self
    }

    pub fn build(self) -> ProjectConfig {
        self.config
    }
}

/// Builder for a named pipeline group node.
pub struct GroupBuilder {
    group: GroupNode,
}

impl GroupBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            group: GroupNode {
                name: Some(name.to_string()),
                ..GroupNode::default()
            },
        }
    }

    pub fn depends_on(
        mut self,
        task: &str,
        condition: DependencyCondition,
        operator: DependencyOperator,
    ) -> Self {
        self.group
            .depends_on
            .push(DependsOn::new(task, condition, operator));
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.group.enabled = Some(enabled);
        self
    }

    pub fn task(mut self, name: &str) -> Self {
        self.group.tasks.push(PipelineNode::task(name));
        self
    }

    pub fn group(mut self, nested: GroupBuilder) -> Self {
        self.group.tasks.push(nested.build());
        self
    }

    pub fn build(self) -> PipelineNode {
        PipelineNode::Group(self.group)
    }
}
