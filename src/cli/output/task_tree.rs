use crate::storage::entities::DayScheduleEntity;

/// Counts of a single label at some depth of the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskNode {
    /// Number of intervals whose hierarchy goes through this node.
    pub count: usize,
    pub children: TaskChildren,
}

/// Child nodes keyed by label. Labels keep the order in which they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChildren(Vec<(String, TaskNode)>);

impl TaskChildren {
    pub fn get(&self, label: &str) -> Option<&TaskNode> {
        self.0.iter().find(|(v, _)| v == label).map(|(_, node)| node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaskNode)> {
        self.0.iter().map(|(label, node)| (label.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn entry(&mut self, label: String) -> &mut TaskNode {
        let index = match self.0.iter().position(|(v, _)| *v == label) {
            Some(index) => index,
            None => {
                self.0.push((label, TaskNode::default()));
                self.0.len() - 1
            }
        };
        &mut self.0[index].1
    }
}

/// Prefix tree over task hierarchies. Every added interval increments each node on its path, so
/// `work: code` adds one to `work` and one to `work -> code`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskTree {
    roots: TaskChildren,
    total_intervals: usize,
}

impl TaskTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_schedule(&mut self, day: &DayScheduleEntity) {
        for interval in &day.schedule {
            self.add(&interval.task);
        }
    }

    /// Adds a single interval. Labels are trimmed and lowercased, empty ones are skipped. An
    /// interval without labels still counts towards [TaskTree::total_intervals].
    pub fn add<S: AsRef<str>>(&mut self, task: &[S]) {
        self.total_intervals += 1;
        let mut level = &mut self.roots;
        for label in task {
            let label = label.as_ref().trim().to_lowercase();
            if label.is_empty() {
                continue;
            }
            let node = level.entry(label);
            node.count += 1;
            level = &mut node.children;
        }
    }

    pub fn roots(&self) -> &TaskChildren {
        &self.roots
    }

    pub fn total_intervals(&self) -> usize {
        self.total_intervals
    }

    pub fn is_empty(&self) -> bool {
        self.total_intervals == 0
    }

    /// Node reached by following `path` from the roots.
    pub fn find(&self, path: &[&str]) -> Option<&TaskNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(first)?;
        for label in rest {
            node = node.children.get(label)?;
        }
        Some(node)
    }
}
