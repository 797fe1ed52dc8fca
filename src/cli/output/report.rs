use std::fmt::Display;

use crate::utils::percentage::{count_percentage, Percentage};

use super::task_tree::{TaskChildren, TaskTree};

const INDENT_STEP: &str = "    - ";

/// Single printed line of the analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub depth: usize,
    pub label: String,
    pub count: usize,
    /// Share of the parent node, or of all intervals for top level tasks.
    pub percentage: Percentage,
}

impl Display for ReportLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}: {:.2} ({} intervals)",
            INDENT_STEP.repeat(self.depth),
            self.label,
            self.percentage,
            self.count
        )
    }
}

/// Flattens the tree depth first, keeping the order labels were first seen in.
pub fn report_lines(tree: &TaskTree) -> Vec<ReportLine> {
    let mut lines = vec![];
    push_lines(&mut lines, tree.roots(), tree.total_intervals(), 0);
    lines
}

fn push_lines(lines: &mut Vec<ReportLine>, nodes: &TaskChildren, parent_count: usize, depth: usize) {
    for (label, node) in nodes.iter() {
        lines.push(ReportLine {
            depth,
            label: label.to_string(),
            count: node.count,
            percentage: count_percentage(node.count, parent_count),
        });
        push_lines(lines, &node.children, node.count, depth + 1);
    }
}

pub fn report_header(days: u32) -> String {
    format!("--- Analysis for the last {days} days ---")
}

/// Analysis as it is shown to the user, without the framing header.
pub fn format_report(tree: &TaskTree) -> String {
    report_lines(tree)
        .iter()
        .map(|line| format!("{line}\n"))
        .collect()
}
