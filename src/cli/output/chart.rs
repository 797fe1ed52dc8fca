use std::{
    f64::consts::PI,
    fmt::Write,
    path::PathBuf,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::{
    cli::record::SLEEP_TASK,
    utils::percentage::{count_percentage, Percentage},
};

use super::task_tree::TaskTree;

/// Categories below this share of all intervals are merged into [OTHER_LABEL] on the pie chart.
const SMALL_SLICE_PERCENTAGE: f64 = 1.;
const OTHER_LABEL: &str = "other";
/// Amount of top level categories that get their own breakdown.
const BREAKDOWN_CATEGORIES: usize = 3;

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Turns an aggregated tree into an image.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Returns location of the rendered chart.
    async fn render(&self, tree: &TaskTree, total_intervals: usize) -> Result<PathBuf>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub percentage: Percentage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownBar {
    pub category: String,
    pub label: String,
    /// Share of the subtask among subtasks of its category.
    pub percentage: Percentage,
}

/// Top level tasks with the small ones merged into a single "other" slice.
pub fn pie_slices(tree: &TaskTree, total_intervals: usize) -> Vec<PieSlice> {
    let mut slices = vec![];
    let mut other = 0;
    for (label, node) in tree.roots().iter() {
        let percentage = count_percentage(node.count, total_intervals);
        if *percentage < SMALL_SLICE_PERCENTAGE {
            other += node.count;
        } else {
            slices.push(PieSlice {
                label: label.to_string(),
                count: node.count,
                percentage,
            });
        }
    }
    if other > 0 {
        slices.push(PieSlice {
            label: OTHER_LABEL.into(),
            count: other,
            percentage: count_percentage(other, total_intervals),
        });
    }
    slices
}

/// Subtasks of the largest categories other than sleep. Every category's bars are sorted from the
/// largest.
pub fn category_breakdowns(tree: &TaskTree) -> Vec<Vec<BreakdownBar>> {
    let mut categories = tree
        .roots()
        .iter()
        .filter(|(label, _)| *label != SLEEP_TASK)
        .collect::<Vec<_>>();
    // Stable sort, ties keep the order they were recorded in
    categories.sort_by(|a, b| b.1.count.cmp(&a.1.count));

    categories
        .into_iter()
        .take(BREAKDOWN_CATEGORIES)
        .filter(|(_, node)| !node.children.is_empty())
        .map(|(category, node)| {
            let category_total = node.children.iter().map(|(_, v)| v.count).sum::<usize>();
            let mut subtasks = node.children.iter().collect::<Vec<_>>();
            subtasks.sort_by(|a, b| b.1.count.cmp(&a.1.count));
            subtasks
                .into_iter()
                .map(|(label, child)| BreakdownBar {
                    category: category.to_string(),
                    label: label.to_string(),
                    percentage: count_percentage(child.count, category_total),
                })
                .collect()
        })
        .collect()
}

/// Writes an svg with a pie chart of top level tasks on the left and a bar chart of the
/// biggest categories on the right.
pub struct SvgChartRenderer {
    path: PathBuf,
}

impl SvgChartRenderer {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ChartRenderer for SvgChartRenderer {
    async fn render(&self, tree: &TaskTree, total_intervals: usize) -> Result<PathBuf> {
        let slices = pie_slices(tree, total_intervals);
        let breakdowns = category_breakdowns(tree);
        debug!(
            "Rendering {} slices and {} breakdowns into {:?}",
            slices.len(),
            breakdowns.len(),
            self.path
        );
        let document = svg_document(&slices, &breakdowns);
        fs::write(&self.path, document)
            .await
            .with_context(|| format!("Failed to write chart into {:?}", self.path))?;
        Ok(self.path.clone())
    }
}

const WIDTH: f64 = 1600.;
const HEIGHT: f64 = 800.;
const PIE_CENTER: (f64, f64) = (400., 420.);
const PIE_RADIUS: f64 = 280.;
const BAR_LEFT: f64 = 1050.;
const BAR_MAX_WIDTH: f64 = 500.;
const BAR_HEIGHT: f64 = 18.;
const BAR_STEP: f64 = 24.;
const BAR_TOP: f64 = 100.;

pub fn svg_document(slices: &[PieSlice], breakdowns: &[Vec<BreakdownBar>]) -> String {
    let mut svg = String::new();
    // Writing into a String can't fail, so results of write! are ignored below
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
    );
    let _ = writeln!(
        svg,
        r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#
    );
    write_pie(&mut svg, slices);
    write_bars(&mut svg, breakdowns);
    svg.push_str("</svg>\n");
    svg
}

fn write_pie(svg: &mut String, slices: &[PieSlice]) {
    let (cx, cy) = PIE_CENTER;
    let _ = writeln!(
        svg,
        r#"<text x="{cx}" y="60" font-size="24" text-anchor="middle">Overall Time Distribution</text>"#
    );

    let total = slices.iter().map(|v| *v.percentage).sum::<f64>();
    if total <= 0. {
        return;
    }

    let mut angle = -PI / 2.;
    for (index, slice) in slices.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        let sweep = *slice.percentage / total * 2. * PI;
        if slices.len() == 1 {
            // An arc from a point to itself draws nothing
            let _ = writeln!(
                svg,
                r#"<circle cx="{cx}" cy="{cy}" r="{PIE_RADIUS}" fill="{color}"/>"#
            );
        } else {
            let (x1, y1) = polar(angle);
            let (x2, y2) = polar(angle + sweep);
            let large_arc = if sweep > PI { 1 } else { 0 };
            let _ = writeln!(
                svg,
                r#"<path d="M {cx} {cy} L {x1:.2} {y1:.2} A {PIE_RADIUS} {PIE_RADIUS} 0 {large_arc} 1 {x2:.2} {y2:.2} Z" fill="{color}" stroke="white"/>"#
            );
        }

        let middle = angle + sweep / 2.;
        let (lx, ly) = (
            cx + (PIE_RADIUS + 30.) * middle.cos(),
            cy + (PIE_RADIUS + 30.) * middle.sin(),
        );
        let anchor = if middle.cos() < 0. { "end" } else { "start" };
        let _ = writeln!(
            svg,
            r#"<text x="{lx:.2}" y="{ly:.2}" font-size="14" text-anchor="{anchor}">{} ({:.1})</text>"#,
            escape_xml(&slice.label),
            slice.percentage
        );
        angle += sweep;
    }
}

fn polar(angle: f64) -> (f64, f64) {
    (
        PIE_CENTER.0 + PIE_RADIUS * angle.cos(),
        PIE_CENTER.1 + PIE_RADIUS * angle.sin(),
    )
}

fn write_bars(svg: &mut String, breakdowns: &[Vec<BreakdownBar>]) {
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="60" font-size="24" text-anchor="middle">Breakdown of Top {BREAKDOWN_CATEGORIES} Categories</text>"#,
        BAR_LEFT + BAR_MAX_WIDTH / 2.
    );

    let mut y = BAR_TOP;
    for (index, bars) in breakdowns.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        for bar in bars {
            let width = BAR_MAX_WIDTH * *bar.percentage / 100.;
            let _ = writeln!(
                svg,
                r#"<rect x="{BAR_LEFT}" y="{y}" width="{width:.2}" height="{BAR_HEIGHT}" fill="{color}"/>"#
            );
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{}" font-size="12" text-anchor="end">{}: {}</text>"#,
                BAR_LEFT - 8.,
                y + BAR_HEIGHT * 0.75,
                escape_xml(&bar.category),
                escape_xml(&bar.label)
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{}" font-size="12">{:.1}</text>"#,
                BAR_LEFT + width + 6.,
                y + BAR_HEIGHT * 0.75,
                bar.percentage
            );
            y += BAR_STEP;
        }
        // Gap between categories
        y += BAR_STEP;
    }
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" font-size="14" text-anchor="middle">Percentage within Category</text>"#,
        BAR_LEFT + BAR_MAX_WIDTH / 2.,
        (y + 20.).min(HEIGHT - 10.)
    );
}

fn escape_xml(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            c => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::cli::output::task_tree::TaskTree;

    use super::{
        category_breakdowns, escape_xml, pie_slices, ChartRenderer, SvgChartRenderer, OTHER_LABEL,
    };

    fn tree(tasks: &[(&[&str], usize)]) -> TaskTree {
        let mut tree = TaskTree::new();
        for (task, times) in tasks {
            for _ in 0..*times {
                tree.add(*task);
            }
        }
        tree
    }

    #[test]
    fn test_small_slices_become_other() {
        let tree = tree(&[(&["work"], 150), (&["tea"], 1), (&["sleep"], 48), (&["call"], 1)]);
        let slices = pie_slices(&tree, tree.total_intervals());

        let labels = slices.iter().map(|v| v.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["work", "sleep", OTHER_LABEL]);
        assert_eq!(slices[2].count, 2);
        assert_eq!(*slices[0].percentage, 75.);
    }

    #[test]
    fn test_breakdowns_skip_sleep_and_take_top_three() {
        let tree = tree(&[
            (&["sleep", "deep"], 40),
            (&["work", "code"], 10),
            (&["work", "meeting"], 30),
            (&["hobby", "guitar"], 5),
            (&["chores"], 8),
            (&["study", "rust"], 4),
            (&["errands", "shop"], 2),
        ]);
        let breakdowns = category_breakdowns(&tree);

        // chores is in top 3 but has nothing to break down
        assert_eq!(breakdowns.len(), 2);
        let work = &breakdowns[0];
        assert_eq!(work[0].category, "work");
        assert_eq!(work[0].label, "meeting");
        assert_eq!(*work[0].percentage, 75.);
        assert_eq!(work[1].label, "code");
        assert_eq!(breakdowns[1][0].category, "hobby");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & <b> \"c\" 'd'"), "a &amp; &lt;b&gt; &quot;c&quot; &apos;d&apos;");
    }

    #[tokio::test]
    async fn test_svg_renderer_writes_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("chart.svg");
        let tree = tree(&[(&["work", "code & review"], 3), (&["sleep"], 1)]);

        let renderer = SvgChartRenderer::new(path.clone());
        assert_eq!(renderer.render(&tree, tree.total_intervals()).await?, path);

        let svg = std::fs::read_to_string(&path)?;
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("work (75.0%)"));
        assert!(svg.contains("work: code &amp; review"));
        Ok(())
    }

    #[tokio::test]
    async fn test_svg_single_slice_is_a_circle() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("chart.svg");
        let tree = tree(&[(&["sleep"], 4)]);

        SvgChartRenderer::new(path.clone()).render(&tree, 4).await?;

        let svg = std::fs::read_to_string(&path)?;
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("<path"));
        Ok(())
    }

    #[tokio::test]
    async fn test_svg_renderer_overwrites_previous_chart() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("chart.svg");
        let renderer = SvgChartRenderer::new(path.clone());

        renderer.render(&tree(&[(&["work"], 2)]), 2).await?;
        renderer.render(&tree(&[(&["garden"], 2)]), 2).await?;

        let svg = tokio::fs::read_to_string(&path).await?;
        assert!(svg.contains("garden (100.0%)"));
        assert!(!svg.contains("work (100.0%)"));
        Ok(())
    }
}
