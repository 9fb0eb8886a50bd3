use clap::ValueEnum;
use colored::*;
use error_common::Result;
use serde::Serialize;
use zanzibar_debug::{Explanation, GraphView, NodeInfo, PathOutcome};

/// How `explain` prints its result on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Graph and path as JSON, for a renderer
    Json,
    /// Graphviz DOT
    Dot,
    /// One line per path record
    Path,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    outcome: PathOutcome,
    color: &'a str,
    path: &'a [NodeInfo],
    graph: GraphView,
}

pub fn render(explanation: &Explanation, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let report = Report {
                outcome: explanation.path.outcome,
                color: &explanation.path.color,
                path: &explanation.path.records,
                graph: explanation.view(),
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::Dot => Ok(explanation.graph.to_dot()),
        OutputFormat::Path => Ok(render_path(&explanation.path.records)),
    }
}

fn render_path(records: &[NodeInfo]) -> String {
    records
        .iter()
        .map(|record| {
            let relation = record.relation.as_deref().unwrap_or("-");
            match record.object_id() {
                Some(object) => format!("{:>3}  {} -> {} [{}]", record.level, record.user, object, relation),
                None => format!("{:>3}  {}", record.level, record.user),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line human summary for stderr
pub fn summary(explanation: &Explanation, subject: &str) -> String {
    let counts = format!(
        "{} nodes, {} edges",
        explanation.graph.node_count(),
        explanation.graph.edge_count()
    );

    if explanation.found() {
        format!(
            "{} {} reaches the queried permission in {} steps ({})",
            "✔".bright_green(),
            subject.bright_white(),
            explanation.path.len().saturating_sub(1),
            counts
        )
    } else {
        format!(
            "{} no chain found for {}; showing every discovered edge ({})",
            "✘".bright_yellow(),
            subject.bright_white(),
            counts
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zanzibar_debug::{assemble, normalize, ExpansionRecord};

    fn explanation(subject: &str) -> Explanation {
        let records = vec![
            ExpansionRecord::self_edge("document:1#viewer", 1),
            ExpansionRecord::reference("document:1#viewer", "user:anne", "viewer", 1),
        ];
        assemble(subject, &normalize("document:1", "viewer", subject, &records))
    }

    #[test]
    fn test_render_json() {
        let json = render(&explanation("user:anne"), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outcome"], "found");
        assert_eq!(value["color"], "green");
        assert_eq!(value["path"].as_array().unwrap().len(), 2);
        assert_eq!(value["graph"]["edges"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_render_path_lines() {
        let text = render(&explanation("user:anne"), OutputFormat::Path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("document:1#viewer -> document:1 [viewer]"));
        assert!(lines[1].contains("user:anne -> document:1#viewer [viewer]"));
    }

    #[test]
    fn test_summary_mentions_fallback() {
        colored::control::set_override(false);
        let text = summary(&explanation("user:bob"), "user:bob");
        assert!(text.contains("no chain found for user:bob"));
    }
}
