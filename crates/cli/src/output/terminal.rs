//! Terminal output formatting

use super::json::{InspectOutput, PathsOutput};
use colored::Colorize;
use protograph_core::{ProtoGraph, SchemaField};

pub fn format_header(graph: &ProtoGraph) -> String {
    format!(
        "  {} {} (v{})",
        "root".bold(),
        graph.full_name().cyan(),
        graph.major_version()
    )
}

pub fn format_summary(summary: &InspectOutput) -> String {
    let mut lines = vec![
        format!(
            "  {} {} (v{})",
            "root".bold(),
            summary.root.cyan(),
            summary.major_version
        ),
        format!("  {} {}", "file".bold(), summary.file),
    ];

    if !summary.comment.is_empty() {
        for line in summary.comment.lines() {
            lines.push(format!("    {}", line.dimmed()));
        }
    }

    let c = &summary.counts;
    lines.push(format!(
        "  {} {} vertices, {} edges ({} messages, {} fields, {} oneofs, {} enums)",
        "graph".bold(),
        c.vertices,
        c.edges,
        c.messages,
        c.fields,
        c.one_ofs,
        c.enums
    ));
    lines.push(format!("  {} {}", "extensions".bold(), summary.extensions));
    lines.push(format!("  {} {}", "hash".bold(), summary.hash.dimmed()));

    lines.join("\n")
}

pub fn format_field(field: &SchemaField) -> String {
    let nullable = if field.nullable { "" } else { " required" };
    format!(
        "  {} {}{}",
        field.field_path,
        field.native_type.green(),
        nullable.yellow()
    )
}

pub fn format_paths(output: &PathsOutput) -> String {
    if output.paths.is_empty() {
        return format!("  No path from {} to {}", output.from, output.to);
    }

    let mut lines = vec![format!(
        "  {} path(s) from {} to {}",
        output.paths.len(),
        output.from.cyan(),
        output.to.cyan()
    )];
    for (i, path) in output.paths.iter().enumerate() {
        let mut hops = vec![output.from.clone()];
        hops.extend(path.steps.iter().map(|step| {
            if step.type_ref {
                format!("({})", step.target)
            } else {
                step.target.clone()
            }
        }));
        lines.push(format!("  {:>3}. {}", i + 1, hops.join(" -> ")));
    }

    lines.join("\n")
}
