use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::gateway::{HealthStatus, ProjectAnalysis};
use crate::types::{SmartResult, WizardData};

pub fn render_smart_table(result: &SmartResult) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Bucket", "Name", "Reason", "Priority", "Score"]);

    for annotated in &result.recommended {
        let name_cell = if annotated.item.placeholder {
            Cell::new(format!("{} (placeholder)", annotated.item.name)).fg(Color::Yellow)
        } else {
            Cell::new(annotated.item.name.clone()).fg(Color::Green)
        };
        table.add_row(Row::from(vec![
            Cell::new("recommended"),
            name_cell,
            Cell::new(annotated.reason.clone()),
            Cell::new(annotated.priority.to_string()),
            Cell::new(
                annotated
                    .relevance_score
                    .map(|s| format!("{s:.2}"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]));
    }
    for item in &result.others {
        table.add_row(Row::from(vec![
            Cell::new("other"),
            Cell::new(item.name.clone()),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
        ]));
    }

    let mut out = String::new();
    if let Some(category) = &result.project_category {
        out.push_str(&format!("Project: {category}"));
        if let Some(confidence) = result.confidence {
            out.push_str(&format!(" (confidence {confidence:.2})"));
        }
        out.push('\n');
    }
    out.push_str(&format!("Tier: {}\n", result.tier));
    out.push_str(&table.to_string());
    out.push('\n');
    out.push_str(&result.ai_message);
    if let Some(context) = &result.context_message {
        out.push('\n');
        out.push_str(context);
    }
    if let Some(error) = &result.error {
        out.push('\n');
        out.push_str(&format!("Error: {error}"));
    }
    out
}

pub fn render_wizard_table(data: &WizardData) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Domain", "Tier", "Recommended", "Others", "Status"]);

    for result in [&data.materials, &data.crafts, &data.techniques] {
        let status_cell = if result.is_failure() {
            Cell::new("FAILED").fg(Color::Red)
        } else {
            Cell::new("OK").fg(Color::Green)
        };
        table.add_row(Row::from(vec![
            Cell::new(result.domain.to_string()),
            Cell::new(result.tier.to_string()),
            Cell::new(result.recommended.len().to_string()),
            Cell::new(result.others.len().to_string()),
            status_cell,
        ]));
    }

    let mut out = table.to_string();
    if !data.failed_domains.is_empty() {
        let failed = data
            .failed_domains
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("\nFailed domains: {failed}"));
    }
    out
}

pub fn render_analysis_table(analysis: &ProjectAnalysis) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Domain", "Suggested Id", "Relevance"]);

    for (label, suggestions) in [
        ("Materials", &analysis.suggested_materials),
        ("Crafts", &analysis.suggested_crafts),
        ("Techniques", &analysis.suggested_techniques),
    ] {
        for suggestion in suggestions {
            table.add_row(vec![
                label.to_string(),
                suggestion.id.to_string(),
                suggestion
                    .relevance_score
                    .map(|s| format!("{s:.2}"))
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }
    }

    let header = match (&analysis.project_category, analysis.confidence_score) {
        (Some(category), Some(confidence)) => {
            format!("Category: {category} (confidence {confidence:.2})\n")
        }
        (Some(category), None) => format!("Category: {category}\n"),
        _ => "Category: unknown\n".to_string(),
    };
    format!("{header}{table}")
}

pub fn render_health(health: &HealthStatus) -> String {
    let mut out = format!("status: {}", health.status);
    if let Some(service) = &health.service {
        out.push_str(&format!("\nservice: {service}"));
    }
    if let Some(error) = &health.error {
        out.push_str(&format!("\nerror: {error}"));
    }
    out
}
