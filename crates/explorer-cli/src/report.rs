use std::path::Path;

use explorer_config::AppConfig;
use explorer_store::{MigrationReport, MigrationStatus};

/// Print a boxed summary of a migration run.
pub fn print_report(report: &MigrationReport, config: &AppConfig, store_path: &Path) {
    for line in render_report(report, config, store_path) {
        println!("{line}");
    }
}

fn render_report(report: &MigrationReport, config: &AppConfig, store_path: &Path) -> Vec<String> {
    let version = env!("CARGO_PKG_VERSION");

    let store_display = match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => store_path.to_string_lossy().replace(&home, "~"),
        _ => store_path.to_string_lossy().to_string(),
    };

    let width = 64;
    let inner = width - 4; // "│ " + " │"

    let title = format!("explorer-settings v{version}");
    let title_dashes = width - 2 - title.chars().count() - 5; // 2 for ╭╮, 5 for "─── " + " "
    let top = format!("╭─── {title} {}╮", "─".repeat(title_dashes));
    let bottom = format!("╰{}╯", "─".repeat(width - 2));

    let row = |text: &str| format!("│ {:<inner$} │", truncate(text, inner));

    let mut lines = vec![top];
    lines.push(row(&format!("Network     {}", config.network)));
    lines.push(row(&format!("Store       {store_display}")));
    lines.push(row(&"─".repeat(inner)));
    for (migration, status) in &report.entries {
        let status = match status {
            MigrationStatus::Applied => "applied".to_string(),
            MigrationStatus::Skipped => "up to date".to_string(),
            MigrationStatus::Failed(e) => format!("failed: {e}"),
        };
        lines.push(row(&format!("{:<12}{status}", migration.name())));
    }
    lines.push(row(""));
    lines.push(row(&format!(
        "{} applied, {} failed",
        report.applied(),
        report.failed()
    )));
    lines.push(bottom);
    lines
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
