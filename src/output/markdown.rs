//! Markdown report generation
//!
//! This module generates human-readable markdown reports of a job,
//! including tallies, status-code breakdown and the broken-link table.

use crate::job::{Job, LinkStatus};
use crate::output::stats::{listed_links, status_label, JobStatistics};
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report of `job` to `output_path`
pub fn write_markdown_report(job: &Job, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(job);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a job as markdown
pub fn format_markdown_report(job: &Job) -> String {
    let mut md = String::new();

    md.push_str("# Link-Sonar Report\n\n");

    md.push_str("## Job Information\n\n");
    md.push_str(&format!("- **Job ID**: {}\n", job.id));
    md.push_str(&format!("- **URL**: {}\n", job.url));
    md.push_str(&format!("- **Status**: {}\n", job.status));
    md.push_str(&format!("- **Created**: {}\n", job.created_at.to_rfc3339()));
    if let Some(completed) = job.completed_at {
        md.push_str(&format!("- **Finished**: {}\n", completed.to_rfc3339()));
        let duration = completed - job.created_at;
        md.push_str(&format!(
            "- **Duration**: {:.1} seconds\n",
            duration.num_milliseconds() as f64 / 1000.0
        ));
    }
    if let Some(error) = &job.error {
        md.push_str(&format!("- **Error**: {}\n", error));
    }
    md.push('\n');

    let Some(result) = &job.result else {
        return md;
    };

    md.push_str("## Overview\n\n");
    if let Some(title) = &result.title {
        md.push_str(&format!("- **Title**: {}\n", escape_cell(title)));
    }
    md.push_str(&format!(
        "- **Discovery Method**: {}\n",
        result.discovery_method
    ));
    md.push_str(&format!("- **Pages Crawled**: {}\n", result.pages_crawled));
    md.push_str(&format!("- **Links Checked**: {}\n\n", result.links_checked));

    let stats = JobStatistics::from_result(result);

    md.push_str("## Link Status\n\n");
    md.push_str("| Status | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Alive | {} |\n", stats.alive));
    md.push_str(&format!("| Dead | {} |\n", stats.dead));
    md.push_str(&format!("| Error | {} |\n\n", stats.errors));
    md.push_str(&format!(
        "Alive rate: {:.2}%, broken rate: {:.2}%\n\n",
        stats.alive_rate(),
        stats.broken_rate()
    ));

    if !stats.status_codes.is_empty() {
        md.push_str("## Status Codes\n\n");
        md.push_str("| Code | Links |\n");
        md.push_str("|------|-------|\n");
        for (code, count) in &stats.status_codes {
            md.push_str(&format!("| {} | {} |\n", code, count));
        }
        md.push('\n');
    }

    if !result.crawled_pages.is_empty() {
        md.push_str("## Pages Crawled\n\n");
        for page in &result.crawled_pages {
            md.push_str(&format!("- {}\n", page));
        }
        md.push('\n');
    }

    let broken: Vec<_> = listed_links(result, true).collect();
    if !broken.is_empty() {
        md.push_str("## Broken Links\n\n");
        md.push_str("| URL | Status | Detail |\n");
        md.push_str("|-----|--------|--------|\n");
        for link in broken {
            let detail = match link.status {
                LinkStatus::Error => link.error.as_deref().map(escape_cell).unwrap_or_default(),
                _ => String::new(),
            };
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                escape_cell(&link.url),
                status_label(link),
                detail
            ));
        }
        md.push('\n');
    }

    if !stats.broken_hosts.is_empty() {
        md.push_str("## Top 20 Hosts With Broken Links\n\n");
        md.push_str("| Host | Broken Links |\n");
        md.push_str("|------|--------------|\n");
        for (host, count) in stats.broken_hosts.iter().take(20) {
            md.push_str(&format!("| {} | {} |\n", host, count));
        }
        md.push('\n');
    }

    md
}

/// Keeps free text from breaking a table row
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}
