//! Statistics derived from a finished job
//!
//! This module computes breakdowns of a job's link results and prints
//! them to the terminal.

use crate::job::{Job, JobResult, JobStatus, LinkResult, LinkStatus};
use std::collections::{BTreeMap, HashMap};
use url::Url;

/// Breakdown of one job's link results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobStatistics {
    /// Number of links probed
    pub links_checked: usize,

    pub alive: usize,
    pub dead: usize,
    pub errors: usize,

    /// Count of links per HTTP status code
    pub status_codes: BTreeMap<u16, usize>,

    /// Hosts with the most dead or erroring links, descending
    pub broken_hosts: Vec<(String, usize)>,
}

impl JobStatistics {
    /// Computes statistics from a job result
    pub fn from_result(result: &JobResult) -> Self {
        let mut status_codes = BTreeMap::new();
        let mut broken_by_host: HashMap<String, usize> = HashMap::new();

        for link in &result.links {
            if let Some(code) = link.status_code {
                *status_codes.entry(code).or_insert(0) += 1;
            }
            if link.status != LinkStatus::Alive {
                *broken_by_host.entry(host_of(&link.url)).or_insert(0) += 1;
            }
        }

        let mut broken_hosts: Vec<(String, usize)> = broken_by_host.into_iter().collect();
        broken_hosts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            links_checked: result.links_checked,
            alive: result.alive,
            dead: result.dead,
            errors: result.errors,
            status_codes,
            broken_hosts,
        }
    }

    /// Share of alive links in percent
    pub fn alive_rate(&self) -> f64 {
        percentage(self.alive, self.links_checked)
    }

    /// Share of dead and erroring links in percent
    pub fn broken_rate(&self) -> f64 {
        percentage(self.dead + self.errors, self.links_checked)
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

/// Links shown in listings: everything, or only dead and erroring ones
pub(crate) fn listed_links(result: &JobResult, dead_only: bool) -> impl Iterator<Item = &LinkResult> {
    result
        .links
        .iter()
        .filter(move |link| !dead_only || link.status != LinkStatus::Alive)
}

/// Short status column text (`404`, `error`)
pub(crate) fn status_label(link: &LinkResult) -> String {
    match link.status_code {
        Some(code) => code.to_string(),
        None => "error".to_string(),
    }
}

/// Prints a job summary to stdout
///
/// With `dead_only`, the link listing is limited to dead and erroring
/// links; the tallies always cover every link.
pub fn print_job_summary(job: &Job, dead_only: bool) {
    println!("=== Link-Sonar Job {} ===\n", job.id);
    println!("  URL: {}", job.url);
    println!("  Status: {}", job.status);

    if job.status == JobStatus::Failed {
        if let Some(error) = &job.error {
            println!("  Error: {}", error);
        }
        return;
    }

    let Some(result) = &job.result else {
        return;
    };

    if let Some(title) = &result.title {
        println!("  Title: {}", title);
    }
    println!("  Discovery: {}", result.discovery_method);
    println!("  Pages crawled: {}", result.pages_crawled);
    println!();

    let stats = JobStatistics::from_result(result);
    println!("Links:");
    println!("  Checked: {}", stats.links_checked);
    println!("  Alive: {} ({:.1}%)", stats.alive, stats.alive_rate());
    println!("  Dead: {}", stats.dead);
    println!("  Errors: {}", stats.errors);
    println!();

    if !stats.broken_hosts.is_empty() {
        println!("Hosts with broken links:");
        for (host, count) in stats.broken_hosts.iter().take(10) {
            println!("  {}: {}", host, count);
        }
        println!();
    }

    let listed: Vec<&LinkResult> = listed_links(result, dead_only).collect();
    if listed.is_empty() {
        return;
    }

    println!("{}:", if dead_only { "Broken links" } else { "All links" });
    for link in listed {
        match &link.error {
            Some(error) => println!("  [{}] {} ({})", link.status, link.url, error),
            None => println!("  [{}] {} {}", link.status, link.url, status_label(link)),
        }
    }
}
