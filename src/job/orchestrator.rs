//! Job orchestration
//!
//! Drives one job through discovery, crawling and checking, and reports
//! each lifecycle transition to the job store:
//!
//! ```text
//! submit ─► insert (pending)
//!   └─► spawn run
//!         ├─► on_processing
//!         ├─► spawn process: sitemap ─► crawl ─► cap ─► check
//!         └─► on_completed | on_failed   (exactly one)
//! ```

use crate::checker::LinkChecker;
use crate::config::{validate, Config};
use crate::crawler::{HttpFetcher, PageCrawler, PageRenderer};
use crate::job::options::{normalize_options, normalize_options_with, JobOptions};
use crate::job::types::{DiscoveryMethod, Job, JobRequest, JobResult};
use crate::sitemap::SitemapResolver;
use crate::storage::{JobStore, StorageResult};
use crate::url::{is_http_scheme, origin_of, parse_http_url, same_host};
use crate::{Result, SonarError};
use std::sync::Arc;
use tokio::task::JoinHandle;
use url::Url;

/// A job accepted for processing
#[derive(Debug)]
pub struct SubmittedJob {
    /// Snapshot of the job in its pending state
    pub job: Job,

    /// Resolves to the job in its terminal state; may be dropped
    pub handle: JoinHandle<Job>,
}

/// Composes sitemap discovery, crawling and link checking per job
pub struct JobOrchestrator {
    resolver: SitemapResolver,
    crawler: PageCrawler,
    checker: LinkChecker,
    store: Arc<dyn JobStore>,
    default_options: JobOptions,
}

impl JobOrchestrator {
    /// Builds an orchestrator from configuration
    ///
    /// Discovery and checking share one HTTP client; pages are rendered
    /// through `renderer`. Configurations built in code are validated the
    /// same way as loaded ones.
    pub fn new(
        config: &Config,
        renderer: Arc<dyn PageRenderer>,
        store: Arc<dyn JobStore>,
    ) -> Result<Self> {
        validate(config)?;
        let fetcher = Arc::new(HttpFetcher::new(&config.fetcher)?);
        let checker = LinkChecker::from_client(fetcher.client().clone());

        Ok(Self {
            resolver: SitemapResolver::new(fetcher, &config.sitemap),
            crawler: PageCrawler::new(renderer),
            checker,
            store,
            default_options: normalize_options(&config.defaults),
        })
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    /// Options every submission is merged over
    pub fn default_options(&self) -> &JobOptions {
        &self.default_options
    }

    /// Validates and stores a new job, then processes it in the background
    ///
    /// Returns as soon as the pending job is stored. Must be called from
    /// within a tokio runtime.
    pub fn submit(self: &Arc<Self>, request: JobRequest) -> Result<SubmittedJob> {
        let url = request.url.trim();
        parse_http_url(url)?;

        let options = normalize_options_with(
            &self.default_options,
            &request.options.unwrap_or_default(),
        );
        let job = Job::new(url, options);
        self.store.insert(&job)?;

        tracing::info!("Accepted job {} for {}", job.id, job.url);

        let this = Arc::clone(self);
        let pending = job.clone();
        let handle = tokio::spawn(async move { this.run(pending).await });

        Ok(SubmittedJob { job, handle })
    }

    /// Processes `job` to a terminal state and returns it
    ///
    /// The pipeline runs in its own task so that a panic inside it still
    /// ends in `on_failed`. Exactly one terminal callback fires per job.
    pub async fn run(self: &Arc<Self>, mut job: Job) -> Job {
        if let Err(e) = job.start() {
            tracing::warn!("Job {} not started: {}", job.id, e);
            return job;
        }
        report(job.id, "processing", self.store.on_processing(job.id));
        tracing::info!("Processing job {} for {}", job.id, job.url);

        let this = Arc::clone(self);
        let url = job.url.clone();
        let options = job.options.clone();
        let outcome = tokio::spawn(async move { this.process(&url, &options).await })
            .await
            .unwrap_or_else(|e| Err(SonarError::Task(e.to_string())));

        match outcome {
            Ok(result) => {
                tracing::info!(
                    "Job {} completed: {} links checked ({} alive, {} dead, {} errors)",
                    job.id,
                    result.links_checked,
                    result.alive,
                    result.dead,
                    result.errors
                );
                report(job.id, "completed", self.store.on_completed(job.id, &result));
                if let Err(e) = job.complete(result) {
                    tracing::warn!("Job {} not completed: {}", job.id, e);
                }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!("Job {} failed: {}", job.id, message);
                report(job.id, "failed", self.store.on_failed(job.id, &message));
                if let Err(e) = job.fail(message) {
                    tracing::warn!("Job {} not failed: {}", job.id, e);
                }
            }
        }

        job
    }

    async fn process(&self, url: &str, options: &JobOptions) -> Result<JobResult> {
        let root = parse_http_url(url)?;
        let origin = origin_of(&root);

        let sitemap_urls = self.resolver.discover_from_sitemap(&origin).await;
        let (method, seeds) = if sitemap_urls.is_empty() {
            (DiscoveryMethod::Scrape, Vec::new())
        } else {
            let seeds = same_host_seeds(&root, sitemap_urls, options.max_internal_pages);
            (DiscoveryMethod::Sitemap, seeds)
        };
        tracing::info!(
            "Discovery for {} used {} ({} seed pages)",
            root,
            method,
            seeds.len()
        );

        let outcome = self.crawler.crawl(&root, options, &seeds).await?;
        tracing::info!(
            "Crawled {} pages of {}, found {} links",
            outcome.pages_crawled.len(),
            root,
            outcome.links.len()
        );

        let mut links = outcome.links;
        if links.len() > options.max_links_to_check {
            tracing::debug!(
                "Capping {} links to {}",
                links.len(),
                options.max_links_to_check
            );
            links.truncate(options.max_links_to_check);
        }

        let results = self.checker.check_links(&links, options).await;

        Ok(JobResult::from_links(
            outcome.title,
            method,
            outcome.pages_crawled,
            results,
        ))
    }
}

/// Sitemap URLs on the root's host, in order, at most `max`
fn same_host_seeds(root: &Url, sitemap_urls: Vec<String>, max: usize) -> Vec<String> {
    sitemap_urls
        .into_iter()
        .filter(|candidate| {
            Url::parse(candidate)
                .map(|u| is_http_scheme(&u) && same_host(&u, root))
                .unwrap_or(false)
        })
        .take(max)
        .collect()
}

fn report(id: uuid::Uuid, event: &str, outcome: StorageResult<()>) {
    if let Err(e) = outcome {
        tracing::warn!("Job store rejected {} update for job {}: {}", event, id, e);
    }
}
