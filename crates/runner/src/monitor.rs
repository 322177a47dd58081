//! One poll cycle: fetch, diff, notify, persist.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, info_span, warn, Instrument};
use watch::{
    ChangeDetector, DeliveryFailurePolicy, Entity, EntityKey, EntityKind, FetchError, Fetcher,
    FirstRunPolicy, Notifier, RepoName, Repository, RunError, RunId, Snapshot, Store, TagName, WatchConfig,
};

use crate::format::format_detection;

/// Outcome of a completed poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// No previous snapshot was available.
    pub first_run: bool,

    /// Entities not present in the previous snapshot.
    pub detected: usize,

    /// Messages delivered.
    pub notified: usize,

    /// New entities recorded without a message (first-run baseline, the
    /// delayed baseline of a repository first listed after it, or tags
    /// already announced through their release).
    pub suppressed: usize,

    /// Messages the notifier failed to deliver.
    pub failed_deliveries: usize,

    /// Repositories whose releases or tags could not be listed.
    pub skipped_repositories: Vec<RepoName>,

    /// Number of keys in the saved snapshot.
    pub snapshot_size: usize,
}

/// Drives a poll cycle against the injected collaborators.
pub struct Monitor<'a> {
    config: WatchConfig,
    detector: ChangeDetector,
    fetcher: &'a dyn Fetcher,
    store: &'a dyn Store,
    notifier: &'a dyn Notifier,
}

impl<'a> Monitor<'a> {
    pub fn new(
        config: WatchConfig,
        fetcher: &'a dyn Fetcher,
        store: &'a dyn Store,
        notifier: &'a dyn Notifier,
    ) -> Self {
        let detector = ChangeDetector::new(config.highlight.clone());
        Self {
            config,
            detector,
            fetcher,
            store,
            notifier,
        }
    }

    /// Runs one poll cycle.
    ///
    /// Fails only when the organization cannot be listed or the snapshot cannot
    /// be saved. Per-repository fetch failures and delivery failures are logged
    /// and reported in the [`RunReport`].
    pub async fn run(&self) -> Result<RunReport, RunError> {
        let run_id = RunId::new();
        let span = info_span!(
            "poll",
            %run_id,
            org = %self.config.organization,
        );
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) -> Result<RunReport, RunError> {
        let mut report = RunReport::default();

        let previous = match self.store.load().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                info!("No previous snapshot; treating this as the first run");
                report.first_run = true;
                Snapshot::new()
            }
            Err(e) => {
                warn!(error = %e, "Previous snapshot unreadable; treating this as the first run");
                report.first_run = true;
                Snapshot::new()
            }
        };

        let repositories = self.fetcher.list_repositories().await.map_err(|source| {
            RunError::OrganizationFetch {
                org: self.config.organization.clone(),
                source,
            }
        })?;
        info!(count = repositories.len(), "Listed repositories");

        let observed = self.observe(repositories, &mut report).await;

        let detections = self.detector.detect(&observed.entities, &previous);
        report.detected = detections.len();

        let baseline_policy = self.config.first_run == FirstRunPolicy::Baseline;
        let baseline = report.first_run && baseline_policy;
        if baseline && !detections.is_empty() {
            info!(
                count = detections.len(),
                "Recording baseline without notifying"
            );
        }

        // Repositories the baseline run recorded without their releases and
        // tags: their history is recorded now, silently.
        let late_baseline: BTreeSet<&RepoName> = if baseline_policy {
            observed
                .listed
                .iter()
                .filter(|repo| previous.is_unlisted(repo))
                .collect()
        } else {
            BTreeSet::new()
        };
        for repo in &late_baseline {
            info!(%repo, "Recording delayed baseline without notifying");
        }

        let mut next = previous;
        for detection in &detections {
            let key = detection.key();
            let late =
                key.kind() != EntityKind::Repository && late_baseline.contains(&key.repo());

            if baseline || late || observed.announced_by_release(&key) {
                debug!(%key, "Recording without notification");
                report.suppressed += 1;
                next.insert(key);
                continue;
            }

            let message = format_detection(&self.config.organization, detection);
            match self.notifier.send(&message).await {
                Ok(()) => {
                    info!(%key, highlighted = detection.highlighted, "Notified");
                    report.notified += 1;
                    next.insert(key);
                }
                Err(e) => {
                    report.failed_deliveries += 1;
                    match self.config.delivery_failure {
                        DeliveryFailurePolicy::Retry => {
                            warn!(%key, error = %e, "Delivery failed; will retry next run");
                        }
                        DeliveryFailurePolicy::MarkSeen => {
                            warn!(%key, error = %e, "Delivery failed; recording as seen");
                            next.insert(key);
                        }
                    }
                }
            }
        }

        for repo in &observed.listed {
            next.mark_listed(repo);
        }
        if baseline {
            for repo in &report.skipped_repositories {
                next.mark_unlisted(repo.clone());
            }
        }

        self.store.save(&next).await?;
        report.snapshot_size = next.len();

        info!(
            detected = report.detected,
            notified = report.notified,
            suppressed = report.suppressed,
            failed_deliveries = report.failed_deliveries,
            skipped_repositories = report.skipped_repositories.len(),
            "Poll complete"
        );
        Ok(report)
    }

    /// Lists releases and tags for every repository. A repository whose
    /// releases or tags cannot be listed contributes only itself.
    async fn observe(&self, repositories: Vec<Repository>, report: &mut RunReport) -> Observed {
        let mut observed = Observed::default();

        for repo in repositories {
            let name = repo.name.clone();
            observed.entities.push(Entity::Repository(repo));

            match self.observe_repository(&name).await {
                Ok(entities) => {
                    debug!(repo = %name, count = entities.len(), "Listed releases and tags");
                    for entity in &entities {
                        if let Entity::Release(release) = entity {
                            observed
                                .release_tags
                                .entry(release.repo.clone())
                                .or_default()
                                .insert(release.tag.clone());
                        }
                    }
                    observed.entities.extend(entities);
                    observed.listed.insert(name);
                }
                Err(e) => {
                    warn!(repo = %name, error = %e, "Skipping repository for this run");
                    report.skipped_repositories.push(name);
                }
            }
        }

        observed
    }

    async fn observe_repository(&self, repo: &RepoName) -> Result<Vec<Entity>, FetchError> {
        let releases = self.fetcher.list_releases(repo).await?;
        let tags = self.fetcher.list_tags(repo).await?;
        Ok(releases
            .into_iter()
            .map(Entity::Release)
            .chain(tags.into_iter().map(Entity::Tag))
            .collect())
    }
}

/// Everything listed during one run.
#[derive(Default)]
struct Observed {
    entities: Vec<Entity>,
    /// Repositories whose releases and tags were both listed.
    listed: BTreeSet<RepoName>,
    /// Tags that currently have a release, per repository.
    release_tags: BTreeMap<RepoName, BTreeSet<TagName>>,
}

impl Observed {
    /// A tag with a release in the same repository is announced by the
    /// release message.
    fn announced_by_release(&self, key: &EntityKey) -> bool {
        match key {
            EntityKey::Tag { repo, name } => self
                .release_tags
                .get(repo)
                .is_some_and(|tags| tags.contains(name)),
            _ => false,
        }
    }
}
