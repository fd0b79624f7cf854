//! Backfill processor
//!
//! Classifies group names that carry neither a category nor a collection and
//! assigns the matching row. Tags resolve to rows by name, so the seeded
//! categories and collections must exist.

use crate::errors::BackfillError;
use namehub_common::classify::{classify_or_default, CategoryTag, TagKind};
use namehub_common::db::{GroupNamePatch, Repository};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Outcome of one backfill run
#[derive(Debug, Default, Serialize)]
pub struct BackfillReport {
    pub scanned: usize,
    pub assigned: usize,
    pub skipped: usize,
    pub by_tag: HashMap<&'static str, usize>,
}

/// One planned assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub group_name_id: i32,
    pub tag: CategoryTag,
    pub target_id: i32,
}

pub struct BackfillProcessor {
    repository: Repository,
    batch_size: u64,
    apply: bool,
    targets: HashMap<CategoryTag, i32>,
}

impl BackfillProcessor {
    pub fn new(repository: Repository, batch_size: u64, apply: bool) -> Self {
        Self {
            repository,
            batch_size,
            apply,
            targets: HashMap::new(),
        }
    }

    /// Look up the category or collection id for a tag, caching the result
    async fn resolve(&mut self, tag: CategoryTag) -> Result<i32, BackfillError> {
        if let Some(id) = self.targets.get(&tag) {
            return Ok(*id);
        }

        let id = match tag.kind() {
            TagKind::Category => self
                .repository
                .find_category_by_name(tag.label())
                .await?
                .map(|c| c.id),
            TagKind::Collection => self
                .repository
                .find_collection_by_name(tag.label())
                .await?
                .map(|c| c.id),
        };

        let id = id.ok_or(BackfillError::MissingTarget {
            tag,
            kind: match tag.kind() {
                TagKind::Category => "category",
                TagKind::Collection => "collection",
            },
            label: tag.label(),
        })?;

        self.targets.insert(tag, id);
        Ok(id)
    }

    /// Classify up to one batch of untagged group names. In apply mode the
    /// assignments are written; otherwise they are only reported.
    #[instrument(skip(self), fields(apply = self.apply))]
    pub async fn run(&mut self) -> Result<(BackfillReport, Vec<Assignment>), BackfillError> {
        let untagged = self.repository.untagged_group_names(self.batch_size).await?;
        info!(count = untagged.len(), "Loaded untagged group names");

        let mut report = BackfillReport {
            scanned: untagged.len(),
            ..Default::default()
        };
        let mut assignments = Vec::with_capacity(untagged.len());

        for group_name in untagged {
            let tag = classify_or_default(&group_name.name);
            let target_id = match self.resolve(tag).await {
                Ok(id) => id,
                Err(e) => {
                    warn!(group_name_id = group_name.id, error = %e, "Skipping group name");
                    report.skipped += 1;
                    continue;
                }
            };

            debug!(group_name_id = group_name.id, tag = tag.label(), "Classified");

            if self.apply {
                let patch = match tag.kind() {
                    TagKind::Category => GroupNamePatch {
                        category_id: Some(Some(target_id)),
                        ..Default::default()
                    },
                    TagKind::Collection => GroupNamePatch {
                        collection_id: Some(Some(target_id)),
                        ..Default::default()
                    },
                };
                self.repository.update_group_name(group_name.id, patch).await?;
            }

            *report.by_tag.entry(tag.label()).or_default() += 1;
            report.assigned += 1;
            assignments.push(Assignment {
                group_name_id: group_name.id,
                tag,
                target_id,
            });
        }

        Ok((report, assignments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use namehub_common::config::DatabaseConfig;
    use namehub_common::db::{
        models::ModerationStatus, CategoryInput, CollectionInput, DbPool, NewGroupName,
    };

    async fn seeded_repo() -> Repository {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..DatabaseConfig::default()
        };
        let repo = Repository::new(DbPool::new(&config).await.unwrap());

        for label in ["搞笑", "可爱"] {
            repo.create_category(CategoryInput {
                name: label.to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        }
        repo.create_collection(CollectionInput {
            name: "寝室群名".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

        for name in ["404宿舍", "喵星人集合", "没有关键词", "岁月静好"] {
            repo.create_group_name(NewGroupName {
                name: name.to_string(),
                category_id: None,
                collection_id: None,
                user_id: None,
                status: ModerationStatus::Approved,
            })
            .await
            .unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let repo = seeded_repo().await;
        let mut processor = BackfillProcessor::new(repo.clone(), 100, false);

        let (report, assignments) = tokio_test::assert_ok!(processor.run().await);
        assert_eq!(report.scanned, 4);
        // No "文艺" category exists, so the literary name is skipped
        assert_eq!(report.assigned, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(assignments[0].tag, CategoryTag::Dorm);

        assert_eq!(repo.untagged_group_names(100).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_apply_assigns_targets() {
        let repo = seeded_repo().await;
        let mut processor = BackfillProcessor::new(repo.clone(), 100, true);

        let (report, assignments) = processor.run().await.unwrap();
        assert_eq!(report.assigned, 3);
        assert_eq!(report.by_tag.get("搞笑"), Some(&1));

        let dorm = repo.find_group_name(assignments[0].group_name_id).await.unwrap().unwrap();
        assert_eq!(dorm.collection_id, Some(assignments[0].target_id));
        assert_eq!(dorm.category_id, None);

        let remaining = repo.untagged_group_names(100).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "岁月静好");
    }
}
