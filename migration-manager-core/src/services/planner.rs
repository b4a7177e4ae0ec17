//! Migration planner - decides what `up` and `down` will touch

use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{MigrationFile, MigrationId};
use crate::services::catalog::MigrationCatalog;
use crate::services::records::MigrationRecordStore;

/// Migrations an `up` run will apply, oldest first
#[derive(Debug, Clone, Default)]
pub struct UpPlan {
    pub last_applied: Option<MigrationId>,
    pub migrations: Vec<MigrationFile>,
}

impl UpPlan {
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn ids(&self) -> Vec<MigrationId> {
        self.migrations.iter().map(|m| m.id.clone()).collect()
    }
}

/// Migrations a `down` run will revert, newest first
#[derive(Debug, Clone, Default)]
pub struct DownPlan {
    /// Applied migrations before the run
    pub applied_total: u64,
    /// Requested count clamped to `applied_total`
    pub count: u64,
    pub migrations: Vec<MigrationFile>,
}

impl DownPlan {
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn ids(&self) -> Vec<MigrationId> {
        self.migrations.iter().map(|m| m.id.clone()).collect()
    }
}

/// Overview of applied and pending migrations
#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationStatus {
    pub applied: Vec<MigrationId>,
    pub last_applied: Option<MigrationId>,
    pub pending: Vec<MigrationId>,
    /// Applied migrations whose file is no longer in the catalog
    pub missing: Vec<MigrationId>,
}

/// Files after `last_applied`, limited to the first `count` (0 = no limit).
///
/// `files` must be sorted ascending.
pub fn select_pending(
    files: Vec<MigrationFile>,
    last_applied: Option<&MigrationId>,
    count: u32,
) -> Vec<MigrationFile> {
    let candidates = files
        .into_iter()
        .filter(|file| last_applied.map_or(true, |last| file.id > *last));

    if count == 0 {
        candidates.collect()
    } else {
        candidates.take(count as usize).collect()
    }
}

/// Computes plans from the catalog and the tracking table
pub struct MigrationPlanner<'a> {
    catalog: &'a MigrationCatalog,
}

impl<'a> MigrationPlanner<'a> {
    pub fn new(catalog: &'a MigrationCatalog) -> Self {
        Self { catalog }
    }

    /// Plan applying up to `count` pending migrations (0 = all)
    pub fn plan_up(&self, store: &mut MigrationRecordStore<'_>, count: u32) -> Result<UpPlan> {
        let last_applied = store.last_applied()?;
        let files = self.catalog.list_ordered()?;
        let migrations = select_pending(files, last_applied.as_ref(), count);

        Ok(UpPlan {
            last_applied,
            migrations,
        })
    }

    /// Plan reverting up to `count` of the most recently applied migrations
    pub fn plan_down(&self, store: &mut MigrationRecordStore<'_>, count: u32) -> Result<DownPlan> {
        let latest = store.list_latest(count)?;
        if latest.is_empty() {
            return Ok(DownPlan::default());
        }

        let applied_total = store.count_applied()?;
        let migrations = latest
            .into_iter()
            .map(|id| {
                let path = self.catalog.path_for(&id);
                MigrationFile::new(id, path)
            })
            .collect();

        Ok(DownPlan {
            applied_total,
            count: u64::from(count).min(applied_total),
            migrations,
        })
    }

    /// Applied, pending and missing migrations
    pub fn status(&self, store: &mut MigrationRecordStore<'_>) -> Result<MigrationStatus> {
        let applied = store.list_all()?;
        let last_applied = applied.last().cloned();
        let files = self.catalog.list_ordered()?;

        let missing = applied
            .iter()
            .filter(|id| !files.iter().any(|f| &f.id == *id))
            .cloned()
            .collect();
        let pending = select_pending(files, last_applied.as_ref(), 0)
            .into_iter()
            .map(|f| f.id)
            .collect();

        Ok(MigrationStatus {
            applied,
            last_applied,
            pending,
            missing,
        })
    }
}
