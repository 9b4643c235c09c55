//! Backup catalog built from an object listing
//!
//! The network layer lists keys under [`StorageLayout::basebackups`] and
//! hands them over as [`ListedObject`]s. A backup exists exactly when its
//! sentinel exists: keys at sentinel depth whose name matches the full
//! sentinel pattern become catalog entries, everything else is skipped.
//!
//! # Queries
//!
//! | Query | Matches |
//! |-------|---------|
//! | `All` | every backup |
//! | `Latest` (`"LATEST"`) | the lexically greatest backup name |
//! | `Named(name)` | the backup called `name` |

use crate::artifact::ArtifactKey;
use crate::layout::StorageLayout;
use crate::partition::TarPartitionName;
use crate::patterns::match_base_backup;
use crate::sentinel::SentinelFetch;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::{debug, info};
use walvault_core::{BackupDescriptor, Error, Field, Result};

/// Query string selecting the most recent backup
pub const LATEST_QUERY: &str = "LATEST";

/// One entry of an object listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedObject {
    /// Bucket-relative key
    pub key: String,
    /// Modification time reported by the store, if any
    pub last_modified: Option<DateTime<Utc>>,
}

impl ListedObject {
    /// Listing entry with a key and modification time
    pub fn new(key: impl Into<String>, last_modified: Option<DateTime<Utc>>) -> Self {
        ListedObject {
            key: key.into(),
            last_modified,
        }
    }
}

/// Selection of backups from a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupQuery {
    /// Every backup
    All,
    /// The lexically greatest backup name
    Latest,
    /// One backup by name
    Named(String),
}

impl BackupQuery {
    /// Query for an optional user-supplied string; `None` selects all
    pub fn from_optional(query: Option<&str>) -> Result<Self> {
        query.map_or(Ok(BackupQuery::All), str::parse)
    }

    fn matches(&self, backup: &BackupDescriptor) -> bool {
        match self {
            BackupQuery::All | BackupQuery::Latest => true,
            BackupQuery::Named(name) => backup.name.known() == Some(name),
        }
    }
}

impl FromStr for BackupQuery {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == LATEST_QUERY {
            return Ok(BackupQuery::Latest);
        }
        if match_base_backup(s).is_none() {
            return Err(Error::configuration("non-conformant backup name passed")
                .with_detail(format!(
                    "The backup name {:?} is not of the form base_<segment>_<offset>.",
                    s
                ))
                .with_hint(format!(
                    "Pass a name from the backup list, or {}.",
                    LATEST_QUERY
                )));
        }
        Ok(BackupQuery::Named(s.to_string()))
    }
}

/// Completed backups found in one listing, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupCatalog {
    backups: Vec<BackupDescriptor>,
}

impl BackupCatalog {
    /// Build a catalog from listed objects
    ///
    /// Keys that are not artifacts of a known type are skipped. Keys of
    /// other artifact kinds (tar partitions, version files) are ignored.
    ///
    /// # Errors
    ///
    /// Fails on keys outside the layout and on an unsupported layout
    /// version; those mean the listing itself was wrong.
    pub fn from_listing(
        layout: &StorageLayout,
        objects: impl IntoIterator<Item = ListedObject>,
    ) -> Result<Self> {
        let mut seen = 0usize;
        let mut backups = Vec::new();

        for object in objects {
            seen += 1;
            match layout.parse_key(&object.key) {
                Ok(ArtifactKey::BackupSentinel(backup)) => {
                    let name = backup.backup_name()?;
                    let mut backup = backup.with_name(name);
                    backup.last_modified = Field::from(object.last_modified);
                    backups.push(backup);
                }
                Ok(other) => {
                    debug!(target: "walvault::listing", key = %object.key, kind = %other.kind(), "Not a sentinel, ignoring");
                }
                Err(e) if e.is_skippable() => {
                    debug!(target: "walvault::listing", key = %object.key, error = %e, "Skipping unrecognized key");
                }
                Err(e) => return Err(e),
            }
        }

        backups.sort_by(compare_names);
        info!(target: "walvault::listing", keys = seen, backups = backups.len(), "Backup catalog built");
        Ok(BackupCatalog { backups })
    }

    /// All backups, ordered by name
    pub fn backups(&self) -> &[BackupDescriptor] {
        &self.backups
    }

    /// Number of backups
    pub fn len(&self) -> usize {
        self.backups.len()
    }

    /// True if no backups were found
    pub fn is_empty(&self) -> bool {
        self.backups.is_empty()
    }

    /// The backup with the greatest name
    pub fn latest(&self) -> Option<&BackupDescriptor> {
        self.backups.last()
    }

    /// Backups matching a query
    pub fn find(&self, query: &BackupQuery) -> Vec<&BackupDescriptor> {
        match query {
            BackupQuery::Latest => self.latest().into_iter().collect(),
            _ => self.backups.iter().filter(|b| query.matches(b)).collect(),
        }
    }

    /// The single backup a query selects
    ///
    /// # Errors
    ///
    /// `Error::Configuration` if nothing or more than one backup matches.
    pub fn resolve(&self, query: &BackupQuery) -> Result<&BackupDescriptor> {
        let found = self.find(query);
        match found.as_slice() {
            [one] => Ok(*one),
            [] => Err(Error::configuration("no backups found for fetching").with_detail(
                format!(
                    "No backup matching the query {} was able to be located.",
                    describe(query)
                ),
            )),
            _ => Err(
                Error::configuration("more than one backup found for fetching")
                    .with_detail(format!(
                        "More than one backup matching the query {} was able to be located.",
                        describe(query)
                    ))
                    .with_hint("To list qualifying backups, query them by name."),
            ),
        }
    }

    /// Fill in sentinel details for every backup
    ///
    /// `fetch` performs the object-store read for one backup's sentinel.
    pub fn with_details(
        self,
        mut fetch: impl FnMut(&BackupDescriptor) -> SentinelFetch,
    ) -> Result<Self> {
        let backups = self
            .backups
            .into_iter()
            .map(|backup| {
                let outcome = fetch(&backup);
                outcome.apply_to(backup)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(BackupCatalog { backups })
    }
}

fn compare_names(a: &BackupDescriptor, b: &BackupDescriptor) -> Ordering {
    a.name.known().cmp(&b.name.known())
}

fn describe(query: &BackupQuery) -> String {
    match query {
        BackupQuery::All => "(all)".to_string(),
        BackupQuery::Latest => LATEST_QUERY.to_string(),
        BackupQuery::Named(name) => name.clone(),
    }
}

impl StorageLayout {
    /// Part names belonging to `backup`, in upload order
    ///
    /// Canonical `part_<n>.tar.lzo` names sort by number and come first;
    /// other part names follow in lexical order. Keys of other backups or
    /// other artifacts are ignored.
    pub fn tar_partition_names<'a>(
        &self,
        backup: &BackupDescriptor,
        keys: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<String>> {
        let wanted = backup.backup_name()?;
        let mut canonical = Vec::new();
        let mut other = Vec::new();

        for key in keys {
            match self.parse_key(key) {
                Ok(ArtifactKey::TarPartition {
                    backup: owner,
                    part_name,
                }) if owner.backup_name().as_ref() == Ok(&wanted) => {
                    match part_name.parse::<TarPartitionName>() {
                        Ok(name) => canonical.push(name),
                        Err(_) => other.push(part_name),
                    }
                }
                Ok(_) => {}
                Err(e) if e.is_skippable() => {
                    debug!(target: "walvault::listing", key, error = %e, "Skipping unrecognized key");
                }
                Err(e) => return Err(e),
            }
        }

        canonical.sort();
        other.sort();
        Ok(canonical
            .iter()
            .map(ToString::to_string)
            .chain(other)
            .collect())
    }
}
