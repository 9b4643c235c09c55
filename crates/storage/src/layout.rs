//! Object-store key layout
//!
//! `StorageLayout` owns the naming scheme for everything written under one
//! `s3://<bucket>/<prefix>` location:
//!
//! ```text
//! <prefix>
//! ├── basebackups_005/
//! │   ├── base_<segment>_<offset>_backup_stop_sentinel.json
//! │   └── base_<segment>_<offset>/
//! │       ├── extended_version.txt
//! │       └── tar_partitions/
//! │           ├── part_1.tar.lzo
//! │           └── ...
//! └── wal_005/
//!     ├── 000000010000000000000001
//!     └── ...
//! ```
//!
//! Every encoder is a pure function of the prefix, the format version and
//! its arguments. [`StorageLayout::parse`] inverts them: for every key that
//! does not end in `/`, `encode(parse(url_for(key))) == key`.
//!
//! # Versioning
//!
//! Only [`CURRENT_VERSION`] is implemented. A layout built for any other
//! version constructs fine but fails every key operation with
//! `Error::UnsupportedVersion`, so a tool never mixes naming schemes.

use crate::artifact::ArtifactKey;
use crate::patterns::{
    match_base_backup, match_sentinel, EXTENDED_VERSION_FILE, SENTINEL_SUFFIX, TAR_PARTITIONS_DIR,
};
use tracing::trace;
use url::Url;
use walvault_core::{BackupDescriptor, Error, Result};

/// The one key-naming version this build reads and writes
pub const CURRENT_VERSION: &str = "005";

/// URL scheme of the object store
pub const S3_SCHEME: &str = "s3";

/// Key layout rooted at one bucket and prefix
///
/// Read-only after construction and cheap to clone; share it freely
/// between upload and download workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    bucket: String,
    /// Empty, or ends with `/`; never starts with `/`
    prefix: String,
    version: String,
    /// `s3://<bucket>/`
    url_root: String,
    /// Path components of a key directly under a version root
    root_depth: usize,
}

impl StorageLayout {
    /// Create a layout for the current version
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the URL does not parse, its scheme
    /// is not `s3`, or it names no bucket.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_version(base_url, CURRENT_VERSION)
    }

    /// Create a layout for an explicit version
    pub fn with_version(base_url: &str, version: impl Into<String>) -> Result<Self> {
        let url = Url::parse(base_url).map_err(|e| {
            Error::configuration("could not parse S3 URL")
                .with_detail(format!("The URL {:?} is malformed: {}.", base_url, e))
        })?;

        if url.scheme() != S3_SCHEME {
            return Err(Error::configuration("bad S3 URL scheme passed").with_detail(format!(
                "The scheme {} was passed when \"{}\" was expected.",
                url.scheme(),
                S3_SCHEME
            )));
        }

        let bucket = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => {
                return Err(Error::configuration("S3 URL names no bucket")
                    .with_detail(format!("The URL {:?} has no bucket.", base_url))
                    .with_hint("Use the form s3://<bucket>/<prefix>."))
            }
        };

        if url.query().is_some() || url.fragment().is_some() {
            return Err(Error::configuration("S3 URL carries a query or fragment")
                .with_detail(format!("The URL {:?} is not a plain prefix.", base_url)));
        }

        // Object-store API requests cannot take a leading slash, and every
        // derived key assumes a trailing one.
        let mut prefix = raw_path(base_url).trim_start_matches('/').to_string();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }

        let version = version.into();
        let root_depth = format!("basebackups_{}/", version)
            .split('/')
            .filter(|c| !c.is_empty())
            .count()
            + 1;

        Ok(StorageLayout {
            url_root: format!("{}://{}/", S3_SCHEME, bucket),
            bucket,
            prefix,
            version,
            root_depth,
        })
    }

    /// Bucket name
    pub fn bucket_name(&self) -> &str {
        &self.bucket
    }

    /// Normalized prefix (empty or ending with `/`)
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Configured format version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Full URL of a bucket-relative key
    pub fn url_for(&self, key: &str) -> String {
        format!("{}{}", self.url_root, key)
    }

    fn check_version(&self) -> Result<()> {
        if self.version != CURRENT_VERSION {
            return Err(Error::UnsupportedVersion {
                version: self.version.clone(),
                supported: CURRENT_VERSION,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Encoding
    // ========================================================================

    /// `<prefix>basebackups_<version>/`
    pub fn basebackups(&self) -> Result<String> {
        self.check_version()?;
        Ok(format!("{}basebackups_{}/", self.prefix, self.version))
    }

    /// `basebackups + base_<start segment>_<start offset>/`
    pub fn basebackup_directory(&self, backup: &BackupDescriptor) -> Result<String> {
        let name = backup.backup_name()?;
        Ok(format!("{}{}/", self.basebackups()?, name))
    }

    /// Backup directory without its trailing `/`, plus the sentinel suffix
    pub fn basebackup_sentinel(&self, backup: &BackupDescriptor) -> Result<String> {
        let directory = self.basebackup_directory(backup)?;
        let without_delimiter = directory.strip_suffix('/').unwrap_or(&directory);
        Ok(format!("{}{}", without_delimiter, SENTINEL_SUFFIX))
    }

    /// `basebackup_directory + tar_partitions/`
    pub fn basebackup_tar_partition_directory(&self, backup: &BackupDescriptor) -> Result<String> {
        Ok(format!(
            "{}{}/",
            self.basebackup_directory(backup)?,
            TAR_PARTITIONS_DIR
        ))
    }

    /// `basebackup_directory + extended_version.txt`
    pub fn basebackup_extended_version(&self, backup: &BackupDescriptor) -> Result<String> {
        Ok(format!(
            "{}{}",
            self.basebackup_directory(backup)?,
            EXTENDED_VERSION_FILE
        ))
    }

    /// `basebackup_tar_partition_directory + part_name`
    ///
    /// `part_name` must be a single non-empty key component.
    pub fn basebackup_tar_partition(
        &self,
        backup: &BackupDescriptor,
        part_name: &str,
    ) -> Result<String> {
        check_leaf("tar partition name", part_name)?;
        Ok(format!(
            "{}{}",
            self.basebackup_tar_partition_directory(backup)?,
            part_name
        ))
    }

    /// `<prefix>wal_<version>/`
    pub fn wal_directory(&self) -> Result<String> {
        self.check_version()?;
        Ok(format!("{}wal_{}/", self.prefix, self.version))
    }

    /// `wal_directory + wal_file_name`
    ///
    /// `wal_file_name` must be a single non-empty key component.
    pub fn wal_path(&self, wal_file_name: &str) -> Result<String> {
        check_leaf("WAL file name", wal_file_name)?;
        Ok(format!("{}{}", self.wal_directory()?, wal_file_name))
    }

    /// Re-encode a decoded key
    pub fn encode(&self, key: &ArtifactKey) -> Result<String> {
        match key {
            ArtifactKey::BackupSentinel(backup) => self.basebackup_sentinel(backup),
            ArtifactKey::ExtendedVersion(backup) => self.basebackup_extended_version(backup),
            ArtifactKey::TarPartition { backup, part_name } => {
                self.basebackup_tar_partition(backup, part_name)
            }
            ArtifactKey::WalFile(name) => self.wal_path(name),
        }
    }

    // ========================================================================
    // Decoding
    // ========================================================================

    /// Classify a full `s3://` URL
    ///
    /// # Errors
    ///
    /// - `Structural`: the URL is not inside this layout's bucket and prefix
    /// - `Parse`: inside the layout, but not the key of any artifact
    /// - `UnsupportedVersion`: the layout's version is not implemented
    pub fn parse(&self, url: &str) -> Result<ArtifactKey> {
        self.check_version()?;

        let parsed = Url::parse(url).map_err(|e| Error::structural(url, e.to_string()))?;
        if parsed.scheme() != S3_SCHEME {
            return Err(Error::structural(url, "scheme does not match"));
        }
        if parsed.host_str() != Some(self.bucket.as_str()) {
            return Err(Error::structural(url, "bucket does not match"));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(Error::structural(url, "query or fragment present"));
        }

        let key = url
            .strip_prefix(&self.url_root)
            .ok_or_else(|| Error::structural(url, "bucket does not match"))?;
        if !key.starts_with(&self.prefix) {
            return Err(Error::structural(url, "prefix does not match"));
        }

        let artifact = self.classify(key)?;

        // Every accepted key must be exactly what the encoder produces;
        // this rejects doubled separators and trailing slashes.
        if self.encode(&artifact)? != key {
            return Err(Error::parse(key, "key is not in canonical form"));
        }

        trace!(target: "walvault::layout", key, kind = %artifact.kind(), "Parsed key");
        Ok(artifact)
    }

    /// Classify a bucket-relative key
    pub fn parse_key(&self, key: &str) -> Result<ArtifactKey> {
        self.parse(&self.url_for(key))
    }

    fn classify(&self, key: &str) -> Result<ArtifactKey> {
        let relative = &key[self.prefix.len()..];
        let parts: Vec<&str> = relative.split('/').filter(|c| !c.is_empty()).collect();
        let depth = parts.len();
        let d0 = self.root_depth;

        if depth == d0 {
            let leaf = parts[depth - 1];
            if key.starts_with(&self.basebackups()?) {
                let (segment, offset) = match_sentinel(leaf)
                    .ok_or_else(|| Error::parse(key, "not a backup sentinel name"))?;
                Ok(ArtifactKey::BackupSentinel(BackupDescriptor::from_start(
                    segment, offset,
                )))
            } else if key.starts_with(&self.wal_directory()?) {
                Ok(ArtifactKey::WalFile(leaf.to_string()))
            } else {
                Err(Error::parse(key, "not under a known directory"))
            }
        } else if depth == d0 + 1 {
            let backup = backup_from_directory(key, parts[depth - 2])?;
            if key != self.basebackup_extended_version(&backup)? {
                return Err(Error::parse(key, "not an extended version file"));
            }
            Ok(ArtifactKey::ExtendedVersion(backup))
        } else if depth == d0 + 2 {
            let backup = backup_from_directory(key, parts[depth - 3])?;
            if !key.starts_with(&self.basebackup_tar_partition_directory(&backup)?) {
                return Err(Error::parse(key, "not a tar partition"));
            }
            Ok(ArtifactKey::TarPartition {
                backup,
                part_name: parts[depth - 1].to_string(),
            })
        } else {
            Err(Error::parse(
                key,
                format!("no artifact has a key of depth {}", depth),
            ))
        }
    }
}

/// Path of a base URL exactly as written
///
/// `Url::path` is percent-encoded; keys must keep the operator's text, so
/// the prefix is cut from the input after `<scheme>://<bucket>`. Only
/// called once the URL has parsed without query or fragment.
fn raw_path(base_url: &str) -> &str {
    let trimmed = base_url.trim_matches(|c: char| c <= ' ');
    let after_scheme = trimmed
        .split_once("://")
        .map_or(trimmed, |(_, rest)| rest);
    after_scheme
        .find('/')
        .map_or("", |slash| &after_scheme[slash..])
}

fn backup_from_directory(key: &str, component: &str) -> Result<BackupDescriptor> {
    let (segment, offset) = match_base_backup(component)
        .ok_or_else(|| Error::parse(key, "not inside a backup directory"))?;
    Ok(BackupDescriptor::from_start(segment, offset))
}

fn check_leaf(what: &str, name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '?', '#']) {
        return Err(Error::Validation(format!(
            "{} {:?} must be one non-empty key component without '?' or '#'",
            what, name
        )));
    }
    Ok(())
}
