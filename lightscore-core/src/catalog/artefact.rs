//! On-disk building catalog artefact.
//!
//! Layout: the four bytes `LSBC`, a little-endian `u16` format version, then a
//! `bincode` encoding of the records in catalog order.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use bincode::{deserialize_from, serialize_into};
use log::info;
use thiserror::Error;

use crate::{BuildingCatalog, BuildingRecord};

/// File identifier for catalog artefacts.
pub(crate) const CATALOG_MAGIC: [u8; 4] = *b"LSBC";

/// Supported catalog artefact version.
pub(crate) const CATALOG_VERSION: u16 = 1;

/// Errors raised while reading or writing a catalog artefact.
#[derive(Debug, Error)]
pub enum ArtefactError {
    /// The file could not be opened, read or written.
    #[error("catalog artefact I/O failed for {path}: {source}")]
    Io {
        /// Artefact location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The payload could not be encoded or decoded.
    #[error("catalog artefact payload is invalid for {path}: {source}")]
    Decode {
        /// Artefact location.
        path: PathBuf,
        /// Codec error returned by `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// The file does not start with the catalog magic bytes.
    #[error("invalid catalog magic: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Expected identifier.
        expected: [u8; 4],
        /// Bytes read from the file.
        found: [u8; 4],
    },
    /// The header names a format this build cannot read.
    #[error("unsupported catalog version {found}; supported version is {supported}")]
    UnsupportedVersion {
        /// Version present in the file header.
        found: u16,
        /// Version written by this build.
        supported: u16,
    },
}

impl ArtefactError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn codec(path: &Path) -> impl FnOnce(bincode::Error) -> Self + '_ {
        move |source| Self::Decode {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Persist `catalog` to `path`, truncating any existing file.
pub fn write_catalog(path: &Path, catalog: &BuildingCatalog) -> Result<(), ArtefactError> {
    let file = File::create(path).map_err(ArtefactError::io(path))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&CATALOG_MAGIC)
        .map_err(ArtefactError::io(path))?;
    writer
        .write_all(&CATALOG_VERSION.to_le_bytes())
        .map_err(ArtefactError::io(path))?;
    serialize_into(&mut writer, catalog.records()).map_err(ArtefactError::codec(path))?;
    let file = writer
        .into_inner()
        .map_err(|err| ArtefactError::io(path)(err.into_error()))?;
    file.sync_all().map_err(ArtefactError::io(path))?;
    info!("wrote {} buildings to {}", catalog.len(), path.display());
    Ok(())
}

/// Load a catalog previously written by [`write_catalog`].
pub fn load_catalog(path: &Path) -> Result<BuildingCatalog, ArtefactError> {
    let file = File::open(path).map_err(ArtefactError::io(path))?;
    let mut reader = BufReader::new(file);

    let mut magic = [0_u8; 4];
    reader
        .read_exact(&mut magic)
        .map_err(ArtefactError::io(path))?;
    if magic != CATALOG_MAGIC {
        return Err(ArtefactError::InvalidMagic {
            expected: CATALOG_MAGIC,
            found: magic,
        });
    }

    let mut version = [0_u8; 2];
    reader
        .read_exact(&mut version)
        .map_err(ArtefactError::io(path))?;
    let version = u16::from_le_bytes(version);
    if version != CATALOG_VERSION {
        return Err(ArtefactError::UnsupportedVersion {
            found: version,
            supported: CATALOG_VERSION,
        });
    }

    let records: Vec<BuildingRecord> =
        deserialize_from(&mut reader).map_err(ArtefactError::codec(path))?;
    info!("loaded {} buildings from {}", records.len(), path.display());
    Ok(BuildingCatalog::new(records))
}
