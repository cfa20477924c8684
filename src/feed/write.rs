// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::WriteError;

/// Name of the generated feed inside the output directory
pub const FEED_FILENAME: &str = "podcast.xml";

const PARTIAL_SUFFIX: &str = ".partial";

/// A feed file that has been put in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFeed {
    pub path: PathBuf,
    pub bytes: u64,
    /// `sha256:<hex>` of the file contents
    pub content_hash: String,
}

/// Hash of a feed document, formatted as `sha256:<hex>`
pub fn content_hash(document: &[u8]) -> String {
    format!("sha256:{:x}", Sha256::digest(document))
}

/// Write the feed document to `<output_dir>/podcast.xml`.
///
/// The directory is created if needed. Each run stages the document in its
/// own `.partial` file and renames it over the previous feed once complete,
/// so overlapping runs both succeed and the last rename wins.
pub async fn write_feed(output_dir: &Path, document: &[u8]) -> Result<WrittenFeed, WriteError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| WriteError::CreateDirectoryFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    let path = output_dir.join(FEED_FILENAME);

    let staging_dir = output_dir.to_path_buf();
    let target = path.clone();
    let staged_document = document.to_vec();
    tokio::task::spawn_blocking(move || replace_feed(&staging_dir, &target, &staged_document))
        .await
        .map_err(|e| WriteError::WriteFailed {
            path: path.clone(),
            source: std::io::Error::other(e),
        })??;

    Ok(WrittenFeed {
        path,
        bytes: document.len() as u64,
        content_hash: content_hash(document),
    })
}

fn staging_file() -> tempfile::Builder<'static, 'static> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("podcast.xml.").suffix(PARTIAL_SUFFIX);

    // The feed is served statically, so it must stay world-readable
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }

    builder
}

fn replace_feed(output_dir: &Path, path: &Path, document: &[u8]) -> Result<(), WriteError> {
    let mut staged = staging_file()
        .tempfile_in(output_dir)
        .map_err(|e| WriteError::WriteFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    staged
        .write_all(document)
        .and_then(|()| staged.flush())
        .map_err(|e| WriteError::WriteFailed {
            path: staged.path().to_path_buf(),
            source: e,
        })?;

    // A failed persist drops the staged file, which removes it
    staged.persist(path).map_err(|e| WriteError::RenameFailed {
        from: e.file.path().to_path_buf(),
        to: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}
