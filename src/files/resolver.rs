use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::http::mime::{guess_media_type, LISTING_MEDIA_TYPE};
use crate::http::request::strip_query;

/// What a request target resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Names of the directory's immediate children, in the order the
    /// operating system listed them.
    Directory { entries: Vec<String> },
    /// Full contents of a regular file and its guessed media type.
    File { bytes: Vec<u8>, media_type: String },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Resource {
    /// Body and media type to send for this resource.
    pub fn into_body(self) -> (Vec<u8>, String) {
        match self {
            Resource::Directory { entries } => {
                (entries.join("\n").into_bytes(), LISTING_MEDIA_TYPE.to_string())
            }
            Resource::File { bytes, media_type } => (bytes, media_type),
        }
    }
}

/// Resolves request targets against a fixed root directory.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
}

impl Resolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps `target` onto a path below the root.
    ///
    /// Query strings and fragments are dropped, `.` segments are skipped and
    /// `..` never climbs above the root.
    pub fn local_path(&self, target: &str) -> PathBuf {
        let mut segments: Vec<&str> = Vec::new();

        for segment in strip_query(target).split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }

        let mut path = self.root.clone();
        path.extend(segments);
        path
    }

    /// Resolves `target` to a directory listing or file contents.
    pub async fn resolve(&self, target: &str) -> Result<Resource, ResolveError> {
        let path = self.local_path(target);

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ResolveError::NotFound(path));
            }
            Err(source) => return Err(ResolveError::Io { path, source }),
        };

        if metadata.is_dir() {
            let entries = list_dir(&path)
                .await
                .map_err(|source| ResolveError::Io {
                    path: path.clone(),
                    source,
                })?;

            tracing::debug!(path = %path.display(), entries = entries.len(), "Listing directory");
            Ok(Resource::Directory { entries })
        } else if metadata.is_file() {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| ResolveError::Io {
                    path: path.clone(),
                    source,
                })?;
            let media_type = guess_media_type(&path).to_string();

            tracing::debug!(path = %path.display(), media_type = %media_type, "Reading file");
            Ok(Resource::File { bytes, media_type })
        } else {
            Err(ResolveError::NotFound(path))
        }
    }
}

async fn list_dir(path: &Path) -> io::Result<Vec<String>> {
    let mut dir = tokio::fs::read_dir(path).await?;
    let mut entries = Vec::new();

    while let Some(entry) = dir.next_entry().await? {
        entries.push(entry.file_name().to_string_lossy().into_owned());
    }

    Ok(entries)
}
