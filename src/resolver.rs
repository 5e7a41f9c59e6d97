use crate::error::ServeError;
use crate::tree::TreeNode;
use log::debug;
use percent_encoding::percent_decode_str;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of walking a request path through the tree.
#[derive(Debug, PartialEq)]
pub struct Walk {
    pub path: PathBuf,
    /// Segments that matched a node.
    pub matched: usize,
    /// Segments the request carried.
    pub requested: usize,
    /// False when the walk stopped on a segment that matched nothing.
    pub complete: bool,
}

/// Maps request paths onto files under the served root.
///
/// Every step of a walk is an exact match against names collected when the tree was built, so
/// request text is never joined onto a filesystem path and `..` cannot leave the root.
#[derive(Debug, Clone)]
pub struct Resolver {
    tree: Arc<TreeNode>,
    root: PathBuf,
    default_file: String,
}

impl Resolver {
    pub fn new(tree: Arc<TreeNode>, root: &Path, default_file: &str) -> Self {
        Resolver {
            tree,
            root: root.to_path_buf(),
            default_file: default_file.to_string(),
        }
    }

    pub fn tree(&self) -> &TreeNode {
        &self.tree
    }

    /// Walks the tree without touching the filesystem.
    ///
    /// Descends through matching directories, stops right after a matching file (any remaining
    /// segments are ignored) and stops without advancing on the first segment that matches
    /// nothing.
    pub fn walk(&self, url: &str) -> Walk {
        let segments = split_segments(url);

        let mut node = self.tree.as_ref();
        let mut walk = Walk {
            path: self.root.clone(),
            matched: 0,
            requested: segments.len(),
            complete: true,
        };

        for segment in &segments {
            let Some(child) = node.child(segment) else {
                walk.complete = false;
                break;
            };

            walk.path.push(child.name());
            walk.matched += 1;

            if !child.is_directory() {
                break;
            }

            node = child;
        }

        walk
    }

    /// Resolves `url` to the regular file that should be streamed for it.
    ///
    /// A directory is substituted with its default file; the directory itself is never listed.
    pub fn resolve(&self, url: &str) -> Result<PathBuf, ServeError> {
        let walk = self.walk(url);

        if walk.requested > 0 && walk.matched == 0 {
            debug!("{url}: first segment matched nothing");
            return Err(ServeError::InvalidPath);
        }

        let metadata = fs::metadata(&walk.path).map_err(ServeError::FilePath)?;

        if !metadata.is_dir() {
            debug!("{url} resolved to {}", walk.path.display());
            return Ok(walk.path);
        }

        let default_path = walk.path.join(&self.default_file);

        match fs::metadata(&default_path) {
            Ok(metadata) if metadata.is_file() => {
                debug!("{url} resolved to {}", default_path.display());
                Ok(default_path)
            }
            _ if walk.complete => Err(ServeError::DefaultFileMissing),
            _ => Err(ServeError::InvalidPath),
        }
    }
}

/// Splits a request target into decoded path segments.
///
/// The query string and fragment are dropped and the leading `/` does not produce a segment, so
/// `/` yields no segments at all. Empty segments in the middle or at the end are kept; they never
/// match a node.
pub fn split_segments(url: &str) -> Vec<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let path = path.strip_prefix('/').unwrap_or(path);

    if path.is_empty() {
        return vec![];
    }

    path.split('/')
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        .collect()
}
