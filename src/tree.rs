use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, TreeError>;

/// One filesystem entry discovered when the server starts.
///
/// Nodes are built in a single pass and never mutated afterwards, so a tree can be shared
/// between request handlers without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    name: String,
    is_directory: bool,
    children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn directory(name: &str, children: Vec<TreeNode>) -> Self {
        TreeNode {
            name: name.to_string(),
            is_directory: true,
            children,
        }
    }

    pub fn file(name: &str) -> Self {
        TreeNode {
            name: name.to_string(),
            is_directory: false,
            children: vec![],
        }
    }

    /// Builds the tree for `root` and everything beneath it.
    ///
    /// Entries are sorted by name. Entry kinds are taken from the directory listing, so a
    /// symlink is never followed here and always ends up as a leaf.
    pub fn build(root: &Path) -> Result<Self> {
        let name = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.to_string_lossy().into_owned());

        Self::build_directory(root, name)
    }

    fn build_directory(path: &Path, name: String) -> Result<Self> {
        let mut entries = fs::read_dir(path)
            .and_then(|entries| entries.collect::<io::Result<Vec<_>>>())
            .map_err(|err| TreeError::new(path, err))?;

        entries.sort_by_key(|entry| entry.file_name());

        let mut children: Vec<TreeNode> = Vec::with_capacity(entries.len());

        for entry in entries {
            let file_type = entry
                .file_type()
                .map_err(|err| TreeError::new(&entry.path(), err))?;
            let entry_name = entry.file_name().to_string_lossy().into_owned();

            if file_type.is_dir() {
                children.push(Self::build_directory(&entry.path(), entry_name)?);
            } else {
                children.push(TreeNode::file(&entry_name));
            }
        }

        Ok(TreeNode {
            name,
            is_directory: true,
            children,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Exact, case-sensitive lookup among the immediate children.
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    fn write_outline(&self, f: &mut Formatter<'_>, depth: usize) -> std::fmt::Result {
        writeln!(f, "{}{}", "\t".repeat(depth), self.name)?;

        for child in &self.children {
            child.write_outline(f, depth + 1)?;
        }

        Ok(())
    }
}

impl Display for TreeNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.write_outline(f, 0)
    }
}

#[derive(Debug)]
pub struct TreeError {
    path: PathBuf,
    source: io::Error,
}

impl TreeError {
    fn new(path: &Path, source: io::Error) -> Self {
        TreeError {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "could not list directory \"{}\": {}",
            self.path.display(),
            self.source
        )
    }
}

impl Error for TreeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod test {
    mod build {
        use crate::tree::TreeNode;
        use std::fs;

        #[test]
        fn builds_nested_tree_sorted_by_name() {
            let root = tempfile::tempdir().unwrap();
            fs::write(root.path().join("b.txt"), "b").unwrap();
            fs::write(root.path().join("a.txt"), "a").unwrap();
            fs::create_dir_all(root.path().join("docs/img")).unwrap();
            fs::write(root.path().join("docs/guide.html"), "guide").unwrap();
            fs::write(root.path().join("docs/img/logo.png"), [0u8, 1, 2]).unwrap();

            let tree = TreeNode::build(root.path()).unwrap();

            let expected = TreeNode::directory(
                root.path().file_name().unwrap().to_str().unwrap(),
                vec![
                    TreeNode::file("a.txt"),
                    TreeNode::file("b.txt"),
                    TreeNode::directory(
                        "docs",
                        vec![
                            TreeNode::file("guide.html"),
                            TreeNode::directory("img", vec![TreeNode::file("logo.png")]),
                        ],
                    ),
                ],
            );

            assert_eq!(tree, expected);
            assert_eq!(tree.node_count(), 7);
        }

        #[test]
        fn empty_directory_has_no_children() {
            let root = tempfile::tempdir().unwrap();
            fs::create_dir(root.path().join("empty")).unwrap();

            let tree = TreeNode::build(root.path()).unwrap();
            let empty = tree.child("empty").unwrap();

            assert!(empty.is_directory());
            assert!(empty.children().is_empty());
        }

        #[test]
        fn missing_root_is_an_error() {
            let root = tempfile::tempdir().unwrap();
            let missing = root.path().join("missing");

            let err = TreeNode::build(&missing).unwrap_err();

            assert_eq!(err.path(), missing.as_path());
        }

        #[test]
        fn file_root_is_an_error() {
            let root = tempfile::tempdir().unwrap();
            let file = root.path().join("file.txt");
            fs::write(&file, "not a directory").unwrap();

            assert!(TreeNode::build(&file).is_err());
        }
    }

    mod lookup {
        use crate::tree::TreeNode;

        #[test]
        fn child_lookup_is_exact_and_case_sensitive() {
            let tree = TreeNode::directory("root", vec![TreeNode::file("Index.html")]);

            assert!(tree.child("Index.html").is_some());
            assert!(tree.child("index.html").is_none());
            assert!(tree.child("Index").is_none());
            assert!(tree.child("..").is_none());
        }

        #[test]
        fn outline_indents_one_tab_per_level() {
            let tree = TreeNode::directory(
                "root",
                vec![TreeNode::directory("img", vec![TreeNode::file("logo.png")])],
            );

            assert_eq!(tree.to_string(), "root\n\timg\n\t\tlogo.png\n");
        }
    }
}
