// Scripted stand-in for the host, used by the probe tests.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::infiniband::system::SystemAccess;

#[derive(Default)]
pub struct FakeSystem {
    files: HashMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    tools: HashSet<String>,
    outputs: HashMap<String, String>,
    reversed_listing: bool,
    pub reads: RefCell<Vec<PathBuf>>,
    pub runs: RefCell<Vec<String>>,
}

fn command_key(program: &str, args: &[&str]) -> String {
    let mut key = program.to_string();
    for arg in args {
        key.push(' ');
        key.push_str(arg);
    }
    key
}

impl FakeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: &str) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self = self.with_dir(parent.to_path_buf());
        }
        self.files.insert(path, contents.to_string());
        self
    }

    /// Installed tool with no scripted output; every run fails.
    pub fn with_tool(mut self, program: &str) -> Self {
        self.tools.insert(program.to_string());
        self
    }

    pub fn with_output(mut self, program: &str, args: &[&str], stdout: &str) -> Self {
        self.tools.insert(program.to_string());
        self.outputs
            .insert(command_key(program, args), stdout.to_string());
        self
    }

    /// Directory listings come back in descending order, like a filesystem
    /// that does not sort its entries.
    pub fn with_reversed_listing(mut self) -> Self {
        self.reversed_listing = true;
        self
    }

    pub fn ran(&self, program: &str) -> bool {
        self.runs
            .borrow()
            .iter()
            .any(|cmd| cmd.split(' ').next() == Some(program))
    }
}

impl SystemAccess for FakeSystem {
    fn has_tool(&self, program: &str) -> bool {
        self.tools.contains(program)
    }

    fn run(&self, program: &str, args: &[&str]) -> Option<String> {
        let key = command_key(program, args);
        self.runs.borrow_mut().push(key.clone());
        if !self.tools.contains(program) {
            return None;
        }
        self.outputs.get(&key).cloned()
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        self.reads.borrow_mut().push(path.to_path_buf());
        self.files.get(path).cloned()
    }

    fn list_dir(&self, path: &Path) -> Vec<String> {
        let children: BTreeSet<String> = self
            .dirs
            .iter()
            .chain(self.files.keys())
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        let mut names: Vec<String> = children.into_iter().collect();
        if self.reversed_listing {
            names.reverse();
        }
        names
    }

    fn exists(&self, path: &Path) -> bool {
        self.dirs.contains(path) || self.files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }
}
