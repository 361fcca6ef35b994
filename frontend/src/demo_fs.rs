//! In-memory directory tree that answers listings after a delay, standing in
//! for a backend the tree would normally query.

use std::cell::RefCell;
use std::collections::HashMap;
use zoon::Timer;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FsNode {
    pub path: String,
    pub name: String,
    pub is_dir: bool,
}

impl FsNode {
    fn new(parent: &str, entry: &str) -> Self {
        let is_dir = entry.ends_with('/');
        Self {
            path: format!("{parent}{entry}"),
            name: entry.trim_end_matches('/').to_string(),
            is_dir,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

pub const ROOT_PATH: &str = "/";

// Directories end with '/'.
const LAYOUT: &[(&str, &[&str])] = &[
    ("/", &["docs/", "src/", "tests/", ".git/", "Cargo.toml", "README.md"]),
    ("/docs/", &["architecture.md", "images/"]),
    ("/docs/images/", &["relay_chain.svg", "states.svg"]),
    ("/src/", &["bus/", "entry/", "lib.rs", "root.rs"]),
    ("/src/bus/", &["relay.rs", "topic.rs"]),
    ("/src/entry/", &["population.rs", "toggle.rs"]),
    ("/tests/", &["scenario.rs"]),
    ("/.git/", &["HEAD"]),
];

pub struct DemoFs {
    latency_ms: u32,
    refreshes: RefCell<HashMap<String, u32>>,
}

impl DemoFs {
    pub fn new(latency_ms: u32) -> Self {
        Self {
            latency_ms,
            refreshes: RefCell::new(HashMap::new()),
        }
    }

    /// List `path` after the simulated latency.
    pub async fn read_dir(&self, path: &str) -> anyhow::Result<Vec<FsNode>> {
        Timer::sleep(self.latency_ms).await;
        self.list(path)
    }

    /// Pretend a file was created in `path`, then list it again.
    pub async fn refresh(&self, path: &str) -> anyhow::Result<Vec<FsNode>> {
        *self
            .refreshes
            .borrow_mut()
            .entry(path.to_string())
            .or_default() += 1;
        self.read_dir(path).await
    }

    pub fn list(&self, path: &str) -> anyhow::Result<Vec<FsNode>> {
        let Some((_, entries)) = LAYOUT.iter().find(|(dir, _)| *dir == path) else {
            anyhow::bail!("no such directory: {path}");
        };
        let mut nodes: Vec<_> = entries.iter().map(|entry| FsNode::new(path, entry)).collect();

        let created = self.refreshes.borrow().get(path).copied().unwrap_or(0);
        nodes.extend((1..=created).map(|n| FsNode::new(path, &format!("new_file_{n}.txt"))));
        Ok(nodes)
    }
}
