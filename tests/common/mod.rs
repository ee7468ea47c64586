#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gemserve::config::Config;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Scratch content root, removed on drop.
pub struct ContentDir {
    pub root: PathBuf,
}

impl ContentDir {
    pub fn new() -> Self {
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let root = std::env::temp_dir().join(format!(
            "gemserve-test-{}-{}",
            std::process::id(),
            id
        ));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    pub fn file(self, rel: &str, contents: impl AsRef<[u8]>) -> Self {
        let path = self.root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
        self
    }

    pub fn dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.root.join(rel)).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Config serving this directory as `localhost`, with extra YAML lines.
    pub fn settings(&self, extra: &str) -> Config {
        let yaml = format!(
            "content: {:?}\nhost: localhost\n{}",
            self.root.display().to_string(),
            extra
        );
        Config::from_yaml(&yaml).unwrap()
    }

    pub fn config(&self, extra: &str) -> Arc<Config> {
        Arc::new(self.settings(extra))
    }
}

impl Drop for ContentDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
