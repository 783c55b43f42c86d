//! The disk and memory stores agree on the same tree.

use adhoc_httpd_core::{FileHandle, FileSystem, ReadLimit, StorePath};
use adhoc_httpd_files::{LocalFs, MemFs, MemFsBuilder};
use std::fs;
use std::io::Read;
use tempfile::TempDir;

const TREE: &[(&str, &str)] = &[
    ("/README.md", "# readme"),
    ("/src/main.rs", "fn main() {}"),
    ("/src/lib.rs", "pub fn f() {}"),
    ("/src/bin/tool.rs", "fn main() {}"),
    ("/assets/logo.svg", "<svg/>"),
];

fn mem_tree() -> MemFs {
    MemFsBuilder::new().add_files(TREE.iter().copied()).build().unwrap()
}

fn local_tree() -> (TempDir, LocalFs) {
    let temp = TempDir::new().unwrap();
    for (path, content) in TREE {
        let full = temp.path().join(path.trim_start_matches('/'));
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }
    let local = LocalFs::new(temp.path()).unwrap();
    (temp, local)
}

/// Drains a directory in small reads and returns `name` or `name/` entries, sorted.
fn listing<S: FileSystem>(fs: &S, path: &str) -> Vec<String> {
    let mut handle = fs.open(&StorePath::new(path).unwrap()).unwrap();
    let mut names = Vec::new();
    loop {
        let batch = handle.read_entries(ReadLimit::at_most(2));
        for entry in &batch.entries {
            let suffix = if entry.is_dir() { "/" } else { "" };
            names.push(format!("{}{suffix}", entry.name()));
        }
        if let Some(terminal) = batch.terminal {
            assert!(terminal.is_end_of_stream());
            break;
        }
    }
    names.sort();
    names
}

fn contents<S: FileSystem>(fs: &S, path: &str) -> String {
    let mut handle = fs.open(&StorePath::new(path).unwrap()).unwrap();
    let mut out = String::new();
    handle.read_to_string(&mut out).unwrap();
    out
}

#[test]
fn test_listings_agree() {
    let mem = mem_tree();
    let (_temp, local) = local_tree();

    for dir in ["/", "/src", "/src/bin", "/assets"] {
        assert_eq!(listing(&mem, dir), listing(&local, dir), "listing of {dir}");
    }
    assert_eq!(listing(&mem, "/"), vec!["README.md", "assets/", "src/"]);
}

#[test]
fn test_contents_and_stat_agree() {
    let mem = mem_tree();
    let (_temp, local) = local_tree();

    for (path, content) in TREE {
        assert_eq!(contents(&mem, path), *content);
        assert_eq!(contents(&local, path), *content);

        let path = StorePath::new(path).unwrap();
        let mem_stat = mem.open(&path).unwrap().stat().unwrap();
        let local_stat = local.open(&path).unwrap().stat().unwrap();
        assert_eq!(mem_stat.name(), local_stat.name());
        assert_eq!(mem_stat.size(), local_stat.size());
        assert!(!mem_stat.is_dir() && !local_stat.is_dir());
    }
}

#[test]
fn test_errors_agree() {
    let mem = mem_tree();
    let (_temp, local) = local_tree();
    let missing = StorePath::new("/src/missing.rs").unwrap();

    assert!(mem.open(&missing).unwrap_err().is_not_found());
    assert!(local.open(&missing).unwrap_err().is_not_found());

    let file = StorePath::new("/README.md").unwrap();
    let mem_batch = mem.open(&file).unwrap().read_entries(ReadLimit::All);
    let local_batch = local.open(&file).unwrap().read_entries(ReadLimit::All);
    assert!(mem_batch.terminal.unwrap().error().unwrap().is_not_directory());
    assert!(local_batch.terminal.unwrap().error().unwrap().is_not_directory());
}
