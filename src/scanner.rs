//! Discovery of component files under a directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;

/// Directories that never contain source components.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".svelte-kit"];

/// Collect the component files to analyze.
///
/// `root` may be a directory or a single file. Returned paths are absolute
/// and sorted.
pub fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let root = root.canonicalize()?;
    let excluded = config.excluded_set()?;

    if root.is_file() {
        return Ok(vec![root]);
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(&root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            // Skip hidden directories
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&&*name)
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if config.has_target_extension(path) && !excluded.is_match(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "<p/>").unwrap();
    }

    #[test]
    fn test_collect_skips_dependency_and_build_dirs() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/App.svelte");
        touch(temp.path(), "src/lib/Button.svelte");
        touch(temp.path(), "src/lib/util.ts");
        touch(temp.path(), "node_modules/pkg/Dep.svelte");
        touch(temp.path(), ".svelte-kit/generated/Root.svelte");
        touch(temp.path(), ".hidden/Secret.svelte");

        let files = collect_files(temp.path(), &Config::default()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["App.svelte", "Button.svelte"]);
        assert!(files.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_collect_applies_excluded_paths() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/App.svelte");
        touch(temp.path(), "src/legacy/Old.svelte");

        let config = Config {
            excluded_paths: vec!["**/legacy/**".to_string()],
            ..Default::default()
        };
        let files = collect_files(temp.path(), &config).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/App.svelte"));
    }

    #[test]
    fn test_collect_single_file() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "Only.svelte");
        let files = collect_files(&temp.path().join("Only.svelte"), &Config::default()).unwrap();
        assert_eq!(files.len(), 1);
    }
}
