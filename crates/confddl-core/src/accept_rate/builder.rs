//! Packaging step: convert per-venue YAML files into JSON plus an index.
//!
//! Source layout is `SRC/SUB/DBLP.yml`. Output is `OUT/SUB/DBLP.json` for
//! each venue and `OUT/index.json` keyed by `"SUB/DBLP"`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use super::index::INDEX_FILE;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub converted: usize,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yml") || e.eq_ignore_ascii_case("yaml"))
        .unwrap_or(false)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

/// Convert every venue file under `src_dir` and write the index into `out_dir`.
///
/// A file that fails to convert is recorded in the report and skipped.
pub fn build_index(src_dir: &Path, out_dir: &Path) -> Result<BuildReport> {
    if !src_dir.is_dir() {
        anyhow::bail!("No acceptance-rate source directory: {}", src_dir.display());
    }
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut files = Vec::new();
    collect_files(src_dir, &mut files)?;
    files.sort();

    let mut report = BuildReport::default();
    let mut index: BTreeMap<String, Value> = BTreeMap::new();

    for path in files.into_iter().filter(|p| is_yaml(p)) {
        let rel = path.strip_prefix(src_dir).unwrap_or(&path);
        let parts: Vec<&str> = rel.iter().filter_map(|p| p.to_str()).collect();
        let [sub, file_name] = parts.as_slice() else {
            warn!(path = %rel.display(), "Unexpected file under accept_rates (expected SUB/FILE.yml)");
            report.skipped.push(path.clone());
            continue;
        };
        let dblp = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(*file_name)
            .to_string();

        match convert_file(&path, &out_dir.join(sub), &dblp) {
            Ok(value) => {
                index.insert(format!("{}/{}", sub, dblp), value);
                report.converted += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to convert acceptance-rate file");
                report.failed.push(path.clone());
            }
        }
    }

    let index_path = out_dir.join(INDEX_FILE);
    std::fs::write(&index_path, serde_json::to_string_pretty(&index)?)
        .with_context(|| format!("Failed to write {}", index_path.display()))?;
    debug!(path = %index_path.display(), count = index.len(), "Wrote acceptance-rate index");

    Ok(report)
}

fn convert_file(path: &Path, out_dir: &Path, dblp: &str) -> Result<Value> {
    let raw = std::fs::read_to_string(path)?;
    let value: Value = serde_yaml::from_str(&raw)?;
    std::fs::create_dir_all(out_dir)?;
    let out_path = out_dir.join(format!("{}.json", dblp));
    std::fs::write(&out_path, serde_json::to_string_pretty(&value)?)?;
    debug!(path = %out_path.display(), "Wrote venue file");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accept_rate::AcceptRateIndex;

    #[test]
    fn test_build_index_converts_and_indexes() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        std::fs::create_dir_all(src.path().join("AI")).unwrap();
        std::fs::write(
            src.path().join("AI/icml.yml"),
            "- title: ICML\n  accept_rates:\n    - year: 2024\n      str: 27.5%(2610/9473 24')\n      rate: 0.275\n",
        )
        .unwrap();
        std::fs::write(src.path().join("AI/notes.txt"), "ignored").unwrap();
        std::fs::write(src.path().join("AI/bad.yaml"), "key: [unclosed").unwrap();
        std::fs::write(src.path().join("stray.yml"), "rate: 0.5").unwrap();

        let report = build_index(src.path(), out.path()).unwrap();
        assert_eq!(report.converted, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.skipped.len(), 1);

        assert!(out.path().join("AI/icml.json").exists());
        let index = AcceptRateIndex::load_from(&out.path().join(INDEX_FILE)).unwrap();
        let payload = index.lookup("AI", "icml").unwrap();
        assert_eq!(payload.index_display_rate().as_deref(), Some("27.5%(2610/9473 24')"));
    }

    #[test]
    fn test_missing_source_dir_is_an_error() {
        let out = tempfile::tempdir().unwrap();
        assert!(build_index(&out.path().join("missing"), out.path()).is_err());
    }
}
