//! Coverage file discovery and sample IDs
//!
//! A pattern argument holds one or more glob patterns separated by
//! newlines. Matches are concatenated in pattern order, and each file gets
//! a sample ID extracted from its file name.

use crate::core::error::{CohortError, CohortResult};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Default sample ID pattern (`XX-<run>-<n>`)
pub const DEFAULT_SAMPLE_PATTERN: &str = r"[a-zA-Z]{2}-.*-\d+";

/// A coverage file and the sample it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFile {
    pub sample_id: String,
    pub path: PathBuf,
}

/// Extracts sample IDs from coverage file names
#[derive(Debug, Clone)]
pub struct SampleIdExtractor {
    regex: Regex,
}

impl SampleIdExtractor {
    pub fn new(pattern: &str) -> CohortResult<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Sample ID of a file: the first regex match in its file name, or the
    /// file stem when nothing matches
    pub fn extract(&self, path: &Path) -> String {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(m) = self.regex.find(&file_name) {
            return m.as_str().to_string();
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        log::warn!(
            "No sample ID in '{}', using file stem '{}'",
            path.display(),
            stem
        );
        stem
    }
}

/// Expand newline-separated glob patterns into file paths
pub fn expand_patterns(patterns: &str) -> CohortResult<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns.trim().lines().map(str::trim) {
        if pattern.is_empty() {
            continue;
        }
        let entries = glob::glob(pattern).map_err(|e| CohortError::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        for entry in entries {
            paths.push(entry?);
        }
    }

    Ok(paths)
}

/// Discover coverage files and assign sample IDs
///
/// A later file with an already-seen sample ID replaces the earlier one,
/// keeping the earlier position.
pub fn discover_samples(
    patterns: &str,
    extractor: &SampleIdExtractor,
) -> CohortResult<Vec<SampleFile>> {
    let paths = expand_patterns(patterns)?;
    if paths.is_empty() {
        return Err(CohortError::NoFiles(patterns.trim().to_string()));
    }

    let mut samples: Vec<SampleFile> = Vec::with_capacity(paths.len());
    for path in paths {
        let sample_id = extractor.extract(&path);
        match samples.iter_mut().find(|s| s.sample_id == sample_id) {
            Some(existing) => {
                log::warn!(
                    "Sample {} seen twice, using {}",
                    sample_id,
                    path.display()
                );
                existing.path = path;
            }
            None => samples.push(SampleFile { sample_id, path }),
        }
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn extractor() -> SampleIdExtractor {
        SampleIdExtractor::new(DEFAULT_SAMPLE_PATTERN).unwrap()
    }

    #[test]
    fn test_extract_sample_id() {
        let id = extractor().extract(Path::new("/data/run7/IonXpress_001_ab-run7-12.amplicon.cov.xls"));
        assert_eq!(id, "ab-run7-12");
    }

    #[test]
    fn test_extract_falls_back_to_stem() {
        let id = extractor().extract(Path::new("/data/sample.cov"));
        assert_eq!(id, "sample");
    }

    #[test]
    fn test_invalid_regex() {
        assert!(matches!(
            SampleIdExtractor::new("(unclosed"),
            Err(CohortError::SampleRegex(_))
        ));
    }

    #[test]
    fn test_discover_multiple_patterns() {
        let dir = tempdir().unwrap();
        for name in ["ab-x-1.cov", "ab-x-2.cov", "cd-y-3.txt"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let patterns = format!(
            "{}\n{}\n",
            dir.path().join("*.txt").display(),
            dir.path().join("*.cov").display()
        );

        let samples = discover_samples(&patterns, &extractor()).unwrap();
        let ids: Vec<&str> = samples.iter().map(|s| s.sample_id.as_str()).collect();
        assert_eq!(ids, vec!["cd-y-3", "ab-x-1", "ab-x-2"]);
    }

    #[test]
    fn test_duplicate_sample_replaced_in_place() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("ab-x-1.a.cov")).unwrap();
        File::create(dir.path().join("ab-x-2.cov")).unwrap();
        File::create(dir.path().join("ab-x-1.b.cov")).unwrap();
        let patterns = format!(
            "{}\n{}\n{}",
            dir.path().join("ab-x-1.a.cov").display(),
            dir.path().join("ab-x-2.cov").display(),
            dir.path().join("ab-x-1.b.cov").display()
        );

        let samples = discover_samples(&patterns, &extractor()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].sample_id, "ab-x-1");
        assert!(samples[0].path.ends_with("ab-x-1.b.cov"));
        assert_eq!(samples[1].sample_id, "ab-x-2");
    }

    #[test]
    fn test_no_files() {
        let dir = tempdir().unwrap();
        let pattern = dir.path().join("*.none").display().to_string();
        assert!(matches!(
            discover_samples(&pattern, &extractor()),
            Err(CohortError::NoFiles(_))
        ));
    }

    #[test]
    fn test_bad_pattern() {
        assert!(matches!(
            expand_patterns("cov/[*.xls"),
            Err(CohortError::Pattern { .. })
        ));
    }
}
