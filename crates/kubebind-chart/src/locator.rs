use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use kubebind_types::{BindError, Picker, Result};

/// File that marks a chart directory
pub const CHART_FILE: &str = "Chart.yaml";

/// Maximum number of chart candidates collected from a workspace
pub const DEFAULT_SEARCH_LIMIT: usize = 1024;

/// Finds the chart directory a command applies to
#[derive(Clone, Debug)]
pub struct ChartLocator {
    root: PathBuf,
    limit: usize,
}

impl ChartLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All chart directories under the workspace root, sorted by path
    pub fn find_charts(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(BindError::NotFound(
                "This command requires an open folder.".to_string(),
            ));
        }

        let charts: Vec<PathBuf> = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && e.file_name() == CHART_FILE)
            .filter_map(|e| e.path().parent().map(Path::to_path_buf))
            .take(self.limit)
            .collect();

        debug!(root = %self.root.display(), count = charts.len(), "chart search");
        Ok(charts)
    }

    /// Resolve the single chart to work on.
    ///
    /// With several candidates the picker chooses among workspace-relative
    /// paths; without a picker that is an `Ambiguous` error.
    pub async fn pick_chart(&self, picker: Option<&mut dyn Picker>) -> Result<PathBuf> {
        let mut charts = self.find_charts()?;

        match charts.len() {
            0 => Err(BindError::NotFound("No charts found".to_string())),
            // Only one chart: that's the one to use
            1 => Ok(charts.remove(0)),
            _ => {
                let labels: Vec<String> = charts.iter().map(|c| self.relative_label(c)).collect();
                let Some(picker) = picker else {
                    return Err(BindError::Ambiguous(labels));
                };

                let selected = picker
                    .pick("Select a chart", &labels)
                    .await?
                    .ok_or(BindError::Cancelled)?;

                labels
                    .iter()
                    .position(|l| *l == selected)
                    .map(|i| charts.swap_remove(i))
                    .ok_or_else(|| BindError::NotFound(format!("No chart at {}", selected)))
            }
        }
    }

    /// Path of a chart directory relative to the root, `.` for the root itself
    fn relative_label(&self, chart: &Path) -> String {
        match chart.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.display().to_string(),
            Err(_) => chart.display().to_string(),
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::fs;

    struct FirstOrNone {
        cancel: bool,
        seen: Vec<String>,
    }

    #[async_trait]
    impl Picker for FirstOrNone {
        async fn pick(&mut self, _placeholder: &str, items: &[String]) -> Result<Option<String>> {
            self.seen = items.to_vec();
            if self.cancel {
                Ok(None)
            } else {
                Ok(items.last().cloned())
            }
        }
    }

    fn chart(root: &Path, rel: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CHART_FILE), "name: test\n").unwrap();
    }

    #[tokio::test]
    async fn test_no_charts() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ChartLocator::new(tmp.path()).pick_chart(None).await.unwrap_err();
        assert_eq!(err.to_string(), "No charts found");
    }

    #[tokio::test]
    async fn test_missing_workspace() {
        let tmp = tempfile::tempdir().unwrap();
        let locator = ChartLocator::new(tmp.path().join("nope"));
        assert!(matches!(locator.pick_chart(None).await, Err(BindError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_single_chart() {
        let tmp = tempfile::tempdir().unwrap();
        chart(tmp.path(), "charts/web");
        let dir = ChartLocator::new(tmp.path()).pick_chart(None).await.unwrap();
        assert_eq!(dir, tmp.path().join("charts/web"));
    }

    #[tokio::test]
    async fn test_hidden_directories_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        chart(tmp.path(), "charts/web");
        chart(tmp.path(), ".git/charts/old");
        let charts = ChartLocator::new(tmp.path()).find_charts().unwrap();
        assert_eq!(charts.len(), 1);
    }

    #[tokio::test]
    async fn test_ambiguous_without_picker() {
        let tmp = tempfile::tempdir().unwrap();
        chart(tmp.path(), "");
        chart(tmp.path(), "charts/api");
        let err = ChartLocator::new(tmp.path()).pick_chart(None).await.unwrap_err();
        match err {
            BindError::Ambiguous(labels) => assert_eq!(labels, vec![".", "charts/api"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ambiguous_resolved_by_picker() {
        let tmp = tempfile::tempdir().unwrap();
        chart(tmp.path(), "charts/api");
        chart(tmp.path(), "charts/web");
        let mut picker = FirstOrNone {
            cancel: false,
            seen: Vec::new(),
        };

        let dir = ChartLocator::new(tmp.path())
            .pick_chart(Some(&mut picker))
            .await
            .unwrap();
        assert_eq!(dir, tmp.path().join("charts/web"));
        assert_eq!(picker.seen.len(), 2);
    }

    #[tokio::test]
    async fn test_ambiguous_dismissed() {
        let tmp = tempfile::tempdir().unwrap();
        chart(tmp.path(), "a");
        chart(tmp.path(), "b");
        let mut picker = FirstOrNone {
            cancel: true,
            seen: Vec::new(),
        };

        let err = ChartLocator::new(tmp.path())
            .pick_chart(Some(&mut picker))
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_search_limit() {
        let tmp = tempfile::tempdir().unwrap();
        chart(tmp.path(), "a");
        chart(tmp.path(), "b");
        chart(tmp.path(), "c");
        let charts = ChartLocator::new(tmp.path()).with_limit(2).find_charts().unwrap();
        assert_eq!(charts.len(), 2);
    }
}
