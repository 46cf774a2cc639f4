use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::cache::TableCache;
use crate::data::filter::Filters;
use crate::data::loader::LoadError;
use crate::data::model::Table;
use crate::data::summary::{self, AgeMean, GroupMean};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// How many jobs the job panel shows.
pub const TOP_JOBS_LIMIT: usize = 10;

/// Where the dataset is expected when nothing else is configured. The bare
/// file name is the fallback for running from inside the data directory.
const PRIMARY_DATA_PATH: &str = "data/welfare_2015.csv";
const FALLBACK_DATA_PATH: &str = "welfare_2015.csv";

/// Optional sidebar logo, first match wins.
const LOGO_CANDIDATES: &[&str] = &["image/sample.png", "sample.png"];

/// Outcome of the most recent load attempt, shown in the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loaded { rows: usize, columns: usize },
    Failed { message: String, not_found: bool },
}

/// The three summaries currently on screen, recomputed on load and on
/// every filter change.
#[derive(Debug, Clone, Default)]
pub struct Summaries {
    pub by_sex: Vec<GroupMean>,
    pub by_age: Vec<AgeMean>,
    pub top_jobs: Vec<GroupMean>,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Path the user typed or picked; loaded on demand.
    pub data_path: String,

    /// Parsed tables keyed by resolved path.
    pub cache: TableCache,

    /// Currently displayed table (None after a failed load).
    pub table: Option<Arc<Table>>,

    /// Sidebar restrictions, rebuilt from each freshly loaded table.
    pub filters: Filters,

    /// Aggregates feeding the three chart panels.
    pub summaries: Summaries,

    /// Result of the last load, for the status line and error screen.
    pub status: LoadStatus,

    /// file:// URI of the sidebar logo, when one was found on disk.
    pub logo_uri: Option<String>,
}

impl AppState {
    /// Starts from the default dataset location and loads it immediately,
    /// so a standard checkout shows charts without any clicking.
    pub fn new() -> Self {
        let mut state = Self {
            data_path: default_data_path(),
            cache: TableCache::new(),
            table: None,
            filters: Filters::default(),
            summaries: Summaries::default(),
            status: LoadStatus::Failed {
                message: "no dataset loaded".to_string(),
                not_found: true,
            },
            logo_uri: find_logo_path().map(|p| format!("file://{}", p.display())),
        };
        state.load_current();
        state
    }

    /// Load `data_path` through the cache.
    pub fn load_current(&mut self) {
        let path = PathBuf::from(&self.data_path);
        let result = self.cache.get_or_load(&path);
        self.apply_load_result(result);
    }

    /// Re-read `data_path` from disk, bypassing the cached entry.
    pub fn reload_current(&mut self) {
        let path = PathBuf::from(&self.data_path);
        let result = self.cache.reload(&path);
        self.apply_load_result(result);
    }

    fn apply_load_result(&mut self, result: Result<Arc<Table>, LoadError>) {
        match result {
            Ok(table) => {
                log::info!(
                    "loaded {}: {} rows, {} columns",
                    self.data_path,
                    table.len(),
                    table.n_columns()
                );
                self.status = LoadStatus::Loaded {
                    rows: table.len(),
                    columns: table.n_columns(),
                };
                self.filters = Filters::from_table(&table);
                self.table = Some(table);
                self.recompute_summaries();
            }
            Err(e) => {
                log::error!("loading {} failed: {e}", self.data_path);
                self.status = LoadStatus::Failed {
                    message: e.to_string(),
                    not_found: e.is_not_found(),
                };
                self.table = None;
                self.filters = Filters::default();
                self.summaries = Summaries::default();
            }
        }
    }

    /// Recompute all three summaries from the table and active filters.
    pub fn recompute_summaries(&mut self) {
        let Some(table) = &self.table else {
            self.summaries = Summaries::default();
            return;
        };
        self.summaries = Summaries {
            by_sex: summary::mean_income_by_sex(table, self.filters.sex.restriction()),
            by_age: summary::mean_income_by_age(table),
            top_jobs: summary::top_jobs_by_mean_income(
                table,
                self.filters.job_restriction(),
                TOP_JOBS_LIMIT,
            ),
        };
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// `data/welfare_2015.csv` when the data directory exists next to the
/// working directory, otherwise the bare file name.
pub fn default_data_path() -> String {
    if Path::new(PRIMARY_DATA_PATH).is_file() {
        PRIMARY_DATA_PATH.to_string()
    } else if Path::new(FALLBACK_DATA_PATH).is_file() {
        FALLBACK_DATA_PATH.to_string()
    } else {
        // Neither exists yet; keep the canonical location so the error
        // screen names the place to put the file.
        PRIMARY_DATA_PATH.to_string()
    }
}

/// First logo candidate that exists on disk.
pub fn find_logo_path() -> Option<PathBuf> {
    LOGO_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}
