use std::path::PathBuf;

use anyhow::Context;

use crate::models::{RivalWindowOptions, TeamScoreOptions, DEFAULT_TOP_N, DEFAULT_WINDOW_SECONDS};

pub const RESULTS_PATH_ENV: &str = "XC_RESULTS_PATH";

/// Runtime settings shared by every CLI command.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub results_path: PathBuf,
    pub top_n: usize,
    pub window_sec: f64,
    pub json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            results_path: PathBuf::new(),
            top_n: DEFAULT_TOP_N,
            window_sec: DEFAULT_WINDOW_SECONDS,
            json: false,
        }
    }
}

impl Settings {
    /// Resolves the results file from the flag, then from `XC_RESULTS_PATH`.
    pub fn resolve(
        results: Option<PathBuf>,
        env_value: Option<String>,
        top_n: usize,
        window_sec: f64,
        json: bool,
    ) -> anyhow::Result<Self> {
        let results_path = results
            .or_else(|| env_value.filter(|value| !value.trim().is_empty()).map(PathBuf::from))
            .with_context(|| {
                format!("pass --results or set {RESULTS_PATH_ENV} to a season results file")
            })?;

        Ok(Self {
            results_path,
            top_n,
            window_sec,
            json,
        })
    }

    pub fn score_options(&self) -> TeamScoreOptions {
        TeamScoreOptions::with_top_n(self.top_n)
    }

    pub fn rival_options(&self) -> RivalWindowOptions {
        RivalWindowOptions {
            window_sec: self.window_sec,
        }
    }
}
