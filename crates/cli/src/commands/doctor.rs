use std::path::Path;

use cloudpick_core::config::{AppConfig, LoadOptions};
use cloudpick_core::dataset::load_offerings_from_path;
use serde::Serialize;
use serde_json::json;

const CONFIG_CHECK: &str = "config_validation";
const DATASET_CHECK: &str = "dataset_readability";
const DATABASE_CHECK: &str = "database_connectivity";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Verdict {
    Pass,
    Fail,
    Skipped,
}

impl Verdict {
    fn marker(self) -> &'static str {
        match self {
            Self::Pass => "ok",
            Self::Fail => "fail",
            Self::Skipped => "skip",
        }
    }
}

#[derive(Debug, Serialize)]
struct Check {
    name: &'static str,
    status: Verdict,
    details: String,
}

impl Check {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: Verdict::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: Verdict::Fail, details: details.into() }
    }

    fn skipped(name: &'static str) -> Self {
        Self {
            name,
            status: Verdict::Skipped,
            details: "not run; configuration did not load".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    overall_status: Verdict,
    summary: String,
    checks: Vec<Check>,
}

impl Report {
    /// Anything short of a pass on every check, skips included, fails the report.
    fn from_checks(checks: Vec<Check>) -> Self {
        let not_passing = checks.iter().filter(|check| check.status != Verdict::Pass).count();
        let (overall_status, summary) = if not_passing == 0 {
            (Verdict::Pass, "doctor: cloudpick is ready to recommend".to_string())
        } else {
            let summary = format!("doctor: {not_passing} of {} checks did not pass", checks.len());
            (Verdict::Fail, summary)
        };
        Self { overall_status, summary, checks }
    }

    fn to_text(&self) -> String {
        let mut out = self.summary.clone();
        for check in &self.checks {
            let marker = check.status.marker();
            out.push_str(&format!("\n- [{marker}] {}: {}", check.name, check.details));
        }
        out
    }
}

pub fn run(json_output: bool) -> String {
    let report = Report::from_checks(run_checks());

    if !json_output {
        return report.to_text();
    }
    serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
        json!({
            "overall_status": Verdict::Fail,
            "summary": "doctor report could not be serialized",
            "error": error.to_string(),
        })
        .to_string()
    })
}

/// Dataset and database checks only run once the config itself is valid.
fn run_checks() -> Vec<Check> {
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => vec![
            Check::pass(CONFIG_CHECK, "configuration loaded and validated"),
            check_dataset(&config.dataset.path),
            check_database(&config),
        ],
        Err(error) => vec![
            Check::fail(CONFIG_CHECK, error.to_string()),
            Check::skipped(DATASET_CHECK),
            Check::skipped(DATABASE_CHECK),
        ],
    }
}

fn check_dataset(path: &Path) -> Check {
    let offerings = match load_offerings_from_path(path) {
        Ok(offerings) => offerings,
        Err(error) => return Check::fail(DATASET_CHECK, format!("`{}`: {error}", path.display())),
    };
    if offerings.is_empty() {
        return Check::fail(
            DATASET_CHECK,
            format!("`{}` has a header but no offerings", path.display()),
        );
    }

    let mut segments: Vec<&str> =
        offerings.iter().map(|offering| offering.segment.as_str()).collect();
    segments.sort_unstable();
    segments.dedup();
    Check::pass(
        DATASET_CHECK,
        format!(
            "loaded {} offerings across segments [{}] from `{}`",
            offerings.len(),
            segments.join(", "),
            path.display()
        ),
    )
}

fn check_database(config: &AppConfig) -> Check {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return Check::fail(DATABASE_CHECK, format!("async runtime unavailable: {error}"))
        }
    };

    let opened = runtime.block_on(async {
        let pool = cloudpick_db::open(&config.database).await?;
        pool.close().await;
        Ok::<(), cloudpick_db::OpenError>(())
    });

    match opened {
        Ok(()) => Check::pass(
            DATABASE_CHECK,
            format!("connected and migrated using `{}`", config.database.url),
        ),
        Err(error) => Check::fail(DATABASE_CHECK, error.to_string()),
    }
}
