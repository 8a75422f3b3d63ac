//! Locating the model run that covers the target time.
//!
//! Candidates are probed newest first: for each calendar day, starting at
//! the target's date, the 18Z, 12Z, 06Z and 00Z runs. The first run that
//! opens and whose time axis spans the target wins.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, info, warn};

use wind_common::{
    datetime_to_posix, DatasetOpener, GridDataset, Resolution, SynopticCycle, WindError,
    WindResult,
};

use crate::config::SourceConfig;
use crate::context::RunContext;

/// One dataset that may cover the target time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub date: NaiveDate,
    pub cycle: SynopticCycle,
    pub url: String,
}

/// Expand a dataset URL template for one model run.
pub fn dataset_url(template: &str, base_url: &str, date: NaiveDate, cycle: SynopticCycle) -> String {
    template
        .replace("{base}", base_url.trim_end_matches('/'))
        .replace("{date}", &date.format("%Y%m%d").to_string())
        .replace("{cycle}", &format!("{:02}", cycle.hour()))
}

/// Newest-first sequence of candidate datasets.
#[derive(Debug, Clone)]
pub struct Candidates {
    template: String,
    base_url: String,
    day: NaiveDate,
    days_left: u32,
    cycle: usize,
}

impl Candidates {
    /// Candidates for `target`, reaching back `lookback_hours`.
    ///
    /// Spans `ceil(lookback / 1 day) + 1` calendar days, the target's own
    /// date included.
    pub fn new(target: DateTime<Utc>, resolution: Resolution, source: &SourceConfig) -> Self {
        let days = source.lookback_days().saturating_add(1);
        Self {
            template: source.template(resolution).to_string(),
            base_url: source.base_url.clone(),
            day: target.date_naive(),
            days_left: days,
            cycle: 0,
        }
    }

    /// Number of calendar days still to be produced, the current one included.
    pub fn days(&self) -> u32 {
        self.days_left
    }
}

impl Iterator for Candidates {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        let cycles = SynopticCycle::latest_first();
        if self.days_left == 0 {
            return None;
        }

        let cycle = cycles[self.cycle];
        let candidate = Candidate {
            date: self.day,
            cycle,
            url: dataset_url(&self.template, &self.base_url, self.day, cycle),
        };

        self.cycle += 1;
        if self.cycle == cycles.len() {
            self.cycle = 0;
            self.days_left -= 1;
            match self.day.pred_opt() {
                Some(day) => self.day = day,
                None => self.days_left = 0,
            }
        }
        Some(candidate)
    }
}

/// Why a candidate was passed over.
#[derive(Debug)]
pub enum RejectReason {
    /// Unreachable or not yet published
    Unavailable(String),
    /// Answered with something that is not a usable dataset
    Unusable(String),
    /// Opened, but its time axis misses the target
    NotCovering {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::Unavailable(msg) => write!(f, "unavailable: {}", msg),
            RejectReason::Unusable(msg) => write!(f, "unusable: {}", msg),
            RejectReason::NotCovering { start, end } => {
                write!(f, "covers only {} to {}", start, end)
            }
        }
    }
}

/// Result of probing one candidate.
#[derive(Debug)]
pub enum ProbeOutcome<D> {
    Accepted(D),
    Rejected(RejectReason),
}

/// Open `candidate` and check it covers `target`.
pub async fn probe<O: DatasetOpener>(
    opener: &O,
    candidate: &Candidate,
    target: DateTime<Utc>,
) -> ProbeOutcome<O::Dataset> {
    debug!(url = %candidate.url, "Trying dataset");

    let dataset = match opener.open(&candidate.url).await {
        Ok(dataset) => dataset,
        Err(WindError::RemoteUnavailable(msg)) => {
            return ProbeOutcome::Rejected(RejectReason::Unavailable(msg))
        }
        Err(e) => return ProbeOutcome::Rejected(RejectReason::Unusable(e.to_string())),
    };

    let (start, end) = match dataset.axes().time_bounds() {
        Ok(bounds) => bounds,
        Err(e) => return ProbeOutcome::Rejected(RejectReason::Unusable(e.to_string())),
    };

    if start <= target && target <= end {
        ProbeOutcome::Accepted(dataset)
    } else {
        ProbeOutcome::Rejected(RejectReason::NotCovering { start, end })
    }
}

/// Probe candidates in order and return the first dataset covering `target`.
///
/// The accepted URL is written to the context's dataset record.
pub async fn locate<O, I>(
    ctx: &RunContext,
    opener: &O,
    candidates: I,
    target: DateTime<Utc>,
) -> WindResult<O::Dataset>
where
    O: DatasetOpener,
    I: IntoIterator<Item = Candidate>,
{
    let mut probed = 0usize;
    for candidate in candidates {
        probed += 1;
        match probe(opener, &candidate, target).await {
            ProbeOutcome::Accepted(dataset) => {
                info!(url = %candidate.url, "Found good dataset");
                record_dataset(ctx, &candidate.url).await;
                return Ok(dataset);
            }
            ProbeOutcome::Rejected(reason) => {
                debug!(url = %candidate.url, reason = %reason, "Skipping dataset");
            }
        }
    }

    Err(WindError::DatasetNotFound(format!(
        "none of {} candidate datasets covers {}",
        probed, target
    )))
}

async fn record_dataset(ctx: &RunContext, url: &str) {
    let path = ctx.dataset_record();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            warn!(path = %parent.display(), error = %e, "Cannot create dataset record directory");
            return;
        }
    }
    if let Err(e) = tokio::fs::write(path, url).await {
        warn!(path = %path.display(), error = %e, "Failed to record dataset");
    }
}

/// Log the extent of the accepted dataset.
pub fn log_dataset_summary<D: GridDataset>(dataset: &D) -> WindResult<()> {
    let axes = dataset.axes();
    let (start, end) = axes.time_bounds()?;
    let extent = |values: &[f64]| {
        values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    };
    let (lat_min, lat_max) = extent(&axes.latitudes);
    let (lon_min, lon_max) = extent(&axes.longitudes);

    info!(
        dataset = %dataset.identifier(),
        start = %start,
        start_posix = datetime_to_posix(&start),
        end = %end,
        end_posix = datetime_to_posix(&end),
        "Found appropriate dataset"
    );
    info!(lat_min, lat_max, lon_min, lon_max, "Dataset extent");
    Ok(())
}

/// The last candidate [`Candidates`] will produce for `target`.
pub fn earliest_candidate_date(
    target: DateTime<Utc>,
    source: &SourceConfig,
) -> Option<NaiveDate> {
    let span = Duration::try_days(i64::from(source.lookback_days()))?;
    target.date_naive().checked_sub_signed(span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_utils::{fixtures, gfs_axes, MockDataset, MockOpener};

    fn half_degree_url(date: &str, hour: &str) -> String {
        format!(
            "https://nomads.ncep.noaa.gov/dods/gfs_0p50/gfs{}/gfs_0p50_{}z",
            date, hour
        )
    }

    #[test]
    fn test_candidate_order_and_span() {
        let target = Utc.with_ymd_and_hms(2017, 11, 11, 15, 30, 0).unwrap();
        let source = SourceConfig::default();
        let candidates: Vec<Candidate> =
            Candidates::new(target, Resolution::HalfDegree, &source).collect();

        // ceil(7.5) + 1 days, four runs each
        assert_eq!(candidates.len(), 9 * 4);
        assert_eq!(candidates[0].url, half_degree_url("20171111", "18"));
        assert_eq!(candidates[1].url, half_degree_url("20171111", "12"));
        assert_eq!(candidates[3].url, half_degree_url("20171111", "00"));
        assert_eq!(candidates[4].url, half_degree_url("20171110", "18"));

        let last = candidates.last().unwrap();
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2017, 11, 3).unwrap());
        assert_eq!(last.cycle, SynopticCycle::Z00);
        assert_eq!(Some(last.date), earliest_candidate_date(target, &source));

        for pair in candidates.windows(2) {
            let key = |c: &Candidate| (c.date, c.cycle.hour());
            assert!(key(&pair[0]) > key(&pair[1]));
        }
    }

    #[test]
    fn test_candidate_templates_per_tier() {
        let target = fixtures::time::reference();
        let source = SourceConfig::default();
        let first = |r| Candidates::new(target, r, &source).next().unwrap().url;

        assert_eq!(
            first(Resolution::OneDegree),
            "https://nomads.ncep.noaa.gov/dods/gfs_1p00/gfs20171111/gfs_1p00_18z"
        );
        assert_eq!(
            first(Resolution::QuarterDegree),
            "https://nomads.ncep.noaa.gov/dods/gfs_0p25_1hr/gfs20171111/gfs_0p25_1hr_18z"
        );
    }

    #[test]
    fn test_zero_lookback_is_one_day() {
        let source = SourceConfig {
            lookback_hours: 0.0,
            ..SourceConfig::default()
        };
        let candidates = Candidates::new(fixtures::time::reference(), Resolution::OneDegree, &source);
        assert_eq!(candidates.days(), 1);
        assert_eq!(candidates.count(), 4);
    }

    #[test]
    fn test_oversized_lookback_is_clamped() {
        let target = fixtures::time::reference();
        let source = SourceConfig {
            lookback_hours: 1e300,
            ..SourceConfig::default()
        };

        let candidates = Candidates::new(target, Resolution::HalfDegree, &source);
        assert_eq!(candidates.days(), 32);
        assert_eq!(
            earliest_candidate_date(target, &source),
            NaiveDate::from_ymd_opt(2017, 10, 11)
        );
        assert_eq!(candidates.last().map(|c| c.date), NaiveDate::from_ymd_opt(2017, 10, 11));
    }

    #[tokio::test]
    async fn test_locate_skips_unavailable_and_non_covering() {
        let target = fixtures::time::reference();
        let dir = tempfile::tempdir().unwrap();
        let record = dir.path().join("gfs").join("dataset.txt");
        let ctx = RunContext::new(&record, None).unwrap();

        // 18Z is unpublished, 12Z is broken and 06Z starts after the target.
        let run_10_18 = Utc.with_ymd_and_hms(2017, 11, 10, 18, 0, 0).unwrap();
        let run_11_00 = Utc.with_ymd_and_hms(2017, 11, 11, 0, 0, 0).unwrap();
        let run_11_06 = Utc.with_ymd_and_hms(2017, 11, 11, 6, 0, 0).unwrap();
        let opener = MockOpener::new()
            .with_malformed(half_degree_url("20171111", "12"))
            .with_dataset(MockDataset::new(
                half_degree_url("20171111", "06"),
                gfs_axes(0.5, run_11_06, 3, 4),
            ))
            .with_dataset(MockDataset::new(
                half_degree_url("20171111", "00"),
                gfs_axes(0.5, run_11_00, 3, 4),
            ))
            .with_dataset(MockDataset::new(
                fixtures::datasets::GFS_0P50_20171110_18Z,
                gfs_axes(0.5, run_10_18, 3, 4),
            ));

        let candidates = Candidates::new(target, Resolution::HalfDegree, &SourceConfig::default());
        let dataset = locate(&ctx, &opener, candidates, target).await.unwrap();

        // The 00Z run starts exactly at the target and is accepted.
        assert_eq!(dataset.identifier(), fixtures::datasets::GFS_0P50_20171111_00Z);
        assert_eq!(
            opener.attempts(),
            vec![
                half_degree_url("20171111", "18"),
                half_degree_url("20171111", "12"),
                half_degree_url("20171111", "06"),
                half_degree_url("20171111", "00"),
            ]
        );
        assert_eq!(
            std::fs::read_to_string(&record).unwrap(),
            fixtures::datasets::GFS_0P50_20171111_00Z
        );
        assert!(log_dataset_summary(&dataset).is_ok());
    }

    #[tokio::test]
    async fn test_locate_exhausted() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = RunContext::new(dir.path().join("dataset.txt"), None).unwrap();
        let target = fixtures::time::reference();
        let opener = MockOpener::new();
        let source = SourceConfig {
            lookback_hours: 24.0,
            ..SourceConfig::default()
        };

        let result = locate(
            &ctx,
            &opener,
            Candidates::new(target, Resolution::HalfDegree, &source),
            target,
        )
        .await;

        assert!(matches!(result, Err(WindError::DatasetNotFound(_))));
        assert_eq!(opener.attempts().len(), 8);
        assert!(!dir.path().join("dataset.txt").exists());
    }

    #[tokio::test]
    async fn test_probe_rejects_run_ending_before_target() {
        let target = fixtures::time::reference();
        let run = Utc.with_ymd_and_hms(2017, 11, 10, 0, 0, 0).unwrap();
        let url = half_degree_url("20171110", "00");
        let opener =
            MockOpener::new().with_dataset(MockDataset::new(url.clone(), gfs_axes(1.0, run, 3, 2)));
        let candidate = Candidate {
            date: run.date_naive(),
            cycle: SynopticCycle::Z00,
            url,
        };

        match probe(&opener, &candidate, target).await {
            ProbeOutcome::Rejected(RejectReason::NotCovering { end, .. }) => {
                assert_eq!(end, run + Duration::hours(3));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
