//! Report consumers.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use super::report::StationReport;
use crate::error::{PlannerError, PlannerResult};

/// Receives one report per station after a plan is solved.
pub trait ReportSink {
    /// Consumes a station report.
    ///
    /// # Errors
    /// `PlannerError::Sink` when the report cannot be delivered.
    fn accept(&mut self, report: &StationReport) -> PlannerResult<()>;
}

/// Keeps reports in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    reports: Vec<StationReport>,
}

impl CollectingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports received so far, in delivery order.
    pub fn reports(&self) -> &[StationReport] {
        &self.reports
    }

    /// Report of a station, if delivered.
    pub fn get(&self, station: &str) -> Option<&StationReport> {
        self.reports.iter().find(|r| r.station == station)
    }

    /// Takes the collected reports.
    pub fn into_reports(self) -> Vec<StationReport> {
        self.reports
    }
}

impl ReportSink for CollectingSink {
    fn accept(&mut self, report: &StationReport) -> PlannerResult<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}

/// Writes each report as pretty JSON to `<dir>/pm_resources_<station>.json`.
#[derive(Debug, Clone)]
pub struct JsonReportSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl JsonReportSink {
    /// Creates a sink writing into `dir`; the directory is created on the
    /// first report.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Path of the file for a station.
    pub fn path_for(&self, station: &str) -> PathBuf {
        let safe: String = station
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
            .collect();
        self.dir.join(format!("pm_resources_{safe}.json"))
    }
}

impl ReportSink for JsonReportSink {
    fn accept(&mut self, report: &StationReport) -> PlannerResult<()> {
        let sink_error = |message: String| PlannerError::Sink {
            station: report.station.clone(),
            message,
        };

        fs::create_dir_all(&self.dir)
            .map_err(|e| sink_error(format!("cannot create {}: {e}", self.dir.display())))?;

        let path = self.path_for(&report.station);
        let file = File::create(&path)
            .map_err(|e| sink_error(format!("cannot create {}: {e}", path.display())))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, report)
            .map_err(|e| sink_error(format!("cannot write {}: {e}", path.display())))?;
        writer
            .flush()
            .map_err(|e| sink_error(format!("cannot write {}: {e}", path.display())))?;

        debug!("station {}: report written to {}", report.station, path.display());
        self.written.push(path);
        Ok(())
    }
}
