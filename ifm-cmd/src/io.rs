//! CSV readers and writers for the command layer.
//!
//! # CSV Formats
//!
//! - **Water level** (headers): `date,water_level` (or `Date,WL`)
//! - **Rainfall** (headers): `date,rainfall_mm[,alpha]` (or `Date,Rainfall (mm/day)[,alpha]`)
//! - **Alpha** (headers): `date,alpha`
//! - **Monthly** (headers): `month,mid_date,mean_water_level,normalized,transformed`
//! - **Influent** (headers): `date,weekday,rainfall_mm,alpha,q_domestic,q_industrial,
//!   q_rdi,q_gwi,delayed_rain,q_rii,total_m3_per_day,total_mgd`
//!
//! Undefined values (RII on singular days) are written as empty cells.
//!
//! Writers stage their rows in a temporary file next to the destination;
//! [`commit`] moves a whole batch into place once every file is complete.

use anyhow::Context;
use ifm_core::{
    observation::{read_records, AlphaReading, RainfallReading, WaterLevelReading},
    series::DailySeries,
};
use ifm_data::monthly::NormalizedSignal;
use ifm_flow::{FlowComponents, InfluentRecord};
use ifm_utils::dates::{format_date, weekday_abbrev};
use log::{info, warn};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

fn read_csv<T: DeserializeOwned>(path: &str, what: &str) -> anyhow::Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("opening {what} CSV {path}"))?;
    let rows: Vec<T> = read_records(BufReader::new(file))
        .with_context(|| format!("parsing {what} CSV {path}"))?;
    info!("read {} {what} rows from {path}", rows.len());
    Ok(rows)
}

pub fn read_water_levels(path: &str) -> anyhow::Result<Vec<WaterLevelReading>> {
    read_csv(path, "water level")
}

pub fn read_rainfall(path: &str) -> anyhow::Result<Vec<RainfallReading>> {
    read_csv(path, "rainfall")
}

pub fn read_alpha(path: &str) -> anyhow::Result<Vec<AlphaReading>> {
    read_csv(path, "alpha")
}

/// A complete CSV held in a temporary file beside its destination.
///
/// Dropping it without [`commit`] leaves the destination untouched.
pub struct StagedOutput {
    file: NamedTempFile,
    path: PathBuf,
    rows: usize,
}

impl StagedOutput {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

fn stage_csv<T: Serialize>(
    path: &str,
    rows: impl IntoIterator<Item = T>,
) -> anyhow::Result<StagedOutput> {
    let target = PathBuf::from(path);
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut file =
        NamedTempFile::new_in(&dir).with_context(|| format!("creating output {path}"))?;
    let mut count = 0usize;
    {
        let mut writer = csv::Writer::from_writer(&mut file);
        for row in rows {
            writer
                .serialize(row)
                .with_context(|| format!("writing {path}"))?;
            count += 1;
        }
        writer.flush().with_context(|| format!("flushing {path}"))?;
    }
    Ok(StagedOutput {
        file,
        path: target,
        rows: count,
    })
}

/// Move staged outputs to their destinations.
///
/// If one cannot be moved, the outputs already placed by this call are
/// removed again.
pub fn commit(outputs: Vec<StagedOutput>) -> anyhow::Result<()> {
    let mut placed: Vec<PathBuf> = Vec::with_capacity(outputs.len());
    for StagedOutput { file, path, rows } in outputs {
        if let Err(e) = file.persist(&path) {
            for done in &placed {
                if let Err(rm) = fs::remove_file(done) {
                    warn!("could not remove {}: {rm}", done.display());
                }
            }
            return Err(anyhow::Error::new(e.error))
                .with_context(|| format!("moving output into place at {}", path.display()));
        }
        info!("wrote {rows} rows to {}", path.display());
        placed.push(path);
    }
    Ok(())
}

pub fn stage_alpha(path: &str, alpha: &DailySeries) -> anyhow::Result<StagedOutput> {
    stage_csv(
        path,
        alpha.iter().map(|(date, alpha)| AlphaReading { date, alpha }),
    )
}

#[derive(Serialize)]
struct MonthlyRow {
    month: String,
    mid_date: String,
    mean_water_level: f64,
    normalized: f64,
    transformed: f64,
}

pub fn stage_monthly(
    path: &str,
    months: &[NormalizedSignal],
) -> anyhow::Result<StagedOutput> {
    stage_csv(
        path,
        months.iter().map(|m| MonthlyRow {
            month: m.period_start.format("%Y-%m").to_string(),
            mid_date: format_date(&m.anchor()),
            mean_water_level: m.mean_water_level,
            normalized: m.normalized,
            transformed: m.transformed,
        }),
    )
}

#[derive(Serialize)]
struct InfluentRow {
    date: String,
    weekday: &'static str,
    rainfall_mm: f64,
    alpha: f64,
    q_domestic: f64,
    q_industrial: f64,
    q_rdi: f64,
    q_gwi: f64,
    delayed_rain: f64,
    q_rii: Option<f64>,
    total_m3_per_day: Option<f64>,
    total_mgd: Option<f64>,
}

/// Write the components next to their totals; both slices cover the same days.
pub fn stage_influent(
    path: &str,
    components: &[FlowComponents],
    records: &[InfluentRecord],
) -> anyhow::Result<StagedOutput> {
    anyhow::ensure!(
        components.len() == records.len(),
        "{} component rows but {} influent records",
        components.len(),
        records.len()
    );
    stage_csv(
        path,
        components.iter().zip(records).map(|(c, r)| InfluentRow {
            date: format_date(&c.date),
            weekday: weekday_abbrev(c.weekday()),
            rainfall_mm: c.rainfall_mm,
            alpha: c.alpha,
            q_domestic: c.q_domestic,
            q_industrial: c.q_industrial,
            q_rdi: c.q_rdi,
            q_gwi: c.q_gwi,
            delayed_rain: c.delayed_rain,
            q_rii: c.q_rii,
            total_m3_per_day: r.total_m3_per_day,
            total_mgd: r.total_mgd,
        }),
    )
}
