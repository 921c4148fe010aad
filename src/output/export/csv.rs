//! CSV export for blending simulation results
//!
//! Writes the computed time series to CSV (Comma-Separated Values), which is
//! compatible with Excel, Python pandas, MATLAB and most data analysis
//! tools.
//!
//! # Features
//!
//! - **Simple interface**: Export with `&[f64]` slices
//! - **Metadata support**: Optional header comments with run parameters
//! - **Customizable**: Delimiter, precision, decimal separator
//! - **Multi-material**: One column per registry material
//! - **Validation**: Checks for NaN, empty data, mismatched lengths
//!
//! # Quick Examples
//!
//! ## Flow series of a completed run
//!
//! ```rust,ignore
//! use belt_rs::output::export::export_flow_csv;
//!
//! export_flow_csv(&result, "flows.csv", None)?;
//! ```
//!
//! **Output** (`flows.csv`):
//! ```csv
//! Time (s),Sinter (kg/s),Coke (kg/s),Total (kg/s)
//! 0.000000,10.000000,5.000000,15.000000
//! 1.000000,10.000000,5.000000,15.000000
//! ...
//! ```
//!
//! ## Raw series with European formatting
//!
//! ```rust,ignore
//! use belt_rs::output::export::{export_series_csv, CsvConfig};
//!
//! let config = CsvConfig::european();
//! export_series_csv(&time, &[series], &["Sinter"], "data.csv", Some(&config))?;
//! ```

use std::error::Error;
use std::fs::File;
use std::io::Write;

use crate::sim::SimulationResult;

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use belt_rs::output::export::CsvConfig;
///
/// let config = CsvConfig::default()
///     .delimiter(';')
///     .precision(10);
/// ```
#[derive(Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,

    /// Header for the time column (default: "Time (s)")
    pub time_header: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            time_header: "Time (s)".to_string(),
        }
    }
}

impl CsvConfig {
    /// Create config with European CSV format (semicolon, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// Create config with high precision (12 decimal places)
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// All fields are optional. Only non-None fields are written.
#[derive(Clone, Default)]
pub struct CsvMetadata {
    /// Engine name (e.g., "Belt Grid Accumulator")
    pub engine_name: Option<String>,

    /// Total simulation time
    pub total_time: Option<f64>,

    /// Number of samples on the grid
    pub samples: Option<usize>,

    /// Belt velocity
    pub belt_velocity: Option<f64>,

    /// Conveyor length
    pub conveyor_length: Option<f64>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Create metadata from a completed simulation result
    pub fn from_result(result: &SimulationResult) -> Self {
        let parameters = result.parameters();

        Self {
            engine_name: result.metadata().get("engine").cloned(),
            total_time: Some(parameters.total_time),
            samples: Some(result.len()),
            belt_velocity: Some(parameters.belt_velocity),
            conveyor_length: Some(parameters.conveyor_length),
            custom: Vec::new(),
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: String, value: String) {
        self.custom.push((key, value));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Write metadata header comments to file
fn write_metadata_header(file: &mut File, metadata: &CsvMetadata) -> Result<(), Box<dyn Error>> {
    writeln!(file, "# Conveyor Blending Simulation Data")?;

    // Timestamp (current time)
    let now = chrono::Utc::now();
    writeln!(file, "# Generated: {}", now.to_rfc3339())?;

    if let Some(engine) = &metadata.engine_name {
        writeln!(file, "# Engine: {}", engine)?;
    }
    if let Some(total_time) = metadata.total_time {
        writeln!(file, "# Total Time: {} s", total_time)?;
    }
    if let Some(samples) = metadata.samples {
        writeln!(file, "# Samples: {}", samples)?;
    }
    if let Some(velocity) = metadata.belt_velocity {
        writeln!(file, "# Belt Velocity: {} m/s", velocity)?;
    }
    if let Some(length) = metadata.conveyor_length {
        writeln!(file, "# Conveyor Length: {} m", length)?;
    }

    for (key, value) in &metadata.custom {
        writeln!(file, "# {}: {}", key, value)?;
    }

    // Separator
    writeln!(file, "#")?;

    Ok(())
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);

    // Replace decimal separator if needed
    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

// =============================================================================
// Export Functions
// =============================================================================

/// Export a set of time series to CSV
///
/// Writes the time column followed by one column per named series.
///
/// # Arguments
///
/// * `time_serie` - Sample timestamps
/// * `series` - One value vector per column, each as long as the time series
/// * `names` - Column headers, one per series
/// * `output_path` - Output file path
/// * `configuration` - Optional CSV configuration (default if `None`)
///
/// # Errors
///
/// - Empty data
/// - Mismatched lengths between time, series and names
/// - NaN or Inf values anywhere in the data
/// - File creation errors
pub fn export_series_csv(
    time_serie: &[f64],
    series: &[Vec<f64>],
    names: &[&str],
    output_path: &str,
    configuration: Option<&CsvConfig>,
) -> Result<(), Box<dyn Error>> {
    // ============================= Validation =============================

    if time_serie.is_empty() || series.is_empty() {
        return Err("Empty data: time and value series must not be empty".into());
    }

    if time_serie.iter().any(|t| !t.is_finite()) {
        return Err("Invalid data: NaN or Inf detected in time series".into());
    }

    if series.len() != names.len() {
        return Err(format!(
            "Data length mismatch: {} value series versus {} column names",
            series.len(),
            names.len()
        )
        .into());
    }

    for (i, column) in series.iter().enumerate() {
        if column.len() != time_serie.len() {
            return Err(format!(
                "Column [{}] length mismatch: {} values vs {} time points",
                names[i],
                column.len(),
                time_serie.len()
            )
            .into());
        }

        if column.iter().any(|v| !v.is_finite()) {
            return Err(format!("Invalid data: NaN or Inf detected in column {}", names[i]).into());
        }
    }

    // ============================= Configuration ==========================

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);

    // ============================= Open File ==============================

    let mut file = File::create(output_path)?;

    // ============================= Write Metadata =========================

    if configuration.include_metadata {
        if let Some(metadata) = &configuration.metadata {
            write_metadata_header(&mut file, metadata)?;
        }
    }

    // ============================= Write Header ===========================

    write!(file, "{}", configuration.time_header)?;
    for name in names {
        write!(file, "{}{}", configuration.delimiter, name)?;
    }
    writeln!(file)?;

    // ============================= Write Data =============================

    for i in 0..time_serie.len() {
        write!(file, "{}", format_number(time_serie[i], configuration))?;

        for column in series {
            write!(
                file,
                "{}{}",
                configuration.delimiter,
                format_number(column[i], configuration)
            )?;
        }
        writeln!(file)?;
    }

    Ok(())
}

/// Export the per-material flow series of a completed run
///
/// One column per registry material (header `"<name> (kg/s)"`) plus a
/// trailing `Total (kg/s)` column.
///
/// # Example
///
/// ```rust,ignore
/// export_flow_csv(&result, "flows.csv", None)?;
/// ```
pub fn export_flow_csv(
    result: &SimulationResult,
    output_path: &str,
    configuration: Option<&CsvConfig>,
) -> Result<(), Box<dyn Error>> {
    let names = result.material_names();

    let mut headers: Vec<String> = names.iter().map(|n| format!("{} (kg/s)", n)).collect();
    headers.push("Total (kg/s)".to_string());

    let mut series: Vec<Vec<f64>> = names
        .iter()
        .map(|name| {
            result
                .flow_series(name)
                .ok_or_else(|| format!("material {name:?} missing from result"))
        })
        .collect::<Result<_, _>>()?;
    series.push(result.total_flow_series());

    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();

    export_series_csv(
        &result.time_points(),
        &series,
        &header_refs,
        output_path,
        configuration,
    )
}

/// Export the per-material composition series of a completed run
///
/// One column per registry material, each value the fraction of the total
/// flow at that sample (0 when the belt discharge point is idle).
pub fn export_composition_csv(
    result: &SimulationResult,
    output_path: &str,
    configuration: Option<&CsvConfig>,
) -> Result<(), Box<dyn Error>> {
    let names = result.material_names();

    let series: Vec<Vec<f64>> = names
        .iter()
        .map(|name| {
            result
                .composition_series(name)
                .ok_or_else(|| format!("material {name:?} missing from result"))
        })
        .collect::<Result<_, _>>()?;

    export_series_csv(
        &result.time_points(),
        &series,
        &names,
        output_path,
        configuration,
    )
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, Material, MaterialRegistry, Silo, SimulationParameters};
    use crate::sim::{RunMonitor, Scenario, SimulationEngine};
    use std::fs;
    use tempfile::NamedTempFile;

    fn completed_result() -> SimulationResult {
        let registry = MaterialRegistry::new(vec![
            Material::new("Sinter", Color::new(178, 34, 34)),
            Material::new("Coke", Color::new(47, 47, 47)),
        ]);
        let scenario = Scenario::new(
            registry,
            vec![
                Silo::new("Sinter", 100.0, 10.0, 0.0, 0.0),
                Silo::new("Coke", 50.0, 5.0, 0.0, 10.0),
            ],
        );
        let parameters = SimulationParameters::new(20.0, 100.0, 1.0, 1.0);

        SimulationEngine::new()
            .run(&scenario, &parameters, &RunMonitor::default())
            .unwrap()
            .into_result()
            .unwrap()
    }

    // ====== Raw series export ======

    #[test]
    fn test_series_export_writes_header_and_rows() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let time = vec![0.0, 1.0, 2.0];
        let values = vec![vec![10.0, 10.0, 0.0]];

        export_series_csv(&time, &values, &["Sinter"], &path, None).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "Time (s),Sinter");
        assert_eq!(lines[1], "0.000000,10.000000");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_series_export_rejects_empty_data() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let result = export_series_csv(&[], &[], &[], &path, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_series_export_rejects_length_mismatch() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let result = export_series_csv(
            &[0.0, 1.0],
            &[vec![1.0, 2.0, 3.0]],
            &["bad"],
            &path,
            None,
        );
        assert!(result.unwrap_err().to_string().contains("length mismatch"));
    }

    #[test]
    fn test_series_export_rejects_non_finite_values() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let result = export_series_csv(
            &[0.0, 1.0],
            &[vec![1.0, f64::NAN]],
            &["bad"],
            &path,
            None,
        );
        assert!(result.unwrap_err().to_string().contains("NaN"));
    }

    #[test]
    fn test_european_format() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = CsvConfig::european().precision(2);
        export_series_csv(&[0.5], &[vec![1.25]], &["x"], &path, Some(&config)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("0,50;1,25"));
    }

    // ====== Result-level conveniences ======

    #[test]
    fn test_flow_export_has_one_column_per_material_plus_total() {
        let result = completed_result();
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        export_flow_csv(&result, &path, None).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();

        assert_eq!(
            header,
            "Time (s),Sinter (kg/s),Coke (kg/s),Total (kg/s)"
        );
        // header + 21 samples
        assert_eq!(content.lines().count(), 22);
    }

    #[test]
    fn test_composition_export_rows_sum_to_one_while_flowing() {
        let result = completed_result();
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        export_composition_csv(&result, &path, None).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // First data row: t=0, both silos discharging: 10/15 and 5/15.
        let row: Vec<&str> = content.lines().nth(1).unwrap().split(',').collect();
        let sinter: f64 = row[1].parse().unwrap();
        let coke: f64 = row[2].parse().unwrap();

        assert!((sinter + coke - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_metadata_header_is_written_when_enabled() {
        let result = completed_result();
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = CsvConfig::default().with_metadata(CsvMetadata::from_result(&result));
        export_flow_csv(&result, &path, Some(&config)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Conveyor Blending Simulation Data"));
        assert!(content.contains("# Engine: Belt Grid Accumulator"));
        assert!(content.contains("# Total Time: 20 s"));
        assert!(content.contains("# Samples: 21"));
    }
}
