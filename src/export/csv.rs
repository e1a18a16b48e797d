use crate::error::ExportError;
use crate::export::MetricsReport;
use std::fs::File;
use std::path::Path;

pub fn export_csv<P: AsRef<Path>>(report: &MetricsReport, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(["Building", "Predicted Energy (kWh)", "Carbon Saved (kg)"])?;

    for row in &report.rows {
        let energy = format_value(row.predicted_energy_kwh);
        let carbon = format_value(row.carbon_saved_kg);
        writer.write_record([row.building.as_str(), energy.as_str(), carbon.as_str()])?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}
