// src/output.rs

use std::fs;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::distribution;
use crate::numfmt;
use crate::records::Record;

/// Percentages are written with six decimals, everything else with two.
const PERCENT_DECIMALS: usize = 6;

/// Write the intermediate text file, one line per source line.
pub fn write_txt(lines: &[String], path: &Path) -> std::io::Result<()> {
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(path, text)?;
    info!(path = %path.display(), lines = lines.len(), "wrote intermediate text");
    Ok(())
}

/// Which derived columns the batch actually carries.
fn derived_columns(records: &[Record]) -> (bool, bool) {
    let with_percent = records.iter().any(|r| r.percent.is_some());
    let with_proportional = records.iter().any(|r| r.proportional.is_some());
    (with_percent, with_proportional)
}

fn header(with_percent: bool, with_proportional: bool) -> Vec<&'static str> {
    let mut columns = vec!["name", "code", "role", "value"];
    if with_percent {
        columns.push("percent");
    }
    if with_proportional {
        columns.push("proportional");
    }
    columns
}

fn row(record: &Record, with_percent: bool, with_proportional: bool) -> Vec<String> {
    let mut fields = vec![
        record.name.clone(),
        record.code.clone(),
        record.role.clone(),
        numfmt::format(record.value),
    ];
    if with_percent {
        fields.push(numfmt::format_decimals(
            record.percent.unwrap_or(0.0),
            PERCENT_DECIMALS,
        ));
    }
    if with_proportional {
        fields.push(numfmt::format(record.proportional.unwrap_or(0.0)));
    }
    fields
}

/// Write the batch as CSV: `name,code,role,value[,percent,proportional]`.
pub fn write_csv(records: &[Record], path: &Path) -> Result<(), csv::Error> {
    let (with_percent, with_proportional) = derived_columns(records);

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(header(with_percent, with_proportional))?;
    for record in records {
        writer.write_record(row(record, with_percent, with_proportional))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = records.len(), "wrote CSV");
    Ok(())
}

/// Write a spreadsheet mirroring the CSV content.
pub fn write_xlsx(records: &[Record], path: &Path) -> Result<(), rust_xlsxwriter::XlsxError> {
    let (with_percent, with_proportional) = derived_columns(records);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, name) in header(with_percent, with_proportional).iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }
    for (index, record) in records.iter().enumerate() {
        let row_num = (index + 1) as u32;
        for (col, field) in row(record, with_percent, with_proportional)
            .iter()
            .enumerate()
        {
            worksheet.write_string(row_num, col as u16, field)?;
        }
    }
    workbook.save(path)?;

    info!(path = %path.display(), rows = records.len(), "wrote spreadsheet");
    Ok(())
}

/// Human-readable per-record listing with the batch summary.
pub fn print_records(records: &[Record], target_amount: Option<f64>) {
    println!("Total records: {}", records.len());
    println!(
        "Sum of all values: {}",
        numfmt::format(distribution::total_value(records))
    );
    if let Some(target) = target_amount {
        println!("Distribution amount: {}", numfmt::format(target));
    }

    for record in records {
        println!();
        println!("name: {}", record.name);
        println!("code: {}", record.code);
        println!("role: {}", record.role);
        println!("value: {}", numfmt::format(record.value));
        if let Some(percent) = record.percent {
            println!(
                "percent: {}",
                numfmt::format_decimals(percent, PERCENT_DECIMALS)
            );
        }
        if let Some(proportional) = record.proportional {
            println!("proportional: {}", numfmt::format(proportional));
        }
    }
}
