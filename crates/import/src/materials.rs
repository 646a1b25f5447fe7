use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

use partsapp_materials::NewMaterial;

use crate::error::ImportError;
use crate::rows::{ImportBatch, ImportSummary};
use crate::values::{parse_date, parse_quantity};

/// A row of the materials seed file. Accepts camelCase or snake_case headers.
#[derive(Debug, Default, Deserialize)]
struct MaterialRow {
    #[serde(default, alias = "bodyTechnician")]
    body_technician: String,
    #[serde(default, alias = "partNumber")]
    part_number: String,
    #[serde(default)]
    description: String,
    #[serde(default, alias = "orderedQty")]
    ordered_qty: String,
    #[serde(default, alias = "orderedDate")]
    ordered_date: String,
    #[serde(default, alias = "unitType")]
    unit_type: String,
    #[serde(default, alias = "receivedQty")]
    received_qty: String,
    #[serde(default, alias = "receivedDate")]
    received_date: String,
}

impl MaterialRow {
    fn into_new_material(self) -> Result<NewMaterial, String> {
        let material = NewMaterial {
            body_technician: self.body_technician,
            part_number: self.part_number,
            description: self.description,
            ordered_qty: parse_quantity(&self.ordered_qty)?,
            ordered_date: parse_date(&self.ordered_date),
            unit_type: self.unit_type,
            received_qty: parse_quantity(&self.received_qty)?,
            received_date: parse_date(&self.received_date),
        };
        material.validate().map_err(|e| e.to_string())?;
        Ok(material)
    }
}

/// Parse the materials seed CSV (plain header row, no report preamble).
pub fn parse_materials_csv(content: &str) -> Result<ImportBatch<NewMaterial>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(content.trim_start_matches('\u{feff}').as_bytes());

    let mut records = Vec::new();
    let mut summary = ImportSummary::default();

    for (index, result) in reader.deserialize::<MaterialRow>().enumerate() {
        let row_number = index + 1;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                summary.parsing_errors.push(format!("Row {row_number}: {e}"));
                continue;
            }
        };
        match row.into_new_material() {
            Ok(material) => records.push(material),
            Err(reason) => {
                summary.errors += 1;
                tracing::debug!(row = row_number, %reason, "skipping material row");
            }
        }
    }

    summary.imported = records.len();
    Ok(ImportBatch { records, summary })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_seed_file() {
        let csv = "\
bodyTechnician,partNumber,description,orderedQty,orderedDate,unitType,receivedQty,receivedDate
Rita,3M-05887,Masking tape,4,2025-02-01,roll,4,2025-02-03
Bo,SEM-39143,Primer,2,2025-02-02,can,,
Bo,,Missing part number,1,,each,,
";
        let batch = parse_materials_csv(csv).unwrap();
        assert_eq!(batch.summary.imported, 2);
        assert_eq!(batch.summary.errors, 1);
        assert_eq!(batch.records[0].received_qty, 4);
        assert!(batch.records[0].received_date.is_some());
        assert_eq!(batch.records[1].received_qty, 0);
    }

    #[test]
    fn accepts_snake_case_headers() {
        let csv = "body_technician,part_number,description,ordered_qty\nRita,P-1,Sandpaper,10\n";
        let batch = parse_materials_csv(csv).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].ordered_qty, 10);
    }
}
