use std::path::Path;

use calamine::{DataType, Range, Reader, open_workbook_auto};
use chrono::{NaiveDateTime, NaiveTime};

use crate::error::{Result, ToolError};
use crate::model::{Cell, Stage, Table};

/// Reads the first worksheet of the workbook at `path` into a [`Table`].
///
/// The first row of the used range is the header row. The workbook format is
/// detected from the file extension. Any failure to open or parse the file is
/// reported as [`ToolError::Processing`].
pub fn read_table(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|err| ToolError::processing(Stage::Loaded, path, err.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            ToolError::processing(Stage::Loaded, path, "workbook contains no worksheets")
        })?
        .map_err(|err| ToolError::processing(Stage::Loaded, path, err.to_string()))?;

    Ok(range_to_table(&range))
}

fn range_to_table(range: &Range<DataType>) -> Table {
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| to_cell(cell).as_text().trim().to_string())
            .collect(),
        None => return Table::default(),
    };

    let rows = rows
        .map(|row| row.iter().map(to_cell).collect())
        .collect();

    Table { headers, rows }
}

fn to_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Bool(value) => Cell::Bool(*value),
        DataType::Empty => Cell::Empty,
        DataType::Error(kind) => Cell::Error(kind.to_string()),
        DataType::DateTime(_) => match cell.as_datetime() {
            Some(datetime) => Cell::Other(iso_text(datetime)),
            None => Cell::Error(format!("invalid date serial {cell}")),
        },
        other => Cell::Other(other.to_string()),
    }
}

/// Midnight timestamps render as a bare date.
fn iso_text(datetime: NaiveDateTime) -> String {
    if datetime.time() == NaiveTime::MIN {
        datetime.date().format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use calamine::CellErrorType;

    use super::*;

    #[test]
    fn date_serials_become_iso_text() {
        assert_eq!(
            to_cell(&DataType::DateTime(45292.0)),
            Cell::Other("2024-01-01".to_string())
        );
        assert_eq!(
            to_cell(&DataType::DateTime(45292.5)),
            Cell::Other("2024-01-01T12:00:00".to_string())
        );
    }

    #[test]
    fn error_values_are_kept_apart_from_text() {
        assert_eq!(
            to_cell(&DataType::Error(CellErrorType::NA)),
            Cell::Error("#N/A".to_string())
        );
    }
}
