//! Validation, cleaning and grouping of the loaded table.

use crate::error::{Result, ToolError};
use crate::model::{
    AggregationResult, CATEGORY_COLUMN, Cell, CleanRecord, CleanedTable, Record, Table,
    VALUE_COLUMN,
};

/// Checks that both required columns exist and projects every row onto them.
///
/// A table without a header row fails here as well, while a header-only table
/// yields an empty record list.
pub fn validate(table: &Table) -> Result<Vec<Record>> {
    let category_idx = table.column_index(CATEGORY_COLUMN);
    let value_idx = table.column_index(VALUE_COLUMN);

    let (category_idx, value_idx) = match (category_idx, value_idx) {
        (Some(category_idx), Some(value_idx)) => (category_idx, value_idx),
        (category_idx, value_idx) => {
            let mut missing = Vec::new();
            if category_idx.is_none() {
                missing.push(CATEGORY_COLUMN.to_string());
            }
            if value_idx.is_none() {
                missing.push(VALUE_COLUMN.to_string());
            }
            return Err(ToolError::Schema { missing });
        }
    };

    let records = table
        .rows
        .iter()
        .map(|row| Record {
            category: row.get(category_idx).cloned().unwrap_or(Cell::Empty),
            value: row.get(value_idx).cloned().unwrap_or(Cell::Empty),
        })
        .collect();

    Ok(records)
}

/// Coerces a cell to a finite number. Anything else counts as missing.
pub fn coerce_value(cell: &Cell) -> Option<f64> {
    let number = match cell {
        Cell::Number(value) => *value,
        Cell::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            text.parse::<f64>().ok()?
        }
        Cell::Empty | Cell::Bool(_) | Cell::Other(_) | Cell::Error(_) => return None,
    };
    number.is_finite().then_some(number)
}

/// Returns the category text, or `None` when it is absent, blank or an
/// error value.
pub fn category_of(cell: &Cell) -> Option<String> {
    let text = match cell {
        Cell::Empty | Cell::Error(_) => return None,
        other => other.as_text(),
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Drops every record without a usable category or value.
pub fn clean(records: Vec<Record>) -> CleanedTable {
    let total = records.len();
    let rows: Vec<CleanRecord> = records
        .into_iter()
        .filter_map(|record| {
            let category = category_of(&record.category)?;
            let value = coerce_value(&record.value)?;
            Some(CleanRecord { category, value })
        })
        .collect();

    CleanedTable {
        dropped: total - rows.len(),
        rows,
    }
}

/// Sums values per category using exact string equality of the category.
pub fn aggregate(cleaned: &CleanedTable) -> AggregationResult {
    let mut result = AggregationResult::default();
    for row in &cleaned.rows {
        result.add(&row.category, row.value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    fn table(headers: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn reports_every_missing_column() {
        let err = validate(&table(&["Name", "Amount"], Vec::new())).unwrap_err();
        match err {
            ToolError::Schema { missing } => assert_eq!(missing, vec!["Category", "Value"]),
            other => panic!("unexpected error: {other}"),
        }

        let err = validate(&table(&["Category"], Vec::new())).unwrap_err();
        assert!(matches!(err, ToolError::Schema { missing } if missing == vec!["Value"]));
    }

    #[test]
    fn table_without_header_fails_validation() {
        let err = validate(&Table::default()).unwrap_err();
        assert!(matches!(err, ToolError::Schema { missing } if missing.len() == 2));
    }

    #[test]
    fn header_only_table_is_valid_and_empty() {
        let records = validate(&table(&["Category", "Value"], Vec::new())).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn projects_columns_by_header_and_ignores_extras() {
        let records = validate(&table(
            &["Value", "Note", "Category"],
            vec![vec![Cell::Number(4.0), text("ignored"), text("A")]],
        ))
        .unwrap();

        assert_eq!(
            records,
            vec![Record {
                category: text("A"),
                value: Cell::Number(4.0),
            }]
        );
    }

    #[test]
    fn coerces_numbers_and_numeric_text() {
        assert_eq!(coerce_value(&Cell::Number(2.5)), Some(2.5));
        assert_eq!(coerce_value(&text(" 10 ")), Some(10.0));
        assert_eq!(coerce_value(&text("-1e3")), Some(-1000.0));
        assert_eq!(coerce_value(&text("bad")), None);
        assert_eq!(coerce_value(&text("")), None);
        assert_eq!(coerce_value(&text("NaN")), None);
        assert_eq!(coerce_value(&text("inf")), None);
        assert_eq!(coerce_value(&Cell::Bool(true)), None);
        assert_eq!(coerce_value(&Cell::Empty), None);
        assert_eq!(coerce_value(&Cell::Other("2024-01-01".into())), None);
        assert_eq!(coerce_value(&Cell::Error("#DIV/0!".into())), None);
    }

    #[test]
    fn blank_categories_are_missing_but_text_is_kept_verbatim() {
        assert_eq!(category_of(&Cell::Empty), None);
        assert_eq!(category_of(&text("   ")), None);
        assert_eq!(category_of(&text(" A")), Some(" A".to_string()));
        assert_eq!(category_of(&Cell::Number(7.0)), Some("7".to_string()));
    }

    #[test]
    fn error_cells_are_missing_categories() {
        assert_eq!(category_of(&Cell::Error("#N/A".into())), None);

        let cleaned = clean(vec![
            Record { category: Cell::Error("#N/A".into()), value: Cell::Number(1.0) },
            Record { category: text("kept"), value: Cell::Number(2.0) },
        ]);
        assert_eq!(cleaned.dropped, 1);
        assert_eq!(aggregate(&cleaned).len(), 1);
    }

    #[test]
    fn date_categories_use_their_iso_text() {
        assert_eq!(
            category_of(&Cell::Other("2024-01-01".into())),
            Some("2024-01-01".to_string())
        );
    }

    #[test]
    fn aggregates_the_reference_rows() {
        let records = vec![
            Record { category: text("A"), value: Cell::Number(10.0) },
            Record { category: text("B"), value: Cell::Number(5.0) },
            Record { category: text("A"), value: Cell::Number(3.5) },
            Record { category: text("A"), value: text("bad") },
            Record { category: text("C"), value: Cell::Empty },
        ];

        let cleaned = clean(records);
        assert_eq!(cleaned.rows.len(), 3);
        assert_eq!(cleaned.dropped, 2);

        let result = aggregate(&cleaned);
        assert_eq!(result.len(), 2);
        assert_eq!(result.get("A"), Some(13.5));
        assert_eq!(result.get("B"), Some(5.0));
        assert_eq!(result.get("C"), None);
    }

    #[test]
    fn grouping_is_case_sensitive() {
        let cleaned = clean(vec![
            Record { category: text("a"), value: Cell::Number(1.0) },
            Record { category: text("A"), value: Cell::Number(2.0) },
        ]);
        let result = aggregate(&cleaned);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn totals_are_conserved() {
        let values = [1.25, 2.5, -0.75, 100.0, 3.0, 0.5];
        let categories = ["x", "y", "x", "z", "y", "x"];
        let records = categories
            .iter()
            .zip(values)
            .map(|(category, value)| Record {
                category: text(category),
                value: Cell::Number(value),
            })
            .collect();

        let result = aggregate(&clean(records));
        let expected: f64 = values.iter().sum();
        assert!((result.grand_total() - expected).abs() < 1e-9);
    }

    #[test]
    fn output_order_is_sorted_by_category() {
        let cleaned = clean(vec![
            Record { category: text("pear"), value: Cell::Number(1.0) },
            Record { category: text("apple"), value: Cell::Number(1.0) },
            Record { category: text("fig"), value: Cell::Number(1.0) },
        ]);
        let order: Vec<String> = aggregate(&cleaned)
            .entries()
            .into_iter()
            .map(|entry| entry.category)
            .collect();
        assert_eq!(order, vec!["apple", "fig", "pear"]);
    }
}
