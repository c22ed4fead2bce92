//! Plain-text rendering of query results and the schema overview.

use nlsql_duck::QueryResult;
use nlsql_schema::TableMetadata;

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a result set as an aligned text table.
pub fn result_table(result: &QueryResult) -> String {
    if result.columns.is_empty() {
        return "(no results)".to_string();
    }

    let text_rows: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let mut widths: Vec<usize> = result.columns.iter().map(|c| c.len()).collect();
    for row in &text_rows {
        for (i, cell) in row.iter().enumerate() {
            if cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:width$}", c, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let header: Vec<String> = result.columns.clone();
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut lines = vec![format_row(&header), separator.join("-+-")];
    for row in &text_rows {
        lines.push(format_row(row));
    }
    lines.push(format!("({} rows)", result.row_count));

    lines.join("\n")
}

/// Render the structured schema overview for the `.schema` command.
pub fn schema_overview(tables: &[TableMetadata]) -> String {
    let mut lines = Vec::new();
    for table in tables {
        lines.push(format!("{}:", table.table_name));
        if let Some(description) = &table.description {
            lines.push(format!("  {}", description));
        }
        for column in &table.columns {
            lines.push(format!("  - {}: {}", column.name, column.description));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_aligned_table_with_row_count() {
        let result = QueryResult {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: vec![
                vec![serde_json::json!(1), serde_json::json!("Alice")],
                vec![serde_json::json!(2), serde_json::json!(null)],
            ],
            row_count: 2,
        };

        let table = result_table(&result);
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[0].contains("id"));
        assert!(lines[0].contains("name"));
        assert!(lines[2].contains("Alice"));
        assert!(lines[3].contains("NULL"));
        assert_eq!(*lines.last().unwrap(), "(2 rows)");
    }

    #[test]
    fn empty_result_renders_placeholder() {
        let result = QueryResult {
            columns: vec![],
            rows: vec![],
            row_count: 0,
        };
        assert_eq!(result_table(&result), "(no results)");
    }
}
