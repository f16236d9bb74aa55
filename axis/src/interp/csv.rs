//! Delimited-text tables for `read_csv` / `write_csv`
//!
//! The format is minimal: a header line of comma-separated field
//! names followed by comma-separated cells in the same order. There is no
//! quoting or escaping, so a cell containing a comma or a line break cannot
//! be represented faithfully.

use super::value::{Mapping, Value};
use std::fs;
use std::io;
use std::path::Path;

/// Parse a table into one mapping per data row (field name -> cell text).
///
/// Blank lines before the header are skipped. After it, a blank line is a
/// row whose only cell is empty when the table has one column, and is skipped
/// otherwise (a multi-column row always contains a comma). Rows shorter than
/// the header get empty cells for the missing columns; cells beyond the
/// header are dropped.
pub fn parse(text: &str) -> Vec<Mapping> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().skip_while(|line| line.trim().is_empty());

    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let fields: Vec<&str> = header.split(',').collect();
    let single_column = fields.len() == 1;

    lines
        .filter(|line| single_column || !line.trim().is_empty())
        .map(|line| {
            let mut cells = line.split(',');
            fields
                .iter()
                .map(|field| {
                    let cell = cells.next().unwrap_or("");
                    (*field, Value::from(cell))
                })
                .collect::<Mapping>()
        })
        .collect()
}

/// Render rows under the given header. Missing cells are written empty.
pub fn render(fields: &[String], rows: &[&Mapping]) -> String {
    let mut out = fields.join(",");
    out.push('\n');
    for row in rows {
        let line: Vec<String> = fields
            .iter()
            .map(|field| row.get(field).map(cell_text).unwrap_or_default())
            .collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Absence => String::new(),
        other => other.to_string(),
    }
}

/// Read and parse a table from disk
pub fn read(path: impl AsRef<Path>) -> io::Result<Vec<Mapping>> {
    let text = fs::read_to_string(path)?;
    Ok(parse(&text))
}

/// Render and write a table to disk, replacing any existing file
pub fn write(path: impl AsRef<Path>, fields: &[String], rows: &[&Mapping]) -> io::Result<()> {
    let unrepresentable = rows
        .iter()
        .flat_map(|row| row.iter())
        .filter(|(_, v)| {
            let text = cell_text(v);
            text.contains(',') || text.contains('\n')
        })
        .count();
    if unrepresentable > 0 {
        tracing::warn!(
            path = %path.as_ref().display(),
            cells = unrepresentable,
            "cells containing ',' or line breaks will not read back as written"
        );
    }
    fs::write(path, render(fields, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> Mapping {
        cells.iter().map(|(k, v)| (*k, Value::from(*v))).collect()
    }

    #[test]
    fn test_parse_basic() {
        let rows = parse("name,age\nana,31\nbo,4\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], row(&[("name", "ana"), ("age", "31")]));
        assert_eq!(rows[1].get("age"), Some(&Value::from("4")));
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["name", "age"]);
    }

    #[test]
    fn test_parse_empty_and_header_only() {
        assert!(parse("").is_empty());
        assert!(parse("a,b\n").is_empty());
    }

    #[test]
    fn test_parse_crlf_and_blank_lines() {
        let rows = parse("a,b\r\n1,2\r\n\r\n3,4\r\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], row(&[("a", "3"), ("b", "4")]));
    }

    #[test]
    fn test_parse_single_column_blank_lines_are_rows() {
        let rows = parse("note\n\nx\n  \n");
        assert_eq!(
            rows,
            vec![row(&[("note", "")]), row(&[("note", "x")]), row(&[("note", "  ")])]
        );
    }

    #[test]
    fn test_single_column_empty_cell_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.csv");
        let rows = vec![row(&[("note", "")]), row(&[("note", "x")])];
        let refs: Vec<&Mapping> = rows.iter().collect();
        write(&path, &["note".to_string()], &refs).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "note\n\nx\n");
        assert_eq!(read(&path).unwrap(), rows);
    }

    #[test]
    fn test_parse_ragged_rows() {
        let rows = parse("a,b,c\n1\n1,2,3,4\n");
        assert_eq!(rows[0], row(&[("a", "1"), ("b", ""), ("c", "")]));
        assert_eq!(rows[1], row(&[("a", "1"), ("b", "2"), ("c", "3")]));
    }

    #[test]
    fn test_render_missing_cells() {
        let r1 = row(&[("a", "1"), ("b", "2")]);
        let r2 = row(&[("b", "3")]);
        let out = render(&["a".to_string(), "b".to_string()], &[&r1, &r2]);
        assert_eq!(out, "a,b\n1,2\n,3\n");
    }

    #[test]
    fn test_render_non_text_cells() {
        let mut r = Mapping::new();
        r.insert("n", Value::Number(2.0));
        r.insert("ok", Value::Bool(true));
        r.insert("none", Value::Absence);
        let fields: Vec<String> = r.keys().map(String::from).collect();
        assert_eq!(render(&fields, &[&r]), "n,ok,none\n2,true,\n");
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let rows = vec![row(&[("x", "1"), ("y", "a")]), row(&[("x", "2"), ("y", "b")])];
        let refs: Vec<&Mapping> = rows.iter().collect();
        write(&path, &["x".to_string(), "y".to_string()], &refs).unwrap();
        assert_eq!(read(&path).unwrap(), rows);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(dir.path().join("absent.csv")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
