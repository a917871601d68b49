//! Migration-script conversion: lift the literal absence INSERTs out of a
//! Flyway SQL file and write them out as CSV.

use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

/// One absence row extracted from the migration script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsenceRecord {
    pub email: String,
    pub start_date: String,
    pub end_date: String,
    pub kind: String,
}

/// Matches the exact statement shape the migration generator emits:
///
///   INSERT INTO absence (id, user_id, start_date, end_date, type)
///   SELECT '<uuid>', id, '<start>', '<end>', '<TYPE>'
///   FROM app_user WHERE email = '<email>';
const INSERT_PATTERN: &str = r"INSERT INTO absence \(id, user_id, start_date, end_date, type\)\s*SELECT '[^']+', id, '([^']+)', '([^']+)', '([^']+)'\s*FROM app_user WHERE email = '([^']+)';";

/// Extract every absence INSERT from the script, in file order.
/// Statements that do not match the pattern are ignored.
pub fn parse_absences(sql: &str) -> Result<Vec<AbsenceRecord>> {
    let pattern = Regex::new(INSERT_PATTERN).context("invalid absence INSERT pattern")?;
    Ok(pattern
        .captures_iter(sql)
        .map(|caps| AbsenceRecord {
            start_date: caps[1].to_string(),
            end_date: caps[2].to_string(),
            kind: caps[3].to_string(),
            email: caps[4].to_string(),
        })
        .collect())
}

/// Quote a field only when it carries a comma, quote or line break.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render records as CSV with the header the importer expects.
pub fn render_csv(records: &[AbsenceRecord]) -> String {
    let mut out = String::from("email,startDate,endDate,type\n");
    for record in records {
        out.push_str(&csv_field(&record.email));
        out.push(',');
        out.push_str(&csv_field(&record.start_date));
        out.push(',');
        out.push_str(&csv_field(&record.end_date));
        out.push(',');
        out.push_str(&csv_field(&record.kind));
        out.push('\n');
    }
    out
}

/// Convert the SQL migration at `input` into a CSV file at `output`.
/// Returns the number of converted records.
pub fn convert(input: &Path, output: &Path) -> Result<usize> {
    let sql = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let records = parse_absences(&sql)?;
    std::fs::write(output, render_csv(&records))
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
-- V5__insert_absences_2026.sql
INSERT INTO absence (id, user_id, start_date, end_date, type)
SELECT 'a3f1c9', id, '2026-02-02', '2026-02-06', 'CP'
FROM app_user WHERE email = 'jean.dupont@example.fr';

INSERT INTO app_user (id, email) VALUES ('x1', 'ignored@example.fr');

INSERT INTO absence (id, user_id, start_date, end_date, type)
SELECT 'b7d2e4', id, '2026-07-13', '2026-07-17', 'RTT'
FROM app_user WHERE email = 'marie.curie@example.fr';
";

    #[test]
    fn extracts_absence_inserts_and_ignores_other_statements() {
        let records = parse_absences(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            AbsenceRecord {
                email: "jean.dupont@example.fr".into(),
                start_date: "2026-02-02".into(),
                end_date: "2026-02-06".into(),
                kind: "CP".into(),
            }
        );
        assert_eq!(records[1].kind, "RTT");
    }

    #[test]
    fn renders_header_and_rows_in_column_order() {
        let records = parse_absences(SAMPLE).unwrap();
        let csv = render_csv(&records);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("email,startDate,endDate,type"));
        assert_eq!(
            lines.next(),
            Some("jean.dupont@example.fr,2026-02-02,2026-02-06,CP")
        );
        assert_eq!(
            lines.next(),
            Some("marie.curie@example.fr,2026-07-13,2026-07-17,RTT")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn fields_with_separators_get_quoted() {
        let records = vec![AbsenceRecord {
            email: "a@example.fr".into(),
            start_date: "2026-01-05".into(),
            end_date: "2026-01-09".into(),
            kind: "CP, solde 2025".into(),
        }];
        let csv = render_csv(&records);
        assert!(csv.contains("\"CP, solde 2025\""));
    }

    #[test]
    fn file_round_trip_reports_record_count() {
        let dir = tempfile::tempdir().unwrap();
        let sql_path = dir.path().join("V5__insert_absences_2026.sql");
        let csv_path = dir.path().join("default-absences.csv");
        std::fs::write(&sql_path, SAMPLE).unwrap();

        let count = convert(&sql_path, &csv_path).unwrap();
        assert_eq!(count, 2);

        let written = std::fs::read_to_string(&csv_path).unwrap();
        assert!(written.starts_with("email,startDate,endDate,type\n"));
        assert_eq!(written.lines().count(), 3);
    }
}
