use predict_core::parse::parse_table;
use pretty_assertions::assert_eq;

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

#[test]
fn caption_rows_and_summary() {
    let table = parse_table("Header\n1 2 3\n4 5 6\nSummary line").unwrap();

    assert_eq!(table.caption, "Header");
    assert_eq!(table.rows, vec![row(&["1", "2", "3"]), row(&["4", "5", "6"])]);
    assert_eq!(table.summary, "Summary line");
}

#[test]
fn blank_lines_and_whitespace_runs_are_skipped() {
    let table = parse_table("Header\n\n1   2\t 3\n   \n4 5 6\n\nSummary line\n\n").unwrap();

    assert_eq!(table.rows, vec![row(&["1", "2", "3"]), row(&["4", "5", "6"])]);
    assert_eq!(table.summary, "Summary line");
}

#[test]
fn ragged_rows_are_kept() {
    let table = parse_table("Year Price\n2021 3.01\n2022 3.95 spike\n2023\nAverage 3.48").unwrap();

    assert_eq!(
        table.rows,
        vec![row(&["2021", "3.01"]), row(&["2022", "3.95", "spike"]), row(&["2023"])]
    );
    assert_eq!(table.summary, "Average 3.48");
}

#[test]
fn single_line_is_not_a_table() {
    assert_eq!(parse_table("just one line"), None);
    assert_eq!(parse_table("   \n  "), None);
}

#[test]
fn caption_and_summary_without_rows() {
    let table = parse_table("Header\nSummary").unwrap();
    assert!(table.rows.is_empty());
    assert_eq!(table.summary, "Summary");
}
