/// Caption, whitespace-separated rows and a trailing summary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    pub caption: String,
    pub rows: Vec<Vec<String>>,
    pub summary: String,
}

/// Parses `caption \n row \n row ... \n summary`.
///
/// Blank lines are ignored everywhere, rows may have different cell counts.
/// Returns `None` when there are not even a caption and a summary line.
pub fn parse_table(text: &str) -> Option<TableBlock> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let (caption, rest) = lines.split_first()?;
    let (summary, interior) = rest.split_last()?;

    let rows = interior
        .iter()
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect();

    Some(TableBlock {
        caption: caption.to_string(),
        rows,
        summary: summary.to_string(),
    })
}
