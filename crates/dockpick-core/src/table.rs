//! ASCII table of the container snapshot
//!
//! Column widths follow the live data: each column is as wide as its
//! longest value, bounded below by the column minimum and, for names and
//! ports, above by [`MAX_NAME_WIDTH`] / [`MAX_PORTS_WIDTH`].

use crate::ports::{abbreviate_ports, truncate_ports, truncate_to_width};
use crate::theme::Palette;
use crate::ContainerRow;
use dockpick_config::Config;
use unicode_width::UnicodeWidthStr;

pub const MIN_INDEX_WIDTH: usize = 3;
pub const MIN_NAME_WIDTH: usize = 15;
pub const MIN_IP_WIDTH: usize = 10;
pub const MIN_UPTIME_WIDTH: usize = 6;
pub const MIN_PORTS_WIDTH: usize = 5;
pub const MIN_FAVORITE_WIDTH: usize = 1;
pub const MAX_NAME_WIDTH: usize = 50;
pub const MAX_PORTS_WIDTH: usize = 50;

const NOT_AVAILABLE: &str = "N/A";
const FAVORITE_MARKER: &str = "*";

/// Bucket an elapsed duration into the largest whole unit
pub fn format_uptime(elapsed_secs: Option<i64>) -> String {
    let Some(secs) = elapsed_secs else {
        return NOT_AVAILABLE.to_string();
    };
    let secs = secs.max(0);
    if secs >= 86_400 {
        format!("{}d", secs / 86_400)
    } else if secs >= 3_600 {
        format!("{}h", secs / 3_600)
    } else if secs >= 60 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

/// Rendered (but not yet truncated) text of one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCells {
    pub index: String,
    pub name: String,
    pub ip: String,
    pub uptime: String,
    pub ports: String,
    pub favorite: String,
}

impl RowCells {
    /// Build the cells for the row at 1-based `index`
    pub fn build(index: usize, row: &ContainerRow, favorites: &[String], now: i64) -> Self {
        let attrs = row.attrs.as_ref();
        Self {
            index: index.to_string(),
            name: row.name.clone(),
            ip: attrs
                .and_then(|a| a.ip_address.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            uptime: format_uptime(attrs.and_then(|a| a.started_at).map(|s| now - s)),
            ports: abbreviate_ports(
                attrs
                    .and_then(|a| a.port_summary.as_deref())
                    .unwrap_or(NOT_AVAILABLE),
            ),
            favorite: if favorites.iter().any(|f| *f == row.name) {
                FAVORITE_MARKER.to_string()
            } else {
                String::new()
            },
        }
    }
}

/// Column widths for one render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub detailed: bool,
    pub index: usize,
    pub name: usize,
    pub ip: usize,
    pub uptime: usize,
    pub ports: usize,
    pub favorite: usize,
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, min: usize, max: Option<usize>) -> usize {
    let widest = values.map(UnicodeWidthStr::width).max().unwrap_or(0);
    let width = widest.max(min);
    match max {
        Some(max) => width.min(max),
        None => width,
    }
}

/// Compute column widths from the current rows
pub fn compute_layout(cells: &[RowCells], detailed: bool) -> Layout {
    Layout {
        detailed,
        index: column_width(cells.iter().map(|c| c.index.as_str()), MIN_INDEX_WIDTH, None),
        name: column_width(
            cells.iter().map(|c| c.name.as_str()),
            MIN_NAME_WIDTH,
            Some(MAX_NAME_WIDTH),
        ),
        ip: column_width(cells.iter().map(|c| c.ip.as_str()), MIN_IP_WIDTH, None),
        uptime: column_width(cells.iter().map(|c| c.uptime.as_str()), MIN_UPTIME_WIDTH, None),
        ports: column_width(
            cells.iter().map(|c| c.ports.as_str()),
            MIN_PORTS_WIDTH,
            Some(MAX_PORTS_WIDTH),
        ),
        favorite: column_width(
            cells.iter().map(|c| c.favorite.as_str()),
            MIN_FAVORITE_WIDTH,
            None,
        ),
    }
}

impl Layout {
    fn widths(&self) -> Vec<usize> {
        if self.detailed {
            vec![
                self.index,
                self.name,
                self.ip,
                self.uptime,
                self.ports,
                self.favorite,
            ]
        } else {
            vec![self.index, self.name]
        }
    }

    /// `+-----+------+` rule spanning every column
    pub fn rule(&self) -> String {
        let mut line = String::from("+");
        for width in self.widths() {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    }
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    match align {
        Align::Left => format!("{}{}", text, fill),
        Align::Right => format!("{}{}", fill, text),
    }
}

/// Renders the snapshot as an ASCII table
#[derive(Debug, Clone)]
pub struct TableRenderer {
    palette: Palette,
}

impl TableRenderer {
    pub fn new(config: &Config) -> Self {
        Self::with_palette(Palette::from_config(config))
    }

    pub fn with_palette(palette: Palette) -> Self {
        Self { palette }
    }

    /// Render using the current time for uptimes
    pub fn render(&self, rows: &[ContainerRow], detailed: bool, favorites: &[String]) -> String {
        self.render_at(rows, detailed, favorites, chrono::Utc::now().timestamp())
    }

    /// Render with uptimes measured against `now` (unix seconds)
    pub fn render_at(
        &self,
        rows: &[ContainerRow],
        detailed: bool,
        favorites: &[String],
        now: i64,
    ) -> String {
        let cells: Vec<RowCells> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| RowCells::build(i + 1, row, favorites, now))
            .collect();
        let layout = compute_layout(&cells, detailed);
        let rule = layout.rule();

        let header = RowCells {
            index: "#".to_string(),
            name: "NAME".to_string(),
            ip: "IP".to_string(),
            uptime: "UPTIME".to_string(),
            ports: "PORTS".to_string(),
            favorite: FAVORITE_MARKER.to_string(),
        };

        let mut lines = Vec::with_capacity(cells.len() + 4);
        lines.push(rule.clone());
        lines.push(self.format_row(&header, &layout, true));
        lines.push(rule.clone());
        for row in &cells {
            lines.push(self.format_row(row, &layout, false));
        }
        lines.push(rule);

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn format_row(&self, cells: &RowCells, layout: &Layout, header: bool) -> String {
        let mut columns = vec![
            pad(&cells.index, layout.index, Align::Right),
            pad(
                &truncate_to_width(&cells.name, layout.name),
                layout.name,
                Align::Left,
            ),
        ];
        if layout.detailed {
            columns.push(pad(&cells.ip, layout.ip, Align::Left));
            columns.push(pad(&cells.uptime, layout.uptime, Align::Right));
            columns.push(pad(
                &truncate_ports(&cells.ports, layout.ports),
                layout.ports,
                Align::Left,
            ));
            columns.push(pad(&cells.favorite, layout.favorite, Align::Left));
        }

        // Colour is applied after padding so escape codes never count as width
        let columns: Vec<String> = if header {
            columns.iter().map(|c| self.palette.header(c)).collect()
        } else if layout.detailed && !cells.favorite.is_empty() {
            let last = columns.len() - 1;
            columns
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    if i == last {
                        self.palette.warning(c)
                    } else {
                        c.clone()
                    }
                })
                .collect()
        } else {
            columns
        };

        format!("| {} |", columns.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContainerAttrs;
    use pretty_assertions::assert_eq;

    const NOW: i64 = 1_700_000_000;

    fn renderer() -> TableRenderer {
        TableRenderer::with_palette(Palette::plain())
    }

    fn simple(names: &[&str]) -> Vec<ContainerRow> {
        names.iter().map(|n| ContainerRow::simple(*n)).collect()
    }

    #[test]
    fn test_uptime_buckets() {
        assert_eq!(format_uptime(Some(90_000)), "1d");
        assert_eq!(format_uptime(Some(5_000)), "1h");
        assert_eq!(format_uptime(Some(90)), "1m");
        assert_eq!(format_uptime(Some(10)), "10s");
        assert_eq!(format_uptime(Some(86_400)), "1d");
        assert_eq!(format_uptime(Some(0)), "0s");
        assert_eq!(format_uptime(Some(-5)), "0s");
        assert_eq!(format_uptime(None), "N/A");
    }

    #[test]
    fn test_simple_table() {
        let out = renderer().render_at(&simple(&["web", "db"]), false, &[], NOW);
        let expected = "\
+-----+-----------------+
|   # | NAME            |
+-----+-----------------+
|   1 | web             |
|   2 | db              |
+-----+-----------------+
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_long_name_capped_and_truncated() {
        let long = "this-is-a-very-long-container-name-that-exceeds-fifty-characters-xx";
        assert!(long.len() > MAX_NAME_WIDTH);
        let rows = simple(&["a", long]);

        let cells: Vec<RowCells> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| RowCells::build(i + 1, r, &[], NOW))
            .collect();
        let layout = compute_layout(&cells, false);
        assert_eq!(layout.name, 50);

        let out = renderer().render_at(&rows, false, &[], NOW);
        let expected_cell = format!("{}...", &long[..47]);
        let row = out.lines().nth(4).unwrap();
        assert_eq!(row, format!("|   2 | {} |", expected_cell));
        assert!(out.lines().all(|l| l.width() == out.lines().next().unwrap().width()));
    }

    #[test]
    fn test_name_width_tracks_longest_name() {
        let cells = vec![RowCells::build(
            1,
            &ContainerRow::simple("twenty-chars-long-xx"),
            &[],
            NOW,
        )];
        assert_eq!(compute_layout(&cells, false).name, 20);
    }

    #[test]
    fn test_index_width_grows_past_minimum() {
        let names: Vec<String> = (0..1000).map(|i| format!("c{}", i)).collect();
        let rows: Vec<ContainerRow> = names.iter().map(ContainerRow::simple).collect();
        let cells: Vec<RowCells> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| RowCells::build(i + 1, r, &[], NOW))
            .collect();
        assert_eq!(compute_layout(&cells, false).index, 4);
    }

    #[test]
    fn test_detailed_table() {
        let rows = vec![
            ContainerRow::detailed(
                "web",
                ContainerAttrs {
                    ip_address: Some("172.17.0.2".to_string()),
                    started_at: Some(NOW - 5_000),
                    port_summary: Some("0.0.0.0:8080->8080/tcp, :::8080->8080/tcp".to_string()),
                },
            ),
            ContainerRow::simple("db"),
        ];
        let out = renderer().render_at(&rows, true, &["db".to_string()], NOW);
        let expected = "\
+-----+-----------------+------------+--------+--------+---+
|   # | NAME            | IP         | UPTIME | PORTS  | * |
+-----+-----------------+------------+--------+--------+---+
|   1 | web             | 172.17.0.2 |     1h | 8080→* |   |
|   2 | db              | N/A        |    N/A | N/A    | * |
+-----+-----------------+------------+--------+--------+---+
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_detailed_ports_truncated_at_cap() {
        let summary = (8000..8015)
            .map(|p| format!("0.0.0.0:{}->{}/tcp", p, p + 1000))
            .collect::<Vec<_>>()
            .join(", ");
        let rows = vec![ContainerRow::detailed(
            "web",
            ContainerAttrs {
                ip_address: None,
                started_at: None,
                port_summary: Some(summary),
            },
        )];
        let cells = vec![RowCells::build(1, &rows[0], &[], NOW)];
        assert_eq!(compute_layout(&cells, true).ports, MAX_PORTS_WIDTH);

        let out = renderer().render_at(&rows, true, &[], NOW);
        assert!(out.contains("| 8000→9000... "));
    }

    #[test]
    fn test_toggling_modes_keeps_rows() {
        let rows = simple(&["b", "a"]);
        let first = renderer().render_at(&rows, false, &[], NOW);
        let _ = renderer().render_at(&rows, true, &[], NOW);
        let again = renderer().render_at(&rows, false, &[], NOW);
        assert_eq!(first, again);
    }

    #[test]
    fn test_empty_table_uses_minimums() {
        let out = renderer().render_at(&[], false, &[], NOW);
        assert_eq!(out.lines().next().unwrap(), "+-----+-----------------+");
        assert_eq!(out.lines().count(), 4);
    }
}
