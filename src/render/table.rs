//! Opportunistic table detection over styled lines.
//!
//! A table is accepted only when a plausible seed line, a stable
//! column axis and at least two physical rows all line up; anything
//! weaker falls through to paragraph handling.

use crate::model::Span;

use super::markdown::{normalize_spaces, LineStyle};
use super::options::RenderOptions;

/// Lines examined when collecting the column axis.
const COLUMN_SCAN_WINDOW: usize = 14;
/// Fraction of the median column gap a row's mean anchor distance may use.
const ROW_FIT_RATIO: f32 = 0.9;
/// Font-size growth that breaks row absorption.
const ROW_SIZE_BREAK_RATIO: f32 = 1.25;
/// Vertical clustering of lines into physical rows.
const ROW_CLUSTER_FLOOR: f32 = 10.0;
const ROW_CLUSTER_SCALE: f32 = 2.0;
/// Font-size share of body size below which typography reads as tabular.
const COMPACT_SIZE_RATIO: f32 = 0.92;
/// Longest text that can read as a SKU.
const SKU_MAX_CHARS: usize = 24;
/// Separators expected inside a SKU.
const SKU_SEPARATORS: [char; 4] = ['-', '/', '–', '—'];
/// Keywords that can seed a table from its first line.
const SEED_KEYWORDS: [&str; 6] = ["sku", "description", "unit", "price", "measure", "notes"];
/// Keywords that mark a header row.
const HEADER_KEYWORDS: [&str; 7] = [
    "sku",
    "description",
    "unit",
    "price",
    "measure",
    "notes",
    "usd",
];

/// A detected table: clustered rows, consumed source lines, header flag.
#[derive(Debug, Clone)]
pub(crate) struct TableCapture {
    /// Cell text per row; every row has the same number of cells
    pub(crate) rows: Vec<Vec<String>>,
    /// Number of source lines consumed
    pub(crate) used: usize,
    /// Whether the first row is a (detected or inherited) header
    pub(crate) has_header: bool,
}

/// One cell accumulated from adjacent spans.
#[derive(Debug, Clone)]
struct Cell {
    x: f32,
    text: String,
}

/// A source line fitted onto the column axis.
struct FittedLine {
    y: f32,
    font_size: f32,
    cells: Vec<String>,
}

/// Try to read a table starting at `lines[0]`.
///
/// `remembered` is the last detected header of this document, offered
/// to continuation tables that start directly with SKU rows.
pub(crate) fn consume_table(
    lines: &[LineStyle],
    body_size: f32,
    remembered: Option<&[String]>,
    options: &RenderOptions,
) -> Option<TableCapture> {
    let seed = lines.first()?;
    if !is_table_seed(seed, body_size, options) {
        return None;
    }

    let anchors = column_axis(lines, body_size, options)?;
    let gap_median = median_gap(&anchors);

    // Absorb rows while they keep fitting the axis.
    let mut fitted: Vec<FittedLine> = Vec::new();
    let mut max_size = 0.0f32;
    let mut used = 0;
    while used < lines.len() {
        let line = &lines[used];
        if max_size > 0.0 && line.font_size > max_size * ROW_SIZE_BREAK_RATIO {
            break;
        }
        match fit_line(line, &anchors, gap_median, options) {
            Some(fit) => {
                max_size = max_size.max(line.font_size);
                fitted.push(fit);
                used += 1;
            }
            None => break,
        }
    }
    if fitted.is_empty() {
        return None;
    }

    let mut rows = cluster_rows(fitted);
    if rows.len() < 2 {
        return None;
    }

    let mut has_header = is_header_row(&rows[0]);
    if !has_header {
        if let Some(header) = remembered {
            if header.len() == rows[0].len() && looks_like_sku(&rows[0][0]) {
                rows.insert(0, header.to_vec());
                has_header = true;
            }
        }
    }

    log::debug!(
        "table: {} columns x {} rows over {} lines, header={}",
        anchors.len(),
        rows.len(),
        used,
        has_header
    );

    Some(TableCapture {
        rows,
        used,
        has_header,
    })
}

/// Whether a line is plausible as the first line of a table.
fn is_table_seed(line: &LineStyle, body_size: f32, options: &RenderOptions) -> bool {
    let cells = cell_starts(line, options);

    if cells.len() >= 3 {
        return true;
    }
    if let Some(first) = cells.first() {
        if looks_like_sku(&first.text) {
            return true;
        }
    }
    let lower = line.text.to_lowercase();
    if SEED_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return true;
    }
    line.font_size <= body_size * COMPACT_SIZE_RATIO && cells.len() >= 2
}

/// Split a line's spans into cells at oversized horizontal gaps.
fn cell_starts(line: &LineStyle, options: &RenderOptions) -> Vec<Cell> {
    let threshold = options
        .cell_gap_floor
        .max(line.font_size * options.cell_gap_font_scale);

    let mut cells: Vec<Cell> = Vec::new();
    let mut current: Vec<&Span> = Vec::new();

    let close = |group: &mut Vec<&Span>, cells: &mut Vec<Cell>| {
        if group.is_empty() {
            return;
        }
        let texts: Vec<&str> = group.iter().map(|s| s.text.trim()).collect();
        cells.push(Cell {
            x: group[0].pos.x,
            text: normalize_spaces(&texts.join(" ")),
        });
        group.clear();
    };

    for span in &line.spans {
        if span.text.trim().is_empty() {
            continue;
        }
        if let Some(prev) = current.last() {
            let gap = span.pos.x - (prev.pos.x + prev.pos.width);
            if gap > threshold {
                close(&mut current, &mut cells);
            }
        }
        current.push(span);
    }
    close(&mut current, &mut cells);

    cells
}

/// Cluster cell starts of the leading lines into column anchors.
fn column_axis(lines: &[LineStyle], body_size: f32, options: &RenderOptions) -> Option<Vec<f32>> {
    let mut starts: Vec<f32> = Vec::new();
    for line in lines.iter().take(COLUMN_SCAN_WINDOW) {
        let cells = cell_starts(line, options);
        if cells.len() < 2 {
            continue;
        }
        // Two-cell lines at body typography are more likely label/value
        // pairs than table rows.
        if cells.len() == 2 && line.font_size > body_size * COMPACT_SIZE_RATIO {
            continue;
        }
        starts.extend(cells.iter().map(|c| c.x));
    }

    let anchors = merge_anchors(
        merge_anchors(starts, options.column_merge_tol1),
        options.column_merge_tol2,
    );

    if anchors.len() < options.table_min_cols || anchors.len() > options.table_max_cols {
        return None;
    }
    if median_gap(&anchors) < options.table_min_row_gap {
        return None;
    }
    Some(anchors)
}

/// One-dimensional sweep merge: sort, then average neighbors within `tol`.
fn merge_anchors(mut xs: Vec<f32>, tol: f32) -> Vec<f32> {
    if xs.is_empty() {
        return xs;
    }
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut merged = vec![xs[0]];
    for x in xs.into_iter().skip(1) {
        let last = merged.last_mut().expect("merged is non-empty");
        if (x - *last).abs() <= tol {
            *last = (*last + x) / 2.0;
        } else {
            merged.push(x);
        }
    }
    merged
}

/// Median gap between adjacent anchors; 0 when fewer than two.
fn median_gap(anchors: &[f32]) -> f32 {
    if anchors.len() < 2 {
        return 0.0;
    }
    let mut gaps: Vec<f32> = anchors.windows(2).map(|w| w[1] - w[0]).collect();
    gaps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    gaps[gaps.len() / 2]
}

/// Assign a line's cells to the nearest anchors; reject poor fits.
fn fit_line(
    line: &LineStyle,
    anchors: &[f32],
    gap_median: f32,
    options: &RenderOptions,
) -> Option<FittedLine> {
    let cells = cell_starts(line, options);
    if cells.is_empty() {
        return None;
    }

    let mut assigned: Vec<Vec<String>> = vec![Vec::new(); anchors.len()];
    let mut total_dist = 0.0f32;
    for cell in &cells {
        let idx = nearest(anchors, cell.x);
        total_dist += (cell.x - anchors[idx]).abs();
        if !cell.text.is_empty() {
            assigned[idx].push(cell.text.clone());
        }
    }

    let mean = total_dist / cells.len() as f32;
    if mean > gap_median * ROW_FIT_RATIO {
        return None;
    }
    if assigned.iter().all(|texts| texts.is_empty()) {
        return None;
    }

    Some(FittedLine {
        y: line.y,
        font_size: line.font_size,
        cells: assigned.into_iter().map(|texts| texts.join(" ")).collect(),
    })
}

/// Index of the anchor closest to `x`.
fn nearest(anchors: &[f32], x: f32) -> usize {
    let mut best = 0;
    let mut best_dist = f32::MAX;
    for (i, anchor) in anchors.iter().enumerate() {
        let dist = (anchor - x).abs();
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// Merge vertically adjacent lines into physical rows.
///
/// Wrapped cell text sits on sub-lines close beneath its row; a gap
/// larger than the cluster threshold starts the next row.
fn cluster_rows(fitted: Vec<FittedLine>) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut prev: Option<(f32, f32)> = None; // (y, font_size)

    for line in fitted {
        let same_row = match prev {
            Some((prev_y, prev_size)) => {
                let threshold =
                    ROW_CLUSTER_FLOOR.max(prev_size.max(line.font_size) * ROW_CLUSTER_SCALE);
                prev_y - line.y <= threshold
            }
            None => false,
        };
        prev = Some((line.y, line.font_size));

        if same_row {
            if let Some(row) = rows.last_mut() {
                for (slot, text) in row.iter_mut().zip(line.cells.iter()) {
                    if text.is_empty() {
                        continue;
                    }
                    if slot.is_empty() {
                        slot.push_str(text);
                    } else {
                        slot.push(' ');
                        slot.push_str(text);
                    }
                }
                continue;
            }
        }
        rows.push(line.cells);
    }

    rows
}

/// Whether a row's text reads as a column header.
fn is_header_row(row: &[String]) -> bool {
    let joined = row.join(" ").to_lowercase();
    let hits = HEADER_KEYWORDS
        .iter()
        .filter(|k| joined.contains(*k))
        .count();
    hits >= 2 && !row.first().map(|c| looks_like_sku(c)).unwrap_or(false)
}

/// Mixed letters and digits with a separator, short enough for a part
/// number.
fn looks_like_sku(text: &str) -> bool {
    if text.is_empty() || text.chars().count() > SKU_MAX_CHARS {
        return false;
    }
    text.chars().any(|c| c.is_alphabetic())
        && text.chars().any(|c| c.is_ascii_digit())
        && text.chars().any(|c| SKU_SEPARATORS.contains(&c))
}
