//! Morse-set CSV files.
//!
//! # Format
//! One row per cell of a Morse set, no header:
//! `min_0,..,min_{D-1},max_0,..,max_{D-1},node`, all fields numeric. The
//! number of Morse sets stored in a file is `max(node) + 1`.

use crate::algs::morse_graph::MorseGraphData;
use crate::grid::CubicalGrid;
use crate::morse_error::MorseError;
use std::io::{Read, Write};

/// Write every cell of every Morse set as a CSV row. Returns the number of rows.
///
/// Sets are written in decomposition order, each row tagged with its
/// Morse-graph vertex.
pub fn save_morse_sets<W: Write>(
    mut writer: W,
    data: &MorseGraphData,
    grid: &CubicalGrid,
) -> Result<usize, MorseError> {
    let mut rows = 0;
    for &vertex in &data.vertex_mapping {
        let cells = data
            .morse_sets
            .get(vertex)
            .ok_or(MorseError::MissingVertex(vertex))?;
        for &cell in cells {
            if cell >= grid.size() {
                return Err(MorseError::CellOutOfRange {
                    index: cell,
                    num_cells: grid.size(),
                });
            }
            let fields: Vec<String> = grid
                .min_vertex(cell)
                .into_iter()
                .chain(grid.max_vertex(cell))
                .map(|x| x.to_string())
                .collect();
            writeln!(writer, "{},{vertex}", fields.join(","))?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn parse_field(raw: &str, line_no: usize) -> Result<f64, MorseError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| MorseError::MorseSetParse(format!("line {line_no}: invalid number `{}`", raw.trim())))
}

/// Read rows written by [`save_morse_sets`]. Blank lines are skipped.
///
/// # Errors
/// [`MorseError::MorseSetParse`] for non-numeric fields, rows whose length is
/// not `2D + 1`, or rows of different lengths.
pub fn load_morse_sets<R: Read>(mut reader: R) -> Result<Vec<Vec<f64>>, MorseError> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (i, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = i + 1;
        let row = line
            .split(',')
            .map(|f| parse_field(f, line_no))
            .collect::<Result<Vec<_>, _>>()?;
        if row.len() < 3 || row.len() % 2 == 0 {
            return Err(MorseError::MorseSetParse(format!(
                "line {line_no}: expected 2D + 1 fields, found {}",
                row.len()
            )));
        }
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(MorseError::MorseSetParse(format!(
                    "line {line_no}: expected {} fields, found {}",
                    first.len(),
                    row.len()
                )));
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

/// `max(node) + 1` over the rows, `0` for no rows.
pub fn num_morse_sets(rows: &[Vec<f64>]) -> usize {
    rows.iter()
        .filter_map(|row| row.last())
        .map(|&node| node as usize + 1)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::dag::DirectedAcyclicGraph;
    use crate::topology::digraph::CellDigraph;

    fn data() -> (MorseGraphData, CubicalGrid) {
        let grid = CubicalGrid::new(vec![0.0, 0.0], vec![1.0, 2.0], vec![2, 2]).unwrap();
        let data = MorseGraphData {
            morse_graph: DirectedAcyclicGraph::from_edges([(1, 0)]),
            vertex_mapping: vec![1, 0],
            morse_sets: vec![vec![3], vec![0, 1]],
            digraph: CellDigraph::new(4),
        };
        (data, grid)
    }

    #[test]
    fn save_then_load() {
        let (data, grid) = data();
        let mut buf = Vec::new();
        assert_eq!(save_morse_sets(&mut buf, &data, &grid).unwrap(), 3);
        let text = String::from_utf8(buf.clone()).unwrap();
        assert_eq!(text, "0,0,0.5,1,1\n0.5,0,1,1,1\n0.5,1,1,2,0\n");
        let rows = load_morse_sets(buf.as_slice()).unwrap();
        assert_eq!(rows[2], vec![0.5, 1.0, 1.0, 2.0, 0.0]);
        assert_eq!(num_morse_sets(&rows), 2);
    }

    #[test]
    fn malformed_rows() {
        assert!(matches!(
            load_morse_sets("0,1,x\n".as_bytes()),
            Err(MorseError::MorseSetParse(_))
        ));
        assert!(matches!(
            load_morse_sets("0,1\n".as_bytes()),
            Err(MorseError::MorseSetParse(_))
        ));
        assert!(matches!(
            load_morse_sets("0,1,0\n0,0,1,1,0\n".as_bytes()),
            Err(MorseError::MorseSetParse(_))
        ));
        assert_eq!(load_morse_sets(" 0, 1, 3\n\n".as_bytes()).unwrap(), vec![vec![0.0, 1.0, 3.0]]);
        assert_eq!(num_morse_sets(&[]), 0);
    }
}
