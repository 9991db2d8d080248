//! Plain-text graph and partition serialization.
//!
//! The format is one edge per line, the two endpoint ids separated by
//! whitespace. A partition file holds the two edge blocks separated by a
//! blank line. Empty lines elsewhere are ignored on input.

use std::fs;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::graph::{Graph, GraphError};
use crate::solver::Partition;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parses an edge list, deriving the vertex set from the endpoints.
pub fn parse_edge_list(text: &str) -> Result<Graph, IoError> {
    let mut pairs = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        pairs.push(parse_pair(line, i + 1)?);
    }
    Ok(Graph::from_edges(pairs)?)
}

/// Reads an edge-list file.
pub fn read_edge_list(path: impl AsRef<Path>) -> Result<Graph, IoError> {
    let text = fs::read_to_string(path)?;
    parse_edge_list(&text)
}

/// Parses a partition file: two edge blocks separated by a blank line.
pub fn parse_partition(text: &str) -> Result<(Vec<(u32, u32)>, Vec<(u32, u32)>), IoError> {
    let mut first = Vec::new();
    let mut second = Vec::new();
    let mut in_second = false;
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            in_second = true;
            continue;
        }
        let pair = parse_pair(line, i + 1)?;
        if in_second {
            second.push(pair);
        } else {
            first.push(pair);
        }
    }
    Ok((first, second))
}

/// Writes the two sides of a partition, separated by a blank line.
pub fn write_partition(writer: &mut impl Write, partition: &Partition) -> std::io::Result<()> {
    for edge in &partition.side0 {
        writeln!(writer, "{} {}", edge.a(), edge.b())?;
    }
    writeln!(writer)?;
    for edge in &partition.side1 {
        writeln!(writer, "{} {}", edge.a(), edge.b())?;
    }
    Ok(())
}

/// Writes a bare edge list, e.g. the unchanged input as diagnostic output
/// when no partition exists.
pub fn write_edge_list(writer: &mut impl Write, graph: &Graph) -> std::io::Result<()> {
    for edge in graph.edges() {
        writeln!(writer, "{} {}", edge.a(), edge.b())?;
    }
    Ok(())
}

fn parse_pair(line: &str, line_no: usize) -> Result<(u32, u32), IoError> {
    let mut fields = line.split_whitespace();
    let mut next = |what: &str| {
        fields
            .next()
            .ok_or_else(|| IoError::Parse {
                line: line_no,
                message: format!("missing {}", what),
            })?
            .parse::<u32>()
            .map_err(|e| IoError::Parse {
                line: line_no,
                message: format!("bad {}: {}", what, e),
            })
    };
    let u = next("first endpoint")?;
    let v = next("second endpoint")?;
    if fields.next().is_some() {
        return Err(IoError::Parse {
            line: line_no,
            message: "trailing fields".to_string(),
        });
    }
    Ok((u, v))
}
