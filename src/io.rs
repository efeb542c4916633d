//! Plain text formats for circuits and segment sets.
//!
//! Circuit files hold one circuit per line: an integer id, a colon, the
//! vertices as whitespace separated `x y` pairs in traversal order (first
//! vertex repeated at the end) and a closing semicolon:
//!
//! ```text
//! 7: 0 0 2 0 2 2 0 0;
//! ```
//!
//! Segment set files hold whitespace separated `x1 y1 x2 y2` quadruples.
//! The multi-set form holds one set per line. Labels are not stored.
//! Windows line endings are accepted everywhere.
use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
    str::FromStr,
};

use geo::CoordNum;
use itertools::Itertools;
use log::debug;

use crate::{
    containers::{Circuit, SegmentsSet},
    events::Point,
    segments::Segment,
    Error, Result,
};

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}

fn parse_number<T: FromStr>(line: usize, token: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| parse_error(line, format!("malformed number {:?}", token)))
}

/// Numbered lines of `reader`, without line terminators.
fn numbered_lines<R: BufRead>(reader: R) -> impl Iterator<Item = Result<(usize, String)>> {
    reader.lines().enumerate().map(|(index, line)| {
        let mut line = line?;
        if line.ends_with('\r') {
            line.pop();
        }
        Ok((index + 1, line))
    })
}

fn parse_segments<T>(line: usize, tokens: &[(usize, &str)]) -> Result<Vec<Segment<T>>>
where
    T: CoordNum + FromStr,
{
    tokens
        .chunks(4)
        .map(|chunk| match chunk {
            [(l1, x1), (l2, y1), (l3, x2), (l4, y2)] => Ok(Segment::new(
                Point::new(parse_number(*l1, x1)?, parse_number(*l2, y1)?),
                Point::new(parse_number(*l3, x2)?, parse_number(*l4, y2)?),
            )),
            _ => Err(parse_error(
                chunk.first().map_or(line, |(l, _)| *l),
                format!("incomplete segment: {} of 4 coordinates", chunk.len()),
            )),
        })
        .collect()
}

/// Read circuits with their ids.
pub fn parse_circuits<T, R>(reader: R) -> Result<Vec<(i64, Circuit<T>)>>
where
    T: CoordNum + FromStr,
    R: BufRead,
{
    let mut circuits = Vec::new();
    for line in numbered_lines(reader) {
        let (number, line) = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (id, body) = line
            .split_once(':')
            .ok_or_else(|| parse_error(number, "missing ':' after the circuit id"))?;
        let id = id
            .trim()
            .parse()
            .map_err(|_| parse_error(number, format!("malformed circuit id {:?}", id)))?;
        let body = body
            .trim_end()
            .strip_suffix(';')
            .ok_or_else(|| parse_error(number, "missing ';' after the vertices"))?;

        let coords = body
            .split_whitespace()
            .map(|token| parse_number(number, token))
            .collect::<Result<Vec<T>>>()?;
        if coords.len() % 2 != 0 {
            return Err(parse_error(number, "odd number of coordinates"));
        }
        if coords.is_empty() {
            return Err(parse_error(number, "circuit without vertices"));
        }
        let vertices: Vec<_> = coords
            .chunks(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect();
        circuits.push((id, Circuit::from_vertices(&vertices)));
    }
    debug!("parsed {} circuits", circuits.len());
    Ok(circuits)
}

/// Read one segment set: every quadruple up to the end of input.
pub fn parse_segments_set<T, R>(reader: R) -> Result<SegmentsSet<T>>
where
    T: CoordNum + FromStr,
    R: BufRead,
{
    let lines = numbered_lines(reader).collect::<Result<Vec<_>>>()?;
    let tokens: Vec<_> = lines
        .iter()
        .flat_map(|(number, line)| line.split_whitespace().map(move |token| (*number, token)))
        .collect();
    let segments = parse_segments(lines.len(), &tokens)?;
    debug!("parsed a set of {} segments", segments.len());
    Ok(SegmentsSet::from_segments(segments))
}

/// Read one segment set per line.
pub fn parse_segments_sets<T, R>(reader: R) -> Result<Vec<SegmentsSet<T>>>
where
    T: CoordNum + FromStr,
    R: BufRead,
{
    let mut sets = Vec::new();
    for line in numbered_lines(reader) {
        let (number, line) = line?;
        let tokens: Vec<_> = line.split_whitespace().map(|token| (number, token)).collect();
        sets.push(SegmentsSet::from_segments(parse_segments(number, &tokens)?));
    }
    debug!("parsed {} segment sets", sets.len());
    Ok(sets)
}

pub fn write_circuits<T, W>(mut writer: W, circuits: &[(i64, Circuit<T>)]) -> Result<()>
where
    T: CoordNum + Display,
    W: Write,
{
    for (id, circuit) in circuits {
        writeln!(writer, "{}: {};", id, circuit.vertices().iter().join(" "))?;
    }
    Ok(())
}

pub fn write_segments_set<T, W>(mut writer: W, set: &SegmentsSet<T>) -> Result<()>
where
    T: CoordNum + Display,
    W: Write,
{
    writeln!(writer, "{}", set.iter().join(" "))?;
    Ok(())
}

pub fn write_segments_sets<T, W>(mut writer: W, sets: &[SegmentsSet<T>]) -> Result<()>
where
    T: CoordNum + Display,
    W: Write,
{
    for set in sets {
        write_segments_set(&mut writer, set)?;
    }
    Ok(())
}

pub fn parse_circuits_file<T: CoordNum + FromStr>(path: impl AsRef<Path>) -> Result<Vec<(i64, Circuit<T>)>> {
    parse_circuits(BufReader::new(File::open(path)?))
}

pub fn parse_segments_set_file<T: CoordNum + FromStr>(path: impl AsRef<Path>) -> Result<SegmentsSet<T>> {
    parse_segments_set(BufReader::new(File::open(path)?))
}

pub fn parse_segments_sets_file<T: CoordNum + FromStr>(
    path: impl AsRef<Path>,
) -> Result<Vec<SegmentsSet<T>>> {
    parse_segments_sets(BufReader::new(File::open(path)?))
}

pub fn write_circuits_file<T: CoordNum + Display>(
    path: impl AsRef<Path>,
    circuits: &[(i64, Circuit<T>)],
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_circuits(&mut writer, circuits)?;
    writer.flush()?;
    Ok(())
}

pub fn write_segments_set_file<T: CoordNum + Display>(
    path: impl AsRef<Path>,
    set: &SegmentsSet<T>,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_segments_set(&mut writer, set)?;
    writer.flush()?;
    Ok(())
}

pub fn write_segments_sets_file<T: CoordNum + Display>(
    path: impl AsRef<Path>,
    sets: &[SegmentsSet<T>],
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_segments_sets(&mut writer, sets)?;
    writer.flush()?;
    Ok(())
}
