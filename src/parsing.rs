use log::{debug, info};
use memmap2::Mmap;
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::{Error, Result};

/// Reads incomes from `input`, or from stdin when no path is given.
///
/// Files with a `.csv` extension are read as CSV and the income column is
/// looked up by `column`; anything else is a newline-delimited list of numbers.
pub fn load(input: Option<&Path>, column: &str) -> Result<Vec<f64>> {
    let values = match input {
        Some(path) => {
            let file = File::open(path).map_err(|source| Error::Open {
                path: path.to_path_buf(),
                source,
            })?;
            if is_csv(path) {
                debug!("reading {} as CSV", path.display());
                read_csv_column(BufReader::new(file), column)?
            } else {
                debug!("reading {} as a list of numbers", path.display());
                read_file_mmap(&file)?
            }
        }
        None => read_lines(io::stdin().lock())?,
    };

    if values.is_empty() {
        return Err(Error::NoValidValues);
    }
    info!("read {} income values", values.len());

    Ok(values)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Parses file using mmap.
/// Much faster than sequential buffered I/O for large files.
pub fn read_file_mmap(file: &File) -> Result<Vec<f64>> {
    // Zero-length files cannot be mapped
    if file.metadata()?.len() == 0 {
        return Ok(Vec::new());
    }

    // SAFETY: the map is read-only and dropped before returning
    let mmap = unsafe { Mmap::map(file)? };

    let num_threads = rayon::current_num_threads();
    let chunk_size = mmap.len().div_ceil(num_threads);

    // Chunk boundaries must align to line breaks to avoid splitting numbers mid-parse
    let mut boundaries = vec![0];
    for i in 1..num_threads {
        let mut pos = i * chunk_size;
        if pos >= mmap.len() {
            break;
        }
        while pos < mmap.len() && mmap[pos] != b'\n' {
            pos += 1;
        }
        if pos < mmap.len() {
            boundaries.push(pos + 1); // Start after the newline
        }
    }
    boundaries.push(mmap.len());

    // A line longer than chunk_size yields repeated boundaries
    let chunks: Vec<_> = boundaries
        .windows(2)
        .filter(|w| w[0] < w[1])
        .map(|w| (w[0], w[1]))
        .collect();

    let results: Vec<Vec<f64>> = chunks
        .par_iter()
        .map(|&(start, end)| parse_chunk(&mmap[start..end]))
        .collect();

    Ok(results.into_iter().flatten().collect())
}

/// Reads one number per line, skipping blank and non-numeric lines.
pub fn read_lines<R: BufRead>(reader: R) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    let mut skipped = 0usize;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_value(&line) {
            Some(value) => values.push(value),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        info!("skipped {skipped} non-numeric lines");
    }
    Ok(values)
}

/// Reads the income column of a CSV document.
///
/// The header lookup ignores case, so `Income`, `income` and `INCOME` all
/// match. Rows whose cell is blank or not a number are dropped.
pub fn read_csv_column<R: io::Read>(reader: R, column: &str) -> Result<Vec<f64>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let wanted = column.to_lowercase();
    let idx = headers
        .iter()
        .position(|name| name.to_lowercase() == wanted)
        .ok_or_else(|| Error::MissingColumn {
            column: column.to_string(),
            found: headers.iter().collect::<Vec<_>>().join(", "),
        })?;

    let mut values = Vec::new();
    let mut skipped = 0usize;
    for record in rdr.records() {
        let record = record?;
        match record.get(idx).and_then(parse_value) {
            Some(value) => values.push(value),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        info!(
            "skipped {skipped} rows with missing or non-numeric '{}' values",
            &headers[idx]
        );
    }
    Ok(values)
}

/// Parses newline-delimited numbers from byte slice.
/// Invalid lines are ignored silently.
fn parse_chunk(chunk: &[u8]) -> Vec<f64> {
    chunk
        .split(|&byte| byte == b'\n')
        .filter_map(|line| std::str::from_utf8(line).ok())
        .filter_map(parse_value)
        .collect()
}

/// Parses a single trimmed value. `nan` and `inf` parse as floats but are
/// not incomes, so they count as non-numeric too.
pub fn parse_value(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
