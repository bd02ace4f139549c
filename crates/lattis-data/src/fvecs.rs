//! Readers and writers for the TEXMEX fvecs/ivecs binary layout.
//!
//! Row format: a little-endian `i32` dimension header, then `dim` 4-byte
//! elements. Every row must repeat the same header; the file size must be an
//! exact multiple of the row size. Violations are errors, never truncation.

use crate::{DataError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Upper bound on a plausible row dimension. Catches endianness mixups and
/// garbage headers before they turn into absurd allocations.
const MAX_DIMENSION: i32 = 1_000_000;

fn read_header(reader: &mut impl Read) -> std::io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Validate the first row header against the file size and return
/// `(dims, rows)`.
fn validate_layout(path: &Path, dims: i32, file_size: u64) -> Result<(usize, usize)> {
    if dims <= 0 || dims > MAX_DIMENSION {
        return Err(DataError::InvalidDimension {
            path: path.display().to_string(),
            dims: dims as i64,
        });
    }
    let row_bytes = 4 + dims as u64 * 4;
    if file_size % row_bytes != 0 {
        return Err(DataError::MalformedFile {
            path: path.display().to_string(),
            size: file_size,
            row_bytes,
        });
    }
    Ok((dims as usize, (file_size / row_bytes) as usize))
}

/// Read a whole `.fvecs` file into row vectors.
pub fn read_fvecs(path: impl AsRef<Path>) -> Result<Vec<Vec<f32>>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let file_size = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let dims = read_header(&mut reader)?;
    let (dims, rows) = validate_layout(path, dims, file_size)?;

    let mut out = Vec::with_capacity(rows);
    let mut row_buf = vec![0u8; dims * 4];
    for row in 0..rows {
        // The first header was already consumed above.
        if row > 0 {
            let header = read_header(&mut reader)?;
            if header != dims as i32 {
                return Err(DataError::DimensionMismatch {
                    path: path.display().to_string(),
                    row,
                    found: header as u32,
                    expected: dims as u32,
                });
            }
        }
        reader.read_exact(&mut row_buf)?;
        let vector = row_buf
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        out.push(vector);
    }

    Ok(out)
}

/// Read a whole `.ivecs` file (ground-truth id lists) into row vectors.
pub fn read_ivecs(path: impl AsRef<Path>) -> Result<Vec<Vec<u32>>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let file_size = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let dims = read_header(&mut reader)?;
    let (dims, rows) = validate_layout(path, dims, file_size)?;

    let mut out = Vec::with_capacity(rows);
    let mut row_buf = vec![0u8; dims * 4];
    for row in 0..rows {
        if row > 0 {
            let header = read_header(&mut reader)?;
            if header != dims as i32 {
                return Err(DataError::DimensionMismatch {
                    path: path.display().to_string(),
                    row,
                    found: header as u32,
                    expected: dims as u32,
                });
            }
        }
        reader.read_exact(&mut row_buf)?;
        let ids = row_buf
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        out.push(ids);
    }

    Ok(out)
}

/// Write row vectors as an `.fvecs` file. Every row must share one length.
pub fn write_fvecs<R: AsRef<[f32]>>(path: impl AsRef<Path>, rows: &[R]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    let dims = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
    for (row, vector) in rows.iter().enumerate() {
        let vector = vector.as_ref();
        if vector.len() != dims {
            return Err(DataError::DimensionMismatch {
                path: path.display().to_string(),
                row,
                found: vector.len() as u32,
                expected: dims as u32,
            });
        }
        writer.write_all(&(dims as i32).to_le_bytes())?;
        for &value in vector {
            writer.write_all(&value.to_le_bytes())?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write row id lists as an `.ivecs` file. Every row must share one length.
pub fn write_ivecs<R: AsRef<[u32]>>(path: impl AsRef<Path>, rows: &[R]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    let dims = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
    for (row, ids) in rows.iter().enumerate() {
        let ids = ids.as_ref();
        if ids.len() != dims {
            return Err(DataError::DimensionMismatch {
                path: path.display().to_string(),
                row,
                found: ids.len() as u32,
                expected: dims as u32,
            });
        }
        writer.write_all(&(dims as i32).to_le_bytes())?;
        for &id in ids {
            writer.write_all(&id.to_le_bytes())?;
        }
    }

    writer.flush()?;
    Ok(())
}
