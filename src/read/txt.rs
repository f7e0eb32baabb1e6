use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::str::FromStr;

/// Reads a comma/newline-delimited numeric table.
///
/// Empty lines are skipped; rows are not required to have equal length. A
/// file that does not exist is a [`Error::MissingFile`], a token that does
/// not parse is a [`Error::Parse`] naming the file and line.
pub fn read_txt<T, P>(path: P) -> Result<Vec<Vec<T>>>
where
    T: FromStr,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            Error::MissingFile(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;
    let mut rows = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split(',')
            .map(|token| {
                let token = token.trim();
                token.parse::<T>().map_err(|_| Error::Parse {
                    file: path.display().to_string(),
                    line: i + 1,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<T>>>()?;
        rows.push(row);
    }
    Ok(rows)
}
