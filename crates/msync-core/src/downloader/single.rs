//! Single-stream HTTP GET writing the body into the destination directory.

use std::cell::Cell;
use std::fs::File;
use std::io::Write;

use super::CurlOptions;
use crate::error::DownloadError;
use crate::local_dir::LocalDirectory;
use crate::url_model::{FileName, RemoteLocation};

/// Downloads `location` into `dir/name`. Returns the number of bytes written.
///
/// The file is opened (truncated) lazily, when the first body chunk of a 2xx
/// response arrives, so error responses never clobber an existing file.
pub(super) fn download_single(
    location: &RemoteLocation,
    name: &FileName,
    dir: &LocalDirectory,
    curl: &CurlOptions,
) -> Result<u64, DownloadError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(location.as_str())?;
    curl.apply(&mut easy)?;

    // Status of the most recent response; redirects produce several.
    let status = Cell::new(0u32);
    let mut sink: Option<File> = None;
    let mut written = 0u64;
    let mut write_error: Option<DownloadError> = None;

    let perform_result = {
        let mut transfer = easy.transfer();
        transfer.header_function(|line| {
            if let Some(code) = parse_status_line(line) {
                status.set(code);
            }
            true
        })?;
        transfer.write_function(|data| {
            let code = status.get();
            if !is_success(code) {
                write_error = Some(DownloadError::Http(code));
                return Ok(0); // abort transfer
            }
            match write_chunk(&mut sink, dir, name, data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_error = Some(e);
                    Ok(0)
                }
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_error {
        return Err(e);
    }
    perform_result?;

    let code = easy.response_code()?;
    if !is_success(code) {
        return Err(DownloadError::Http(code));
    }

    match sink {
        Some(mut file) => file.flush().map_err(|source| DownloadError::Write {
            name: name.clone(),
            source,
        })?,
        None => {
            // 2xx with an empty body still produces the file.
            open_sink(dir, name)?;
        }
    }
    Ok(written)
}

fn write_chunk(
    sink: &mut Option<File>,
    dir: &LocalDirectory,
    name: &FileName,
    data: &[u8],
) -> Result<(), DownloadError> {
    let file = match sink {
        Some(file) => file,
        None => sink.insert(open_sink(dir, name)?),
    };
    file.write_all(data).map_err(|source| DownloadError::Write {
        name: name.clone(),
        source,
    })
}

fn open_sink(dir: &LocalDirectory, name: &FileName) -> Result<File, DownloadError> {
    dir.ensure_exists()?;
    dir.create_file(name).map_err(|source| DownloadError::Write {
        name: name.clone(),
        source,
    })
}

fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}

/// Parses the status code from a response status line such as `HTTP/1.1 200 OK`.
fn parse_status_line(line: &[u8]) -> Option<u32> {
    let line = std::str::from_utf8(line).ok()?;
    let rest = line.strip_prefix("HTTP/")?;
    rest.split_whitespace().nth(1)?.parse().ok()
}
