//! Streaming copy into newly created files.
//!
//! - The destination is opened with `create_new(true)` (O_EXCL); an existing file is never clobbered.
//! - Data flows through fixed-size buffers, so input size does not affect memory use.
//! - On failure the partially written destination is removed before the error is returned.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::helpers::io_error_with_help_io;

/// Buffer size for reader and writer sides.
pub const BUF_SIZE: usize = 256 * 1024;

/// Stream everything from `reader` into a new file at `dst`.
/// Returns the number of bytes written.
pub fn copy_stream<R: Read>(reader: R, dst: &Path) -> io::Result<u64> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dst)
        .map_err(io_error_with_help_io("create destination", dst))?;

    let result = write_all_buffered(reader, file);
    if result.is_err() {
        let _ = fs::remove_file(dst);
    }
    result.map_err(io_error_with_help_io("write destination", dst))
}

/// Copy the regular file `src` to a new file at `dst`.
pub fn copy_file(src: &Path, dst: &Path) -> io::Result<u64> {
    let src_f = File::open(src).map_err(io_error_with_help_io("open source", src))?;
    copy_stream(src_f, dst)
}

fn write_all_buffered<R: Read>(reader: R, file: File) -> io::Result<u64> {
    let mut reader = BufReader::with_capacity(BUF_SIZE, reader);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, file);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    Ok(bytes)
}
