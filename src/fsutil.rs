use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Error that occurs when opening a file fails.
#[derive(Debug, thiserror::Error)]
#[error("failed to open file `{path}`: {source}")]
pub struct FileOpenError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Error that occurs when reading an opened file fails.
#[derive(Debug, thiserror::Error)]
pub enum FileReadError {
    #[error(transparent)]
    Open(#[from] FileOpenError),
    #[error("failed to read file `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Opens a file at the given path and wraps it in a [`BufReader`].
///
/// # Errors
///
/// Returns a [`FileOpenError`] if the file cannot be opened.
///
/// # Example
/// ```no_run
/// # use nfsstat_monitor::fsutil;
/// let reader = fsutil::open_file_reader("/proc/net/rpc/nfs")?;
/// # Ok::<(), fsutil::FileOpenError>(())
/// ```
pub fn open_file_reader(path: impl AsRef<Path>) -> Result<BufReader<File>, FileOpenError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FileOpenError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Reads the whole file at `path` into a string.
///
/// procfs files report a size of zero, so this reads until EOF instead of
/// trusting the metadata.
///
/// # Errors
///
/// Returns [`FileReadError::Open`] if the file cannot be opened and
/// [`FileReadError::Read`] if reading fails or the content is not UTF-8.
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String, FileReadError> {
    let path = path.as_ref();
    let mut reader = open_file_reader(path)?;
    let mut contents = String::new();
    reader
        .read_to_string(&mut contents)
        .map_err(|source| FileReadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(contents)
}
