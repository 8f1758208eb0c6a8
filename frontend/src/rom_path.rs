//! Program image loading: a raw file, or the first file inside a ZIP
//! archive.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RomError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: invalid ZIP: {source}")]
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },
    #[error("{0}: ZIP archive contains no files")]
    EmptyArchive(PathBuf),
}

/// Read a program image from `path`.
///
/// A `.zip` path yields its first non-directory entry; anything else is
/// read as-is.
pub fn load_program(path: &Path) -> Result<Vec<u8>, RomError> {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
    {
        return load_from_zip(path);
    }
    std::fs::read(path).map_err(|source| RomError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_from_zip(path: &Path) -> Result<Vec<u8>, RomError> {
    let io_err = |source| RomError::Io {
        path: path.to_path_buf(),
        source,
    };
    let zip_err = |source| RomError::Zip {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(zip_err)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(zip_err)?;
        if entry.is_dir() {
            continue;
        }
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data).map_err(io_err)?;
        return Ok(data);
    }

    Err(RomError::EmptyArchive(path.to_path_buf()))
}
