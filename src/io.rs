// Reading and publishing ceremony artifacts.
//
// An artifact is written to a temporary file next to its destination and only
// moved into place once it is complete, so a failed run never leaves a
// truncated file behind. An existing file is never overwritten.
use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use tempfile::NamedTempFile;
use tracing::info;

pub fn read_artifact(path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("unable to read `{}`: {}", path.display(), err),
        )
    })
}

// Writes the concatenation of `blobs` to `path`
pub fn write_artifact(path: &Path, blobs: &[&[u8]]) -> io::Result<()> {
    if path.exists() {
        return Err(already_exists(path));
    }

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(directory)?;
    for blob in blobs {
        file.write_all(blob)?;
    }
    file.as_file().sync_all()?;

    // Fails if someone else created the destination in the meantime
    file.persist_noclobber(path).map_err(|err| {
        if err.error.kind() == io::ErrorKind::AlreadyExists {
            already_exists(path)
        } else {
            err.error
        }
    })?;

    let size: usize = blobs.iter().map(|blob| blob.len()).sum();
    info!(path = %path.display(), size, "wrote artifact");
    Ok(())
}

fn already_exists(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("`{}` exists and won't be overwritten", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("challenge");

        write_artifact(&path, &[&b"powers"[..], &b"of"[..], &b"tau"[..]]).unwrap();
        assert_eq!(read_artifact(&path).unwrap(), b"powersoftau");
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("response");
        fs::write(&path, b"previous").unwrap();

        let err = write_artifact(&path, &[&b"new"[..]]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&path).unwrap(), b"previous");
    }

    #[test]
    fn leaves_nothing_behind_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("result");

        assert!(write_artifact(&path, &[&b"data"[..]]).is_err());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_artifact(&dir.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
