use std::{
    error::Error,
    fmt::Display,
    fs::{self, File},
    io::{self, Read},
    path::{Path, PathBuf},
};

use log::{debug, trace};
use serde::Deserialize;

#[derive(Debug)]
#[non_exhaustive]
pub struct FromFileError {
    path: PathBuf,
    kind: FromFileErrorKind,
}

impl FromFileError {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> &FromFileErrorKind {
        &self.kind
    }
}

impl Display for FromFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            FromFileErrorKind::Open(_) => write!(f, "unable to open file {:?}", self.path),
            FromFileErrorKind::Read(_) => write!(f, "unable to read file {:?}", self.path),
            FromFileErrorKind::Parse(_) | FromFileErrorKind::ParseLenient(_) => {
                write!(f, "unable to parse file {:?}", self.path)
            }
        }
    }
}

impl Error for FromFileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            FromFileErrorKind::Open(err) => Some(err),
            FromFileErrorKind::Read(err) => Some(err),
            FromFileErrorKind::Parse(err) => Some(err),
            FromFileErrorKind::ParseLenient(err) => Some(err),
        }
    }
}

#[derive(Debug)]
pub enum FromFileErrorKind {
    #[non_exhaustive]
    Open(io::Error),
    #[non_exhaustive]
    Read(io::Error),
    #[non_exhaustive]
    Parse(serde_json::Error),
    #[non_exhaustive]
    ParseLenient(json5::Error),
}

fn read_to_string(path: &Path) -> Result<String, FromFileErrorKind> {
    // Reading a file into a string before invoking Serde is faster than
    // invoking Serde from a BufReader, see
    // https://github.com/serde-rs/json/issues/160
    let mut string = String::new();
    File::open(path)
        .map_err(FromFileErrorKind::Open)?
        .read_to_string(&mut string)
        .map_err(FromFileErrorKind::Read)?;
    Ok(string)
}

/// Deserialize a strict JSON document.
pub(crate) fn read_json_from_file<P, T>(path: P) -> Result<T, FromFileError>
where
    P: AsRef<Path>,
    for<'de> T: Deserialize<'de>,
{
    fn inner<T>(path: &Path) -> Result<T, FromFileError>
    where
        for<'de> T: Deserialize<'de>,
    {
        trace!("reading JSON from {:?}", path);
        (|| -> Result<T, FromFileErrorKind> {
            let string = read_to_string(path)?;
            let json = serde_json::from_str(&string).map_err(FromFileErrorKind::Parse)?;
            Ok(json)
        })()
        .map_err(|kind| FromFileError {
            path: path.to_owned(),
            kind,
        })
    }
    inner(path.as_ref())
}

/// Deserialize a hand-written config file. tsconfig.json and jsconfig.json
/// routinely contain comments and trailing commas, so these are parsed as
/// JSON5.
pub(crate) fn read_json5_from_file<P, T>(path: P) -> Result<T, FromFileError>
where
    P: AsRef<Path>,
    for<'de> T: Deserialize<'de>,
{
    fn inner<T>(path: &Path) -> Result<T, FromFileError>
    where
        for<'de> T: Deserialize<'de>,
    {
        trace!("reading JSON5 from {:?}", path);
        (|| -> Result<T, FromFileErrorKind> {
            let string = read_to_string(path)?;
            let json = json5::from_str(&string).map_err(FromFileErrorKind::ParseLenient)?;
            Ok(json)
        })()
        .map_err(|kind| FromFileError {
            path: path.to_owned(),
            kind,
        })
    }
    inner(path.as_ref())
}

#[derive(Debug)]
#[non_exhaustive]
pub struct WriteError {
    path: PathBuf,
    kind: WriteErrorKind,
}

impl Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            WriteErrorKind::Compare(_) => {
                write!(f, "unable to read existing file {:?}", self.path)
            }
            WriteErrorKind::CreateDirectory(_) => {
                write!(f, "unable to create parent directory of {:?}", self.path)
            }
            WriteErrorKind::Write(_) => write!(f, "unable to write file {:?}", self.path),
        }
    }
}

impl Error for WriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            WriteErrorKind::Compare(err) => Some(err),
            WriteErrorKind::CreateDirectory(err) => Some(err),
            WriteErrorKind::Write(err) => Some(err),
        }
    }
}

#[derive(Debug)]
pub enum WriteErrorKind {
    #[non_exhaustive]
    Compare(io::Error),
    #[non_exhaustive]
    CreateDirectory(io::Error),
    #[non_exhaustive]
    Write(io::Error),
}

/// Write `contents` to `path` unless the file already holds exactly those
/// bytes. Returns whether the file was written.
pub fn write_if_changed<P: AsRef<Path>>(path: P, contents: &str) -> Result<bool, WriteError> {
    fn inner(path: &Path, contents: &str) -> Result<bool, WriteError> {
        (|| -> Result<bool, WriteErrorKind> {
            match fs::read(path) {
                Ok(existing) if existing == contents.as_bytes() => {
                    debug!("{:?} is up to date", path);
                    return Ok(false);
                }
                Ok(_) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(WriteErrorKind::Compare(err)),
            }

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(WriteErrorKind::CreateDirectory)?;
            }
            fs::write(path, contents).map_err(WriteErrorKind::Write)?;
            debug!("wrote {:?}", path);
            Ok(true)
        })()
        .map_err(|kind| WriteError {
            path: path.to_owned(),
            kind,
        })
    }
    inner(path.as_ref(), contents)
}
