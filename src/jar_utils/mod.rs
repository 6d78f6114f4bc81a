//! Loading class indexes out of JAR archives.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use binrw::BinRead;
use thiserror::Error;

use crate::callpoint::ClassIndex;
use crate::types::ClassFile;

#[derive(Debug, Error)]
pub enum JarError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("class parse error: {0}")]
    ClassParse(#[from] binrw::Error),
}

pub type JarResult<T> = Result<T, JarError>;

/// Read every `.class` entry of a JAR into a [`ClassIndex`].
///
/// Entries that fail to parse are skipped with a warning; archives built
/// across modules routinely carry stubs and multi-release variants that a
/// scan has no use for.
pub fn read_class_index<R: Read + Seek>(reader: R) -> JarResult<ClassIndex> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut index = ClassIndex::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() || !file.name().ends_with(".class") {
            continue;
        }
        let name = file.name().to_string();
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        match ClassFile::read(&mut Cursor::new(&data)) {
            Ok(class) => {
                index.insert(class);
            }
            Err(e) => {
                log::warn!("skipping unparsable entry '{name}': {e}");
            }
        }
    }

    Ok(index)
}

/// Read a class index from a JAR on disk.
pub fn open_class_index(path: impl AsRef<Path>) -> JarResult<ClassIndex> {
    let file = std::fs::File::open(path)?;
    read_class_index(std::io::BufReader::new(file))
}
