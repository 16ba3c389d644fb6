//! In-memory OPC package
//!
//! A package is loaded whole: every ZIP entry becomes a [`Part`] holding its
//! bytes, in archive order. Saving writes every part back, so parts this
//! crate does not understand (styles, themes, drawings, custom XML) survive
//! byte-for-byte.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};

use crate::error::{XlsxError, XlsxResult};

/// Name of the content-types part every package must carry
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Compression used for parts written to the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Deflate (what spreadsheet applications write)
    #[default]
    Deflated,
    /// No compression
    Stored,
}

impl Compression {
    fn method(self) -> zip::CompressionMethod {
        match self {
            Compression::Deflated => zip::CompressionMethod::Deflated,
            Compression::Stored => zip::CompressionMethod::Stored,
        }
    }
}

/// Options controlling how a package is written
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Compression applied to every part
    pub compression: Compression,
}

/// One named part of the package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Package path without a leading slash (e.g. `xl/workbook.xml`)
    pub name: String,
    /// Raw part bytes
    pub data: Vec<u8>,
}

/// All parts of a package, in archive order
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<Part>,
}

impl Package {
    /// Create a package with no parts
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a package from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Load a package from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Self> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().trim_start_matches('/').to_string();
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.push(Part { name, data });
        }

        let package = Self { parts };
        if package.part(CONTENT_TYPES_PART).is_none() {
            return Err(XlsxError::InvalidFormat(format!(
                "Missing {}",
                CONTENT_TYPES_PART
            )));
        }
        log::debug!("loaded package with {} parts", package.parts.len());
        Ok(package)
    }

    /// Bytes of the named part, if present
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Bytes of the named part, or a [`XlsxError::MissingPart`] error
    pub fn require_part(&self, name: &str) -> XlsxResult<&[u8]> {
        self.part(name)
            .ok_or_else(|| XlsxError::MissingPart(name.to_string()))
    }

    /// Replace the named part's bytes, appending the part if it is new
    pub fn set_part<S: Into<String>>(&mut self, name: S, data: Vec<u8>) {
        let name = name.into();
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part { name, data }),
        }
    }

    /// Part names in archive order
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if the package has no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Write the package to a writer
    pub fn write<W: Write + Seek>(&self, writer: W, options: &WriteOptions) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);
        let file_options =
            zip::write::SimpleFileOptions::default().compression_method(options.compression.method());

        for part in &self.parts {
            zip.start_file(part.name.as_str(), file_options)?;
            zip.write_all(&part.data)?;
        }

        let mut inner = zip.finish()?;
        inner.flush()?;
        Ok(())
    }

    /// Write the package to `path`, replacing any existing file.
    ///
    /// The archive is written to a temporary file next to the real target
    /// and moved into place only once complete and synced, so a failure never
    /// leaves a partially written document behind. An existing target must be
    /// writable; a symlink is followed and the file it points at is replaced.
    /// An existing file's permissions carry over.
    pub fn save<P: AsRef<Path>>(&self, path: P, options: &WriteOptions) -> XlsxResult<()> {
        let target = existing_target(path.as_ref())?;
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        self.write(BufWriter::new(tmp.as_file_mut()), options)?;
        tmp.as_file().sync_all()?;

        if let Ok(metadata) = fs::metadata(&target) {
            tmp.as_file().set_permissions(metadata.permissions())?;
        }
        tmp.persist(&target)?;
        log::debug!("saved package to {}", target.display());
        Ok(())
    }
}

/// The file a save to `path` must replace.
///
/// An existing path is resolved through any symlinks and opened for writing
/// (without truncating) so a read-only target fails before anything is
/// written. A path that does not exist yet is returned as given.
fn existing_target(path: &Path) -> XlsxResult<PathBuf> {
    match fs::canonicalize(path) {
        Ok(real) => {
            OpenOptions::new().write(true).open(&real)?;
            Ok(real)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e.into()),
    }
}

/// Directory portion of a part name (`xl/workbook.xml` -> `xl`)
pub fn part_dir(name: &str) -> &str {
    name.rfind('/').map_or("", |i| &name[..i])
}

/// Relationships part that belongs to `source` (`xl/workbook.xml` ->
/// `xl/_rels/workbook.xml.rels`); the package root's is `_rels/.rels`.
pub fn rels_part_for(source: &str) -> String {
    let dir = part_dir(source);
    let file = &source[source.rfind('/').map_or(0, |i| i + 1)..];
    if dir.is_empty() {
        format!("_rels/{}.rels", file)
    } else {
        format!("{}/_rels/{}.rels", dir, file)
    }
}

/// Resolve a relationship target against the part that declares it.
///
/// A leading `/` makes the target package-absolute; otherwise it is relative
/// to the source part's directory. `.` and `..` segments are normalized.
pub fn resolve_target(source: &str, target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => {
            let dir = part_dir(source);
            if dir.is_empty() {
                target.to_string()
            } else {
                format!("{}/{}", dir, target)
            }
        }
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_rels_part_for() {
        assert_eq!(rels_part_for("xl/workbook.xml"), "xl/_rels/workbook.xml.rels");
        assert_eq!(rels_part_for(""), "_rels/.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("xl/workbook.xml", "worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            resolve_target("xl/workbook.xml", "/xl/worksheets/sheet2.xml"),
            "xl/worksheets/sheet2.xml"
        );
        assert_eq!(
            resolve_target("xl/worksheets/sheet1.xml", "../sharedStrings.xml"),
            "xl/sharedStrings.xml"
        );
        assert_eq!(resolve_target("", "xl/workbook.xml"), "xl/workbook.xml");
    }

    #[test]
    fn test_write_then_read_keeps_part_order() {
        let mut package = Package::new();
        package.set_part(CONTENT_TYPES_PART, b"<Types/>".to_vec());
        package.set_part("xl/b.xml", b"b".to_vec());
        package.set_part("xl/a.xml", b"a".to_vec());
        package.set_part("xl/b.xml", b"bb".to_vec());

        let mut buf = Vec::new();
        package
            .write(Cursor::new(&mut buf), &WriteOptions::default())
            .unwrap();
        let loaded = Package::read(Cursor::new(&buf)).unwrap();

        let names: Vec<_> = loaded.part_names().collect();
        assert_eq!(names, vec![CONTENT_TYPES_PART, "xl/b.xml", "xl/a.xml"]);
        assert_eq!(loaded.part("xl/b.xml"), Some(&b"bb"[..]));
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        fs::write(&path, b"old bytes").unwrap();

        let mut package = Package::new();
        package.set_part(CONTENT_TYPES_PART, b"<Types/>".to_vec());
        package.save(&path, &WriteOptions::default()).unwrap();

        let loaded = Package::open(&path).unwrap();
        assert_eq!(loaded.part(CONTENT_TYPES_PART), Some(&b"<Types/>"[..]));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_follows_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.xlsx");
        let link = dir.path().join("link.xlsx");
        fs::write(&real, b"old bytes").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let mut package = Package::new();
        package.set_part(CONTENT_TYPES_PART, b"<Types/>".to_vec());
        package.save(&link, &WriteOptions::default()).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert!(Package::open(&real).unwrap().part(CONTENT_TYPES_PART).is_some());
    }

    #[test]
    fn test_read_rejects_archive_without_content_types() {
        let mut package = Package::new();
        package.set_part("xl/workbook.xml", b"<workbook/>".to_vec());

        let mut buf = Vec::new();
        package
            .write(Cursor::new(&mut buf), &WriteOptions::default())
            .unwrap();

        assert!(matches!(
            Package::read(Cursor::new(&buf)),
            Err(XlsxError::InvalidFormat(_))
        ));
    }
}
