//! Spreadsheet document: a loaded package plus its parsed workbook structure

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::{Read, Seek, Write};
use std::path::Path;

use crate::error::{XlsxError, XlsxResult};
use crate::package::{rels_part_for, resolve_target, Package, WriteOptions, CONTENT_TYPES_PART};
use crate::reader::{ParsedSheet, XlsxReader, REL_OFFICE_DOCUMENT, REL_SHARED_STRINGS};
use crate::writer::XlsxWriter;
use sheetcrud_core::{SharedStringTable, SheetCatalog, SheetEntry, Worksheet, DEFAULT_SHEET_NAME};

/// A workbook package held entirely in memory.
///
/// Worksheets are parsed on first access. Worksheets obtained through
/// [`SpreadsheetDocument::worksheet_mut`] are re-serialized on save; every
/// other part is written back unchanged.
#[derive(Debug)]
pub struct SpreadsheetDocument {
    package: Package,
    workbook_part: String,
    catalog: SheetCatalog,
    shared_strings: SharedStringTable,
    edited: HashMap<String, ParsedSheet>,
}

impl SpreadsheetDocument {
    /// Build a new workbook with a single empty worksheet named `Sheet1`
    pub fn new() -> Self {
        let workbook_part = "xl/workbook.xml".to_string();
        let catalog = SheetCatalog::from(SheetEntry {
            name: DEFAULT_SHEET_NAME.to_string(),
            sheet_id: 1,
            rel_id: "rId1".to_string(),
            part: "xl/worksheets/sheet1.xml".to_string(),
        });

        let mut package = Package::new();
        package.set_part(
            CONTENT_TYPES_PART,
            XlsxWriter::content_types_xml(catalog.iter().map(|e| e.part.as_str())).into_bytes(),
        );
        package.set_part("_rels/.rels", XlsxWriter::root_rels_xml().into_bytes());
        package.set_part(
            workbook_part.as_str(),
            XlsxWriter::workbook_xml(&catalog).into_bytes(),
        );
        package.set_part(
            rels_part_for(&workbook_part),
            XlsxWriter::workbook_rels_xml(&catalog).into_bytes(),
        );
        for entry in catalog.iter() {
            package.set_part(
                entry.part.as_str(),
                XlsxWriter::empty_worksheet_xml().into_bytes(),
            );
        }

        Self {
            package,
            workbook_part,
            catalog,
            shared_strings: SharedStringTable::new(),
            edited: HashMap::new(),
        }
    }

    /// Open a document from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Open a document from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Self> {
        Self::from_package(Package::read(reader)?)
    }

    /// Parse the workbook structure of a loaded package.
    ///
    /// Fails if the package has no workbook part, or if any catalog entry
    /// points at a worksheet part that does not exist.
    pub fn from_package(package: Package) -> XlsxResult<Self> {
        let root_rels = XlsxReader::read_relationships(package.require_part("_rels/.rels")?)?;
        let workbook_part = root_rels
            .iter()
            .find(|r| r.is_type(REL_OFFICE_DOCUMENT) && !r.external)
            .map(|r| resolve_target("", &r.target))
            .ok_or_else(|| XlsxError::MissingPart("workbook (officeDocument relationship)".into()))?;

        let workbook_rels_part = rels_part_for(&workbook_part);
        let workbook_rels = match package.part(&workbook_rels_part) {
            Some(data) => XlsxReader::read_relationships(data)?,
            None => Vec::new(),
        };

        let catalog = XlsxReader::read_sheet_catalog(
            package.require_part(&workbook_part)?,
            &workbook_part,
            &workbook_rels,
        )?;
        for entry in catalog.iter() {
            package.require_part(&entry.part)?;
        }

        let shared_strings = match workbook_rels
            .iter()
            .find(|r| r.is_type(REL_SHARED_STRINGS) && !r.external)
        {
            Some(rel) => {
                let part = resolve_target(&workbook_part, &rel.target);
                XlsxReader::read_shared_strings(package.require_part(&part)?)?
            }
            None => SharedStringTable::new(),
        };

        log::debug!(
            "opened workbook {} with {} sheets, {} shared strings",
            workbook_part,
            catalog.len(),
            shared_strings.len()
        );

        Ok(Self {
            package,
            workbook_part,
            catalog,
            shared_strings,
            edited: HashMap::new(),
        })
    }

    /// Package path of the workbook part
    pub fn workbook_part(&self) -> &str {
        &self.workbook_part
    }

    /// The sheet catalog
    pub fn catalog(&self) -> &SheetCatalog {
        &self.catalog
    }

    /// The shared-string table (empty if the package has none)
    pub fn shared_strings(&self) -> &SharedStringTable {
        &self.shared_strings
    }

    /// The underlying package
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Parse the sheet data of a catalog entry
    pub fn worksheet(&self, entry: &SheetEntry) -> XlsxResult<Worksheet> {
        if let Some(parsed) = self.edited.get(&entry.part) {
            return Ok(parsed.worksheet.clone());
        }
        let parsed = XlsxReader::read_sheet_data(self.package.require_part(&entry.part)?)?;
        Ok(parsed.worksheet)
    }

    /// Sheet data of the named sheet, for editing.
    ///
    /// The name must match a catalog entry exactly (case-sensitive). The
    /// worksheet is re-serialized on the next save.
    pub fn worksheet_mut(&mut self, name: &str) -> XlsxResult<&mut Worksheet> {
        let part = self.catalog.find(name)?.part.clone();

        let parsed = match self.edited.entry(part) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let parsed = XlsxReader::read_sheet_data(self.package.require_part(entry.key())?)?;
                entry.insert(parsed)
            }
        };
        Ok(&mut parsed.worksheet)
    }

    /// Fold edited worksheets back into their parts
    fn flush_edits(&mut self) -> XlsxResult<()> {
        for (part, parsed) in self.edited.drain() {
            let original = self.package.require_part(&part)?;
            let sheet_data = XlsxWriter::sheet_data_xml(&parsed.worksheet, parsed.prefix.as_deref());
            let data = XlsxWriter::splice_sheet_data(original, parsed.span.clone(), &sheet_data);
            log::trace!("rewrote sheetData of {}", part);
            self.package.set_part(part, data);
        }
        Ok(())
    }

    /// Write the document to `path`, replacing any existing file
    pub fn save<P: AsRef<Path>>(&mut self, path: P, options: &WriteOptions) -> XlsxResult<()> {
        self.flush_edits()?;
        self.package.save(path, options)
    }

    /// Write the document to a writer
    pub fn write<W: Write + Seek>(&mut self, writer: W, options: &WriteOptions) -> XlsxResult<()> {
        self.flush_edits()?;
        self.package.write(writer, options)
    }
}

impl Default for SpreadsheetDocument {
    fn default() -> Self {
        Self::new()
    }
}
