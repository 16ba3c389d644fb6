//! XLSX reader
//!
//! Parses the XML parts that the codec understands: relationship parts, the
//! workbook's sheet catalog, the shared-string table and a worksheet's
//! `<sheetData>` block.

use std::borrow::Cow;
use std::ops::Range;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::package::resolve_target;
use sheetcrud_core::{
    Attribute, Cell, CellValue, Formula, Row, SharedStringTable, SheetCatalog, SheetEntry,
    Worksheet,
};

/// Relationship type suffix of the main workbook part
pub const REL_OFFICE_DOCUMENT: &str = "/officeDocument";
/// Relationship type suffix of a worksheet part
pub const REL_WORKSHEET: &str = "/worksheet";
/// Relationship type suffix of the shared-string part
pub const REL_SHARED_STRINGS: &str = "/sharedStrings";

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("_x") {
        result.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(ch) => {
                result.push(ch);
                rest = &candidate[7..];
            }
            None => {
                result.push('_');
                rest = &candidate[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// One `<Relationship>` of a relationships part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship id (`Id`)
    pub id: String,
    /// Relationship type URI (`Type`)
    pub rel_type: String,
    /// Target as written (`Target`)
    pub target: String,
    /// Whether `TargetMode="External"`
    pub external: bool,
}

impl Relationship {
    /// Check if the relationship type ends with `suffix`
    pub fn is_type(&self, suffix: &str) -> bool {
        self.rel_type.ends_with(suffix)
    }
}

/// A worksheet's sheet data plus where `<sheetData>` sits in the part bytes
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    /// Parsed rows and cells
    pub worksheet: Worksheet,
    /// Byte range of the whole `<sheetData>` element in the original part
    pub span: Range<usize>,
    /// Namespace prefix used on the element (`x` for `<x:sheetData>`)
    pub prefix: Option<String>,
}

/// XLSX part reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a relationships part
    pub fn read_relationships(data: &[u8]) -> XlsxResult<Vec<Relationship>> {
        let mut xml_reader = Reader::from_reader(data);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;
                    let mut external = false;

                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"Id" => id = Some(attr.unescape_value()?.into_owned()),
                            b"Target" => target = Some(attr.unescape_value()?.into_owned()),
                            b"Type" => rel_type = Some(attr.unescape_value()?.into_owned()),
                            b"TargetMode" => external = attr.unescape_value()? == "External",
                            _ => {}
                        }
                    }

                    match (id, target, rel_type) {
                        (Some(id), Some(target), Some(rel_type)) => rels.push(Relationship {
                            id,
                            rel_type,
                            target,
                            external,
                        }),
                        _ => {
                            return Err(XlsxError::Parse(
                                "Relationship missing Id, Type or Target".into(),
                            ))
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read `xl/workbook.xml` into a sheet catalog.
    ///
    /// `workbook_part` is the workbook's package path and `rels` its
    /// relationships; each `<sheet>`'s `r:id` must name a worksheet
    /// relationship whose target is resolved against the workbook part.
    pub fn read_sheet_catalog(
        data: &[u8],
        workbook_part: &str,
        rels: &[Relationship],
    ) -> XlsxResult<SheetCatalog> {
        let mut xml_reader = Reader::from_reader(data);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut catalog = SheetCatalog::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheet" => {
                    let mut name = None;
                    let mut sheet_id = None;
                    let mut r_id = None;

                    for attr in e.attributes() {
                        let attr = attr?;
                        match (attr.key.prefix().is_some(), attr.key.local_name().as_ref()) {
                            (false, b"name") => name = Some(attr.unescape_value()?.into_owned()),
                            (false, b"sheetId") => {
                                let raw = attr.unescape_value()?;
                                sheet_id = Some(raw.trim().parse::<u32>().map_err(|_| {
                                    XlsxError::Parse(format!("invalid sheetId '{}'", raw))
                                })?);
                            }
                            (true, b"id") => r_id = Some(attr.unescape_value()?.into_owned()),
                            _ => {}
                        }
                    }

                    let (Some(name), Some(sheet_id), Some(rel_id)) = (name, sheet_id, r_id) else {
                        return Err(XlsxError::Parse(
                            "sheet entry missing name, sheetId or r:id".into(),
                        ));
                    };

                    let rel = rels
                        .iter()
                        .find(|r| r.id == rel_id && r.is_type(REL_WORKSHEET) && !r.external)
                        .ok_or_else(|| {
                            XlsxError::InvalidFormat(format!(
                                "sheet '{}' has no worksheet relationship {}",
                                name, rel_id
                            ))
                        })?;

                    catalog.push(SheetEntry {
                        name,
                        sheet_id,
                        rel_id,
                        part: resolve_target(workbook_part, &rel.target),
                    })?;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(catalog)
    }

    /// Read the shared strings table.
    ///
    /// Each `<si>` yields the concatenation of its `<t>` runs; phonetic
    /// (`<rPh>`) runs are skipped.
    pub fn read_shared_strings(data: &[u8]) -> XlsxResult<SharedStringTable> {
        let mut xml_reader = Reader::from_reader(data);

        let mut buf = Vec::new();
        let mut strings = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut phonetic_depth = 0usize;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" if in_si => phonetic_depth += 1,
                    b"t" if in_si && phonetic_depth == 0 => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => current_string.push_str(&e.unescape()?),
                Ok(Event::CData(e)) if in_t => current_string.push_str(&utf8(&e)?),
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        log::debug!("read {} shared strings", strings.len());
        Ok(SharedStringTable::from(strings))
    }

    /// Read a worksheet part's `<sheetData>` block.
    ///
    /// Rows and cells are kept in document order. Attributes the model does
    /// not interpret are carried on the row or cell, and each cell keeps its
    /// original `<c>` markup, so the block can be written back without loss.
    pub fn read_sheet_data(data: &[u8]) -> XlsxResult<ParsedSheet> {
        let mut xml_reader = Reader::from_reader(data);

        let mut buf = Vec::new();
        let mut rows: Vec<Row> = Vec::new();
        let mut span: Option<Range<usize>> = None;
        let mut prefix: Option<String> = None;
        let mut sheet_data_start: Option<usize> = None;

        // Current cell state
        let mut current_row: Option<Row> = None;
        let mut current_cell: Option<PendingCell> = None;
        let mut cell_start = 0usize;
        let mut in_value = false;
        let mut in_formula = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;
        let mut phonetic_depth = 0usize;

        loop {
            let event_start = xml_reader.buffer_position();
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"sheetData" if sheet_data_start.is_none() && span.is_none() => {
                        sheet_data_start = Some(event_start);
                        prefix = element_prefix(&e)?;
                    }
                    b"row" if sheet_data_start.is_some() => {
                        current_row = Some(read_row_start(&e)?);
                    }
                    b"c" if current_row.is_some() => {
                        current_cell = Some(PendingCell::from_start(&e)?);
                        cell_start = event_start;
                    }
                    b"v" if current_cell.is_some() => in_value = true,
                    b"f" if current_cell.is_some() => {
                        in_formula = true;
                        if let Some(cell) = current_cell.as_mut() {
                            cell.formula = Some(Formula {
                                attributes: read_attributes(&e, &[])?,
                                text: String::new(),
                            });
                        }
                    }
                    b"is" if current_cell.is_some() => in_inline_str = true,
                    b"rPh" if in_inline_str => phonetic_depth += 1,
                    b"t" if in_inline_str && phonetic_depth == 0 => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"sheetData" if sheet_data_start.is_none() && span.is_none() => {
                        span = Some(event_start..xml_reader.buffer_position());
                        prefix = element_prefix(&e)?;
                    }
                    b"row" if sheet_data_start.is_some() => {
                        rows.push(read_row_start(&e)?);
                    }
                    b"c" => {
                        if let Some(row) = current_row.as_mut() {
                            let markup = &data[event_start..xml_reader.buffer_position()];
                            row.cells.push(PendingCell::from_start(&e)?.finish(markup)?);
                        }
                    }
                    b"f" => {
                        if let Some(cell) = current_cell.as_mut() {
                            cell.formula = Some(Formula {
                                attributes: read_attributes(&e, &[])?,
                                text: String::new(),
                            });
                        }
                    }
                    b"v" => {
                        if let Some(cell) = current_cell.as_mut() {
                            cell.value.get_or_insert_with(String::new);
                        }
                    }
                    b"is" => {
                        if let Some(cell) = current_cell.as_mut() {
                            cell.inline.get_or_insert_with(String::new);
                        }
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"sheetData" => {
                        if let Some(start) = sheet_data_start.take() {
                            span = Some(start..xml_reader.buffer_position());
                        }
                    }
                    b"row" => {
                        if let Some(row) = current_row.take() {
                            rows.push(row);
                        }
                    }
                    b"c" => {
                        if let (Some(row), Some(cell)) = (current_row.as_mut(), current_cell.take())
                        {
                            let markup = &data[cell_start..xml_reader.buffer_position()];
                            row.cells.push(cell.finish(markup)?);
                        }
                    }
                    b"v" => in_value = false,
                    b"f" => in_formula = false,
                    b"is" => {
                        in_inline_str = false;
                        if let Some(cell) = current_cell.as_mut() {
                            cell.inline.get_or_insert_with(String::new);
                        }
                    }
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_value || in_formula || in_inline_text => {
                    let text = e.unescape()?;
                    push_cell_text(&mut current_cell, &text, in_value, in_formula);
                }
                Ok(Event::CData(e)) if in_value || in_formula || in_inline_text => {
                    let text = utf8(&e)?;
                    push_cell_text(&mut current_cell, &text, in_value, in_formula);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        let span = span
            .ok_or_else(|| XlsxError::InvalidFormat("worksheet has no sheetData".into()))?;
        log::trace!("read {} rows from sheetData at {:?}", rows.len(), span);

        Ok(ParsedSheet {
            worksheet: Worksheet::from_rows(rows),
            span,
            prefix,
        })
    }
}

/// Cell being assembled while its child elements are read
struct PendingCell {
    reference: String,
    type_tag: Option<String>,
    attributes: Vec<Attribute>,
    value: Option<String>,
    inline: Option<String>,
    formula: Option<Formula>,
}

impl PendingCell {
    fn from_start(e: &BytesStart<'_>) -> XlsxResult<Self> {
        let mut reference = String::new();
        let mut type_tag = None;
        for attr in e.attributes() {
            let attr = attr?;
            match attr.key.as_ref() {
                b"r" => reference = attr.unescape_value()?.into_owned(),
                b"t" => type_tag = Some(attr.unescape_value()?.into_owned()),
                _ => {}
            }
        }

        Ok(Self {
            reference,
            type_tag,
            attributes: read_attributes(e, &[b"r", b"t"])?,
            value: None,
            inline: None,
            formula: None,
        })
    }

    /// Build the cell, keeping `markup` (the element's original bytes) so
    /// an untouched cell is written back exactly as read
    fn finish(self, markup: &[u8]) -> XlsxResult<Cell> {
        let tag = self.type_tag.as_deref();
        let raw = match tag {
            Some("inlineStr") => self.inline.or(self.value),
            _ => self.value,
        };

        let value = match raw {
            Some(raw) => {
                let raw = if tag == Some("inlineStr") {
                    decode_excel_escapes(&raw)
                } else {
                    raw
                };
                Some(CellValue::from_raw(tag, raw.clone()).ok_or_else(|| {
                    XlsxError::Parse(format!(
                        "cell {}: invalid value '{}' for type {}",
                        self.reference,
                        raw,
                        tag.unwrap_or("n")
                    ))
                })?)
            }
            None => None,
        };

        Ok(Cell {
            reference: self.reference,
            value,
            formula: self.formula,
            attributes: self.attributes,
            markup: Some(utf8(markup)?.into_owned()),
        })
    }
}

fn push_cell_text(cell: &mut Option<PendingCell>, text: &str, in_value: bool, in_formula: bool) {
    let Some(cell) = cell.as_mut() else {
        return;
    };
    if in_value {
        cell.value.get_or_insert_with(String::new).push_str(text);
    } else if in_formula {
        if let Some(formula) = cell.formula.as_mut() {
            formula.text.push_str(text);
        }
    } else {
        cell.inline.get_or_insert_with(String::new).push_str(text);
    }
}

fn read_row_start(e: &BytesStart<'_>) -> XlsxResult<Row> {
    let mut index = 0;
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"r" {
            let raw = attr.unescape_value()?;
            index = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| XlsxError::Parse(format!("invalid row index '{}'", raw)))?;
        }
    }

    Ok(Row {
        index,
        cells: Vec::new(),
        attributes: read_attributes(e, &[b"r"])?,
    })
}

/// Every attribute of `e` except those named in `skip`, in document order
fn read_attributes(e: &BytesStart<'_>, skip: &[&[u8]]) -> XlsxResult<Vec<Attribute>> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        if skip.contains(&attr.key.as_ref()) {
            continue;
        }
        let key = utf8(attr.key.as_ref())?.into_owned();
        attributes.push((key, attr.unescape_value()?.into_owned()));
    }
    Ok(attributes)
}

fn element_prefix(e: &BytesStart<'_>) -> XlsxResult<Option<String>> {
    match e.name().prefix() {
        Some(prefix) => Ok(Some(utf8(prefix.as_ref())?.into_owned())),
        None => Ok(None),
    }
}

fn utf8(bytes: &[u8]) -> XlsxResult<Cow<'_, str>> {
    std::str::from_utf8(bytes)
        .map(Cow::Borrowed)
        .map_err(|e| XlsxError::Parse(format!("invalid UTF-8: {}", e)))
}
