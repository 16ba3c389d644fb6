//! XLSX writer
//!
//! Produces the XML parts of a new workbook and re-serializes a worksheet's
//! `<sheetData>` block for splicing back into its original part.

use std::fmt::Write as _;
use std::ops::Range;

use sheetcrud_core::{Attribute, Cell, CellValue, Row, SheetCatalog, Worksheet};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const REL_TYPE_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// XLSX part writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// `[Content_Types].xml` for a workbook at `xl/workbook.xml` with the
    /// given worksheet parts
    pub fn content_types_xml<'a, I>(worksheet_parts: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut content = format!(
            r#"{}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
            XML_DECLARATION
        );

        for part in worksheet_parts {
            let _ = write!(
                content,
                r#"
    <Override PartName="/{}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                Self::escape_xml(part)
            );
        }

        content.push_str("\n</Types>");
        content
    }

    /// `_rels/.rels` pointing at `xl/workbook.xml`
    pub fn root_rels_xml() -> String {
        format!(
            r#"{}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="{}/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
            XML_DECLARATION, REL_TYPE_BASE
        )
    }

    /// `xl/workbook.xml` listing the catalog's sheets
    pub fn workbook_xml(catalog: &SheetCatalog) -> String {
        let mut content = format!(
            r#"{}
<workbook xmlns="{}" xmlns:r="{}">
    <sheets>"#,
            XML_DECLARATION, NS_MAIN, NS_REL
        );

        for entry in catalog.iter() {
            let _ = write!(
                content,
                r#"
        <sheet name="{}" sheetId="{}" r:id="{}"/>"#,
                Self::escape_xml(&entry.name),
                entry.sheet_id,
                Self::escape_xml(&entry.rel_id)
            );
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );
        content
    }

    /// `xl/_rels/workbook.xml.rels` with one worksheet relationship per
    /// catalog entry. Part paths must live under `xl/`.
    pub fn workbook_rels_xml(catalog: &SheetCatalog) -> String {
        let mut content = format!(
            r#"{}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            XML_DECLARATION
        );

        for entry in catalog.iter() {
            let target = entry.part.strip_prefix("xl/").unwrap_or(&entry.part);
            let _ = write!(
                content,
                r#"
    <Relationship Id="{}" Type="{}/worksheet" Target="{}"/>"#,
                Self::escape_xml(&entry.rel_id),
                REL_TYPE_BASE,
                Self::escape_xml(target)
            );
        }

        content.push_str("\n</Relationships>");
        content
    }

    /// A worksheet part with an empty `<sheetData/>`
    pub fn empty_worksheet_xml() -> String {
        format!(
            r#"{}
<worksheet xmlns="{}"><sheetData/></worksheet>"#,
            XML_DECLARATION, NS_MAIN
        )
    }

    /// Serialize a worksheet's rows as a `<sheetData>` element.
    ///
    /// `prefix` is the namespace prefix the original element used, applied
    /// to every element written so the block matches its surroundings.
    pub fn sheet_data_xml(worksheet: &Worksheet, prefix: Option<&str>) -> String {
        let p = match prefix {
            Some(prefix) => format!("{}:", prefix),
            None => String::new(),
        };

        if worksheet.is_empty() {
            return format!("<{}sheetData/>", p);
        }

        let mut content = format!("<{}sheetData>", p);
        for row in worksheet.rows() {
            Self::write_row(&mut content, &p, row);
        }
        let _ = write!(content, "</{}sheetData>", p);
        content
    }

    /// Replace the bytes in `span` of `original` with `sheet_data`
    pub fn splice_sheet_data(original: &[u8], span: Range<usize>, sheet_data: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(original.len() - span.len() + sheet_data.len());
        out.extend_from_slice(&original[..span.start]);
        out.extend_from_slice(sheet_data.as_bytes());
        out.extend_from_slice(&original[span.end..]);
        out
    }

    fn write_row(content: &mut String, p: &str, row: &Row) {
        let _ = write!(content, "<{}row", p);
        if row.index != 0 {
            let _ = write!(content, r#" r="{}""#, row.index);
        }
        Self::write_attributes(content, &row.attributes);

        if row.is_empty() {
            content.push_str("/>");
            return;
        }

        content.push('>');
        for cell in &row.cells {
            Self::write_cell(content, p, cell);
        }
        let _ = write!(content, "</{}row>", p);
    }

    fn write_cell(content: &mut String, p: &str, cell: &Cell) {
        if let Some(markup) = &cell.markup {
            content.push_str(markup);
            return;
        }

        let _ = write!(content, "<{}c", p);
        if !cell.reference.is_empty() {
            let _ = write!(content, r#" r="{}""#, Self::escape_xml(&cell.reference));
        }
        Self::write_attributes(content, &cell.attributes);
        if let Some(tag) = cell.value.as_ref().and_then(CellValue::type_tag) {
            let _ = write!(content, r#" t="{}""#, tag);
        }

        if cell.value.is_none() && cell.formula.is_none() {
            content.push_str("/>");
            return;
        }
        content.push('>');

        if let Some(formula) = &cell.formula {
            let _ = write!(content, "<{}f", p);
            Self::write_attributes(content, &formula.attributes);
            if formula.text.is_empty() {
                content.push_str("/>");
            } else {
                let _ = write!(content, ">{}</{}f>", Self::escape_xml(&formula.text), p);
            }
        }

        match &cell.value {
            Some(CellValue::InlineString(text)) => {
                let _ = write!(
                    content,
                    r#"<{p}is><{p}t xml:space="preserve">{}</{p}t></{p}is>"#,
                    Self::escape_xml(text),
                    p = p
                );
            }
            Some(value) => {
                let _ = write!(
                    content,
                    "<{p}v>{}</{p}v>",
                    Self::escape_xml(&value.raw_text()),
                    p = p
                );
            }
            None => {}
        }

        let _ = write!(content, "</{}c>", p);
    }

    fn write_attributes(content: &mut String, attributes: &[Attribute]) {
        for (name, value) in attributes {
            let _ = write!(content, r#" {}="{}""#, name, Self::escape_xml(value));
        }
    }

    fn escape_xml(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;")
    }
}
