//! Streaming quick-xml reader producing an [`OrmDocument`].

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Field, OrmDocument, Record, CELL_DATA_TAG, SUPER_CELLS_TAG};
use crate::{Error, Result};

/// Depth of the document root element.
const ROOT_DEPTH: usize = 1;
/// Depth of `SuperCells` / `AllCellData` elements.
const RECORD_DEPTH: usize = 2;
/// Depth of record fields (`HEXID`, `N`, `K`, ...).
const FIELD_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordKind {
    SuperCell,
    Cell,
}

impl RecordKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            SUPER_CELLS_TAG => Some(RecordKind::SuperCell),
            CELL_DATA_TAG => Some(RecordKind::Cell),
            _ => None,
        }
    }
}

/// Read an ORM document from a file.
pub fn read_file(path: &Path) -> Result<OrmDocument> {
    let xml = std::fs::read_to_string(path)?;
    read_document(&xml)
}

/// Read an ORM document from text.
///
/// Only `SuperCells` and `AllCellData` children of the root are kept.
/// Text below field level is folded into the enclosing field.
pub fn read_document(xml: &str) -> Result<OrmDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut doc = OrmDocument::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut record: Option<(RecordKind, Record)> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let name = element_name(e)?;
                match depth {
                    ROOT_DEPTH => seen_root = true,
                    RECORD_DEPTH => {
                        record = RecordKind::from_tag(&name).map(|kind| (kind, Record::new()));
                    }
                    FIELD_DEPTH if record.is_some() => field = Some(Field::new(name, "")),
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = element_name(e)?;
                match depth + 1 {
                    ROOT_DEPTH => seen_root = true,
                    RECORD_DEPTH => {
                        if let Some(kind) = RecordKind::from_tag(&name) {
                            push_record(&mut doc, kind, Record::new());
                        }
                    }
                    FIELD_DEPTH => {
                        if let Some((_, rec)) = record.as_mut() {
                            rec.fields.push(Field::new(name, ""));
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref t)) => {
                if let Some(f) = field.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| Error::Xml(format!("bad text in <{}>: {}", f.tag, e)))?;
                    f.text.push_str(&text);
                }
            }
            Ok(Event::CData(ref c)) => {
                if let Some(f) = field.as_mut() {
                    f.text.push_str(&String::from_utf8_lossy(c));
                }
            }
            Ok(Event::End(_)) => {
                match depth {
                    FIELD_DEPTH => {
                        if let (Some(mut f), Some((_, rec))) = (field.take(), record.as_mut()) {
                            let trimmed = f.text.trim();
                            if trimmed.len() != f.text.len() {
                                f.text = trimmed.to_string();
                            }
                            rec.fields.push(f);
                        }
                    }
                    RECORD_DEPTH => {
                        if let Some((kind, rec)) = record.take() {
                            push_record(&mut doc, kind, rec);
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!(
                    "at byte {}: {}",
                    reader.error_position(),
                    e
                )));
            }
            _ => {} // Declarations, comments, processing instructions
        }
    }

    if !seen_root {
        return Err(Error::Xml("empty document".to_string()));
    }

    tracing::debug!(
        super_cells = doc.super_cells.len(),
        cells = doc.cells.len(),
        "read ORM document"
    );
    Ok(doc)
}

fn element_name(elem: &BytesStart) -> Result<String> {
    std::str::from_utf8(elem.name().as_ref())
        .map(str::to_string)
        .map_err(|e| Error::Xml(format!("invalid UTF-8 in element name: {}", e)))
}

fn push_record(doc: &mut OrmDocument, kind: RecordKind, record: Record) {
    match kind {
        RecordKind::SuperCell => doc.super_cells.push(record),
        RecordKind::Cell => doc.cells.push(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reads_both_record_kinds_in_order() {
        let xml = r#"<?xml version="1.0"?>
            <ORM>
              <SuperCells><ID>A</ID><InResistance>50</InResistance><OutResistance>25</OutResistance></SuperCells>
              <AllCellData>
                <HEXID>h1</HEXID>
                <SE> h2 </SE>
                <N>b</N>
              </AllCellData>
              <AllCellData><HEXID>h2</HEXID></AllCellData>
            </ORM>"#;
        let doc = read_document(xml).unwrap();

        assert_eq!(doc.super_cells.len(), 1);
        assert_eq!(doc.super_cells[0].first("InResistance"), Some("50"));
        assert_eq!(doc.cells.len(), 2);
        let tags: Vec<&str> = doc.cells[0].iter().map(|f| f.tag.as_str()).collect();
        assert_eq!(tags, vec!["HEXID", "SE", "N"]);
        assert_eq!(doc.cells[0].first("SE"), Some("h2"));
    }

    #[test]
    fn test_ignores_unrelated_root_children() {
        let xml = "<ORM><Meta><Author>x</Author></Meta><AllCellData><HEXID>a</HEXID></AllCellData></ORM>";
        let doc = read_document(xml).unwrap();
        assert!(doc.super_cells.is_empty());
        assert_eq!(doc.cells.len(), 1);
    }

    #[test]
    fn test_self_closing_field_has_empty_text() {
        let xml = "<ORM><AllCellData><HEXID>a</HEXID><supercell/></AllCellData><AllCellData/></ORM>";
        let doc = read_document(xml).unwrap();
        assert_eq!(doc.cells.len(), 2);
        assert_eq!(doc.cells[0].first("supercell"), Some(""));
        assert!(doc.cells[1].fields.is_empty());
    }

    #[test]
    fn test_unescapes_entities() {
        let xml = "<ORM><AllCellData><HEXID>a&amp;b</HEXID></AllCellData></ORM>";
        let doc = read_document(xml).unwrap();
        assert_eq!(doc.cells[0].first("HEXID"), Some("a&b"));
    }

    #[test]
    fn test_empty_and_malformed_documents() {
        assert!(matches!(read_document(""), Err(Error::Xml(_))));
        assert!(matches!(
            read_document("<ORM><AllCellData></ORM>"),
            Err(Error::Xml(_))
        ));
    }
}
