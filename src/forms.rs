//! Interactive form fields – the two passes over the generated PDF.
//!
//! [`attach_form_fields`] turns every [`FormField`] of the layout into a text
//! widget on its page and registers it in the document's AcroForm.
//! [`fix_field_display_flags`] runs on the re-loaded scratch file: it centers
//! every field and asks viewers to regenerate appearances, so pre-filled
//! values show up without a click.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, StringFormat};

use crate::error::{ReportError, Result};
use crate::layout_config::{Alignment, DocumentLayout, FormField};

/// Field flag bit for multi-line text fields.
const FF_MULTILINE: i64 = 1 << 12;
/// Annotation flag bit: print the widget.
const F_PRINT: i64 = 4;
/// `/Q` quadding value for centered text.
const Q_CENTER: i64 = 1;

/// Encode a PDF text string: a literal for plain ASCII, UTF-16BE with a byte
/// order mark otherwise.
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        return Object::string_literal(s);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn quadding(align: Alignment) -> i64 {
    match align {
        Alignment::Left => 0,
        Alignment::Center => Q_CENTER,
        Alignment::Right => 2,
    }
}

fn widget(field: &FormField, page_id: ObjectId, page_height: f32) -> Dictionary {
    let top = page_height - field.y;
    let mut dict = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "T" => text_string(&field.name),
        "V" => text_string(&field.value),
        "Rect" => vec![
            field.x.into(),
            (top - field.height).into(),
            (field.x + field.width).into(),
            top.into(),
        ],
        "F" => F_PRINT,
        "P" => page_id,
        "DA" => Object::string_literal(format!("/Helv {} Tf 0 g", field.font_size)),
        "Q" => quadding(field.align),
        "Border" => vec![0.into(), 0.into(), 0.into()],
    };
    if field.multiline {
        dict.set("Ff", FF_MULTILINE);
    }
    dict
}

fn catalog_id(doc: &Document) -> Result<ObjectId> {
    Ok(doc.trailer.get(b"Root")?.as_reference()?)
}

/// Append `annots` to a page's `/Annots`, which may be missing, inline or
/// indirect.
fn append_annots(doc: &mut Document, page_id: ObjectId, annots: Vec<Object>) -> Result<()> {
    let existing = match doc.get_object(page_id)?.as_dict()?.get(b"Annots") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };
    if let Some(id) = existing {
        doc.get_object_mut(id)?.as_array_mut()?.extend(annots);
        return Ok(());
    }

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    match page.get_mut(b"Annots") {
        Ok(Object::Array(list)) => list.extend(annots),
        _ => page.set("Annots", annots),
    }
    Ok(())
}

/// Add one text widget per layout field and build the AcroForm.
///
/// Returns the number of fields added.
pub fn attach_form_fields(doc: &mut Document, layout: &DocumentLayout) -> Result<usize> {
    let pages = doc.get_pages();
    if pages.len() < layout.pages.len() {
        return Err(ReportError::Render(format!(
            "document has {} pages, layout has {}",
            pages.len(),
            layout.pages.len()
        )));
    }

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut field_refs: Vec<Object> = Vec::new();
    for (page_layout, page_id) in layout.pages.iter().zip(pages.values()) {
        let mut annots = Vec::with_capacity(page_layout.fields.len());
        for field in &page_layout.fields {
            let id = doc.add_object(widget(field, *page_id, layout.page_height_pt));
            annots.push(Object::Reference(id));
        }
        if annots.is_empty() {
            continue;
        }
        field_refs.extend(annots.iter().cloned());
        append_annots(doc, *page_id, annots)?;
    }

    let count = field_refs.len();
    let acroform_id = doc.add_object(dictionary! {
        "Fields" => field_refs,
        "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
        "DR" => dictionary! {
            "Font" => dictionary! {
                "Helv" => font_id,
            },
        },
    });
    let root = catalog_id(doc)?;
    doc.get_object_mut(root)?
        .as_dict_mut()?
        .set("AcroForm", acroform_id);

    log::debug!("Attached {count} form fields");
    Ok(count)
}

/// Field object ids listed in the AcroForm.
fn field_ids(doc: &Document) -> Result<(Option<ObjectId>, Vec<ObjectId>)> {
    let catalog = doc.get_object(catalog_id(doc)?)?.as_dict()?;
    let (form_id, form) = match catalog.get(b"AcroForm") {
        Ok(Object::Reference(id)) => (Some(*id), doc.get_object(*id)?.as_dict()?),
        Ok(Object::Dictionary(dict)) => (None, dict),
        _ => return Ok((None, Vec::new())),
    };
    let ids = match form.get(b"Fields") {
        Ok(Object::Array(fields)) => fields
            .iter()
            .filter_map(|f| f.as_reference().ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok((form_id, ids))
}

/// Center every field and set `/NeedAppearances`.
///
/// Returns the number of fields updated.
pub fn fix_field_display_flags(doc: &mut Document) -> Result<usize> {
    let (form_id, ids) = field_ids(doc)?;

    for id in &ids {
        doc.get_object_mut(*id)?.as_dict_mut()?.set("Q", Q_CENTER);
    }

    let form = match form_id {
        Some(id) => doc.get_object_mut(id)?.as_dict_mut()?,
        None => {
            let root = catalog_id(doc)?;
            let catalog = doc.get_object_mut(root)?.as_dict_mut()?;
            if !catalog.has(b"AcroForm") {
                catalog.set("AcroForm", Dictionary::new());
            }
            catalog.get_mut(b"AcroForm")?.as_dict_mut()?
        }
    };
    form.set("NeedAppearances", true);

    log::debug!("Updated display flags of {} form fields", ids.len());
    Ok(ids.len())
}
