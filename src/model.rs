//! Input model: the header field set and the wagon row records.
//!
//! Both vocabularies are closed enumerations so that a misspelt field name is
//! a compile error in Rust callers and a logged, ignored key in JSON input.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ReportError, Result};

/// Explicit line-break marker used when joining list values.
pub const LINE_BREAK: &str = "<br/>";

// ---------------------------------------------------------------------------
// Header fields
// ---------------------------------------------------------------------------

/// Every header field the form knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeaderField {
    Versandbahnhof1,
    Versandbahnhof2,
    Leitungswege,
    Ort,
    Bahnhof,
    Unternehmen,
    VersandNr,
    Land,
    AusstellungDurch,
    Date,
    SumMasses,
    Absender,
    Empfaenger,
    ZuVerzollenIn,
    Begleiter,
}

/// Shape a header field's value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Exactly one string.
    SingleLine,
    /// A string or a list of strings, stacked as lines.
    MultiLine,
    /// A list of exactly three strings.
    Triple,
}

impl HeaderField {
    pub const ALL: [HeaderField; 15] = [
        HeaderField::Versandbahnhof1,
        HeaderField::Versandbahnhof2,
        HeaderField::Leitungswege,
        HeaderField::Ort,
        HeaderField::Bahnhof,
        HeaderField::Unternehmen,
        HeaderField::VersandNr,
        HeaderField::Land,
        HeaderField::AusstellungDurch,
        HeaderField::Date,
        HeaderField::SumMasses,
        HeaderField::Absender,
        HeaderField::Empfaenger,
        HeaderField::ZuVerzollenIn,
        HeaderField::Begleiter,
    ];

    /// Key used in JSON input and in generated form-field names.
    pub fn key(self) -> &'static str {
        match self {
            HeaderField::Versandbahnhof1 => "Versandbahnhof_1",
            HeaderField::Versandbahnhof2 => "Versandbahnhof_2",
            HeaderField::Leitungswege => "Leitungswege",
            HeaderField::Ort => "Ort",
            HeaderField::Bahnhof => "Bahnhof",
            HeaderField::Unternehmen => "Unternehmen",
            HeaderField::VersandNr => "Versand_Nr",
            HeaderField::Land => "Land",
            HeaderField::AusstellungDurch => "Ausstellung_durch",
            HeaderField::Date => "date",
            HeaderField::SumMasses => "Sum_masses",
            HeaderField::Absender => "Absender",
            HeaderField::Empfaenger => "Empfänger",
            HeaderField::ZuVerzollenIn => "Zu_verzollen_in",
            HeaderField::Begleiter => "Begleiter",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }

    pub fn shape(self) -> FieldShape {
        match self {
            HeaderField::Date | HeaderField::SumMasses => FieldShape::Triple,
            HeaderField::Versandbahnhof1
            | HeaderField::Versandbahnhof2
            | HeaderField::Absender
            | HeaderField::Empfaenger
            | HeaderField::ZuVerzollenIn
            | HeaderField::Begleiter => FieldShape::MultiLine,
            _ => FieldShape::SingleLine,
        }
    }
}

/// A header value: one string or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Lines(Vec<String>),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(v: Vec<&str>) -> Self {
        FieldValue::Lines(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::Lines(v)
    }
}

/// Caller-supplied header values for one report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderFieldSet {
    values: BTreeMap<HeaderField, FieldValue>,
}

impl HeaderFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: HeaderField, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: HeaderField, value: impl Into<FieldValue>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: HeaderField) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Parse a JSON object keyed by the header vocabulary.
    ///
    /// Unknown keys are ignored with a warning. Values must be strings or
    /// lists of strings.
    pub fn from_json(json: &str) -> Result<Self> {
        let map: serde_json::Map<String, Value> = serde_json::from_str(json)?;
        let mut set = Self::new();
        for (key, value) in map {
            let Some(field) = HeaderField::from_key(&key) else {
                log::warn!("Ignoring unknown header field '{key}'");
                continue;
            };
            let value = match value {
                Value::String(s) => FieldValue::Text(s),
                Value::Array(items) => {
                    let mut lines = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            Value::String(s) => lines.push(s),
                            other => {
                                return Err(ReportError::validation(
                                    key,
                                    format!("list entries must be strings, got {other}"),
                                ))
                            }
                        }
                    }
                    FieldValue::Lines(lines)
                }
                other => {
                    return Err(ReportError::validation(
                        key,
                        format!("must be a string or a list of strings, got {other}"),
                    ))
                }
            };
            set.values.insert(field, value);
        }
        Ok(set)
    }

    /// Validate shapes and normalize every value into display text.
    ///
    /// Missing keys become empty strings; lists are joined with
    /// [`LINE_BREAK`].
    pub fn resolve(&self) -> Result<ResolvedHeader> {
        let mut text = BTreeMap::new();
        let mut date = empty_triple();
        let mut sum_masses = empty_triple();

        for field in HeaderField::ALL {
            let value = self.values.get(&field);
            match field.shape() {
                FieldShape::SingleLine => match value {
                    None => {}
                    Some(FieldValue::Text(s)) => {
                        text.insert(field, s.clone());
                    }
                    Some(FieldValue::Lines(_)) => {
                        return Err(ReportError::validation(field.key(), "must be a string"))
                    }
                },
                FieldShape::MultiLine => match value {
                    None => {}
                    Some(FieldValue::Text(s)) => {
                        text.insert(field, s.clone());
                    }
                    Some(FieldValue::Lines(lines)) => {
                        text.insert(field, lines.join(LINE_BREAK));
                    }
                },
                FieldShape::Triple => {
                    let Some(value) = value else { continue };
                    let parts = match value {
                        FieldValue::Lines(lines) if lines.len() == 3 => {
                            [lines[0].clone(), lines[1].clone(), lines[2].clone()]
                        }
                        FieldValue::Lines(lines) => {
                            return Err(ReportError::validation(
                                field.key(),
                                format!("must have 3 values, got {}", lines.len()),
                            ))
                        }
                        FieldValue::Text(_) => {
                            return Err(ReportError::validation(
                                field.key(),
                                "must be a list of 3 values",
                            ))
                        }
                    };
                    if field == HeaderField::Date {
                        date = parts;
                    } else {
                        sum_masses = parts;
                    }
                }
            }
        }

        Ok(ResolvedHeader {
            text,
            date,
            sum_masses,
        })
    }
}

fn empty_triple() -> [String; 3] {
    [String::new(), String::new(), String::new()]
}

/// Header values after validation, ready for layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedHeader {
    text: BTreeMap<HeaderField, String>,
    pub date: [String; 3],
    pub sum_masses: [String; 3],
}

impl ResolvedHeader {
    /// Display text for a single- or multi-line field (empty when absent).
    pub fn text(&self, field: HeaderField) -> &str {
        self.text.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Übernahme value: the three date parts spaced apart.
    pub fn handover_date(&self) -> String {
        self.date.join("  ")
    }

    /// Place and date written into the signature block.
    pub fn signature_line(&self) -> String {
        let ort = self.text(HeaderField::Ort);
        let has_date = self.date.iter().any(|d| !d.is_empty());
        let date = if has_date { self.date.join(".") } else { String::new() };
        match (ort.is_empty(), date.is_empty()) {
            (true, _) => date,
            (false, true) => ort.to_string(),
            (false, false) => format!("{ort} am {date}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Table columns, in left-to-right order. `Index` is the running "No."
/// column; the others are record columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    Index,
    Wagen,
    BezDG,
    NHM,
    PN,
    RID,
    NettoMasse,
    TaraWagon,
    BruttoMasse,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Index,
        Column::Wagen,
        Column::BezDG,
        Column::NHM,
        Column::PN,
        Column::RID,
        Column::NettoMasse,
        Column::TaraWagon,
        Column::BruttoMasse,
    ];

    /// Record key, also used in form-field names.
    pub fn key(self) -> &'static str {
        match self {
            Column::Index => "No",
            Column::Wagen => "Wagen",
            Column::BezDG => "BezDG",
            Column::NHM => "NHM",
            Column::PN => "PN",
            Column::RID => "RID",
            Column::NettoMasse => "NettoMasse",
            Column::TaraWagon => "TaraWagon",
            Column::BruttoMasse => "BruttoMasse",
        }
    }
}

/// One wagon's values. Missing columns deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    #[serde(rename = "Wagen", default, deserialize_with = "display_value")]
    pub wagen: String,
    #[serde(rename = "BezDG", default, deserialize_with = "display_value")]
    pub bez_dg: String,
    #[serde(rename = "NHM", default, deserialize_with = "display_value")]
    pub nhm: String,
    #[serde(rename = "PN", default, deserialize_with = "display_value")]
    pub pn: String,
    #[serde(rename = "RID", default, deserialize_with = "display_value")]
    pub rid: String,
    #[serde(rename = "NettoMasse", default, deserialize_with = "display_value")]
    pub netto_masse: String,
    #[serde(rename = "TaraWagon", default, deserialize_with = "display_value")]
    pub tara_wagon: String,
    #[serde(rename = "BruttoMasse", default, deserialize_with = "display_value")]
    pub brutto_masse: String,
}

impl RowRecord {
    /// Value shown in `column`. The index column is not part of the record.
    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Index => "",
            Column::Wagen => &self.wagen,
            Column::BezDG => &self.bez_dg,
            Column::NHM => &self.nhm,
            Column::PN => &self.pn,
            Column::RID => &self.rid,
            Column::NettoMasse => &self.netto_masse,
            Column::TaraWagon => &self.tara_wagon,
            Column::BruttoMasse => &self.brutto_masse,
        }
    }
}

/// Accept strings and numbers for display columns.
fn display_value<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

/// Parse a JSON array of row records.
pub fn rows_from_json(json: &str) -> Result<Vec<RowRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Rows to render: real records, or a number of blank rows for an empty
/// fill-in template.
#[derive(Debug, Clone, PartialEq)]
pub enum RowInput {
    Records(Vec<RowRecord>),
    Blank(usize),
}

impl RowInput {
    pub fn len(&self) -> usize {
        match self {
            RowInput::Records(rows) => rows.len(),
            RowInput::Blank(n) => *n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_records(self) -> Vec<RowRecord> {
        match self {
            RowInput::Records(rows) => rows,
            RowInput::Blank(n) => vec![RowRecord::default(); n],
        }
    }
}

impl From<Vec<RowRecord>> for RowInput {
    fn from(rows: Vec<RowRecord>) -> Self {
        RowInput::Records(rows)
    }
}

impl From<usize> for RowInput {
    fn from(n: usize) -> Self {
        RowInput::Blank(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_resolve_to_empty() {
        let resolved = HeaderFieldSet::new().resolve().unwrap();
        assert_eq!(resolved.text(HeaderField::Leitungswege), "");
        assert_eq!(resolved.sum_masses, empty_triple());
    }

    #[test]
    fn lists_join_with_line_break_marker() {
        let set = HeaderFieldSet::new().with(HeaderField::Absender, vec!["ACME", "Wien"]);
        let resolved = set.resolve().unwrap();
        assert_eq!(resolved.text(HeaderField::Absender), "ACME<br/>Wien");
    }

    #[test]
    fn date_needs_three_values() {
        let set = HeaderFieldSet::new().with(HeaderField::Date, vec!["09", "03"]);
        match set.resolve() {
            Err(ReportError::Validation { field, .. }) => assert_eq!(field, "date"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn sum_masses_needs_three_values() {
        let set = HeaderFieldSet::new().with(HeaderField::SumMasses, vec!["1", "2", "3", "4"]);
        assert!(matches!(set.resolve(), Err(ReportError::Validation { .. })));
    }

    #[test]
    fn single_line_field_rejects_list() {
        let set = HeaderFieldSet::new().with(HeaderField::Ort, vec!["a", "b"]);
        assert!(matches!(set.resolve(), Err(ReportError::Validation { .. })));
    }

    #[test]
    fn json_header_rejects_numbers() {
        let err = HeaderFieldSet::from_json(r#"{"Land": 12}"#).unwrap_err();
        assert!(matches!(err, ReportError::Validation { .. }));
    }

    #[test]
    fn json_header_ignores_unknown_keys() {
        let set = HeaderFieldSet::from_json(r#"{"Land": "AT", "Colour": "green"}"#).unwrap();
        assert_eq!(set.get(HeaderField::Land), Some(&FieldValue::from("AT")));
    }

    #[test]
    fn rows_accept_numbers_and_missing_columns() {
        let rows = rows_from_json(r#"[{"Wagen": "3180 0000 000-0", "NettoMasse": 56038}]"#).unwrap();
        assert_eq!(rows[0].get(Column::NettoMasse), "56038");
        assert_eq!(rows[0].get(Column::RID), "");
    }

    #[test]
    fn signature_line_combines_place_and_date() {
        let set = HeaderFieldSet::new()
            .with(HeaderField::Ort, "Seekirchen")
            .with(HeaderField::Date, vec!["09", "03", "24"]);
        assert_eq!(set.resolve().unwrap().signature_line(), "Seekirchen am 09.03.24");
    }
}
