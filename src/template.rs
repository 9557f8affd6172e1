//! The form template: fixed geometry, column layout and label table.
//!
//! Everything here is immutable configuration. Labels default to the German
//! wording of the printed form and can be replaced wholesale.

use serde::{Deserialize, Serialize};

use crate::matrix::Region;
use crate::model::{Column, HeaderField};

/// Height of the column caption strip above the table body.
pub const TABLE_CAPTION_HEIGHT: f32 = 30.0;
/// Height of one table row.
pub const ROW_HEIGHT: f32 = 14.0;
/// Footer (issuer and signature blocks) as a percentage of the page frame.
pub const FOOTER_PCT: f32 = 5.0;
/// Height of the caption strip at the top of every header block.
pub const LABEL_HEIGHT: f32 = 15.0;
/// Horizontal and vertical inset of captions and values inside a block.
pub const BLOCK_INSET: f32 = 2.0;
/// Height of the title inside the Wagenliste block.
pub const TITLE_HEIGHT: f32 = 30.0;
/// Inner padding of the footer blocks.
pub const FOOTER_PADDING: f32 = 5.0;
/// Gap between the page frame and the boilerplate strip below it.
pub const BOILERPLATE_GAP: f32 = 3.0;

pub const TABLE_FONT_SIZE: f32 = 10.0;
pub const HEADER_VALUE_FONT_SIZE: f32 = 11.0;
pub const PARTY_VALUE_FONT_SIZE: f32 = 8.0;

/// Width split of the header's top section: left stack, center stack,
/// Wagenliste block.
pub const HEADER_COLUMNS: [Region; 3] = [
    Region::columns(0.0, 35.0),
    Region::columns(35.0, 65.0),
    Region::columns(65.0, 100.0),
];

pub const LEFT_BLOCKS: [HeaderField; 3] = [
    HeaderField::Versandbahnhof1,
    HeaderField::Versandbahnhof2,
    HeaderField::Leitungswege,
];

pub const CENTER_BLOCKS: [HeaderField; 2] = [HeaderField::Date, HeaderField::Ort];

/// Metadata grid inside the Wagenliste block, 2 × 2.
pub const WAGENLISTE_FIELDS: [(HeaderField, Region); 4] = [
    (HeaderField::Bahnhof, Region::new((0.0, 50.0), (0.0, 50.0))),
    (HeaderField::Unternehmen, Region::new((50.0, 100.0), (0.0, 50.0))),
    (HeaderField::VersandNr, Region::new((0.0, 50.0), (50.0, 100.0))),
    (HeaderField::Land, Region::new((50.0, 100.0), (50.0, 100.0))),
];

/// Parties strip of the [`TemplateVariant::WithParties`] form.
pub const PARTY_BLOCKS: [(HeaderField, Region); 4] = [
    (HeaderField::Absender, Region::columns(0.0, 28.0)),
    (HeaderField::Empfaenger, Region::columns(28.0, 56.0)),
    (HeaderField::ZuVerzollenIn, Region::columns(56.0, 75.0)),
    (HeaderField::Begleiter, Region::columns(75.0, 100.0)),
];

/// Placement of one table column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    pub column: Column,
    /// Horizontal slice of the table, in percent.
    pub span: (f32, f32),
    /// Where the caption starts inside the caption strip, in percent.
    pub caption_offset: f32,
    /// Caption printed one character per line (for very narrow columns).
    pub stacked: bool,
}

const fn col(column: Column, start: f32, end: f32, caption_offset: f32) -> ColumnSpec {
    ColumnSpec {
        column,
        span: (start, end),
        caption_offset,
        stacked: false,
    }
}

pub const COLUMNS: [ColumnSpec; 9] = [
    col(Column::Index, 0.0, 4.0, 40.0),
    col(Column::Wagen, 4.0, 23.0, 40.0),
    col(Column::BezDG, 23.0, 44.0, 40.0),
    col(Column::NHM, 44.0, 52.0, 40.0),
    col(Column::PN, 52.0, 62.0, 20.0),
    ColumnSpec {
        column: Column::RID,
        span: (62.0, 64.0),
        caption_offset: 5.0,
        stacked: true,
    },
    col(Column::NettoMasse, 64.0, 76.0, 40.0),
    col(Column::TaraWagon, 76.0, 88.0, 40.0),
    col(Column::BruttoMasse, 88.0, 100.0, 40.0),
];

/// Columns that carry the summary row.
pub const SUM_LABEL_COLUMN: Column = Column::PN;
pub const SUM_COLUMNS: [Column; 3] = [Column::NettoMasse, Column::TaraWagon, Column::BruttoMasse];

/// Form layouts sharing one composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemplateVariant {
    /// Station, routing, date and Wagenliste blocks.
    #[default]
    Standard,
    /// Standard header plus a strip with sender, consignee, customs office
    /// and escort.
    WithParties,
}

impl TemplateVariant {
    /// Smallest header band; taller measured content grows it.
    pub fn min_header_height(self) -> f32 {
        match self {
            TemplateVariant::Standard => 135.0,
            TemplateVariant::WithParties => 180.0,
        }
    }

    pub fn has_parties(self) -> bool {
        matches!(self, TemplateVariant::WithParties)
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 50.0,
            bottom: 50.0,
            left: 20.0,
            right: 20.0,
        }
    }
}

/// Printed captions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub title: String,
    pub versandbahnhof: String,
    pub leitungswege: String,
    pub ort: String,
    pub uebernahme: String,
    pub bahnhof: String,
    pub unternehmen: String,
    pub versand_nr: String,
    pub land: String,
    pub absender: String,
    pub empfaenger: String,
    pub zu_verzollen_in: String,
    pub begleiter: String,
    pub issuer: String,
    pub signature: String,
    pub sum: String,
    pub combined_transport: String,
    pub form_code: String,
    /// Column captions in [`Column::ALL`] order.
    pub columns: [String; 9],
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            title: "Wagenliste zum Frachtbrief".to_string(),
            versandbahnhof: "Versandbahnhof".to_string(),
            leitungswege: "Leitungswege".to_string(),
            ort: "Ort".to_string(),
            uebernahme: "Übernahme Monat - Tag - Stunde".to_string(),
            bahnhof: "Bahnhof".to_string(),
            unternehmen: "Unternehmen".to_string(),
            versand_nr: "Versand Nr.".to_string(),
            land: "Land".to_string(),
            absender: "Absender".to_string(),
            empfaenger: "Empfänger".to_string(),
            zu_verzollen_in: "Zu verzollen in".to_string(),
            begleiter: "Begleiter (Name, Vorname)".to_string(),
            issuer: "Ausstellung durch".to_string(),
            signature: "Ort, Datum und Unterschrift".to_string(),
            sum: "Sum:".to_string(),
            combined_transport: "Nur für den kombinierten Verkehr".to_string(),
            form_code: "CIT-23".to_string(),
            columns: [
                "No.",
                "Wagen",
                "Bezeichnung des Gutes",
                "NHM",
                "Plomben Nummer",
                "RID",
                "Netto Masse",
                "Tara Wagon",
                "Brutto Masse",
            ]
            .map(str::to_string),
        }
    }
}

impl Labels {
    /// Caption printed above a header field's value.
    pub fn for_field(&self, field: HeaderField) -> &str {
        match field {
            HeaderField::Versandbahnhof1 | HeaderField::Versandbahnhof2 => &self.versandbahnhof,
            HeaderField::Leitungswege => &self.leitungswege,
            HeaderField::Ort => &self.ort,
            HeaderField::Date => &self.uebernahme,
            HeaderField::Bahnhof => &self.bahnhof,
            HeaderField::Unternehmen => &self.unternehmen,
            HeaderField::VersandNr => &self.versand_nr,
            HeaderField::Land => &self.land,
            HeaderField::Absender => &self.absender,
            HeaderField::Empfaenger => &self.empfaenger,
            HeaderField::ZuVerzollenIn => &self.zu_verzollen_in,
            HeaderField::Begleiter => &self.begleiter,
            HeaderField::AusstellungDurch => &self.issuer,
            HeaderField::SumMasses => &self.sum,
        }
    }

    pub fn column(&self, column: Column) -> &str {
        &self.columns[column as usize]
    }
}
