//! Billing summary report.
//!
//! [`BillingReport::build`] turns a record set into plain text lines and
//! table rows; [`BillingReport::to_pdf`] lays them out on A4 pages with
//! `printpdf`. Positions are measured from the top of the page and flipped
//! when drawn, since PDF coordinates start at the bottom left.

use chrono::{DateTime, FixedOffset, Utc};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::BufWriter;

use crate::error::{BillingError, BillingResult};
use crate::models::BillingRecord;
use crate::summary::{summarize, BillingSummary};

pub const REPORT_TITLE: &str = "Billing Summary Report";
pub const SUMMARY_HEADING: &str = "Summary of Payments:";
pub const TABLE_HEADING: &str = "Detailed Billing Information";
pub const TABLE_HEADERS: [&str; 7] = [
    "Bill No",
    "Billing Type",
    "Patient Name",
    "Patient ID",
    "Total Amount",
    "Payment Status",
    "Date",
];

/// `M/D/YYYY, H:MM:SS AM`
const DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_X: f32 = 14.0;
const GENERATED_X: f32 = 130.0;
const TABLE_TOP_FIRST: f32 = 90.0;
const TABLE_TOP_NEXT: f32 = 20.0;
const ROW_HEIGHT: f32 = 7.0;
const PAGE_BOTTOM: f32 = 280.0;
const COLUMN_X: [f32; 7] = [14.0, 42.0, 66.0, 100.0, 122.0, 146.0, 170.0];
const COLUMN_CHARS: [usize; 7] = [16, 13, 20, 12, 14, 14, 24];

/// `1500.5` -> `1500.50`
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}

/// `Rs. 1500.50`, as used in the summary lines
pub fn format_rupees(amount: Decimal) -> String {
    format!("Rs. {}", format_amount(amount))
}

/// A line of text drawn above the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub text: String,
    pub size: f32,
    pub bold: bool,
    pub x: f32,
    pub top: f32,
}

impl TextLine {
    fn new(text: impl Into<String>, size: f32, top: f32) -> Self {
        Self {
            text: text.into(),
            size,
            bold: false,
            x: MARGIN_X,
            top,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn at_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }
}

/// One table row, already formatted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub bill_no: String,
    pub billing_type: String,
    pub patient_name: String,
    pub patient_id: String,
    pub total_amount: String,
    pub payment_status: String,
    pub date: String,
}

impl ReportRow {
    fn cells(&self) -> [&str; 7] {
        [
            &self.bill_no,
            &self.billing_type,
            &self.patient_name,
            &self.patient_id,
            &self.total_amount,
            &self.payment_status,
            &self.date,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingReport {
    pub title: String,
    pub summary: BillingSummary,
    pub rows: Vec<ReportRow>,
    pub generated_at: DateTime<FixedOffset>,
}

impl BillingReport {
    /// Build a report over `records`, rendering dates in `offset`.
    pub fn build(records: &[BillingRecord], offset: FixedOffset) -> BillingResult<Self> {
        Self::build_at(records, offset, Utc::now())
    }

    pub fn build_at(
        records: &[BillingRecord],
        offset: FixedOffset,
        now: DateTime<Utc>,
    ) -> BillingResult<Self> {
        let summary = summarize(records)?;
        let rows = records
            .iter()
            .map(|record| ReportRow {
                bill_no: record.bill_no.clone(),
                billing_type: record.billing_type.to_string(),
                patient_name: record.patient_name.clone(),
                patient_id: record.patient_id.clone(),
                total_amount: format!("Rs.{}", format_amount(record.total_amount)),
                payment_status: record.payment_status.clone(),
                date: record
                    .created_at
                    .with_timezone(&offset)
                    .format(DATE_FORMAT)
                    .to_string(),
            })
            .collect();

        Ok(Self {
            title: REPORT_TITLE.to_string(),
            summary,
            rows,
            generated_at: now.with_timezone(&offset),
        })
    }

    pub fn summary_lines(&self) -> [String; 3] {
        [
            format!("Total Paid: {}", format_rupees(self.summary.total_paid)),
            format!("Total Pending: {}", format_rupees(self.summary.total_pending)),
            format!("Total Payments: {}", format_rupees(self.summary.total_payments)),
        ]
    }

    /// `Generated: 3/5/2024, 1:45:00 PM`, in the report's offset
    pub fn generated_line(&self) -> String {
        format!("Generated: {}", self.generated_at.format(DATE_FORMAT))
    }

    /// Everything drawn on the first page above the table
    pub fn header_lines(&self) -> Vec<TextLine> {
        let [paid, pending, payments] = self.summary_lines();
        vec![
            TextLine::new(self.title.as_str(), 18.0, 20.0),
            TextLine::new(self.generated_line(), 9.0, 20.0).at_x(GENERATED_X),
            TextLine::new(SUMMARY_HEADING, 12.0, 30.0).bold(),
            TextLine::new(paid, 12.0, 40.0),
            TextLine::new(pending, 12.0, 50.0),
            TextLine::new(payments, 12.0, 60.0),
            TextLine::new(TABLE_HEADING, 16.0, 80.0),
        ]
    }

    /// Rows split into pages. The first page holds fewer rows because the
    /// title and summary sit above the table. Always at least one page.
    pub fn pages(&self) -> Vec<&[ReportRow]> {
        let first = rows_per_page(TABLE_TOP_FIRST);
        let next = rows_per_page(TABLE_TOP_NEXT);

        let split = first.min(self.rows.len());
        let (head, rest) = self.rows.split_at(split);
        let mut pages = vec![head];
        pages.extend(rest.chunks(next));
        pages
    }

    pub fn to_pdf(&self) -> BillingResult<Vec<u8>> {
        let (doc, page1, layer1) =
            PdfDocument::new(&self.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| BillingError::Report(format!("PDF font error: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| BillingError::Report(format!("PDF font error: {e}")))?;

        let layer = doc.get_page(page1).get_layer(layer1);
        for line in self.header_lines() {
            let face = if line.bold { &bold } else { &font };
            text(&layer, &line.text, line.size, line.x, line.top, face);
        }

        for (index, rows) in self.pages().into_iter().enumerate() {
            let (layer, table_top) = if index == 0 {
                (doc.get_page(page1).get_layer(layer1), TABLE_TOP_FIRST)
            } else {
                let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                (doc.get_page(page).get_layer(layer), TABLE_TOP_NEXT)
            };

            draw_row(&layer, TABLE_HEADERS, table_top, &bold);
            let mut top = table_top;
            for row in rows {
                top += ROW_HEIGHT;
                draw_row(&layer, row.cells(), top, &font);
            }
        }

        let mut buf = BufWriter::new(Vec::new());
        doc.save(&mut buf)
            .map_err(|e| BillingError::Report(format!("PDF save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| BillingError::Report(format!("PDF buffer error: {e}")))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rows_per_page(table_top: f32) -> usize {
    ((PAGE_BOTTOM - table_top - ROW_HEIGHT) / ROW_HEIGHT) as usize + 1
}

fn text(layer: &PdfLayerReference, value: &str, size: f32, x: f32, top: f32, font: &IndirectFontRef) {
    layer.use_text(value, size, Mm(x), Mm(PAGE_HEIGHT - top), font);
}

fn draw_row(layer: &PdfLayerReference, cells: [&str; 7], top: f32, font: &IndirectFontRef) {
    for ((cell, x), width) in cells.iter().zip(COLUMN_X).zip(COLUMN_CHARS) {
        text(layer, &clip(cell, width), 8.0, x, top, font);
    }
}

fn clip(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let kept: String = value.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}~")
    }
}
