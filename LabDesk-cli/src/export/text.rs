use std::fmt::Write as _;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use lab_desk_domain::entities::{ReportDocument, ReportRow, Severity};
use lab_desk_domain::export::{ExportError, ReportExporter};

const RULE_WIDTH: usize = 100;

/// Renders the report as a plain-text page with one table per subsection
#[derive(Debug, Clone, Copy)]
pub struct TextExporter {
    /// Color abnormal values with ANSI escapes
    pub styled: bool,

    /// Table width in columns
    pub width: u16,
}

impl Default for TextExporter {
    fn default() -> Self {
        Self {
            styled: false,
            width: RULE_WIDTH as u16,
        }
    }
}

impl ReportExporter for TextExporter {
    fn format_name(&self) -> &'static str {
        "text"
    }

    fn export(&self, document: &ReportDocument) -> Result<Vec<u8>, ExportError> {
        let mut out = String::new();
        self.render(document, &mut out)
            .map_err(|e| ExportError::Render(e.to_string()))?;
        Ok(out.into_bytes())
    }
}

impl TextExporter {
    fn render(&self, document: &ReportDocument, out: &mut String) -> std::fmt::Result {
        let header = &document.header;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(out, "{}", header.lab.name.to_uppercase())?;
        if let Some(slogan) = &header.lab.slogan {
            writeln!(out, "{}", slogan)?;
        }
        let contact: Vec<&str> = [&header.lab.address, &header.lab.phone, &header.lab.email]
            .into_iter()
            .filter_map(|value| value.as_deref())
            .collect();
        if !contact.is_empty() {
            writeln!(out, "{}", contact.join(" | "))?;
        }
        writeln!(out, "{}", rule)?;
        writeln!(out, "{:^width$}", header.title, width = RULE_WIDTH)?;
        writeln!(out, "{}", rule)?;

        let mut panel = self.table();
        panel.set_header(vec![header_cell("PATIENT INFORMATION"), header_cell("REPORT DETAILS")]);
        panel.add_row(vec![
            format!("Name: {}", header.patient.name),
            format!("Report Date: {}", header.details.report_date),
        ]);
        panel.add_row(vec![
            format!("Age/Sex: {}", header.patient.age_sex),
            format!("Report Time: {}", header.details.report_time),
        ]);
        panel.add_row(vec![
            format!("Patient ID: {}", header.patient.patient_id),
            format!("REF. BY: {}", header.details.referred_by),
        ]);
        panel.add_row(vec![format!("Contact: {}", header.patient.contact), String::new()]);
        writeln!(out, "{}", panel)?;

        for section in &document.sections {
            writeln!(out)?;
            writeln!(out, "{}", section.title)?;
            for subsection in &section.subsections {
                if let Some(title) = &subsection.title {
                    writeln!(out, "  {}", title)?;
                }
                writeln!(out, "{}", self.rows_table(&subsection.rows))?;
                for row in &subsection.rows {
                    if let Some(note) = &row.note {
                        writeln!(out, "  Note ({}): {}", row.test_name, note)?;
                    }
                }
            }
        }

        let footer = &document.footer;
        writeln!(out)?;
        writeln!(out, "{}", footer.interpretation_title)?;
        for note in &footer.interpretation_notes {
            writeln!(out, "  - {}", note)?;
        }

        if let Some(link) = &footer.share_link {
            writeln!(out)?;
            writeln!(out, "View online: {}", link)?;
        }

        if let Some(signatory) = &footer.signatory {
            writeln!(out)?;
            writeln!(out, "{:>width$}", signatory.name.to_uppercase(), width = RULE_WIDTH)?;
            for line in [&signatory.credentials, &signatory.title].into_iter().flatten() {
                writeln!(out, "{:>width$}", line, width = RULE_WIDTH)?;
            }
        }

        writeln!(out)?;
        if let Some(director) = &footer.lab_director {
            writeln!(out, "Lab Director: {}", director)?;
        }
        writeln!(out, "{}", footer.generated_note)?;
        writeln!(out, "{}", footer.generated_on)?;
        writeln!(out)?;
        writeln!(out, "{}", footer.disclaimer_title)?;
        writeln!(out, "{}", footer.disclaimer)?;
        Ok(())
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(self.width);
        if self.styled {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }
        table
    }

    fn rows_table(&self, rows: &[ReportRow]) -> Table {
        let mut table = self.table();
        table.set_header(vec![
            header_cell("TEST NAME"),
            header_cell("RESULT"),
            header_cell("UNIT"),
            header_cell("REFERENCE RANGE"),
            header_cell("STATUS"),
        ]);

        for row in rows {
            let result = match row.arrow.glyph() {
                "" => row.result.clone(),
                glyph => format!("{} {}", row.result, glyph),
            };
            table.add_row(vec![
                Cell::new(&row.test_name),
                severity_cell(result, row.severity),
                Cell::new(&row.unit),
                Cell::new(&row.reference_range),
                severity_cell(&row.status_label, row.severity).add_attribute(Attribute::Bold),
            ]);
        }

        if let Some(column) = table.column_mut(1) {
            column.set_cell_alignment(CellAlignment::Right);
        }
        table
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

fn severity_cell<T: ToString>(value: T, severity: Severity) -> Cell {
    let cell = Cell::new(value);
    match severity {
        Severity::Abnormal => cell.fg(Color::Red),
        Severity::Normal => cell.fg(Color::Green),
        Severity::Neutral => cell,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_desk_domain::entities::conversions::convert_to_domain_report;
    use lab_desk_domain::services::{assemble_report, GroupingLayout};
    use lab_desk_domain::testing::{sample_context, sample_payload, SAMPLE_PATIENT_CODE};

    fn render(layout: GroupingLayout) -> String {
        let context = sample_context()
            .with_layout(layout)
            .with_share_link("http://localhost:5173/view-report/LAB-1001");
        let data = convert_to_domain_report(sample_payload(SAMPLE_PATIENT_CODE), context.generated_at);
        let bytes = TextExporter::default().export(&assemble_report(&data, &context)).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_text_layout_contains_report_parts() {
        let text = render(GroupingLayout::Nested);

        assert!(text.starts_with("SUNRISE DIAGNOSTICS\n"));
        assert!(text.contains("LABORATORY INVESTIGATION REPORT"));
        assert!(text.contains("Age/Sex: 42 Years / Female"));
        assert!(text.contains("REF. BY: Dr. A. Shah"));
        assert!(text.contains("HEMATOLOGY\n  Complete Blood Count\n"));
        assert!(text.contains("10.8 ↓"));
        assert!(text.contains("  Note (Fasting Glucose): Non-fasting sample\n"));
        assert!(text.contains("View online: http://localhost:5173/view-report/LAB-1001"));
        assert!(text.contains("Report generated on: 15/01/2024, 10:30:00"));
        assert!(text.contains("IMPORTANT MEDICAL DISCLAIMER:"));
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let text = render(GroupingLayout::Flat);
        assert!(!text.contains('\u{1b}'));
        assert!(text.contains("HEMATOLOGY PROFILE"));
    }
}
