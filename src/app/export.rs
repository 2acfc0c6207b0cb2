use crate::domain::model::PaymentTerm;
use crate::utils::error::{Result, TermsError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
    #[default]
    Table,
}

pub fn render_terms(terms: &[PaymentTerm], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => render_csv(terms),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(terms)?),
        OutputFormat::Table => Ok(render_table(terms)),
    }
}

fn render_csv(terms: &[PaymentTerm]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if terms.is_empty() {
        writer.write_record(["external_id", "revision_token", "name", "discount_days"])?;
    }
    for term in terms {
        writer.serialize(term)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TermsError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| TermsError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

fn render_table(terms: &[PaymentTerm]) -> String {
    const HEADERS: [&str; 4] = ["NAME", "DISCOUNT DAYS", "LIST ID", "EDIT SEQUENCE"];

    let rows: Vec<[String; 4]> = terms
        .iter()
        .map(|term| {
            [
                term.name().to_string(),
                term.discount_days().to_string(),
                term.external_id().to_string(),
                term.revision_token().to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: [&str; 4]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(HEADERS)];
    for row in &rows {
        lines.push(format_row([&row[0], &row[1], &row[2], &row[3]]));
    }
    lines.push(format!("{} term(s)", rows.len()));
    lines.join("\n")
}
