//! Result rendering for the `icd` command.
//!
//! Every command produces a report that can be shown as a table, as JSON,
//! or as plain text with one line per input for use in pipelines.

use anyhow::Context;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use icd_core::{CHARLSON_MAP, ComorbidityTable, Explanation};
use icd_model::{ComorbidityMap, DiagnosticReport, ItemFailure, Severity};
use icd_validate::ValidationReport;
use serde::{Deserialize, Serialize};

/// Placeholder printed in plain output where an input produced no value.
pub const MISSING: &str = "NA";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Plain,
}

/// A command result.
pub trait Report: Serialize {
    fn table(&self) -> Table;

    fn plain(&self) -> anyhow::Result<String>;

    /// Lines for stderr: per-item failures and warnings.
    fn issues(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether the command should exit with status 1.
    fn has_failures(&self) -> bool {
        false
    }
}

pub fn render<R: Report>(report: &R, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Table => report.table().to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Plain => report.plain()?,
    })
}

/// Codes produced by condense, children, range and sort.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CodeList {
    pub codes: Vec<String>,
    pub failures: Vec<ItemFailure>,
    pub diagnostics: DiagnosticReport,
}

impl Report for CodeList {
    fn table(&self) -> Table {
        let mut table = new_table(&["#", "Code"]);
        align_column(&mut table, 0, CellAlignment::Right);
        for (index, code) in self.codes.iter().enumerate() {
            table.add_row(vec![dim_cell(index + 1), code_cell(code)]);
        }
        table
    }

    fn plain(&self) -> anyhow::Result<String> {
        Ok(lines(self.codes.iter().map(String::as_str)))
    }

    fn issues(&self) -> Vec<String> {
        failure_lines(&self.failures)
            .chain(diagnostic_lines(&self.diagnostics))
            .collect()
    }

    fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// One converted input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionRow {
    pub input: String,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Conversions {
    pub rows: Vec<ConversionRow>,
    pub failures: Vec<ItemFailure>,
}

impl Report for Conversions {
    fn table(&self) -> Table {
        let mut table = new_table(&["Input", "Output"]);
        for row in &self.rows {
            table.add_row(vec![
                Cell::new(&row.input),
                row.output.as_deref().map_or_else(missing_cell, code_cell),
            ]);
        }
        table
    }

    fn plain(&self) -> anyhow::Result<String> {
        Ok(lines(
            self.rows
                .iter()
                .map(|row| row.output.as_deref().unwrap_or(MISSING)),
        ))
    }

    fn issues(&self) -> Vec<String> {
        failure_lines(&self.failures).collect()
    }

    fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Major and minor segments of one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartsRow {
    pub input: String,
    pub major: Option<String>,
    pub minor: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PartsReport {
    pub rows: Vec<PartsRow>,
    pub failures: Vec<ItemFailure>,
}

impl Report for PartsReport {
    fn table(&self) -> Table {
        let mut table = new_table(&["Input", "Major", "Minor"]);
        for row in &self.rows {
            table.add_row(vec![
                Cell::new(&row.input),
                row.major.as_deref().map_or_else(missing_cell, code_cell),
                row.minor.as_deref().map_or_else(missing_cell, Cell::new),
            ]);
        }
        table
    }

    /// `major<TAB>minor` per input.
    fn plain(&self) -> anyhow::Result<String> {
        let rendered: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                format!(
                    "{}\t{}",
                    row.major.as_deref().unwrap_or(MISSING),
                    row.minor.as_deref().unwrap_or(MISSING)
                )
            })
            .collect();
        Ok(lines(rendered.iter().map(String::as_str)))
    }

    fn issues(&self) -> Vec<String> {
        failure_lines(&self.failures).collect()
    }

    fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl Report for ValidationReport {
    fn table(&self) -> Table {
        let mut table = new_table(&["Input", "Code", "Kind", "Valid", "Defined", "Billable"]);
        for column in 3..=5 {
            align_column(&mut table, column, CellAlignment::Center);
        }
        for row in &self.rows {
            table.add_row(vec![
                Cell::new(&row.input),
                row.code.as_deref().map_or_else(missing_cell, code_cell),
                row.kind
                    .map_or_else(|| dim_cell("-"), |kind| Cell::new(kind.to_string())),
                flag_cell(Some(row.valid)),
                flag_cell(row.defined),
                flag_cell(row.billable),
            ]);
        }
        table
    }

    /// `true`/`false` per input.
    fn plain(&self) -> anyhow::Result<String> {
        let rendered: Vec<&str> = self
            .rows
            .iter()
            .map(|row| {
                if row.valid && row.defined != Some(false) {
                    "true"
                } else {
                    "false"
                }
            })
            .collect();
        Ok(lines(rendered))
    }

    fn issues(&self) -> Vec<String> {
        let errors = self.rows.iter().filter_map(|row| {
            row.error
                .as_ref()
                .map(|error| format!("#{} {}: {error}", row.index, row.input))
        });
        errors.chain(diagnostic_lines(&self.diagnostics)).collect()
    }

    fn has_failures(&self) -> bool {
        !self.all_valid()
    }
}

impl Report for Explanation {
    fn table(&self) -> Table {
        let mut table = new_table(&["Code", "Description", "Billable"]);
        align_column(&mut table, 2, CellAlignment::Center);
        for row in &self.rows {
            table.add_row(vec![
                code_cell(&row.code),
                Cell::new(&row.long_desc),
                flag_cell(Some(row.billable)),
            ]);
        }
        table
    }

    /// Long descriptions, one per described code.
    fn plain(&self) -> anyhow::Result<String> {
        Ok(lines(self.rows.iter().map(|row| row.long_desc.as_str())))
    }

    fn issues(&self) -> Vec<String> {
        failure_lines(&self.failures)
            .chain(diagnostic_lines(&self.diagnostics))
            .collect()
    }

    fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Comorbidity flags, optionally with the Charlson index per record.
#[derive(Debug, Clone, Serialize)]
pub struct ComorbidityReport {
    #[serde(flatten)]
    pub table: ComorbidityTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<u32>>,
}

impl ComorbidityReport {
    /// # Errors
    ///
    /// Fails when scores are requested for a map other than Charlson.
    pub fn new(table: ComorbidityTable, with_scores: bool) -> anyhow::Result<Self> {
        let scores = if with_scores {
            let scores = table.charlson_scores().with_context(|| {
                format!(
                    "Charlson scores need the {CHARLSON_MAP} map, not '{}'",
                    table.map
                )
            })?;
            Some(scores)
        } else {
            None
        };
        Ok(Self { table, scores })
    }

    fn score(&self, row: usize) -> Option<u32> {
        self.scores.as_ref().and_then(|scores| scores.get(row).copied())
    }
}

impl Report for ComorbidityReport {
    fn table(&self) -> Table {
        let mut headers = vec!["Id", "Categories"];
        if self.scores.is_some() {
            headers.push("Score");
        }
        let mut table = new_table(&headers);
        align_column(&mut table, 2, CellAlignment::Right);
        for (position, row) in self.table.rows.iter().enumerate() {
            let categories = if row.categories.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(row.categories.join(", "))
            };
            let mut cells = vec![Cell::new(&row.id), categories];
            if let Some(score) = self.score(position) {
                cells.push(count_cell(score as usize, Color::Yellow));
            }
            table.add_row(cells);
        }
        table
    }

    /// CSV with one 0/1 column per category.
    fn plain(&self) -> anyhow::Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut header = vec!["id"];
        header.extend(self.table.categories.iter().map(String::as_str));
        if self.scores.is_some() {
            header.push("score");
        }
        writer.write_record(&header)?;
        for (position, row) in self.table.rows.iter().enumerate() {
            let mut fields = vec![row.id.clone()];
            fields.extend(
                row.flags
                    .iter()
                    .map(|flag| if *flag { "1" } else { "0" }.to_string()),
            );
            if let Some(score) = self.score(position) {
                fields.push(score.to_string());
            }
            writer.write_record(&fields)?;
        }
        let bytes = writer.into_inner().map_err(|error| error.into_error())?;
        let rendered = String::from_utf8(bytes)?;
        Ok(rendered.trim_end_matches('\n').to_string())
    }

    fn issues(&self) -> Vec<String> {
        self.table
            .rows
            .iter()
            .flat_map(|row| {
                row.failures
                    .iter()
                    .map(move |failure| format!("{}: {}", row.id, failure.error))
            })
            .collect()
    }

    fn has_failures(&self) -> bool {
        self.table.failure_count() > 0
    }
}

/// Category of a comorbidity map with the number of listed codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub codes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapSummary {
    pub name: String,
    pub categories: Vec<CategorySummary>,
}

impl From<&ComorbidityMap> for MapSummary {
    fn from(map: &ComorbidityMap) -> Self {
        Self {
            name: map.name().to_string(),
            categories: map
                .categories()
                .map(|name| CategorySummary {
                    name: name.to_string(),
                    codes: map.get(name).map_or(0, |codes| codes.len()),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MapsReport {
    pub maps: Vec<MapSummary>,
}

impl Report for MapsReport {
    fn table(&self) -> Table {
        let mut table = new_table(&["Map", "Category", "Codes"]);
        align_column(&mut table, 2, CellAlignment::Right);
        for map in &self.maps {
            for (position, category) in map.categories.iter().enumerate() {
                let name = if position == 0 {
                    Cell::new(&map.name)
                        .fg(Color::Blue)
                        .add_attribute(Attribute::Bold)
                } else {
                    Cell::new("")
                };
                table.add_row(vec![name, Cell::new(&category.name), Cell::new(category.codes)]);
            }
        }
        table
    }

    /// `map<TAB>category` per category.
    fn plain(&self) -> anyhow::Result<String> {
        let rendered: Vec<String> = self
            .maps
            .iter()
            .flat_map(|map| {
                map.categories
                    .iter()
                    .map(move |category| format!("{}\t{}", map.name, category.name))
            })
            .collect();
        Ok(lines(rendered.iter().map(String::as_str)))
    }
}

fn lines<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values.into_iter().collect::<Vec<_>>().join("\n")
}

fn failure_lines(failures: &[ItemFailure]) -> impl Iterator<Item = String> + '_ {
    failures
        .iter()
        .map(|failure| format!("#{} {}: {}", failure.index, failure.input, failure.error))
}

fn diagnostic_lines(report: &DiagnosticReport) -> impl Iterator<Item = String> + '_ {
    report.iter().map(|diagnostic| {
        let label = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        format!("{label}: {}", diagnostic.message)
    })
}

pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_header(headers.iter().map(|label| header_cell(label)));
    apply_table_style(&mut table);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn code_cell(code: &str) -> Cell {
    Cell::new(code).fg(Color::Blue)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn missing_cell() -> Cell {
    Cell::new(MISSING).fg(Color::Red)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn flag_cell(flag: Option<bool>) -> Cell {
    match flag {
        Some(true) => Cell::new("yes").fg(Color::Green),
        Some(false) => Cell::new("no").fg(Color::Red),
        None => dim_cell("-"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_conversion_keeps_failed_lines() {
        let report = Conversions {
            rows: vec![
                ConversionRow {
                    input: "391.0".to_string(),
                    output: Some("3910".to_string()),
                },
                ConversionRow {
                    input: "bad!".to_string(),
                    output: None,
                },
            ],
            failures: Vec::new(),
        };
        assert_eq!(render(&report, OutputFormat::Plain).unwrap(), "3910\nNA");
    }

    #[test]
    fn tables_carry_headers() {
        let list = CodeList {
            codes: vec!["391".to_string()],
            ..CodeList::default()
        };
        let table = render(&list, OutputFormat::Table).unwrap();
        assert!(table.contains("Code"));
        assert!(table.contains("391"));
    }

    #[test]
    fn output_format_reads_lowercase_names() {
        let format: OutputFormat = serde_json::from_str("\"plain\"").unwrap();
        assert_eq!(format, OutputFormat::Plain);
    }
}
