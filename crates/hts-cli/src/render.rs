//! Terminal tables for schema, vectors and outcomes.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use hts_model::{Feature, FeatureKind, FeatureVector, RiskOutcome, RiskTier};

/// Plain one-line-per-feature listing of the schema.
#[must_use]
pub fn feature_listing() -> String {
    Feature::ALL
        .iter()
        .map(|feature| {
            format!(
                "{:<22} {:<26} {}",
                feature.group().label(),
                feature.name(),
                feature.kind().label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Schema table: group, feature, kind.
#[must_use]
pub fn features_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Feature"),
        header_cell("Kind"),
    ]);
    apply_table_style(&mut table);
    let mut previous_group = None;
    for feature in Feature::ALL {
        let group = feature.group();
        let group_cell = if previous_group == Some(group) {
            Cell::new("")
        } else {
            Cell::new(group.label())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold)
        };
        previous_group = Some(group);
        let kind_cell = match feature.kind() {
            FeatureKind::Indicator => dim_cell(feature.kind().label()),
            FeatureKind::Numeric => Cell::new(feature.kind().label()).fg(Color::Yellow),
        };
        table.add_row(vec![group_cell, Cell::new(feature.name()), kind_cell]);
    }
    table
}

/// Table of the non-zero features of a vector.
#[must_use]
pub fn vector_table(vector: &FeatureVector) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Feature"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for (feature, value) in vector.iter().filter(|(_, value)| *value != 0.0) {
        table.add_row(vec![
            Cell::new(feature.group().label()),
            Cell::new(feature.name()),
            Cell::new(value),
        ]);
    }
    table
}

/// Human-readable outcome line.
#[must_use]
pub fn outcome_line(outcome: &RiskOutcome) -> String {
    match outcome {
        RiskOutcome::Scored(assessment) => format!(
            "[{}] p={:.6} {}",
            assessment.tier,
            assessment.probability,
            assessment.message()
        ),
        RiskOutcome::NoResult => outcome.message().to_string(),
    }
}

/// Color used for a tier when printing to a terminal.
#[must_use]
pub fn tier_color(tier: RiskTier) -> Color {
    match tier {
        RiskTier::VeryHigh => Color::Red,
        RiskTier::High => Color::DarkRed,
        RiskTier::Medium => Color::Yellow,
        RiskTier::Low => Color::Green,
    }
}

/// Single-row table summarising an outcome.
#[must_use]
pub fn outcome_table(outcome: &RiskOutcome) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Tier"),
        header_cell("Probability"),
        header_cell("Recommendation"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    match outcome {
        RiskOutcome::Scored(assessment) => {
            table.add_row(vec![
                Cell::new(assessment.tier.label())
                    .fg(tier_color(assessment.tier))
                    .add_attribute(Attribute::Bold),
                Cell::new(format!("{:.6}", assessment.probability)),
                Cell::new(assessment.message()),
            ]);
        }
        RiskOutcome::NoResult => {
            table.add_row(vec![dim_cell("-"), dim_cell("-"), Cell::new(outcome.message())]);
        }
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
