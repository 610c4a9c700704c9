use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ilr_cli::report::ValidationReport;
use ilr_model::Severity;
use ilr_reference::VerifySummary;
use ilr_validate::{Rule, RuleDefinition, RuleSet};

pub fn print_summary(report: &ValidationReport, rules: &RuleSet) {
    let context = &report.context;
    let outcome = &report.outcome;
    println!("Batch: {}", context.batch.display());
    println!("Reference: {}", context.reference_dir.display());
    println!(
        "Settings: {} (academic year {}/{})",
        context.settings_version,
        context.academic_year,
        (context.academic_year + 1) % 100
    );
    println!(
        "Learners: {}/{} processed in {} ms",
        outcome.records_processed,
        outcome.records_total,
        outcome.elapsed.as_millis()
    );
    if outcome.cancelled {
        println!("Run was cancelled; results cover complete learners only.");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Severity"),
        header_cell("Violations"),
        header_cell("Description"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    for row in report.rule_rows() {
        let description = rules
            .get(row.rule_id.as_str())
            .map(|rule| rule.description().to_string())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(row.rule_id.as_str()).add_attribute(Attribute::Bold),
            severity_cell(row.severity),
            count_cell(row.count, severity_color(row.severity)),
            Cell::new(description),
        ]);
    }
    let summary = &report.summary;
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(summary.total()).add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} errors, {} warnings across {} learners",
            summary.errors, summary.warnings, summary.learners
        ))
        .fg(Color::Cyan),
    ]);
    println!("{table}");
    print_diagnostics(report);
}

fn print_diagnostics(report: &ValidationReport) {
    let diagnostics = &report.outcome.diagnostics;
    if diagnostics.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Learner"),
        header_cell("Record"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for diagnostic in diagnostics {
        table.add_row(vec![
            Cell::new(diagnostic.rule_id.as_str()).fg(Color::Red),
            Cell::new(diagnostic.learn_ref_number.as_str()),
            Cell::new(diagnostic.record),
            Cell::new(&diagnostic.message),
        ]);
    }
    eprintln!();
    eprintln!("Quarantined rule defects:");
    eprintln!("{table}");
}

pub fn print_rules(rules: &[RuleDefinition]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Severity"),
        header_cell("Requires"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for rule in rules {
        let requires = rule
            .requires()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(rule.id().as_str()).add_attribute(Attribute::Bold),
            severity_cell(rule.severity()),
            Cell::new(requires),
            Cell::new(rule.description()),
        ]);
    }
    println!("{table}");
}

pub fn print_reference(summary: &VerifySummary) {
    println!("Reference: {}", summary.reference_dir.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Item"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows = [
        ("Files", summary.file_count),
        ("Postcodes", summary.postcode_count),
        ("LARS learning deliveries", summary.lars_count),
        ("FCS contract allocations", summary.contract_count),
        ("Organisations", summary.organisation_count),
        ("Thresholds", summary.threshold_count),
        ("Dates", summary.date_count),
        ("Code sets", summary.code_set_count),
    ];
    for (label, count) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
    }
}

fn severity_cell(severity: Severity) -> Cell {
    let label = match severity {
        Severity::Error => "Error",
        Severity::Warning => "Warning",
    };
    Cell::new(label)
        .fg(severity_color(severity))
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}
