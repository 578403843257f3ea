use super::ui::{self, StyleType};
use crate::core::trend::OverviewStats;
use comfy_table::Cell;

pub fn render(stats: &OverviewStats) -> String {
    let title = ui::style_text("Overview of all quarterly data", StyleType::Title);
    if stats.quarter_count == 0 {
        return format!(
            "{title}\n{}",
            ui::style_text(ui::NO_DATA, StyleType::Subtle)
        );
    }

    let mut totals = ui::new_styled_table();
    totals.set_header(vec![ui::header_cell("Statistic"), ui::header_cell("Value")]);
    totals.add_row(vec![
        Cell::new("Total Visitors"),
        ui::right_cell(ui::format_count(stats.total_visitors)),
    ]);
    totals.add_row(vec![
        Cell::new("Total Spending"),
        ui::right_cell(ui::format_millions(stats.total_amount)),
    ]);
    totals.add_row(vec![
        Cell::new("Average per Visitor"),
        ui::right_cell(ui::format_average(stats.average_per_unit)),
    ]);
    totals.add_row(vec![
        Cell::new("Countries"),
        ui::right_cell(stats.country_count),
    ]);
    totals.add_row(vec![
        Cell::new("Quarters"),
        ui::right_cell(stats.quarter_count),
    ]);
    let growth = stats.growth.as_ref();
    totals.add_row(vec![
        Cell::new("Visitor Growth (first to last quarter)"),
        ui::growth_cell(growth.and_then(|g| g.visitors)),
    ]);
    totals.add_row(vec![
        Cell::new("Spending Growth (first to last quarter)"),
        ui::growth_cell(growth.and_then(|g| g.amount)),
    ]);
    totals.add_row(vec![
        Cell::new("Average Yearly Growth"),
        ui::growth_cell(growth.and_then(|g| g.average_yearly)),
    ]);

    let season_total = stats
        .seasonal
        .values()
        .fold(0u64, |sum, v| sum.saturating_add(*v));
    let mut seasonal = ui::new_styled_table();
    seasonal.set_header(vec![
        ui::header_cell("Quarter"),
        ui::header_cell("Visitors"),
        ui::header_cell("Share"),
    ]);
    for (quarter, visitors) in &stats.seasonal {
        let share = (season_total > 0).then(|| *visitors as f64 / season_total as f64 * 100.0);
        seasonal.add_row(vec![
            Cell::new(quarter),
            ui::right_cell(ui::format_count(*visitors)),
            ui::format_optional_cell(share, |s| format!("{s:.1}%")),
        ]);
    }

    let mut top = ui::new_styled_table();
    top.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Country"),
        ui::header_cell("Visitors"),
        ui::header_cell("Spending"),
    ]);
    for (i, entry) in stats.top_countries.iter().enumerate() {
        top.add_row(vec![
            ui::right_cell(i + 1),
            Cell::new(&entry.country),
            ui::right_cell(ui::format_count(entry.record.visitors)),
            ui::right_cell(ui::format_millions(entry.record.amount)),
        ]);
    }

    format!(
        "{title}\n{totals}\n{}\n{seasonal}\n{}\n{top}",
        ui::style_text("Seasonal distribution", StyleType::TotalLabel),
        ui::style_text("Top countries", StyleType::TotalLabel),
    )
}

pub fn run(stats: &OverviewStats) {
    println!("{}", render(stats));
}
