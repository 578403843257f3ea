use super::ui::{self, StyleType};
use crate::core::model::Metric;
use crate::core::view::PeriodView;
use comfy_table::Cell;

/// Statistics panel for the selected period. An empty period lists the
/// years that do have data.
pub fn render(view: &PeriodView, years: &[i32]) -> String {
    if view.is_empty() {
        let mut out = format!(
            "{}: {}",
            view.summary.label,
            ui::style_text(ui::NO_DATA, StyleType::Subtle)
        );
        if let Some(hint) = ui::years_hint(years) {
            out.push('\n');
            out.push_str(&ui::style_text(&hint, StyleType::Subtle));
        }
        return out;
    }

    let summary = &view.summary;
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Statistic"),
        ui::header_cell("Value"),
        ui::header_cell("Growth"),
    ]);

    table.add_row(vec![
        Cell::new("Total Visitors"),
        ui::right_cell(ui::format_count(summary.total_visitors)),
        ui::growth_cell(view.total_growth(Metric::Visitors)),
    ]);
    table.add_row(vec![
        Cell::new("Total Spending"),
        ui::right_cell(ui::format_millions(summary.total_amount)),
        ui::growth_cell(view.total_growth(Metric::Amount)),
    ]);
    table.add_row(vec![
        Cell::new("Average per Visitor"),
        ui::right_cell(ui::format_average(summary.average_per_unit)),
        ui::na_cell(),
    ]);
    table.add_row(vec![
        Cell::new("Countries"),
        ui::right_cell(summary.country_count),
        ui::na_cell(),
    ]);
    table.add_row(vec![
        Cell::new("Top Market"),
        Cell::new(summary.top_country.as_deref().unwrap_or("N/A")),
        ui::format_optional_cell(summary.top_country_share, |s| format!("{s:.1}% share")),
    ]);

    format!(
        "{}\n{table}",
        ui::style_text(&format!("Statistics for {}", summary.label), StyleType::Title)
    )
}

pub fn run(view: &PeriodView, years: &[i32]) {
    println!("{}", render(view, years));
}
