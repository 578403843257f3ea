use super::ui::{self, StyleType};
use crate::core::country::insight_for_period;
use crate::core::dataset::Dataset;
use crate::core::metrics::growth;
use crate::core::model::PeriodKey;
use comfy_table::Cell;

/// Detail panel for one country in the selected period.
pub fn render(dataset: &Dataset, period: PeriodKey, country: &str) -> String {
    let title = ui::style_text(&format!("{country} in {period}"), StyleType::Title);
    let Some(insight) = insight_for_period(dataset, period, country) else {
        return format!(
            "{title}\n{}",
            ui::style_text(ui::NO_DATA, StyleType::Subtle)
        );
    };
    let rates = growth(dataset, period, country);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Statistic"),
        ui::header_cell("Value"),
        ui::header_cell("Growth"),
    ]);
    table.add_row(vec![
        Cell::new("Visitors"),
        ui::right_cell(ui::format_count(insight.record.visitors)),
        ui::growth_cell(rates.and_then(|g| g.visitors)),
    ]);
    table.add_row(vec![
        Cell::new("Spending"),
        ui::right_cell(ui::format_millions(insight.record.amount)),
        ui::growth_cell(rates.and_then(|g| g.amount)),
    ]);
    table.add_row(vec![
        Cell::new("Market Share"),
        ui::right_cell(format!("{:.1}%", insight.share)),
        ui::na_cell(),
    ]);
    table.add_row(vec![
        Cell::new("Average per Visitor"),
        ui::format_optional_cell(insight.average_per_unit, ui::format_average),
        ui::na_cell(),
    ]);
    table.add_row(vec![
        Cell::new("Period Average per Visitor"),
        ui::right_cell(ui::format_average(insight.period_average)),
        ui::na_cell(),
    ]);

    let mut output = format!("{title}\n{table}");
    output.push_str(&format!(
        "\n{} {country} is a {} with {:.1}% of visitors.",
        ui::style_text("Position:", StyleType::TotalLabel),
        insight.position,
        insight.share
    ));
    if let Some(profile) = insight.profile {
        output.push_str(&format!(
            "\n{} {profile}.",
            ui::style_text("Spending:", StyleType::TotalLabel)
        ));
    }
    output
}

pub fn run(dataset: &Dataset, period: PeriodKey, country: &str) {
    println!("{}", render(dataset, period, country));
}
