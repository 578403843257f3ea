use super::ui::{self, StyleType};
use crate::core::metrics::record_average;
use crate::core::ranking::RegionFilter;
use crate::core::view::PeriodView;
use comfy_table::Cell;

/// Ranked country table for the selected period, region and metric.
pub fn render(view: &PeriodView) -> String {
    let filter = &view.filter;
    let scope = match &filter.region {
        RegionFilter::All => String::new(),
        RegionFilter::Region(id) => format!(" in {id}"),
    };
    let title = ui::style_text(
        &format!(
            "Top countries by {}{} for {}",
            ui::metric_label(filter.metric).to_lowercase(),
            scope,
            view.period
        ),
        StyleType::Title,
    );

    if view.ranked.is_empty() {
        return format!(
            "{title}\n{}",
            ui::style_text(ui::NO_DATA, StyleType::Subtle)
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Country"),
        ui::header_cell(ui::metric_label(filter.metric)),
        ui::header_cell("Share"),
        ui::header_cell("Growth"),
        ui::header_cell("Avg / Visitor"),
    ]);

    for (i, entry) in view.ranked.iter().enumerate() {
        let growth = view
            .growth(&entry.country)
            .and_then(|g| g.get(filter.metric));
        table.add_row(vec![
            ui::right_cell(i + 1),
            Cell::new(&entry.country),
            ui::right_cell(ui::format_metric(
                entry.record.value(filter.metric),
                filter.metric,
            )),
            ui::right_cell(format!("{:.1}%", view.share(&entry.country))),
            ui::growth_cell(growth),
            ui::format_optional_cell(record_average(&entry.record), ui::format_average),
        ]);
    }

    format!("{title}\n{table}")
}

pub fn run(view: &PeriodView) {
    println!("{}", render(view));
}
