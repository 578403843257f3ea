use super::ui::{self, StyleType};
use crate::core::dataset::Dataset;
use crate::core::model::Metric;
use crate::core::trend::{self, TrendRange};
use comfy_table::Cell;

pub fn render(dataset: &Dataset, country: &str, metric: Metric, range: TrendRange) -> String {
    let series = trend::country_series(dataset, country, metric, range);
    let title = ui::style_text(
        &format!("{} trend for {country}", ui::metric_label(metric)),
        StyleType::Title,
    );
    if series.is_empty() {
        return format!(
            "{title}\n{}",
            ui::style_text(ui::NO_DATA, StyleType::Subtle)
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Period"),
        ui::header_cell(ui::metric_label(metric)),
        ui::header_cell("Change"),
    ]);

    let mut previous: Option<f64> = None;
    for point in &series {
        let change = previous.and_then(|p| crate::core::metrics::growth_rate(point.value, p));
        table.add_row(vec![
            Cell::new(&point.label),
            ui::right_cell(ui::format_metric(point.value, metric)),
            ui::growth_cell(change),
        ]);
        previous = Some(point.value);
    }

    let mut output = format!("{title}\n{table}");
    match trend::insight(&series) {
        Some(insight) => {
            output.push_str(&format!(
                "\n{} from {} to {}: {} ({})",
                ui::style_text("Overall", StyleType::TotalLabel),
                insight.first.label,
                insight.last.label,
                insight
                    .overall_change
                    .map_or_else(|| "N/A".to_string(), ui::format_growth),
                insight.direction,
            ));
            output.push_str(&format!(
                "\n{} {} ({})",
                ui::style_text("Peak:", StyleType::TotalLabel),
                insight.peak.label,
                ui::format_metric(insight.peak.value, metric)
            ));
            if let Some(low) = insight.low {
                output.push_str(&format!(
                    "\n{} {} ({})",
                    ui::style_text("Lowest:", StyleType::TotalLabel),
                    low.label,
                    ui::format_metric(low.value, metric)
                ));
            }
        }
        None => output.push_str(&format!(
            "\n{}",
            ui::style_text("Not enough data for a trend", StyleType::Subtle)
        )),
    }
    output
}

pub fn run(dataset: &Dataset, country: &str, metric: Metric, range: TrendRange) {
    println!("{}", render(dataset, country, metric, range));
}
