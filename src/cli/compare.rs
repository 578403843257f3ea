use super::ui::{self, StyleType};
use crate::core::country::comparison;
use crate::core::dataset::Dataset;
use crate::core::model::{Metric, QuarterPeriod};
use comfy_table::Cell;

/// One row per quarter, one column per country.
pub fn render(
    dataset: &Dataset,
    countries: &[String],
    metric: Metric,
    from: QuarterPeriod,
    to: QuarterPeriod,
) -> String {
    let title = ui::style_text(
        &format!("{} from {from} to {to}", ui::metric_label(metric)),
        StyleType::Title,
    );
    if countries.is_empty() {
        return format!(
            "{title}\n{}",
            ui::style_text("Select at least one country to compare", StyleType::Error)
        );
    }

    let series = comparison(dataset, countries, metric, from, to);
    let Some(labels) = series
        .first()
        .map(|s| s.points.iter().map(|p| p.label.as_str()).collect::<Vec<_>>())
        .filter(|labels| !labels.is_empty())
    else {
        return format!(
            "{title}\n{}",
            ui::style_text(ui::NO_DATA, StyleType::Subtle)
        );
    };

    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Period")];
    header.extend(series.iter().map(|s| ui::header_cell(&s.country)));
    table.set_header(header);

    for (i, label) in labels.iter().enumerate() {
        let mut row = vec![Cell::new(label)];
        row.extend(
            series
                .iter()
                .map(|s| ui::right_cell(ui::format_metric(s.points[i].value, metric))),
        );
        table.add_row(row);
    }

    format!("{title}\n{table}")
}

pub fn run(
    dataset: &Dataset,
    countries: &[String],
    metric: Metric,
    from: QuarterPeriod,
    to: QuarterPeriod,
) {
    println!("{}", render(dataset, countries, metric, from, to));
}
