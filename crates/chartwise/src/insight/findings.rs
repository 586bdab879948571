//! Natural-language findings for a single chart.

use std::collections::BTreeMap;

use chrono::{Datelike, Month, NaiveDateTime};

use crate::chart::{ChartCandidate, label};
use crate::input::DataTable;
use crate::profile::likert::scale_by_name;
use crate::profile::stats::{StreamingStats, pearson, percentile_sorted};
use crate::profile::values::format_iso;
use crate::schema::{Aggregate, ChartType, ColumnProfile, DatasetProfile, Dtype};

use super::InsightConfig;
use super::data;

/// Sentences describing a chart's dominant pattern, plus how pronounced
/// that pattern is (0.0-1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub sentences: Vec<String>,
    pub strength: f64,
}

impl Finding {
    fn new(sentences: Vec<String>, strength: f64) -> Self {
        Self {
            sentences,
            strength: if strength.is_finite() { strength.clamp(0.0, 1.0) } else { 0.0 },
        }
    }
}

/// Format a number with thousands separators and at most two decimals.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.abs() >= 1e15 {
        return format!("{value:.3e}");
    }
    let rounded = (value * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let mut whole = abs.trunc() as u64;
    let mut cents = ((abs - abs.trunc()) * 100.0).round() as u64;
    if cents >= 100 {
        whole += 1;
        cents = 0;
    }

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let fraction = match cents {
        0 => String::new(),
        c if c % 10 == 0 => format!(".{}", c / 10),
        c => format!(".{c:02}"),
    };
    let sign = if negative && (whole > 0 || cents > 0) { "-" } else { "" };
    format!("{sign}{grouped}{fraction}")
}

/// `1 row`, `2 rows`, `1,200 rows`.
pub fn count_phrase(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{} {noun}{suffix}", format_number(count as f64))
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part / whole * 100.0 }
}

/// The single value furthest from the mean, if it lies beyond `sigma`
/// standard deviations. Needs at least four points.
fn anomaly<'a>(points: &'a [(String, f64)], sigma: f64) -> Option<(&'a str, f64, f64)> {
    if points.len() < 4 {
        return None;
    }
    let stats: StreamingStats = points.iter().map(|p| p.1).collect();
    let mean = stats.mean()?;
    let std = stats.std()?;
    if std == 0.0 {
        return None;
    }
    let mut best: Option<(&str, f64, f64)> = None;
    for (label, value) in points {
        let z = (value - mean) / std;
        if best.is_none_or(|b| z.abs() > b.2.abs()) {
            best = Some((label.as_str(), *value, z));
        }
    }
    best.filter(|b| b.2.abs() >= sigma)
}

fn anomaly_sentence(points: &[(String, f64)], config: &InsightConfig) -> Option<String> {
    let (label, value, z) = anomaly(points, config.anomaly_sigma)?;
    let side = if z > 0.0 { "above" } else { "below" };
    Some(format!(
        "{label} stands out at {}, {:.1} standard deviations {side} the average.",
        format_number(value),
        z.abs()
    ))
}

/// Derive the finding for one candidate. `None` when the data has no
/// usable pattern for this chart.
pub fn find(
    candidate: &ChartCandidate,
    table: &DataTable,
    profile: &DatasetProfile,
    config: &InsightConfig,
) -> Option<Finding> {
    match candidate.chart_type {
        ChartType::Line => trend(candidate, table, profile, config),
        ChartType::Bar if candidate.color_column.is_some() => combination(candidate, table, profile),
        ChartType::Bar if candidate.y_column.is_none() => most_common(candidate, table, profile),
        ChartType::Bar => comparison(candidate, table, profile, config),
        ChartType::Scatter => relationship(candidate, table, profile),
        ChartType::Histogram => distribution(candidate, table, profile, config),
        ChartType::LikertBar => rating(candidate, table, profile),
        ChartType::CheckboxBar => selections(candidate, table, profile),
        ChartType::GridBar => grid(candidate, table, profile),
        ChartType::Table => Some(Finding::new(
            vec![format!(
                "The dataset has {} and {}.",
                count_phrase(profile.row_count, "row"),
                count_phrase(profile.col_count, "column")
            )],
            0.0,
        )),
    }
}

fn trend(
    candidate: &ChartCandidate,
    table: &DataTable,
    profile: &DatasetProfile,
    config: &InsightConfig,
) -> Option<Finding> {
    let y = candidate.y_column.as_deref();
    let aggregate = if y.is_some() { candidate.aggregate } else { Some(Aggregate::Count) };
    let series = data::time_series(table, &candidate.x_column, y, aggregate);
    if series.len() < 2 {
        return None;
    }
    let subject = y.map_or_else(|| "Responses".to_string(), |name| label(name, profile));

    let (first_t, first) = series[0];
    let (last_t, last) = series[series.len() - 1];
    let (from, to) = (format_iso(&first_t), format_iso(&last_t));

    let change = (first != 0.0).then(|| (last - first) / first.abs() * 100.0);
    let mut sentences = vec![match change {
        Some(pct) if pct.abs() < config.stable_change_pct => format!(
            "{subject} stayed roughly stable around {} between {from} and {to}.",
            format_number(first)
        ),
        Some(pct) => format!(
            "{subject} {} {:.1}% from {} to {} between {from} and {to}.",
            if pct > 0.0 { "grew" } else { "declined" },
            pct.abs(),
            format_number(first),
            format_number(last)
        ),
        None => format!(
            "{subject} moved from {} to {} between {from} and {to}.",
            format_number(first),
            format_number(last)
        ),
    }];

    if series.len() >= 3 {
        let mut peak = 0;
        for (i, point) in series.iter().enumerate() {
            if point.1 > series[peak].1 {
                peak = i;
            }
        }
        if peak != series.len() - 1 && peak != 0 {
            sentences.push(format!(
                "{subject} peaked at {} on {}.",
                format_number(series[peak].1),
                format_iso(&series[peak].0)
            ));
        }
    }

    let season = seasonality(&series, config);
    if let Some(season) = &season {
        sentences.push(format!(
            "{subject} is seasonal: it peaks in {} ({}) and dips in {} ({}).",
            season.peak_month,
            format_number(season.peak),
            season.low_month,
            format_number(season.low)
        ));
    }

    let points: Vec<(String, f64)> = series.iter().map(|(t, v)| (format_iso(t), *v)).collect();
    sentences.extend(anomaly_sentence(&points, config));

    let strength = change.map_or(0.0, |pct| (pct.abs() / 100.0).min(1.0));
    let strength = season.map_or(strength, |s| strength.max(s.variation.min(1.0)));
    Some(Finding::new(sentences, strength))
}

/// Month-of-year pattern in a time series.
#[derive(Debug, Clone, PartialEq)]
struct Seasonality {
    peak_month: &'static str,
    peak: f64,
    low_month: &'static str,
    low: f64,
    /// Coefficient of variation of the monthly means.
    variation: f64,
}

/// Compare the mean value of each calendar month. Needs enough points
/// spread over enough months, a spread of monthly means above
/// `seasonal_variation` and a peak clearly above the low.
fn seasonality(series: &[(NaiveDateTime, f64)], config: &InsightConfig) -> Option<Seasonality> {
    if series.len() < config.seasonal_min_points {
        return None;
    }
    let mut months: BTreeMap<u32, StreamingStats> = BTreeMap::new();
    for (t, v) in series {
        months.entry(t.month()).or_default().add(*v);
    }
    if months.len() < config.seasonal_min_months {
        return None;
    }

    let means: Vec<(u32, f64)> = months
        .iter()
        .filter_map(|(month, stats)| Some((*month, stats.mean()?)))
        .collect();
    let overall: StreamingStats = means.iter().map(|m| m.1).collect();
    let mean = overall.mean()?;
    if mean <= 0.0 {
        return None;
    }
    let variation = overall.std()? / mean;
    if variation <= config.seasonal_variation {
        return None;
    }

    let mut peak = means[0];
    let mut low = means[0];
    for entry in &means {
        if entry.1 > peak.1 {
            peak = *entry;
        }
        if entry.1 < low.1 {
            low = *entry;
        }
    }
    if peak.1 <= low.1 * config.seasonal_peak_ratio {
        return None;
    }

    Some(Seasonality {
        peak_month: month_name(peak.0)?,
        peak: peak.1,
        low_month: month_name(low.0)?,
        low: low.1,
        variation,
    })
}

fn month_name(month: u32) -> Option<&'static str> {
    let month = Month::try_from(u8::try_from(month).ok()?).ok()?;
    Some(month.name())
}

fn metric_phrase(candidate: &ChartCandidate, profile: &DatasetProfile) -> String {
    let y = candidate
        .y_column
        .as_deref()
        .map(|name| label(name, profile).to_lowercase())
        .unwrap_or_default();
    match candidate.aggregate {
        Some(Aggregate::Sum) => format!("total {y}"),
        Some(Aggregate::Mean) => format!("average {y}"),
        Some(Aggregate::Count) => "records".to_string(),
        None => y,
    }
}

fn ranked_categories(
    candidate: &ChartCandidate,
    table: &DataTable,
) -> Vec<(String, f64)> {
    let values = data::category_values(
        table,
        &candidate.x_column,
        candidate.y_column.as_deref(),
        candidate.aggregate,
    );
    let mut ranked: Vec<(String, f64)> = values.into_iter().collect();
    // Stable: equal values keep first-seen order.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

fn comparison(
    candidate: &ChartCandidate,
    table: &DataTable,
    profile: &DatasetProfile,
    config: &InsightConfig,
) -> Option<Finding> {
    let ranked = ranked_categories(candidate, table);
    let metric = metric_phrase(candidate, profile);
    let category = label(&candidate.x_column, profile).to_lowercase();

    let (leader, lead_value) = ranked.first()?;
    let Some((runner, runner_value)) = ranked.get(1) else {
        return Some(Finding::new(
            vec![format!("{leader} is the only {category}, with {metric} of {}.", format_number(*lead_value))],
            0.0,
        ));
    };

    let ratio = (*lead_value > 0.0 && *runner_value > 0.0).then(|| lead_value / runner_value);
    let headline = match ratio {
        Some(r) if r >= config.dominance_ratio => format!(
            "{leader} leads every other {category} by at least {r:.1}× in {metric} ({} vs {} for {runner}).",
            format_number(*lead_value),
            format_number(*runner_value)
        ),
        Some(r) if r > config.leader_ratio => format!(
            "{leader} leads with {metric} of {}, {r:.1}× {runner}.",
            format_number(*lead_value)
        ),
        _ => format!(
            "{leader} has the highest {metric} ({}), followed by {runner} ({}).",
            format_number(*lead_value),
            format_number(*runner_value)
        ),
    };

    let mut sentences = vec![headline];
    sentences.extend(anomaly_sentence(&ranked, config));
    let strength = ratio.map_or(0.0, |r| 1.0 - 1.0 / r);
    Some(Finding::new(sentences, strength))
}

fn most_common(
    candidate: &ChartCandidate,
    table: &DataTable,
    profile: &DatasetProfile,
) -> Option<Finding> {
    let ranked = ranked_categories(candidate, table);
    let total: f64 = ranked.iter().map(|r| r.1).sum();
    let (top, count) = ranked.first()?;
    let share = percent(*count, total);
    let category = label(&candidate.x_column, profile).to_lowercase();
    Some(Finding::new(
        vec![format!(
            "{top} is the most common {category}, with {} of {} records ({share:.1}%).",
            format_number(*count),
            format_number(total)
        )],
        share / 100.0,
    ))
}

fn combination(
    candidate: &ChartCandidate,
    table: &DataTable,
    profile: &DatasetProfile,
) -> Option<Finding> {
    let color = candidate.color_column.as_deref()?;
    let counts = data::pair_counts(table, &candidate.x_column, color);
    let total: usize = counts.values().sum();
    let mut best: Option<(&(String, String), usize)> = None;
    for (pair, count) in &counts {
        if best.is_none_or(|b| *count > b.1) {
            best = Some((pair, *count));
        }
    }
    let ((x_value, color_value), count) = best?;
    let x_label = label(&candidate.x_column, profile).to_lowercase();
    let color_label = label(color, profile).to_lowercase();
    Some(Finding::new(
        vec![format!(
            "The most common combination is {x_label} {x_value} with {color_label} {color_value} ({count} of {total} records)."
        )],
        percent(count as f64, total as f64) / 100.0,
    ))
}

fn relationship(
    candidate: &ChartCandidate,
    table: &DataTable,
    profile: &DatasetProfile,
) -> Option<Finding> {
    let y = candidate.y_column.as_deref()?;
    let pairs = data::number_pairs(table, &candidate.x_column, y);
    let r = pearson(&pairs)?;
    let x_label = label(&candidate.x_column, profile);
    let y_label = label(y, profile);

    let direction = if r > 0.0 { "positive" } else { "negative" };
    let sentence = match r.abs() {
        a if a >= 0.7 => format!("{x_label} and {y_label} have a strong {direction} relationship (r = {r:.2})."),
        a if a >= 0.4 => format!("{x_label} and {y_label} have a moderate {direction} relationship (r = {r:.2})."),
        a if a >= 0.2 => format!("{x_label} and {y_label} are weakly related (r = {r:.2})."),
        _ => format!("{x_label} and {y_label} show no clear relationship (r = {r:.2})."),
    };
    Some(Finding::new(vec![sentence], r.abs()))
}

fn distribution(
    candidate: &ChartCandidate,
    table: &DataTable,
    profile: &DatasetProfile,
    config: &InsightConfig,
) -> Option<Finding> {
    let mut values = data::numbers(table, &candidate.x_column);
    if values.is_empty() {
        return None;
    }
    let stats: StreamingStats = values.iter().copied().collect();
    let subject = label(&candidate.x_column, profile);
    let mut sentences = vec![format!(
        "{subject} ranges from {} to {}, averaging {}.",
        format_number(stats.min()?),
        format_number(stats.max()?),
        format_number(stats.mean()?)
    )];

    values.sort_by(f64::total_cmp);
    let mut outlier_share = 0.0;
    if values.len() >= 4 {
        let q1 = percentile_sorted(&values, 0.25)?;
        let q3 = percentile_sorted(&values, 0.75)?;
        let iqr = q3 - q1;
        if iqr > 0.0 {
            let low = q1 - config.outlier_iqr * iqr;
            let high = q3 + config.outlier_iqr * iqr;
            let outliers = values.iter().filter(|v| **v < low || **v > high).count();
            if outliers > 0 {
                outlier_share = outliers as f64 / values.len() as f64;
                sentences.push(format!(
                    "{} in {subject} ({:.1}% of data) {} outside the typical range.",
                    count_phrase(outliers, "unusual value"),
                    outlier_share * 100.0,
                    if outliers == 1 { "falls" } else { "fall" }
                ));
            }
        }
    }

    if values.len() > 10 {
        if let (Some(mean), Some(std)) = (stats.mean(), stats.std()) {
            let cv = if mean != 0.0 { std / mean.abs() } else { 0.0 };
            if cv > 1.0 {
                sentences.push(format!(
                    "{subject} varies widely (coefficient of variation {cv:.2})."
                ));
            }
        }
    }
    Some(Finding::new(sentences, outlier_share))
}

fn rating(candidate: &ChartCandidate, table: &DataTable, profile: &DatasetProfile) -> Option<Finding> {
    let column = profile.column(&candidate.x_column)?;
    let scale = column.likert_scale.as_deref().and_then(scale_by_name)?;
    let counts = data::value_counts(table, &candidate.x_column);
    let total: usize = counts.values().sum();
    if total == 0 {
        return None;
    }
    let positive: usize = counts
        .iter()
        .filter(|(value, _)| scale.level_of(value).is_some_and(|l| scale.is_positive_level(l)))
        .map(|(_, n)| n)
        .sum();

    let mut top: Option<(&String, usize)> = None;
    for (value, count) in &counts {
        if top.is_none_or(|t| *count > t.1) {
            top = Some((value, *count));
        }
    }
    let (top_value, top_count) = top?;
    let subject = label(&candidate.x_column, profile);
    let top_share = percent(top_count as f64, total as f64);
    Some(Finding::new(
        vec![format!(
            "{:.0}% of responses to {subject} are favourable; the most common answer is \"{top_value}\" ({top_share:.0}%).",
            percent(positive as f64, total as f64)
        )],
        top_share / 100.0,
    ))
}

fn selections(candidate: &ChartCandidate, table: &DataTable, profile: &DatasetProfile) -> Option<Finding> {
    let (counts, respondents) = data::token_counts(table, &candidate.x_column);
    let mut top: Option<(&String, usize)> = None;
    for (token, count) in &counts {
        if top.is_none_or(|t| *count > t.1) {
            top = Some((token, *count));
        }
    }
    let (option, count) = top?;
    let share = percent(count as f64, respondents as f64);
    let subject = label(&candidate.x_column, profile);
    Some(Finding::new(
        vec![format!(
            "\"{option}\" is the most selected option for {subject}, chosen in {share:.0}% of responses."
        )],
        share / 100.0,
    ))
}

fn item_label(column: &ColumnProfile) -> String {
    column.grid_item.clone().unwrap_or_else(|| column.name.clone())
}

fn grid(candidate: &ChartCandidate, table: &DataTable, profile: &DatasetProfile) -> Option<Finding> {
    let members: Vec<_> = candidate
        .group_columns
        .iter()
        .filter_map(|name| profile.column(name))
        .collect();
    let first = members.first()?;
    let stem = first.grid_group.clone().unwrap_or_else(|| first.name.clone());

    let scores: Vec<(String, f64)> = match first.dtype {
        Dtype::Numeric => members
            .iter()
            .filter_map(|c| {
                let values: StreamingStats = data::numbers(table, &c.name).into_iter().collect();
                Some((item_label(c), values.mean()?))
            })
            .collect(),
        Dtype::Ordinal => members
            .iter()
            .filter_map(|c| {
                let scale = c.likert_scale.as_deref().and_then(scale_by_name)?;
                let counts = data::value_counts(table, &c.name);
                let total: usize = counts.values().sum();
                let positive: usize = counts
                    .iter()
                    .filter(|(v, _)| scale.level_of(v).is_some_and(|l| scale.is_positive_level(l)))
                    .map(|(_, n)| n)
                    .sum();
                (total > 0).then(|| (item_label(c), percent(positive as f64, total as f64)))
            })
            .collect(),
        _ => Vec::new(),
    };

    if scores.len() < 2 {
        return Some(Finding::new(
            vec![format!("{stem} covers {}.", count_phrase(members.len(), "item"))],
            0.0,
        ));
    }

    let mut best = &scores[0];
    let mut worst = &scores[0];
    for entry in &scores {
        if entry.1 > best.1 {
            best = entry;
        }
        if entry.1 < worst.1 {
            worst = entry;
        }
    }

    let (sentence, strength) = if first.dtype == Dtype::Numeric {
        let scale = best.1.abs().max(worst.1.abs());
        (
            format!(
                "{} has the highest average in {stem} ({}), {} the lowest ({}).",
                best.0,
                format_number(best.1),
                worst.0,
                format_number(worst.1)
            ),
            if scale > 0.0 { (best.1 - worst.1) / scale } else { 0.0 },
        )
    } else {
        (
            format!(
                "{} has the most favourable responses in {stem} ({:.0}%), {} the fewest ({:.0}%).",
                best.0, best.1, worst.0, worst.1
            ),
            (best.1 - worst.1) / 100.0,
        )
    };
    Some(Finding::new(vec![sentence], strength))
}
