//! Vega-Lite specification synthesis.

use serde_json::{Map, Value, json};

use super::candidate::ChartPlan;
use super::title::label;
use crate::schema::{ChartType, ColumnProfile, DatasetProfile, Dtype};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v6.json";

/// Named data source the renderer binds the analysis dataset to.
pub const DATA_SOURCE: &str = "table";

/// Rows shown by a table chart.
const TABLE_ROWS: usize = 20;

/// Columns shown by a table chart.
const TABLE_COLUMNS: usize = 12;

/// Escape a column name for use as a Vega-Lite field reference.
///
/// Dots and brackets would otherwise be read as nested-field accessors.
pub fn field_name(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut escaped = String::with_capacity(collapsed.len());
    for c in collapsed.chars() {
        if matches!(c, '\\' | '.' | '[' | ']' | '\'' | '"') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Expression accessor for a raw column, e.g. `datum["Device used"]`.
fn datum_accessor(name: &str) -> String {
    let quoted = serde_json::to_string(name).unwrap_or_else(|_| format!("\"{name}\""));
    format!("datum[{quoted}]")
}

/// Builds declarative chart specifications from plans.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecSynthesizer;

impl SpecSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Produce a renderable Vega-Lite spec for a plan.
    pub fn synthesize(&self, plan: &ChartPlan, profile: &DatasetProfile, title: &str) -> Value {
        let x = profile.column(&plan.x_column);
        let body = match plan.chart_type {
            ChartType::Line => self.line(plan, profile),
            ChartType::Bar if plan.color_column.is_some() => self.stacked_bar(plan, profile),
            ChartType::Bar => self.bar(plan, profile),
            ChartType::Scatter => self.scatter(plan, profile),
            ChartType::Histogram => self.histogram(plan, profile),
            ChartType::Table => self.table(plan),
            ChartType::LikertBar => self.likert_bar(plan, profile, x),
            ChartType::CheckboxBar => self.checkbox_bar(plan, profile, x),
            ChartType::GridBar => self.grid_bar(plan, profile),
        };

        let mut spec = Map::new();
        spec.insert("$schema".to_string(), json!(VEGA_LITE_SCHEMA));
        spec.insert(
            "title".to_string(),
            json!({ "text": title, "anchor": "start", "fontSize": 18 }),
        );
        spec.insert("width".to_string(), json!("container"));
        spec.insert("height".to_string(), json!(400));
        spec.insert("data".to_string(), json!({ "name": DATA_SOURCE }));
        if let Value::Object(fields) = body {
            spec.extend(fields);
        }
        Value::Object(spec)
    }

    fn encoding_type(&self, name: &str, profile: &DatasetProfile) -> &'static str {
        profile
            .column(name)
            .map_or("nominal", |c| c.dtype.encoding_type())
    }

    fn line(&self, plan: &ChartPlan, profile: &DatasetProfile) -> Value {
        let x = field_name(&plan.x_column);
        let x_title = label(&plan.x_column, profile);
        let y = match &plan.y_column {
            Some(y) => {
                let mut enc = json!({
                    "field": field_name(y),
                    "type": "quantitative",
                    "title": label(y, profile),
                });
                if let Some(aggregate) = plan.aggregate {
                    enc["aggregate"] = json!(aggregate.as_str());
                }
                enc
            }
            None => json!({ "aggregate": "count", "type": "quantitative", "title": "Count" }),
        };
        json!({
            "mark": { "type": "line", "point": true, "strokeWidth": 3 },
            "encoding": {
                "x": { "field": x, "type": "temporal", "title": x_title },
                "y": y,
                "tooltip": [
                    { "field": x, "type": "temporal" },
                    y,
                ],
            },
        })
    }

    fn bar(&self, plan: &ChartPlan, profile: &DatasetProfile) -> Value {
        let x = field_name(&plan.x_column);
        let x_type = self.encoding_type(&plan.x_column, profile);
        let x_title = label(&plan.x_column, profile);
        let y = match &plan.y_column {
            Some(y) => {
                let mut enc = json!({
                    "field": field_name(y),
                    "type": "quantitative",
                    "title": label(y, profile),
                });
                if let Some(aggregate) = plan.aggregate {
                    enc["aggregate"] = json!(aggregate.as_str());
                }
                enc
            }
            None => json!({ "aggregate": "count", "type": "quantitative", "title": "Count" }),
        };
        let sort = match profile.column(&plan.x_column) {
            Some(c) if c.is_likert => json!(c.likert_order),
            _ => json!("-y"),
        };
        json!({
            "mark": { "type": "bar", "cornerRadiusEnd": 4 },
            "encoding": {
                "x": { "field": x, "type": x_type, "title": x_title, "sort": sort, "axis": { "labelAngle": 0 } },
                "y": y,
                "tooltip": [{ "field": x, "type": x_type }, y],
            },
        })
    }

    fn stacked_bar(&self, plan: &ChartPlan, profile: &DatasetProfile) -> Value {
        let x = field_name(&plan.x_column);
        let x_type = self.encoding_type(&plan.x_column, profile);
        let color_name = plan.color_column.as_deref().unwrap_or(&plan.x_column);
        let color = field_name(color_name);
        let color_type = self.encoding_type(color_name, profile);
        let count = json!({ "aggregate": "count", "type": "quantitative", "title": "Count" });

        let mut x_enc = json!({ "field": x, "type": x_type, "title": label(&plan.x_column, profile) });
        if let Some(order) = likert_order(&plan.x_column, profile) {
            x_enc["sort"] = json!(order);
        }
        let mut color_enc = json!({
            "field": color,
            "type": color_type,
            "title": label(color_name, profile),
            "scale": { "scheme": "tableau10" },
        });
        if let Some(order) = likert_order(color_name, profile) {
            color_enc["sort"] = json!(order);
            color_enc["scale"] = json!({ "domain": order, "scheme": "redyellowgreen", "reverse": true });
        }
        json!({
            "mark": { "type": "bar" },
            "encoding": {
                "x": x_enc,
                "y": count,
                "color": color_enc,
                "tooltip": [
                    { "field": x, "type": x_type },
                    { "field": color, "type": color_type },
                    count,
                ],
            },
        })
    }

    fn scatter(&self, plan: &ChartPlan, profile: &DatasetProfile) -> Value {
        let x = field_name(&plan.x_column);
        let y = plan.y_column.as_deref().map(field_name).unwrap_or_else(|| x.clone());
        let y_title = plan
            .y_column
            .as_deref()
            .map(|name| label(name, profile))
            .unwrap_or_default();
        json!({
            "mark": { "type": "circle", "size": 80, "opacity": 0.6 },
            "encoding": {
                "x": { "field": x, "type": "quantitative", "title": label(&plan.x_column, profile) },
                "y": { "field": y, "type": "quantitative", "title": y_title },
                "tooltip": [
                    { "field": x, "type": "quantitative" },
                    { "field": y, "type": "quantitative" },
                ],
            },
            "params": [{ "name": "zoom", "select": "interval", "bind": "scales" }],
        })
    }

    fn histogram(&self, plan: &ChartPlan, profile: &DatasetProfile) -> Value {
        let x = field_name(&plan.x_column);
        json!({
            "mark": { "type": "bar", "cornerRadiusEnd": 2 },
            "encoding": {
                "x": {
                    "field": x,
                    "type": "quantitative",
                    "bin": { "maxbins": 20 },
                    "title": label(&plan.x_column, profile),
                },
                "y": { "aggregate": "count", "type": "quantitative", "title": "Frequency" },
                "tooltip": [
                    { "field": x, "bin": true, "type": "quantitative" },
                    { "aggregate": "count", "type": "quantitative", "title": "Count" },
                ],
            },
        })
    }

    fn table(&self, plan: &ChartPlan) -> Value {
        let columns: Vec<&str> = plan
            .group_columns
            .iter()
            .map(String::as_str)
            .take(TABLE_COLUMNS)
            .collect();
        let fields: Vec<String> = columns.iter().map(|c| field_name(c)).collect();
        json!({
            "transform": [
                { "window": [{ "op": "row_number", "as": "row" }] },
                { "filter": format!("datum.row <= {TABLE_ROWS}") },
                { "fold": fields, "as": ["column", "value"] },
            ],
            "mark": { "type": "text", "align": "left" },
            "encoding": {
                "x": {
                    "field": "column",
                    "type": "nominal",
                    "sort": columns,
                    "axis": { "orient": "top", "title": null, "labelAngle": 0 },
                },
                "y": { "field": "row", "type": "ordinal", "axis": null },
                "text": { "field": "value", "type": "nominal" },
            },
        })
    }

    fn likert_bar(
        &self,
        plan: &ChartPlan,
        profile: &DatasetProfile,
        column: Option<&ColumnProfile>,
    ) -> Value {
        let x = field_name(&plan.x_column);
        let order: Vec<String> = column.map(|c| c.likert_order.clone()).unwrap_or_default();
        json!({
            "mark": { "type": "bar", "cornerRadiusEnd": 4 },
            "encoding": {
                "x": {
                    "field": x,
                    "type": "ordinal",
                    "sort": order,
                    "title": label(&plan.x_column, profile),
                    "axis": { "labelAngle": 0 },
                },
                "y": { "aggregate": "count", "type": "quantitative", "title": "Responses" },
                "color": {
                    "field": x,
                    "type": "ordinal",
                    "sort": order,
                    "scale": { "domain": order, "scheme": "redyellowgreen", "reverse": true },
                    "legend": null,
                },
                "tooltip": [
                    { "field": x, "type": "ordinal" },
                    { "aggregate": "count", "type": "quantitative", "title": "Responses" },
                ],
            },
        })
    }

    fn checkbox_bar(
        &self,
        plan: &ChartPlan,
        profile: &DatasetProfile,
        column: Option<&ColumnProfile>,
    ) -> Value {
        let options: Vec<String> = column.map(|c| c.checkbox_options.clone()).unwrap_or_default();
        let accessor = datum_accessor(&plan.x_column);
        json!({
            "transform": [
                { "filter": format!("isValid({accessor}) && {accessor} !== ''") },
                { "calculate": format!("split(replace({accessor} + '', /;/g, ','), ',')"), "as": "option" },
                { "flatten": ["option"] },
                { "calculate": "trim(datum.option)", "as": "option" },
                { "filter": "datum.option !== ''" },
            ],
            "mark": { "type": "bar", "cornerRadiusEnd": 4 },
            "encoding": {
                "x": {
                    "field": "option",
                    "type": "nominal",
                    "sort": options,
                    "title": label(&plan.x_column, profile),
                    "axis": { "labelAngle": 0 },
                },
                "y": { "aggregate": "count", "type": "quantitative", "title": "Selections" },
                "tooltip": [
                    { "field": "option", "type": "nominal" },
                    { "aggregate": "count", "type": "quantitative", "title": "Selections" },
                ],
            },
        })
    }

    fn grid_bar(&self, plan: &ChartPlan, profile: &DatasetProfile) -> Value {
        let members: Vec<&ColumnProfile> = plan
            .group_columns
            .iter()
            .filter_map(|name| profile.column(name))
            .collect();
        let fields: Vec<String> = plan.group_columns.iter().map(|c| field_name(c)).collect();
        let items: Vec<String> = members
            .iter()
            .map(|c| c.grid_item.clone().unwrap_or_else(|| c.name.clone()))
            .collect();

        let dtype = members.first().map_or(Dtype::Nominal, |c| c.dtype);
        let stem = members
            .first()
            .and_then(|c| c.grid_group.clone())
            .unwrap_or_default();

        // Map raw column names to their item labels after folding.
        let relabel = plan
            .group_columns
            .iter()
            .zip(&items)
            .map(|(name, item)| {
                format!(
                    "datum.item === {} ? {}",
                    serde_json::to_string(name).unwrap_or_default(),
                    serde_json::to_string(item).unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join(" : ");
        let relabel = format!("{relabel} : datum.item");

        let transform = json!([
            { "fold": fields, "as": ["item", "response"] },
            { "filter": "isValid(datum.response) && datum.response !== ''" },
            { "calculate": relabel, "as": "item" },
        ]);

        if dtype == Dtype::Numeric {
            return json!({
                "transform": transform,
                "mark": { "type": "bar", "cornerRadiusEnd": 4 },
                "encoding": {
                    "x": { "field": "item", "type": "nominal", "sort": items, "title": stem },
                    "y": { "field": "response", "type": "quantitative", "aggregate": "mean", "title": "Average" },
                    "tooltip": [
                        { "field": "item", "type": "nominal" },
                        { "field": "response", "type": "quantitative", "aggregate": "mean", "title": "Average" },
                    ],
                },
            });
        }

        let order = merged_likert_order(&members);
        let response_type = if order.is_empty() { "nominal" } else { "ordinal" };
        let mut color = json!({
            "field": "response",
            "type": response_type,
            "title": "Response",
        });
        if !order.is_empty() {
            color["sort"] = json!(order);
            color["scale"] = json!({ "domain": order, "scheme": "redyellowgreen", "reverse": true });
        }
        json!({
            "transform": transform,
            "mark": { "type": "bar" },
            "encoding": {
                "y": { "field": "item", "type": "nominal", "sort": items, "title": stem },
                "x": {
                    "aggregate": "count",
                    "type": "quantitative",
                    "stack": "normalize",
                    "title": "Share of responses",
                    "axis": { "format": "%" },
                },
                "color": color,
                "tooltip": [
                    { "field": "item", "type": "nominal" },
                    { "field": "response", "type": "nominal" },
                    { "aggregate": "count", "type": "quantitative", "title": "Responses" },
                ],
            },
        })
    }
}

/// Scale order of a Likert column, if the column is one.
fn likert_order<'a>(name: &str, profile: &'a DatasetProfile) -> Option<&'a [String]> {
    profile
        .column(name)
        .filter(|c| c.is_likert && !c.likert_order.is_empty())
        .map(|c| c.likert_order.as_slice())
}

/// Union of member scale orders, keeping the first member's order and
/// appending levels only later members use.
fn merged_likert_order(members: &[&ColumnProfile]) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let scale = members.iter().find_map(|c| c.likert_scale.as_deref());
    let Some(scale) = scale.and_then(crate::profile::likert::scale_by_name) else {
        return order;
    };
    let mut ranked: Vec<(usize, String)> = Vec::new();
    for member in members {
        for value in &member.likert_order {
            if ranked.iter().any(|(_, v)| v == value) {
                continue;
            }
            if let Some(level) = scale.level_of(value) {
                ranked.push((level, value.clone()));
            }
        }
    }
    ranked.sort_by_key(|(level, _)| *level);
    order.extend(ranked.into_iter().map(|(_, v)| v));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(columns: Vec<ColumnProfile>) -> DatasetProfile {
        DatasetProfile::new(5, columns)
    }

    fn column(name: &str, dtype: Dtype, position: usize) -> ColumnProfile {
        let mut c = ColumnProfile::new(name, name, position);
        c.dtype = dtype;
        c
    }

    #[test]
    fn test_field_name_escaping() {
        assert_eq!(field_name("revenue"), "revenue");
        assert_eq!(field_name("price.usd"), "price\\.usd");
        assert_eq!(field_name("Rate [Price]"), "Rate \\[Price\\]");
        assert_eq!(field_name("it's"), "it\\'s");
        assert_eq!(field_name("a\nb"), "a b");
    }

    #[test]
    fn test_line_spec() {
        let p = profile(vec![
            column("date", Dtype::Temporal, 0),
            column("revenue", Dtype::Numeric, 1),
        ]);
        let plan = ChartPlan::new(ChartType::Line, "date").with_y("revenue");
        let spec = SpecSynthesizer::new().synthesize(&plan, &p, "Revenue Over Time");

        assert_eq!(spec["$schema"], VEGA_LITE_SCHEMA);
        assert_eq!(spec["title"]["text"], "Revenue Over Time");
        assert_eq!(spec["mark"]["type"], "line");
        assert_eq!(spec["encoding"]["x"]["field"], "date");
        assert_eq!(spec["encoding"]["x"]["type"], "temporal");
        assert_eq!(spec["encoding"]["y"]["field"], "revenue");
        assert_eq!(spec["data"]["name"], DATA_SOURCE);
    }

    #[test]
    fn test_aggregated_bar_spec() {
        let p = profile(vec![
            column("category", Dtype::Nominal, 0),
            column("value", Dtype::Numeric, 1),
        ]);
        let plan = ChartPlan::new(ChartType::Bar, "category")
            .with_y("value")
            .with_aggregate(crate::schema::Aggregate::Sum);
        let spec = SpecSynthesizer::new().synthesize(&plan, &p, "Total Value by Category");
        assert_eq!(spec["mark"]["type"], "bar");
        assert_eq!(spec["encoding"]["y"]["aggregate"], "sum");
        assert_eq!(spec["encoding"]["x"]["sort"], "-y");
    }

    #[test]
    fn test_likert_spec_uses_scale_order() {
        let mut c = column("satisfaction", Dtype::Ordinal, 0);
        c.is_likert = true;
        c.likert_order = vec!["Very Satisfied".into(), "Neutral".into(), "Dissatisfied".into()];
        let p = profile(vec![c]);
        let plan = ChartPlan::new(ChartType::LikertBar, "satisfaction");
        let spec = SpecSynthesizer::new().synthesize(&plan, &p, "Satisfaction Responses");
        assert_eq!(
            spec["encoding"]["x"]["sort"],
            json!(["Very Satisfied", "Neutral", "Dissatisfied"])
        );
    }

    #[test]
    fn test_stacked_bar_keeps_likert_order() {
        let mut c = column("satisfaction", Dtype::Ordinal, 0);
        c.is_likert = true;
        c.likert_order = vec![
            "Very Satisfied".into(),
            "Satisfied".into(),
            "Neutral".into(),
            "Dissatisfied".into(),
        ];
        let p = profile(vec![c, column("region", Dtype::Nominal, 1)]);
        let order = json!(["Very Satisfied", "Satisfied", "Neutral", "Dissatisfied"]);

        let by_region = ChartPlan::new(ChartType::Bar, "region").with_color("satisfaction");
        let spec = SpecSynthesizer::new().synthesize(&by_region, &p, "Satisfaction by Region");
        assert_eq!(spec["encoding"]["color"]["sort"], order);
        assert_eq!(spec["encoding"]["color"]["scale"]["domain"], order);
        assert!(spec["encoding"]["x"].get("sort").is_none());

        let by_rating = ChartPlan::new(ChartType::Bar, "satisfaction").with_color("region");
        let spec = SpecSynthesizer::new().synthesize(&by_rating, &p, "Region by Satisfaction");
        assert_eq!(spec["encoding"]["x"]["sort"], order);
        assert_eq!(spec["encoding"]["color"]["scale"]["scheme"], "tableau10");
    }

    #[test]
    fn test_checkbox_spec_explodes_tokens() {
        let mut c = column("devices", Dtype::Nominal, 0);
        c.is_checkbox = true;
        c.checkbox_options = vec!["Mobile".into(), "Desktop".into(), "Tablet".into()];
        let p = profile(vec![c]);
        let plan = ChartPlan::new(ChartType::CheckboxBar, "devices");
        let spec = SpecSynthesizer::new().synthesize(&plan, &p, "Most Selected Devices");
        let transforms = spec["transform"].as_array().unwrap();
        assert!(transforms.iter().any(|t| t.get("flatten").is_some()));
        assert_eq!(spec["encoding"]["x"]["sort"], json!(["Mobile", "Desktop", "Tablet"]));
    }

    #[test]
    fn test_grid_spec_folds_members() {
        let mut a = column("Satisfaction: Price", Dtype::Ordinal, 0);
        a.grid_group = Some("Satisfaction".into());
        a.grid_item = Some("Price".into());
        a.likert_scale = Some("satisfaction".into());
        a.likert_order = vec!["Satisfied".into(), "Dissatisfied".into()];
        let mut b = column("Satisfaction: Support", Dtype::Ordinal, 1);
        b.grid_group = Some("Satisfaction".into());
        b.grid_item = Some("Support".into());
        b.likert_scale = Some("satisfaction".into());
        b.likert_order = vec!["Very Satisfied".into(), "Satisfied".into()];
        let p = profile(vec![a, b]);

        let plan = ChartPlan::new(ChartType::GridBar, "Satisfaction: Price").with_group_columns(vec![
            "Satisfaction: Price".into(),
            "Satisfaction: Support".into(),
        ]);
        let spec = SpecSynthesizer::new().synthesize(&plan, &p, "Satisfaction Across Items");
        assert_eq!(
            spec["transform"][0]["fold"],
            json!(["Satisfaction: Price", "Satisfaction: Support"])
        );
        assert_eq!(spec["encoding"]["y"]["sort"], json!(["Price", "Support"]));
        assert_eq!(
            spec["encoding"]["color"]["sort"],
            json!(["Very Satisfied", "Satisfied", "Dissatisfied"])
        );
    }

    #[test]
    fn test_table_spec() {
        let p = profile(vec![column("a", Dtype::Nominal, 0), column("b", Dtype::Numeric, 1)]);
        let plan = ChartPlan::new(ChartType::Table, "a").with_group_columns(vec!["a".into(), "b".into()]);
        let spec = SpecSynthesizer::new().synthesize(&plan, &p, "Data Overview");
        assert_eq!(spec["mark"]["type"], "text");
        assert_eq!(spec["encoding"]["x"]["sort"], json!(["a", "b"]));
    }
}
