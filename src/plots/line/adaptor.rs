use crate::adaptor::common::{self, adjust, animation, annotation, interaction, scale, slider, theme, tooltip};
use crate::adaptor::geometries;
use crate::chart::{GeometryKind, Legend};
use crate::options::{PlotOptions, Toggle};
use crate::pipeline::{flow, Params};
use crate::transform::maybe_percent;
use crate::types::{display_value, is_truthy, Record, TooltipFn, TooltipItem};
use crate::utils::{adjust_y_meta_by_zero, number_value, to_fixed};
use serde_json::{json, Map, Value};

/// `{key: value}` as the fixed part of a geometry mapping
pub(crate) fn fixed(key: &str, value: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), json!(value));
    map
}

/// Default geometry tooltip formatter for percent charts: the series (or x)
/// value as name, the share as a two-decimal percentage. Left alone when the
/// tooltip is off or the user supplied a formatter.
pub(crate) fn percent_tooltip(options: &mut PlotOptions) {
    if !options.flag("isPercent")
        || options.toggle("tooltip").is_off()
        || options.callback("tooltip.formatter").is_some()
        || options.get_path("tooltip.formatter").is_some()
    {
        return;
    }
    let x = options.field("xField").unwrap_or_default().to_string();
    let y = options.field("yField").unwrap_or_default().to_string();
    let series = options.field("seriesField").map(str::to_string);
    options.set_callback(
        "tooltip.formatter",
        TooltipFn::new(move |datum: &Record| {
            let name = series
                .as_deref()
                .and_then(|field| datum.get(field))
                .filter(|v| is_truthy(v))
                .or_else(|| datum.get(&x));
            let share = number_value(datum.get(&y));
            TooltipItem {
                name: display_value(name),
                value: format!("{}%", to_fixed(share * 100.0, 2)),
            }
        }),
    );
}

/// Data (percent-transformed when `isPercent`), then the line and, when
/// enabled, point markers without their own tooltip.
pub fn geometry(mut params: Params<'_>) -> Params<'_> {
    let options = &params.options;
    let x = options.field("xField").unwrap_or_default().to_string();
    let y = options.field("yField").unwrap_or_default().to_string();
    let data = maybe_percent(options.data(), options.flag("isPercent"), &y, &x, &y);
    params.chart.data(data);

    let mut derived = params.options.clone();
    percent_tooltip(&mut derived);
    let shape = if derived.flag("smooth") { "smooth" } else { "line" };
    derived.resolve_shorthand("line", Some("lineStyle"), fixed("shape", shape), false);
    derived.resolve_shorthand("point", None, fixed("shape", "circle"), true);

    let mut markers = derived.clone();
    markers.set("tooltip", Value::Bool(false));

    geometries::line(params.derive(derived));
    geometries::point(params.derive(markers));
    params
}

/// Scales: x categorical, y pinned at zero when the data allows it
pub fn meta(params: Params<'_>) -> Params<'_> {
    let options = &params.options;
    let (Some(x), Some(y)) = (options.field("xField"), options.field("yField")) else {
        return params;
    };
    let (x, y) = (x.to_string(), y.to_string());

    let mut defaults = Map::new();
    defaults.insert(x.clone(), json!({"type": "cat"}));
    let y_meta = adjust_y_meta_by_zero(&options.data(), &y);
    if !y_meta.is_empty() {
        defaults.insert(y.clone(), Value::Object(y_meta));
    }

    let x_axis = options.get("xAxis").cloned();
    let y_axis = options.get("yAxis").cloned();
    scale(
        params,
        &[(x.as_str(), x_axis.as_ref()), (y.as_str(), y_axis.as_ref())],
        defaults,
    )
}

/// `xAxis` / `yAxis`: falsy hides the axis, anything else is forwarded
pub fn axis(params: Params<'_>) -> Params<'_> {
    for (key, field_key) in [("xAxis", "xField"), ("yAxis", "yField")] {
        let Some(field) = params.options.field(field_key) else {
            continue;
        };
        let cfg = match params.options.toggle(key) {
            Toggle::Off => None,
            Toggle::On(cfg) => Some(cfg),
            Toggle::Unset => Some(Map::new()),
        };
        params.chart.axis(field, cfg);
    }
    params
}

/// Legend bound to `seriesField` when set; only a literal `false` removes it
pub fn legend(params: Params<'_>) -> Params<'_> {
    let series = params.options.field("seriesField");
    match (params.options.get("legend"), series) {
        (Some(Value::Bool(false)), _) => params.chart.legend(Legend::Disabled),
        (Some(cfg), Some(field)) if is_truthy(cfg) => params.chart.legend(Legend::Field {
            field: field.to_string(),
            cfg: cfg.as_object().cloned().unwrap_or_default(),
        }),
        _ => {}
    }
    params
}

fn label(params: Params<'_>) -> Params<'_> {
    let fields = params.options.field("yField").map(str::to_string).into_iter().collect();
    common::label(params, GeometryKind::Line, fields)
}

/// Line chart adaptor
pub fn adaptor(params: Params<'_>) -> Params<'_> {
    flow(
        params,
        &[
            &geometry,
            &meta,
            &adjust,
            &theme,
            &axis,
            &legend,
            &tooltip,
            &label,
            &slider,
            &annotation(Vec::new()),
            &interaction,
            &animation,
        ],
    )
}
