//! Adaptor pipeline: `Params`, the `Stage` trait and flow composition.
//!
//! A plot adaptor is an ordered list of stages folded over one `Params`
//! value. Each stage sees exactly what the previous stage returned.

use crate::chart::Chart;
use crate::options::PlotOptions;
use std::any::type_name;
use tracing::debug;

/// Pipeline state: the borrowed chart handle plus the resolved options
pub struct Params<'a> {
    pub chart: &'a mut dyn Chart,
    pub options: PlotOptions,
}

impl<'a> Params<'a> {
    pub fn new(chart: &'a mut dyn Chart, options: PlotOptions) -> Self {
        Self { chart, options }
    }

    /// Reborrow the chart with a different set of options. Used by stages that
    /// hand derived options to sub-builders without touching their own.
    pub fn derive(&mut self, options: PlotOptions) -> Params<'_> {
        Params {
            chart: &mut *self.chart,
            options,
        }
    }
}

/// One single-concern step of an adaptor
pub trait Stage {
    fn apply<'a>(&self, params: Params<'a>) -> Params<'a>;

    fn name(&self) -> &str {
        type_name::<Self>()
    }
}

impl<F> Stage for F
where
    F: for<'a> Fn(Params<'a>) -> Params<'a>,
{
    fn apply<'a>(&self, params: Params<'a>) -> Params<'a> {
        self(params)
    }
}

/// Apply `stages` left to right
pub fn flow<'a>(params: Params<'a>, stages: &[&dyn Stage]) -> Params<'a> {
    stages.iter().fold(params, |params, stage| {
        debug!(stage = short_name(stage.name()), "applying stage");
        stage.apply(params)
    })
}

/// Owned stage list, for adaptors assembled at runtime
#[derive(Default)]
pub struct Flow<'s> {
    stages: Vec<Box<dyn Stage + 's>>,
}

impl<'s> Flow<'s> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn then(mut self, stage: impl Stage + 's) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn run<'a>(&self, params: Params<'a>) -> Params<'a> {
        let stages: Vec<&dyn Stage> = self.stages.iter().map(|s| s.as_ref() as &dyn Stage).collect();
        flow(params, &stages)
    }
}

/// `plotflow::plots::area::adaptor::geometry` -> `area::adaptor::geometry`
fn short_name(name: &str) -> &str {
    let parts: Vec<&str> = name.rsplitn(4, "::").collect();
    if parts.len() < 4 {
        return name;
    }
    let keep: usize = parts[..3].iter().map(|p| p.len()).sum::<usize>() + 4;
    &name[name.len() - keep..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec_chart::SpecChart;
    use serde_json::json;

    fn mark_a(mut params: Params<'_>) -> Params<'_> {
        let trail = format!("{}a", params.options.field("trail").unwrap_or(""));
        params.options.set("trail", json!(trail));
        params
    }

    fn mark_b(mut params: Params<'_>) -> Params<'_> {
        let trail = format!("{}b", params.options.field("trail").unwrap_or(""));
        params.options.set("trail", json!(trail));
        params
    }

    struct Animate(bool);

    impl Stage for Animate {
        fn apply<'a>(&self, params: Params<'a>) -> Params<'a> {
            params.chart.animate(self.0);
            params
        }
    }

    #[test]
    fn test_flow_applies_in_declaration_order() {
        let mut chart = SpecChart::new("c");
        let params = flow(Params::new(&mut chart, PlotOptions::new()), &[&mark_a, &mark_b, &mark_a]);
        assert_eq!(params.options.field("trail"), Some("aba"));
    }

    #[test]
    fn test_empty_flow_is_identity() {
        let mut chart = SpecChart::new("c");
        let options = PlotOptions::new().with("xField", json!("date"));
        let params = flow(Params::new(&mut chart, options), &[]);
        assert_eq!(params.options.field("xField"), Some("date"));
        drop(params);
        assert!(chart.spec().instructions.is_empty());
    }

    #[test]
    fn test_owned_flow_with_struct_stage() {
        let mut chart = SpecChart::new("c");
        let pipeline = Flow::new().then(mark_b).then(Animate(false)).then(mark_a);
        assert_eq!(pipeline.len(), 3);
        let params = pipeline.run(Params::new(&mut chart, PlotOptions::new()));
        assert_eq!(params.options.field("trail"), Some("ba"));
        drop(params);
        assert_eq!(chart.spec().animate, Some(false));
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("plotflow::plots::area::adaptor::geometry"), "area::adaptor::geometry");
        assert_eq!(short_name("adaptor::label"), "adaptor::label");
    }
}
