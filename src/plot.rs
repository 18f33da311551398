//! Plot wrapper: owns the resolved options and drives one chart handle through
//! `clear -> adaptor -> render`.

use crate::chart::Chart;
use crate::options::PlotOptions;
use crate::pipeline::Params;
use crate::types::Record;
use anyhow::{Context, Result};
use serde_json::json;
use std::marker::PhantomData;
use tracing::{debug, info};

/// A plot type: its name, its option defaults and its adaptor pipeline
pub trait PlotType {
    const NAME: &'static str;

    /// Defaults merged under the user's options. Include [`base_defaults`].
    fn default_options() -> PlotOptions;

    fn adaptor(params: Params<'_>) -> Params<'_>;
}

/// Defaults every plot type starts from
pub fn base_defaults() -> PlotOptions {
    PlotOptions::from_value(json!({
        "xAxis": {"nice": true},
        "yAxis": {"nice": true},
        "animation": true,
    }))
}

pub struct Plot<P: PlotType, C: Chart> {
    container: String,
    options: PlotOptions,
    chart: C,
    plot: PhantomData<P>,
}

impl<P: PlotType, C: Chart> Plot<P, C> {
    /// `chart` is the engine handle created for `container`
    pub fn new(container: &str, options: PlotOptions, chart: C) -> Self {
        let options = PlotOptions::merged(&P::default_options(), &options);
        debug!(plot = P::NAME, container, "plot created");
        Self {
            container: container.to_string(),
            options,
            chart,
            plot: PhantomData,
        }
    }

    pub fn render(&mut self) -> Result<()> {
        self.chart.clear();
        P::adaptor(Params::new(&mut self.chart, self.options.clone()));
        self.chart
            .render()
            .with_context(|| format!("Failed to render {} plot in '{}'", P::NAME, self.container))?;
        info!(plot = P::NAME, container = %self.container, "rendered");
        Ok(())
    }

    /// Deep-assign `options` over the current ones and re-render
    pub fn update(&mut self, options: PlotOptions) -> Result<()> {
        self.options.assign(&options);
        self.render()
    }

    /// Replace the data and re-render
    pub fn change_data(&mut self, data: Vec<Record>) -> Result<()> {
        self.options.set_data(data);
        self.render()
    }

    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }

    pub fn into_chart(self) -> C {
        self.chart
    }
}
