//! Rendering consumer port.

use crate::domain::error::KlineError;
use crate::domain::series::ChartSeries;

pub trait RenderPort {
    fn render(&self, chart: &ChartSeries) -> Result<(), KlineError>;
}
