use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    /// A chart-scoped accessor was used outside a matching chart root.
    ///
    /// `chart` names the component that was expected to be an ancestor
    /// (`TimeChart`, `PriceChart` or `YieldCurveChart`), so misuse of one
    /// variant's context is distinguishable from the others.
    #[error("no parent {chart} component found")]
    MissingChartContext { chart: &'static str },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
