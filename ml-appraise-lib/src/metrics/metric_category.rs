use strum::{Display, EnumIter};

/// Groups metrics by the aspect of an artifact they judge. Used to organize reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum MetricCategory {
    Usability,
    Community,
    Evidence,
    Legal,
    Footprint,
    Data,
    Engineering,
}
