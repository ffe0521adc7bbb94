//! Report generation port trait.

use crate::domain::error::DcasimError;
use crate::domain::summary::RunSummary;

/// Port for writing human-readable simulation reports. The augmented CSV is
/// machine output and goes through the data adapter instead.
pub trait ReportPort {
    fn write(&self, summary: &RunSummary, symbol: &str, output_path: &str)
        -> Result<(), DcasimError>;
}
