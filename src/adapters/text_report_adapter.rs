//! Plain-text comparison report adapter.

use crate::domain::error::DcasimError;
use crate::domain::summary::RunSummary;
use crate::ports::report_port::ReportPort;
use std::fmt::Write as _;
use std::fs;

pub struct TextReportAdapter;

impl TextReportAdapter {
    /// Render the report body. Also used by the CLI for the stderr summary.
    pub fn render(summary: &RunSummary, symbol: &str) -> String {
        let mut out = String::new();
        let title = format!(
            "{symbol} DCA vs {}x leveraged {symbol} DCA",
            summary.multiplier
        );

        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(out, "{title}");
        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Date range:        {} to {} ({} days, {} bars)",
            summary.start_date, summary.end_date, summary.calendar_days, summary.bar_count
        );
        let _ = writeln!(out, "Investment months: {}", summary.investment_months);

        for (label, series) in [("Base", &summary.base), ("Leveraged", &summary.leveraged)] {
            let _ = writeln!(out);
            let _ = writeln!(out, "[{label} DCA]");
            let _ = writeln!(out, "Total invested:    ${:.2}", series.total_invested);
            let _ = writeln!(out, "Final value:       ${:.2}", series.final_value);
            let _ = writeln!(out, "Total return:      ${:.2}", series.total_return);
            let _ = writeln!(out, "Return:            {:.2}%", series.return_pct);
            let _ = writeln!(out, "Annualized:        {:.2}%", series.annualized_return_pct);
            let _ = writeln!(out, "Max drawdown:      -{:.2}%", series.max_drawdown_pct);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "[Comparison]");
        let _ = writeln!(out, "Return multiple:   {:.2}x", summary.return_multiple);
        let _ = writeln!(out, "Final value ratio: {:.2}x", summary.final_value_ratio);

        out
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        summary: &RunSummary,
        symbol: &str,
        output_path: &str,
    ) -> Result<(), DcasimError> {
        fs::write(output_path, Self::render(summary, symbol)).map_err(DcasimError::Io)
    }
}
