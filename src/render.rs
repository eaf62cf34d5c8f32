//! Terminal rendering of the weather card

use std::fmt::{self, Display};

use crate::models::WeatherReport;

/// Text card over a report, showing at most `days` forecast days
pub struct Card<'a> {
    pub report: &'a WeatherReport,
    pub days: usize,
}

impl Display for Card<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = &self.report.current;
        writeln!(f, "{}", current.location_name)?;
        writeln!(f, "{}", current.condition.format_description())?;
        writeln!(f, "{}", current.format_temperature())?;
        writeln!(f, "Background: {}", self.report.background.asset())?;

        if self.report.daily.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        for day in self.report.daily.iter().take(self.days) {
            writeln!(
                f,
                "{:<10} {:<24} {:>9}",
                day.day,
                day.condition.format_description(),
                day.format_temperature()
            )?;
        }
        Ok(())
    }
}

/// Render the card as plain text, showing at most `days` forecast days
#[must_use]
pub fn render_card(report: &WeatherReport, days: usize) -> String {
    Card { report, days }.to_string()
}

/// Render the report as pretty JSON
pub fn render_json(report: &WeatherReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
