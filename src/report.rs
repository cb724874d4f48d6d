//! Snapshots of a run for export and display.

use crate::Result;
use indexmap::IndexMap;
use rdice_core::variable::Variable;
use rdice_core::Dice;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// One line of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub year: f64,
    pub miu: f64,
    pub savings: f64,
    pub tatm: f64,
    pub mat: f64,
    pub cprice: f64,
    pub cpc: f64,
}

/// All named series of a run, with the welfare they achieve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub years: Vec<f64>,
    pub welfare: f64,
    /// Series keyed by variable name, in reporting order.
    pub series: IndexMap<String, Vec<f64>>,
    pub summary: Vec<SummaryRow>,
}

impl Trajectory {
    /// Capture the current state of `dice`.
    ///
    /// Summary rows are taken every `stride` periods, plus the final period. A
    /// stride of zero is treated as one.
    pub fn from_dice(dice: &Dice, stride: usize) -> Self {
        let years = dice.time_axis().to_vec();
        let series: IndexMap<String, Vec<f64>> = Variable::ALL
            .iter()
            .map(|variable| (variable.name().to_string(), dice.series(*variable).to_vec()))
            .collect();

        let row = |t: usize| SummaryRow {
            year: years[t],
            miu: dice.series(Variable::MitigationRate)[t],
            savings: dice.series(Variable::SavingsRate)[t],
            tatm: dice.series(Variable::AtmosphericTemperature)[t],
            mat: dice.series(Variable::AtmosphericCarbon)[t],
            cprice: dice.series(Variable::CarbonPrice)[t],
            cpc: dice.series(Variable::ConsumptionPerCapita)[t],
        };

        let nt = years.len();
        let mut periods: Vec<usize> = (0..nt).step_by(stride.max(1)).collect();
        if nt > 0 && periods.last() != Some(&(nt - 1)) {
            periods.push(nt - 1);
        }
        let summary = periods.into_iter().map(row).collect();

        Self {
            welfare: dice.f_utility(),
            years,
            series,
            summary,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text table of the summary rows.
    pub fn summary_table(&self) -> String {
        let mut table = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(
            table,
            "{:>6} {:>7} {:>7} {:>7} {:>9} {:>9} {:>8}",
            "year", "MIU", "S", "TATM", "MAT", "CPRICE", "CPC"
        );
        for row in &self.summary {
            let _ = writeln!(
                table,
                "{:>6.0} {:>7.4} {:>7.4} {:>7.3} {:>9.1} {:>9.2} {:>8.2}",
                row.year, row.miu, row.savings, row.tatm, row.mat, row.cprice, row.cpc
            );
        }
        let _ = writeln!(table, "welfare: {:.4}", self.welfare);
        table
    }
}
