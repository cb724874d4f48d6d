//! Named model variables.
//!
//! Every series the model produces has a stable short name (the symbol used in the
//! DICE literature), a unit and a category. Reporting code addresses series through
//! [`Variable`] rather than through struct fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DiceError;

/// Whether a series depends on the policy.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum VariableType {
    /// Values that are fixed before the rollout
    Exogenous,
    /// Values chosen by the optimiser
    Control,
    /// Values that are determined by the rollout
    Endogenous,
}

macro_rules! variables {
    ($($variant:ident => ($name:literal, $unit:literal, $kind:ident, $description:literal)),+ $(,)?) => {
        /// A named time series of the model.
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub enum Variable {
            $(
                #[doc = $description]
                $variant,
            )+
        }

        impl Variable {
            /// All variables, exogenous first, in reporting order.
            pub const ALL: &'static [Variable] = &[$(Variable::$variant),+];

            /// Short symbolic name.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Variable::$variant => $name,)+
                }
            }

            /// Physical unit (documented, not enforced).
            pub fn unit(&self) -> &'static str {
                match self {
                    $(Variable::$variant => $unit,)+
                }
            }

            pub fn variable_type(&self) -> VariableType {
                match self {
                    $(Variable::$variant => VariableType::$kind,)+
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $(Variable::$variant => $description,)+
                }
            }
        }
    };
}

variables! {
    Population => ("L", "millions", Exogenous, "Level of population and labor"),
    TfpGrowth => ("ga", "per period", Exogenous, "Growth rate of productivity"),
    Tfp => ("A", "1", Exogenous, "Level of total factor productivity"),
    SigmaGrowth => ("gsig", "per year", Exogenous, "Change in sigma, the cumulative improvement of energy efficiency"),
    Sigma => ("sigma", "tCO2 per thousand 2010 USD", Exogenous, "CO2-equivalent-emissions output ratio"),
    Cost1 => ("cost1", "1", Exogenous, "Adjusted cost for backstop"),
    BackstopPrice => ("pbacktime", "2010 USD per tCO2", Exogenous, "Backstop price"),
    LandEmissions => ("etree", "GtCO2 per year", Exogenous, "Emissions from deforestation"),
    CumulativeLandEmissions => ("cumetree", "GtC", Exogenous, "Cumulative emissions from land"),
    DiscountFactor => ("rr", "1", Exogenous, "Average utility social discount rate"),
    OtherForcing => ("forcoth", "W/m^2", Exogenous, "Exogenous forcing for other greenhouse gases"),
    BaseCarbonPrice => ("cpricebase", "2010 USD per tCO2", Exogenous, "Carbon price in the base case"),
    MitigationRate => ("MIU", "1", Control, "Emission control rate of greenhouse gases"),
    SavingsRate => ("S", "1", Control, "Gross savings rate as fraction of gross world product"),
    Capital => ("K", "trill 2010 USD", Endogenous, "Capital stock"),
    GrossOutput => ("YGROSS", "trill 2010 USD per year", Endogenous, "Gross world product gross of abatement and damages"),
    IndustrialEmissions => ("EIND", "GtCO2 per year", Endogenous, "Industrial emissions"),
    TotalEmissions => ("E", "GtCO2 per year", Endogenous, "Total CO2 emissions"),
    CumulativeIndustrialEmissions => ("CCA", "GtC", Endogenous, "Cumulative industrial carbon emissions"),
    CumulativeTotalEmissions => ("CCATOT", "GtC", Endogenous, "Total carbon emissions"),
    AtmosphericCarbon => ("MAT", "GtC", Endogenous, "Carbon concentration increase in atmosphere"),
    UpperOceanCarbon => ("MU", "GtC", Endogenous, "Carbon concentration increase in shallow oceans"),
    LowerOceanCarbon => ("ML", "GtC", Endogenous, "Carbon concentration increase in lower oceans"),
    Forcing => ("FORC", "W/m^2", Endogenous, "Increase in radiative forcing since 1900"),
    AtmosphericTemperature => ("TATM", "K", Endogenous, "Increase in temperature of atmosphere since 1900"),
    OceanTemperature => ("TOCEAN", "K", Endogenous, "Increase in temperature of lower oceans since 1900"),
    DamageFraction => ("DAMFRAC", "1", Endogenous, "Damages as fraction of gross output"),
    Damages => ("DAMAGES", "trill 2010 USD per year", Endogenous, "Damages"),
    AbatementCost => ("ABATECOST", "trill 2010 USD per year", Endogenous, "Cost of emissions reductions"),
    MarginalAbatementCost => ("MCABATE", "2010 USD per tCO2", Endogenous, "Marginal cost of abatement"),
    CarbonPrice => ("CPRICE", "2010 USD per tCO2", Endogenous, "Carbon price"),
    NetOutput => ("YNET", "trill 2010 USD per year", Endogenous, "Output net of damages"),
    Output => ("Y", "trill 2010 USD per year", Endogenous, "Gross world product net of abatement and damages"),
    Investment => ("I", "trill 2010 USD per year", Endogenous, "Investment"),
    Consumption => ("C", "trill 2010 USD per year", Endogenous, "Consumption"),
    ConsumptionPerCapita => ("CPC", "thousand 2010 USD per year", Endogenous, "Per capita consumption"),
    PeriodUtility => ("PERIODU", "1", Endogenous, "One period utility function"),
    WeightedUtility => ("CEMUTOTPER", "1", Endogenous, "Period utility weighted by population and discounting"),
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Variable {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::ALL
            .iter()
            .copied()
            .find(|v| v.name() == s)
            .ok_or_else(|| DiceError::Config(format!("unknown variable {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = Variable::ALL.iter().map(|v| v.name()).collect();
        assert_eq!(names.len(), Variable::ALL.len());
    }

    #[test]
    fn test_parse_round_trip() {
        for variable in Variable::ALL {
            assert_eq!(variable.name().parse::<Variable>().unwrap(), *variable);
        }
        assert!("NOPE".parse::<Variable>().is_err());
    }

    #[test]
    fn test_categories() {
        assert_eq!(Variable::Population.variable_type(), VariableType::Exogenous);
        assert_eq!(Variable::MitigationRate.variable_type(), VariableType::Control);
        assert_eq!(
            Variable::AtmosphericTemperature.variable_type(),
            VariableType::Endogenous
        );
        assert_eq!(Variable::AtmosphericTemperature.unit(), "K");
    }
}
