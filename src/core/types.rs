use serde::{Deserialize, Serialize};

use super::error::EngineError;

pub const MAX_RISK_TOLERANCE: u8 = 5;
pub const MAX_PROJECTION_YEARS: u32 = 100;
/// Upper bound for the initial sum and the monthly contribution. Keeps the
/// fastest-growing allocation finite over `MAX_PROJECTION_YEARS`.
pub const MAX_AMOUNT: f64 = 1e12;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FamilySituation {
    Single,
    Couple,
    Family,
    #[serde(alias = "singleParent", alias = "single_parent")]
    SingleParent,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectorPreference {
    General,
    Technology,
    Healthcare,
    Energy,
    Automotive,
    #[serde(alias = "real-estate", alias = "realEstate")]
    RealEstate,
    #[serde(other)]
    Unlisted,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeographyPreference {
    Global,
    Europe,
    Emerging,
    #[serde(other)]
    Unlisted,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Lt,
    En,
}

/// Volatility class of an instrument. Drives drawdown magnitudes during
/// crashes and corrections; display names never do.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstrumentClass {
    BroadEtf,
    SectorEtf,
    GrowthStock,
    CryptoEtf,
    Crypto,
    Gold,
    Options,
    Leveraged,
    Moonshot,
}

/// Concrete fund chosen for the ETF slot of an allocation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EtfVariant {
    Global,
    Europe,
    Emerging,
    Technology,
    Healthcare,
    Energy,
    Automotive,
    RealEstate,
}

impl EtfVariant {
    pub fn class(self) -> InstrumentClass {
        match self {
            EtfVariant::Global => InstrumentClass::BroadEtf,
            _ => InstrumentClass::SectorEtf,
        }
    }
}

/// Instruments held outside the ETF slot of an allocation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Holding {
    GrowthStock,
    CryptoEtf,
    Crypto,
    Gold,
    Options,
    Leveraged,
    Moonshot,
}

impl Holding {
    pub fn class(self) -> InstrumentClass {
        match self {
            Holding::GrowthStock => InstrumentClass::GrowthStock,
            Holding::CryptoEtf => InstrumentClass::CryptoEtf,
            Holding::Crypto => InstrumentClass::Crypto,
            Holding::Gold => InstrumentClass::Gold,
            Holding::Options => InstrumentClass::Options,
            Holding::Leveraged => InstrumentClass::Leveraged,
            Holding::Moonshot => InstrumentClass::Moonshot,
        }
    }
}

/// Expected annual return band in percent.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ReturnRange {
    pub min: f64,
    pub max: f64,
}

impl ReturnRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub name: String,
    pub class: InstrumentClass,
    pub percentage: f64,
    pub description: String,
    pub return_range: ReturnRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAllocation {
    pub risk_tolerance: u8,
    pub risk_level: String,
    pub instruments: Vec<Instrument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl PortfolioAllocation {
    pub fn total_percentage(&self) -> f64 {
        self.instruments.iter().map(|i| i.percentage).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentInputs {
    pub age: u32,
    pub family_situation: FamilySituation,
    pub initial_sum: f64,
    pub monthly_contribution: f64,
    pub time_horizon: u32,
    pub risk_tolerance: u8,
    pub management_preference: u8,
    pub sector_preference: SectorPreference,
    pub geography_preference: GeographyPreference,
}

impl InvestmentInputs {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.risk_tolerance > MAX_RISK_TOLERANCE {
            return Err(EngineError::invalid(
                "risk_tolerance",
                format!(
                    "must be between 0 and {MAX_RISK_TOLERANCE}, got {}",
                    self.risk_tolerance
                ),
            ));
        }
        if !(0.0..=MAX_AMOUNT).contains(&self.initial_sum) {
            return Err(EngineError::invalid(
                "initial_sum",
                format!("must be between 0 and {MAX_AMOUNT:e}"),
            ));
        }
        if !(0.0..=MAX_AMOUNT).contains(&self.monthly_contribution) {
            return Err(EngineError::invalid(
                "monthly_contribution",
                format!("must be between 0 and {MAX_AMOUNT:e}"),
            ));
        }
        if !(1..=MAX_PROJECTION_YEARS).contains(&self.time_horizon) {
            return Err(EngineError::invalid(
                "time_horizon",
                format!("must be between 1 and {MAX_PROJECTION_YEARS}"),
            ));
        }
        Ok(())
    }

    pub fn annual_contribution(&self) -> f64 {
        self.monthly_contribution * 12.0
    }

    /// Principal paid in by the end of `year`. Independent of any draw.
    pub fn total_invested(&self, year: u32) -> f64 {
        self.initial_sum + self.annual_contribution() * year as f64
    }
}

pub fn validate_period(period: u32) -> Result<(), EngineError> {
    if period == 0 || period > MAX_PROJECTION_YEARS {
        return Err(EngineError::invalid(
            "period",
            format!("must be between 1 and {MAX_PROJECTION_YEARS}, got {period}"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentSnapshot {
    pub name: String,
    pub class: InstrumentClass,
    pub percentage: f64,
    pub annual_return: f64,
    pub value: f64,
    pub volatile_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crash_drawdown: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction_drawdown: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_recovering: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correction: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_progress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction_recovery_progress: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyCalculation {
    pub year: u32,
    pub instruments: Vec<InstrumentSnapshot>,
    pub total_value: f64,
    pub total_invested: f64,
    pub volatile_value: f64,
    pub is_crash_year: bool,
    pub is_recovery_year: bool,
    pub is_correction_year: bool,
    pub recovery_time_remaining: f64,
    pub correction_time_remaining: f64,
}

/// One point of the chart series. Currency values are rounded to whole units;
/// the best/worst bands are a fixed +/-30% around `value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub year: u32,
    pub value: f64,
    pub invested: f64,
    pub best_case: f64,
    pub worst_case: f64,
    pub volatile_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub projection_data: Vec<ProjectionPoint>,
    pub yearly_calculations: Vec<YearlyCalculation>,
}

impl Projection {
    pub fn final_point(&self) -> Option<&ProjectionPoint> {
        self.projection_data.last()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub period: u32,
    pub total_invested: f64,
    pub projected_value: f64,
    pub potential_profit: f64,
    pub volatile_value: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    #[serde(rename = "stop-after-1")]
    StopAfter1,
    #[serde(rename = "stop-after-3")]
    StopAfter3,
    #[serde(rename = "stop-after-10")]
    StopAfter10,
    Baseline,
    Double,
}

impl ScenarioKind {
    pub fn stop_year(self) -> Option<u32> {
        match self {
            ScenarioKind::StopAfter1 => Some(1),
            ScenarioKind::StopAfter3 => Some(3),
            ScenarioKind::StopAfter10 => Some(10),
            ScenarioKind::Baseline | ScenarioKind::Double => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionScenario {
    pub id: ScenarioKind,
    pub name: String,
    pub description: String,
    pub final_value: f64,
    pub total_contributions: f64,
    pub growth: f64,
    pub difference_from_baseline: f64,
    pub percentage_difference: f64,
}

/// Everything the results page needs from one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub allocation: PortfolioAllocation,
    pub period: u32,
    #[serde(flatten)]
    pub projection: Projection,
    pub summary: ProjectionSummary,
    pub scenarios: Vec<ContributionScenario>,
}
