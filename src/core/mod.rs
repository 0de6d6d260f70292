mod allocation;
mod engine;
mod error;
mod labels;
mod sampler;
mod shock;
mod types;

pub use allocation::{etf_return_range, holding_return_range, resolve_etf, select_allocation};
pub use engine::{
    BEST_CASE_FACTOR, WORST_CASE_FACTOR, calculate_detailed_projections, calculate_portfolio,
    contribution_scenarios, project, simulate, summarize,
};
pub use error::EngineError;
pub use sampler::{RandomSource, sample_return};
pub use shock::{CORRECTION_PROBABILITY, CRASH_PROBABILITY};
pub use types::{
    ContributionScenario, EtfVariant, FamilySituation, GeographyPreference, Holding, Instrument,
    InstrumentClass, InstrumentSnapshot, InvestmentInputs, Locale, MAX_AMOUNT, MAX_PROJECTION_YEARS,
    MAX_RISK_TOLERANCE, PortfolioAllocation, Projection, ProjectionPoint, ProjectionSummary,
    ReturnRange, ScenarioKind, SectorPreference, SimulationReport, YearlyCalculation,
    validate_period,
};
