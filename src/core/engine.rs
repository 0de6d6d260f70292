use super::allocation::select_allocation;
use super::error::EngineError;
use super::labels;
use super::sampler::{RandomSource, sample_return};
use super::shock::{self, Phase, ShockKind, ShockState};
use super::types::{
    ContributionScenario, InstrumentSnapshot, InvestmentInputs, Locale, PortfolioAllocation,
    Projection, ProjectionPoint, ProjectionSummary, ScenarioKind, SimulationReport,
    YearlyCalculation, validate_period,
};

pub const BEST_CASE_FACTOR: f64 = 1.3;
pub const WORST_CASE_FACTOR: f64 = 0.7;
const VOLATILITY_FACTOR: f64 = 1.0;

const STOP_SCENARIOS: [ScenarioKind; 3] = [
    ScenarioKind::StopAfter1,
    ScenarioKind::StopAfter3,
    ScenarioKind::StopAfter10,
];

pub fn calculate_portfolio(
    inputs: &InvestmentInputs,
    locale: Locale,
) -> Result<PortfolioAllocation, EngineError> {
    inputs.validate()?;
    select_allocation(
        inputs.risk_tolerance,
        inputs.sector_preference,
        inputs.geography_preference,
        locale,
    )
}

pub fn calculate_detailed_projections(
    inputs: &InvestmentInputs,
    period: u32,
    locale: Locale,
    rng: &mut impl RandomSource,
) -> Result<Projection, EngineError> {
    let allocation = calculate_portfolio(inputs, locale)?;
    project(inputs, period, &allocation, rng)
}

/// Allocation, projection, summary and contribution scenarios in one go.
pub fn simulate(
    inputs: &InvestmentInputs,
    period: u32,
    locale: Locale,
    rng: &mut impl RandomSource,
) -> Result<SimulationReport, EngineError> {
    let allocation = calculate_portfolio(inputs, locale)?;
    let projection = project(inputs, period, &allocation, rng)?;
    let summary = summarize(inputs, period, &projection);
    let scenarios = contribution_scenarios_for(
        inputs,
        period,
        &allocation,
        summary.projected_value,
        locale,
        rng,
    )?;

    tracing::info!(
        risk = inputs.risk_tolerance,
        period,
        projected_value = summary.projected_value,
        "simulation finished"
    );

    Ok(SimulationReport {
        allocation,
        period,
        projection,
        summary,
        scenarios,
    })
}

/// Runs the year loop for `period` years on top of year 0.
///
/// Two value tracks evolve side by side: the authoritative one always
/// compounds on the year's sampled return, the volatile one takes the
/// crash/correction drawdowns and recoveries. They are never reconciled.
pub fn project(
    inputs: &InvestmentInputs,
    period: u32,
    allocation: &PortfolioAllocation,
    rng: &mut impl RandomSource,
) -> Result<Projection, EngineError> {
    inputs.validate()?;
    validate_period(period)?;
    Ok(run_years(inputs, period, allocation, rng))
}

// Callers validate first. The doubled-contribution run may reach twice the
// input cap, which still stays finite.
fn run_years(
    inputs: &InvestmentInputs,
    period: u32,
    allocation: &PortfolioAllocation,
    rng: &mut impl RandomSource,
) -> Projection {
    let years = period as usize + 1;
    let mut projection_data = Vec::with_capacity(years);
    let mut yearly_calculations = Vec::with_capacity(years);

    let annual_contribution = inputs.annual_contribution();
    let mut state = ShockState::default();
    let mut current_value = inputs.initial_sum;
    let mut volatile_value = inputs.initial_sum;

    yearly_calculations.push(initial_snapshot(inputs, allocation));
    projection_data.push(projection_point(0, current_value, inputs.total_invested(0), volatile_value));

    for year in 1..=period {
        let (next_state, year_shock) = shock::step(state, year, volatile_value, rng);
        state = next_state;
        let started = year_shock.started();

        let mut new_total_value = 0.0;
        let mut new_volatile_value = 0.0;
        let mut instruments = Vec::with_capacity(allocation.instruments.len());

        for instrument in &allocation.instruments {
            let weight = instrument.percentage / 100.0;
            let annual_return = sample_return(instrument.return_range, VOLATILITY_FACTOR, rng);
            let drawdown = started.map(|kind| shock::draw_drawdown(instrument.class, kind, rng));
            let contribution = annual_contribution * weight;

            let value = current_value * weight * (1.0 + annual_return / 100.0) + contribution;
            let volatile = year_shock.volatile_outcome(
                weight,
                volatile_value,
                annual_return,
                drawdown,
                contribution,
            );
            new_total_value += value;
            new_volatile_value += volatile;

            instruments.push(InstrumentSnapshot {
                name: instrument.name.clone(),
                class: instrument.class,
                percentage: instrument.percentage,
                annual_return,
                value,
                volatile_value: volatile,
                crash_drawdown: drawdown.filter(|_| started == Some(ShockKind::Crash)),
                correction_drawdown: drawdown.filter(|_| started == Some(ShockKind::Correction)),
                is_recovering: year_shock
                    .recovery_progress
                    .map(|_| year_shock.is_recovery_year()),
                is_correction: year_shock
                    .correction_recovery_progress
                    .map(|_| year_shock.phase == Phase::CorrectionActive),
                recovery_progress: year_shock.recovery_progress,
                correction_recovery_progress: year_shock.correction_recovery_progress,
            });
        }

        current_value = new_total_value;
        volatile_value = new_volatile_value;
        let total_invested = inputs.total_invested(year);

        yearly_calculations.push(YearlyCalculation {
            year,
            instruments,
            total_value: current_value,
            total_invested,
            volatile_value,
            is_crash_year: year_shock.phase == Phase::CrashActive,
            is_recovery_year: year_shock.is_recovery_year(),
            is_correction_year: year_shock.phase == Phase::CorrectionActive,
            recovery_time_remaining: year_shock.recovery_time_remaining,
            correction_time_remaining: year_shock.correction_time_remaining,
        });
        projection_data.push(projection_point(year, current_value, total_invested, volatile_value));
    }

    Projection {
        projection_data,
        yearly_calculations,
    }
}

fn initial_snapshot(
    inputs: &InvestmentInputs,
    allocation: &PortfolioAllocation,
) -> YearlyCalculation {
    let instruments = allocation
        .instruments
        .iter()
        .map(|instrument| {
            let value = inputs.initial_sum * instrument.percentage / 100.0;
            InstrumentSnapshot {
                name: instrument.name.clone(),
                class: instrument.class,
                percentage: instrument.percentage,
                annual_return: 0.0,
                value,
                volatile_value: value,
                crash_drawdown: None,
                correction_drawdown: None,
                is_recovering: None,
                is_correction: None,
                recovery_progress: None,
                correction_recovery_progress: None,
            }
        })
        .collect();

    YearlyCalculation {
        year: 0,
        instruments,
        total_value: inputs.initial_sum,
        total_invested: inputs.total_invested(0),
        volatile_value: inputs.initial_sum,
        is_crash_year: false,
        is_recovery_year: false,
        is_correction_year: false,
        recovery_time_remaining: 0.0,
        correction_time_remaining: 0.0,
    }
}

// Bands are plain scalings of the point estimate, not a simulated interval.
fn projection_point(year: u32, value: f64, invested: f64, volatile_value: f64) -> ProjectionPoint {
    ProjectionPoint {
        year,
        value: value.round(),
        invested,
        best_case: (value * BEST_CASE_FACTOR).round(),
        worst_case: (value * WORST_CASE_FACTOR).round(),
        volatile_value: volatile_value.round(),
    }
}

pub fn summarize(
    inputs: &InvestmentInputs,
    period: u32,
    projection: &Projection,
) -> ProjectionSummary {
    let total_invested = inputs.total_invested(period);
    let (projected_value, volatile_value) = projection
        .final_point()
        .map_or((0.0, 0.0), |point| (point.value, point.volatile_value));

    ProjectionSummary {
        period,
        total_invested,
        projected_value,
        potential_profit: projected_value - total_invested,
        volatile_value,
    }
}

/// What-if rows next to the caller's baseline: stopping contributions early
/// (only for stop years inside the period) and doubling them.
pub fn contribution_scenarios(
    inputs: &InvestmentInputs,
    period: u32,
    baseline_value: f64,
    locale: Locale,
    rng: &mut impl RandomSource,
) -> Result<Vec<ContributionScenario>, EngineError> {
    let allocation = calculate_portfolio(inputs, locale)?;
    contribution_scenarios_for(inputs, period, &allocation, baseline_value, locale, rng)
}

fn contribution_scenarios_for(
    inputs: &InvestmentInputs,
    period: u32,
    allocation: &PortfolioAllocation,
    baseline_value: f64,
    locale: Locale,
    rng: &mut impl RandomSource,
) -> Result<Vec<ContributionScenario>, EngineError> {
    inputs.validate()?;
    validate_period(period)?;

    let full_contributions = inputs.total_invested(period);
    let stops: Vec<(ScenarioKind, u32)> = STOP_SCENARIOS
        .iter()
        .filter_map(|&kind| kind.stop_year().map(|year| (kind, year)))
        .filter(|&(_, year)| year < period)
        .collect();

    let mut rows = Vec::with_capacity(stops.len() + 2);

    if !stops.is_empty() {
        let reference = project(inputs, period, allocation, rng)?;
        let reference_final = reference.final_point().map_or(0.0, |point| point.value);
        let average_return = if full_contributions > 0.0 {
            (reference_final / full_contributions).powf(1.0 / period as f64) - 1.0
        } else {
            0.0
        };

        for (kind, stop_year) in stops {
            let stop_value = reference.projection_data[stop_year as usize].value;
            let final_value = stop_value * (1.0 + average_return).powi((period - stop_year) as i32);
            rows.push(scenario_row(
                kind,
                locale,
                final_value,
                inputs.total_invested(stop_year),
                baseline_value,
            ));
        }
    }

    rows.push(scenario_row(
        ScenarioKind::Baseline,
        locale,
        baseline_value,
        full_contributions,
        baseline_value,
    ));

    let doubled = InvestmentInputs {
        monthly_contribution: inputs.monthly_contribution * 2.0,
        ..inputs.clone()
    };
    let doubled_run = run_years(&doubled, period, allocation, rng);
    rows.push(scenario_row(
        ScenarioKind::Double,
        locale,
        doubled_run.final_point().map_or(0.0, |point| point.value),
        doubled.total_invested(period),
        baseline_value,
    ));

    Ok(rows)
}

fn scenario_row(
    kind: ScenarioKind,
    locale: Locale,
    final_value: f64,
    total_contributions: f64,
    baseline_value: f64,
) -> ContributionScenario {
    let text = labels::scenario(kind, locale);
    let difference = final_value - baseline_value;
    ContributionScenario {
        id: kind,
        name: text.name.to_string(),
        description: text.description.to_string(),
        final_value,
        total_contributions,
        growth: final_value - total_contributions,
        difference_from_baseline: difference,
        percentage_difference: if baseline_value != 0.0 {
            difference / baseline_value * 100.0
        } else {
            0.0
        },
    }
}
