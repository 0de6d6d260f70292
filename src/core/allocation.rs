use super::error::EngineError;
use super::labels;
use super::types::{
    EtfVariant, GeographyPreference, Holding, Instrument, Locale, MAX_RISK_TOLERANCE,
    PortfolioAllocation, ReturnRange, SectorPreference,
};

#[derive(Copy, Clone, Debug)]
enum Slot {
    Etf,
    Fixed(Holding),
}

const GROWTH: Slot = Slot::Fixed(Holding::GrowthStock);
const CRYPTO_ETF: Slot = Slot::Fixed(Holding::CryptoEtf);
const CRYPTO: Slot = Slot::Fixed(Holding::Crypto);
const GOLD: Slot = Slot::Fixed(Holding::Gold);
const OPTIONS: Slot = Slot::Fixed(Holding::Options);
const LEVERAGED: Slot = Slot::Fixed(Holding::Leveraged);
const MOONSHOT: Slot = Slot::Fixed(Holding::Moonshot);

/// Instruments per risk level, in display order.
const RISK_TABLE: [&[(Slot, f64)]; 6] = [
    &[(Slot::Etf, 100.0)],
    &[(Slot::Etf, 50.0), (GROWTH, 50.0)],
    &[(GROWTH, 50.0), (Slot::Etf, 30.0), (CRYPTO_ETF, 10.0), (GOLD, 10.0)],
    &[(GROWTH, 50.0), (OPTIONS, 20.0), (LEVERAGED, 20.0), (CRYPTO, 10.0)],
    &[(GROWTH, 30.0), (CRYPTO, 30.0), (LEVERAGED, 30.0), (OPTIONS, 10.0)],
    &[(CRYPTO, 30.0), (OPTIONS, 30.0), (LEVERAGED, 30.0), (MOONSHOT, 10.0)],
];

pub fn etf_return_range(variant: EtfVariant) -> ReturnRange {
    match variant {
        EtfVariant::Global => ReturnRange::new(12.8, 13.2),
        EtfVariant::Europe => ReturnRange::new(6.8, 8.2),
        EtfVariant::Emerging => ReturnRange::new(4.2, 6.1),
        EtfVariant::Technology => ReturnRange::new(18.3, 18.8),
        EtfVariant::Healthcare => ReturnRange::new(8.5, 10.2),
        EtfVariant::Energy => ReturnRange::new(2.1, 4.8),
        EtfVariant::Automotive => ReturnRange::new(5.0, 9.0),
        EtfVariant::RealEstate => ReturnRange::new(6.0, 8.5),
    }
}

pub fn holding_return_range(holding: Holding) -> ReturnRange {
    match holding {
        Holding::GrowthStock => ReturnRange::new(10.0, 15.0),
        Holding::CryptoEtf => ReturnRange::new(-15.0, 45.0),
        Holding::Crypto => ReturnRange::new(-20.0, 60.0),
        Holding::Gold => ReturnRange::new(3.0, 8.0),
        Holding::Options => ReturnRange::new(-30.0, 50.0),
        Holding::Leveraged => ReturnRange::new(25.0, 35.0),
        Holding::Moonshot => ReturnRange::new(-50.0, 100.0),
    }
}

/// Sector wins over geography unless it is `general`. Preferences missing
/// from the table fall back to the global fund.
pub fn resolve_etf(sector: SectorPreference, geography: GeographyPreference) -> EtfVariant {
    let from_geography = || match geography {
        GeographyPreference::Global => EtfVariant::Global,
        GeographyPreference::Europe => EtfVariant::Europe,
        GeographyPreference::Emerging => EtfVariant::Emerging,
        GeographyPreference::Unlisted => {
            tracing::warn!("unlisted geography preference, using global ETF");
            EtfVariant::Global
        }
    };

    match sector {
        SectorPreference::General => from_geography(),
        SectorPreference::Technology => EtfVariant::Technology,
        SectorPreference::Healthcare => EtfVariant::Healthcare,
        SectorPreference::Energy => EtfVariant::Energy,
        SectorPreference::Automotive => EtfVariant::Automotive,
        SectorPreference::RealEstate => EtfVariant::RealEstate,
        SectorPreference::Unlisted => {
            tracing::warn!("unlisted sector preference, using global ETF");
            EtfVariant::Global
        }
    }
}

pub fn select_allocation(
    risk_tolerance: u8,
    sector: SectorPreference,
    geography: GeographyPreference,
    locale: Locale,
) -> Result<PortfolioAllocation, EngineError> {
    let Some(slots) = RISK_TABLE.get(risk_tolerance as usize) else {
        return Err(EngineError::invalid(
            "risk_tolerance",
            format!("must be between 0 and {MAX_RISK_TOLERANCE}, got {risk_tolerance}"),
        ));
    };

    let etf = resolve_etf(sector, geography);
    let instruments: Vec<Instrument> = slots
        .iter()
        .map(|&(slot, percentage)| {
            let (class, range, text) = match slot {
                Slot::Etf => (etf.class(), etf_return_range(etf), labels::etf(etf, locale)),
                Slot::Fixed(holding) => (
                    holding.class(),
                    holding_return_range(holding),
                    labels::holding(holding, locale),
                ),
            };
            Instrument {
                name: text.name.to_string(),
                class,
                percentage,
                description: text.description.to_string(),
                return_range: range,
            }
        })
        .collect();

    let allocation = PortfolioAllocation {
        risk_tolerance,
        risk_level: labels::risk_level(risk_tolerance, locale).to_string(),
        instruments,
        warning: labels::risk_warning(risk_tolerance, locale).map(str::to_string),
    };
    debug_assert!(
        (allocation.total_percentage() - 100.0).abs() < 1e-9,
        "allocation for risk {risk_tolerance} does not sum to 100"
    );
    Ok(allocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::InstrumentClass;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use proptest::sample::select;

    const SECTORS: [SectorPreference; 7] = [
        SectorPreference::General,
        SectorPreference::Technology,
        SectorPreference::Healthcare,
        SectorPreference::Energy,
        SectorPreference::Automotive,
        SectorPreference::RealEstate,
        SectorPreference::Unlisted,
    ];
    const GEOGRAPHIES: [GeographyPreference; 4] = [
        GeographyPreference::Global,
        GeographyPreference::Europe,
        GeographyPreference::Emerging,
        GeographyPreference::Unlisted,
    ];

    const HOLDINGS: [Holding; 7] = [
        Holding::GrowthStock,
        Holding::CryptoEtf,
        Holding::Crypto,
        Holding::Gold,
        Holding::Options,
        Holding::Leveraged,
        Holding::Moonshot,
    ];

    #[test]
    fn holdings_never_map_to_fund_classes() {
        for holding in HOLDINGS {
            assert!(
                !matches!(
                    holding.class(),
                    InstrumentClass::BroadEtf | InstrumentClass::SectorEtf
                ),
                "{holding:?}"
            );
            let range = holding_return_range(holding);
            assert!(range.min < range.max, "{holding:?}");
            for locale in [Locale::Lt, Locale::En] {
                assert!(!labels::holding(holding, locale).name.is_empty());
            }
        }
    }

    #[test]
    fn minimal_risk_is_all_global_etf() {
        let allocation = select_allocation(
            0,
            SectorPreference::General,
            GeographyPreference::Global,
            Locale::En,
        )
        .expect("valid risk level");

        assert_eq!(allocation.instruments.len(), 1);
        let etf = &allocation.instruments[0];
        assert_eq!(etf.class, InstrumentClass::BroadEtf);
        assert_eq!(etf.percentage, 100.0);
        assert_eq!(etf.return_range, ReturnRange::new(12.8, 13.2));
        assert!(allocation.warning.is_none());
    }

    #[test]
    fn rejects_risk_tolerance_above_table() {
        let err = select_allocation(
            6,
            SectorPreference::General,
            GeographyPreference::Global,
            Locale::Lt,
        )
        .expect_err("risk 6 is out of range");
        assert!(matches!(
            err,
            EngineError::InvalidInput {
                field: "risk_tolerance",
                ..
            }
        ));
    }

    #[test]
    fn sector_preference_overrides_geography() {
        assert_eq!(
            resolve_etf(SectorPreference::Energy, GeographyPreference::Europe),
            EtfVariant::Energy
        );
        assert_eq!(
            resolve_etf(SectorPreference::General, GeographyPreference::Emerging),
            EtfVariant::Emerging
        );
    }

    #[test]
    fn unlisted_preferences_fall_back_to_global_etf() {
        assert_eq!(
            resolve_etf(SectorPreference::Unlisted, GeographyPreference::Europe),
            EtfVariant::Global
        );
        assert_eq!(
            resolve_etf(SectorPreference::General, GeographyPreference::Unlisted),
            EtfVariant::Global
        );
    }

    #[test]
    fn medium_risk_holds_gold_and_sector_etf() {
        let allocation = select_allocation(
            2,
            SectorPreference::Technology,
            GeographyPreference::Global,
            Locale::Lt,
        )
        .expect("valid risk level");

        let classes: Vec<InstrumentClass> =
            allocation.instruments.iter().map(|i| i.class).collect();
        assert_eq!(
            classes,
            vec![
                InstrumentClass::GrowthStock,
                InstrumentClass::SectorEtf,
                InstrumentClass::CryptoEtf,
                InstrumentClass::Gold,
            ]
        );
        assert_eq!(
            allocation.instruments[1].return_range,
            ReturnRange::new(18.3, 18.8)
        );
        assert!(allocation.warning.is_some());
    }

    proptest! {
        #[test]
        fn prop_allocations_sum_to_one_hundred_percent(
            risk in 0u8..=MAX_RISK_TOLERANCE,
            sector in select(SECTORS.to_vec()),
            geography in select(GEOGRAPHIES.to_vec()),
        ) {
            for locale in [Locale::Lt, Locale::En] {
                let allocation = select_allocation(risk, sector, geography, locale).expect("valid");
                prop_assert!((allocation.total_percentage() - 100.0).abs() < 1e-9);
                prop_assert_eq!(allocation.warning.is_some(), risk >= 2);
                for instrument in &allocation.instruments {
                    prop_assert!(instrument.return_range.min <= instrument.return_range.max);
                }
            }
        }

        #[test]
        fn prop_selection_is_pure(
            risk in 0u8..=MAX_RISK_TOLERANCE,
            sector in select(SECTORS.to_vec()),
            geography in select(GEOGRAPHIES.to_vec()),
        ) {
            let first = select_allocation(risk, sector, geography, Locale::En).expect("valid");
            let second = select_allocation(risk, sector, geography, Locale::En).expect("valid");
            prop_assert_eq!(first, second);
        }
    }
}
