//! Display strings, keyed by locale. Nothing in here feeds a simulation
//! decision; the engine only copies these into its output records.

use super::types::{EtfVariant, Holding, Locale, ScenarioKind};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Label {
    pub name: &'static str,
    pub description: &'static str,
}

const fn label(name: &'static str, description: &'static str) -> Label {
    Label { name, description }
}

pub fn risk_level(level: u8, locale: Locale) -> &'static str {
    match (locale, level) {
        (Locale::Lt, 0) => "Minimali rizika",
        (Locale::Lt, 1) => "Maža rizika",
        (Locale::Lt, 2) => "Vidutinė rizika",
        (Locale::Lt, 3) => "Didesnė rizika",
        (Locale::Lt, 4) => "Didelė rizika",
        (Locale::Lt, _) => "Ultra rizika",
        (Locale::En, 0) => "Minimal risk",
        (Locale::En, 1) => "Low risk",
        (Locale::En, 2) => "Medium risk",
        (Locale::En, 3) => "Elevated risk",
        (Locale::En, 4) => "High risk",
        (Locale::En, _) => "Ultra risk",
    }
}

pub fn risk_warning(level: u8, locale: Locale) -> Option<&'static str> {
    let text = match (locale, level) {
        (_, 0 | 1) => return None,
        (Locale::Lt, 2) => "Vidutinė rizika gali būti per didelė pradedantiesiems investuotojams.",
        (Locale::Lt, 3) => {
            "Šis portfolio nėra rekomenduojamas pradedantiesiems investuotojams dėl padidėjusios rizikos."
        }
        (Locale::Lt, 4) => {
            "DIDELĖ RIZIKA: Šis portfolio yra labai spekuliatyvus ir gali sukelti didelius nuostolius. Rekomenduojamas tik patyrusiems investuotojams."
        }
        (Locale::Lt, _) => {
            "EKSTREMALI RIZIKA: Šis portfolio gali sukelti visiško kapitalo praradimą. Investuokite tik tuos pinigus, kuriuos galite prarasti."
        }
        (Locale::En, 2) => "Medium risk may be too much for beginner investors.",
        (Locale::En, 3) => {
            "This portfolio is not recommended for beginner investors due to increased risk."
        }
        (Locale::En, 4) => {
            "HIGH RISK: This portfolio is highly speculative and can lead to large losses. Recommended for experienced investors only."
        }
        (Locale::En, _) => {
            "EXTREME RISK: This portfolio can lose all of its capital. Only invest money you can afford to lose."
        }
    };
    Some(text)
}

pub fn etf(variant: EtfVariant, locale: Locale) -> Label {
    match locale {
        Locale::Lt => match variant {
            EtfVariant::Global => label(
                "VWCE ETF (Vanguard FTSE All-World)",
                "Pasaulio akcijų indeksas su daugiau nei 4000 įmonių (Apple, Microsoft, ASML, Samsung)",
            ),
            EtfVariant::Europe => label(
                "Europos rinkų ETF (pvz. VGK, EZU)",
                "Europos šalių akcijų indeksas (ASML, SAP, LVMH, Nestle)",
            ),
            EtfVariant::Emerging => label(
                "Besivystančių rinkų ETF (pvz. VWO, EEM)",
                "Besivystančių šalių akcijų indeksas (Taiwan Semi, Alibaba, Samsung, Tencent)",
            ),
            EtfVariant::Technology => label(
                "Technologijų ETF (pvz. VGT, XLK)",
                "Diversifikuotas technologijų sektorius ETF su daugiau nei 100 įmonių (Apple, Microsoft, Google)",
            ),
            EtfVariant::Healthcare => label(
                "Sveikatos sektorius ETF (pvz. VHT, XLV)",
                "Sveikatos sektorius ir biotechnologijų ETF (Johnson & Johnson, Pfizer, UnitedHealth)",
            ),
            EtfVariant::Energy => label(
                "Energetikos ETF (pvz. VDE, XLE)",
                "Atsinaujinančios energetikos ir energijos ETF (Exxon, Chevron, NextEra Energy)",
            ),
            EtfVariant::Automotive => label(
                "Automobilių ETF (pvz. CARZ, DRIV)",
                "Automobilių pramonės ir elektrinių automobilių ETF (Tesla, Ford, GM)",
            ),
            EtfVariant::RealEstate => label(
                "Nekilnojamojo turto ETF (pvz. VNQ, REIT)",
                "Nekilnojamojo turto investicinių fondų (REIT) ETF (diversifikuotas NT portfolio)",
            ),
        },
        Locale::En => match variant {
            EtfVariant::Global => label(
                "VWCE ETF (Vanguard FTSE All-World)",
                "World equity index with more than 4000 companies (Apple, Microsoft, ASML, Samsung)",
            ),
            EtfVariant::Europe => label(
                "European markets ETF (e.g. VGK, EZU)",
                "European equity index (ASML, SAP, LVMH, Nestle)",
            ),
            EtfVariant::Emerging => label(
                "Emerging markets ETF (e.g. VWO, EEM)",
                "Emerging economies equity index (Taiwan Semi, Alibaba, Samsung, Tencent)",
            ),
            EtfVariant::Technology => label(
                "Technology ETF (e.g. VGT, XLK)",
                "Diversified technology sector ETF with more than 100 companies (Apple, Microsoft, Google)",
            ),
            EtfVariant::Healthcare => label(
                "Healthcare ETF (e.g. VHT, XLV)",
                "Healthcare and biotechnology ETF (Johnson & Johnson, Pfizer, UnitedHealth)",
            ),
            EtfVariant::Energy => label(
                "Energy ETF (e.g. VDE, XLE)",
                "Renewable and traditional energy ETF (Exxon, Chevron, NextEra Energy)",
            ),
            EtfVariant::Automotive => label(
                "Automotive ETF (e.g. CARZ, DRIV)",
                "Automotive and electric vehicle ETF (Tesla, Ford, GM)",
            ),
            EtfVariant::RealEstate => label(
                "Real estate ETF (e.g. VNQ, REIT)",
                "Real estate investment trust (REIT) ETF (diversified property portfolio)",
            ),
        },
    }
}

/// Text for holdings outside the ETF slot; fund text comes from [`etf`].
pub fn holding(holding: Holding, locale: Locale) -> Label {
    match (locale, holding) {
        (Locale::Lt, Holding::GrowthStock) => label(
            "Augimo akcijos",
            "Didelio potencialo įmonių akcijos (pvz. Apple, Microsoft, Tesla, Google)",
        ),
        (Locale::Lt, Holding::CryptoEtf) => label(
            "Kriptovaliutų ETF",
            "Diversifikuotas kriptovaliutų fondas (pvz. BITO, ETHE)",
        ),
        (Locale::Lt, Holding::Crypto) => label(
            "Kriptovaliutos",
            "Tiesioginės kriptovaliutų investicijos (Bitcoin, Ethereum, Solana)",
        ),
        (Locale::Lt, Holding::Gold) => label(
            "Auksas",
            "Fizinis auksas arba aukso ETF (pvz. GLD, IAU) kaip infliacijos apsauga",
        ),
        (Locale::Lt, Holding::Options) => label(
            "Opcionai",
            "Akcijų opcionai didelio potencialo pelno gavimui (SPY, QQQ opcionai)",
        ),
        (Locale::Lt, Holding::Leveraged) => label(
            "Leveraged produktai",
            "Finansiniais svertais pagrįsti investavimo produktai (pvz. TQQQ, UPRO)",
        ),
        (Locale::Lt, Holding::Moonshot) => label(
            "Moonshot aktyvai",
            "Itin spekuliatyvūs aktyvai (penny stocks, meme coins, SPAC)",
        ),
        (Locale::En, Holding::GrowthStock) => label(
            "Growth stocks",
            "High-potential company shares (e.g. Apple, Microsoft, Tesla, Google)",
        ),
        (Locale::En, Holding::CryptoEtf) => label(
            "Crypto ETF",
            "Diversified cryptocurrency fund (e.g. BITO, ETHE)",
        ),
        (Locale::En, Holding::Crypto) => label(
            "Cryptocurrencies",
            "Direct cryptocurrency holdings (Bitcoin, Ethereum, Solana)",
        ),
        (Locale::En, Holding::Gold) => label(
            "Gold",
            "Physical gold or gold ETF (e.g. GLD, IAU) as an inflation hedge",
        ),
        (Locale::En, Holding::Options) => label(
            "Options",
            "Equity options for high-upside positions (SPY, QQQ options)",
        ),
        (Locale::En, Holding::Leveraged) => label(
            "Leveraged products",
            "Leverage-based investment products (e.g. TQQQ, UPRO)",
        ),
        (Locale::En, Holding::Moonshot) => label(
            "Moonshot assets",
            "Highly speculative assets (penny stocks, meme coins, SPAC)",
        ),
    }
}

pub fn scenario(kind: ScenarioKind, locale: Locale) -> Label {
    match (locale, kind) {
        (Locale::Lt, ScenarioKind::StopAfter1) => {
            label("Sustabdyti po 1 metų", "Daugiau nebeįmokėti po 1 metų")
        }
        (Locale::Lt, ScenarioKind::StopAfter3) => {
            label("Sustabdyti po 3 metų", "Daugiau nebeįmokėti po 3 metų")
        }
        (Locale::Lt, ScenarioKind::StopAfter10) => {
            label("Sustabdyti po 10 metų", "Daugiau nebeįmokėti po 10 metų")
        }
        (Locale::Lt, ScenarioKind::Baseline) => label("Dabartinis planas", "Tęsti kaip suplanuota"),
        (Locale::Lt, ScenarioKind::Double) => {
            label("Dvigubos įmokos", "Dvigubinti mėnesines įmokas")
        }
        (Locale::En, ScenarioKind::StopAfter1) => {
            label("Stop after 1 year", "No more contributions after year 1")
        }
        (Locale::En, ScenarioKind::StopAfter3) => {
            label("Stop after 3 years", "No more contributions after year 3")
        }
        (Locale::En, ScenarioKind::StopAfter10) => {
            label("Stop after 10 years", "No more contributions after year 10")
        }
        (Locale::En, ScenarioKind::Baseline) => label("Current plan", "Continue as planned"),
        (Locale::En, ScenarioKind::Double) => {
            label("Double contributions", "Double monthly contributions")
        }
    }
}
