//! Domain models for the energy explorer.
//!
//! This module contains the explicit schema of the dataset:
//!
//! - [`Observation`] - One (entity, year) row with typed indicator values
//! - [`Metric`] - Every numeric indicator column, with header and description
//! - [`Field`] - Any addressable column (identifiers plus metrics)
//! - [`Table`] / [`Cell`] - Derived tables handed to renderers

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;
use crate::parser::parse_number;

mod table;

pub use table::{Cell, Column, Table};

/// Header of the entity column.
pub const ENTITY_HEADER: &str = "Entity";

/// Header of the year column.
pub const YEAR_HEADER: &str = "Year";

// =============================================================================
// Metric
// =============================================================================

/// A numeric indicator column of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    AccessToElectricity,
    CleanCookingFuels,
    RenewableCapacityPerCapita,
    FinancialFlows,
    RenewableShare,
    ElectricityFossil,
    ElectricityNuclear,
    ElectricityRenewables,
    LowCarbonElectricity,
    PrimaryEnergyPerCapita,
    EnergyIntensity,
    Co2Emissions,
    RenewablesPrimary,
    GdpGrowth,
    GdpPerCapita,
    Density,
    LandArea,
    Latitude,
    Longitude,
    Population,
}

impl Metric {
    /// All metrics in file column order.
    pub const ALL: [Metric; 20] = [
        Metric::AccessToElectricity,
        Metric::CleanCookingFuels,
        Metric::RenewableCapacityPerCapita,
        Metric::FinancialFlows,
        Metric::RenewableShare,
        Metric::ElectricityFossil,
        Metric::ElectricityNuclear,
        Metric::ElectricityRenewables,
        Metric::LowCarbonElectricity,
        Metric::PrimaryEnergyPerCapita,
        Metric::EnergyIntensity,
        Metric::Co2Emissions,
        Metric::RenewablesPrimary,
        Metric::GdpGrowth,
        Metric::GdpPerCapita,
        Metric::Density,
        Metric::LandArea,
        Metric::Latitude,
        Metric::Longitude,
        Metric::Population,
    ];

    /// Column header in the input file.
    pub fn header(self) -> &'static str {
        match self {
            Metric::AccessToElectricity => "Access to electricity (% of population)",
            Metric::CleanCookingFuels => "Access to clean fuels for cooking",
            Metric::RenewableCapacityPerCapita => {
                "Renewable-electricity-generating-capacity-per-capita"
            }
            Metric::FinancialFlows => "Financial flows to developing countries (US $)",
            Metric::RenewableShare => {
                "Renewable energy share in the total final energy consumption (%)"
            }
            Metric::ElectricityFossil => "Electricity from fossil fuels (TWh)",
            Metric::ElectricityNuclear => "Electricity from nuclear (TWh)",
            Metric::ElectricityRenewables => "Electricity from renewables (TWh)",
            Metric::LowCarbonElectricity => "Low-carbon electricity (% electricity)",
            Metric::PrimaryEnergyPerCapita => "Primary energy consumption per capita (kWh/person)",
            Metric::EnergyIntensity => "Energy intensity level of primary energy (MJ/$2011 PPP GDP)",
            Metric::Co2Emissions => "Value_co2_emissions_kt_by_country",
            Metric::RenewablesPrimary => "Renewables (% equivalent primary energy)",
            Metric::GdpGrowth => "gdp_growth",
            Metric::GdpPerCapita => "gdp_per_capita",
            Metric::Density => "Density",
            Metric::LandArea => "Land Area(Km2)",
            Metric::Latitude => "Latitude",
            Metric::Longitude => "Longitude",
            Metric::Population => "Population",
        }
    }

    /// Alternative headers found in other exports of the same dataset.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Metric::CleanCookingFuels => &["Access to clean fuels for cooking (% of population)"],
            Metric::Density => &["Density\n(P/Km2)", "Density (P/Km2)"],
            _ => &[],
        }
    }

    /// Stable snake_case key used by the API and CLI.
    pub fn key(self) -> &'static str {
        match self {
            Metric::AccessToElectricity => "access_to_electricity",
            Metric::CleanCookingFuels => "clean_cooking_fuels",
            Metric::RenewableCapacityPerCapita => "renewable_capacity_per_capita",
            Metric::FinancialFlows => "financial_flows",
            Metric::RenewableShare => "renewable_share",
            Metric::ElectricityFossil => "electricity_fossil",
            Metric::ElectricityNuclear => "electricity_nuclear",
            Metric::ElectricityRenewables => "electricity_renewables",
            Metric::LowCarbonElectricity => "low_carbon_electricity",
            Metric::PrimaryEnergyPerCapita => "primary_energy_per_capita",
            Metric::EnergyIntensity => "energy_intensity",
            Metric::Co2Emissions => "co2_emissions",
            Metric::RenewablesPrimary => "renewables_primary",
            Metric::GdpGrowth => "gdp_growth",
            Metric::GdpPerCapita => "gdp_per_capita",
            Metric::Density => "density",
            Metric::LandArea => "land_area",
            Metric::Latitude => "latitude",
            Metric::Longitude => "longitude",
            Metric::Population => "population",
        }
    }

    /// Short axis label for charts.
    pub fn label(self) -> &'static str {
        match self {
            Metric::AccessToElectricity => "Access to electricity (%)",
            Metric::CleanCookingFuels => "Clean cooking fuels (%)",
            Metric::RenewableCapacityPerCapita => "Renewable capacity per capita",
            Metric::FinancialFlows => "Financial flows (US $)",
            Metric::RenewableShare => "Renewable share (%)",
            Metric::ElectricityFossil => "Fossil electricity (TWh)",
            Metric::ElectricityNuclear => "Nuclear electricity (TWh)",
            Metric::ElectricityRenewables => "Renewable electricity (TWh)",
            Metric::LowCarbonElectricity => "Low-carbon electricity (%)",
            Metric::PrimaryEnergyPerCapita => "Primary energy per capita (kWh)",
            Metric::EnergyIntensity => "Energy intensity (MJ/$)",
            Metric::Co2Emissions => "CO2 emissions (kt)",
            Metric::RenewablesPrimary => "Renewables (% primary energy)",
            Metric::GdpGrowth => "GDP growth (%)",
            Metric::GdpPerCapita => "GDP per capita ($)",
            Metric::Density => "Density (P/Km2)",
            Metric::LandArea => "Land area (Km2)",
            Metric::Latitude => "Latitude",
            Metric::Longitude => "Longitude",
            Metric::Population => "Population",
        }
    }

    /// Glossary text shown on the features page.
    pub fn description(self) -> &'static str {
        match self {
            Metric::AccessToElectricity => {
                "Share of the population with access to electricity."
            }
            Metric::CleanCookingFuels => {
                "Share of the population using clean fuels for cooking; relevant to public health and energy access."
            }
            Metric::RenewableCapacityPerCapita => {
                "Installed renewable generating capacity per person."
            }
            Metric::FinancialFlows => {
                "Aid from developed countries for clean energy projects in developing countries."
            }
            Metric::RenewableShare => {
                "Proportion of total final energy consumption coming from renewable sources."
            }
            Metric::ElectricityFossil => "Electricity generated from fossil fuels.",
            Metric::ElectricityNuclear => "Electricity generated from nuclear power.",
            Metric::ElectricityRenewables => "Electricity generated from renewable sources.",
            Metric::LowCarbonElectricity => {
                "Share of electricity generated from low-carbon sources (nuclear plus renewables)."
            }
            Metric::PrimaryEnergyPerCapita => "Primary energy consumed per person.",
            Metric::EnergyIntensity => {
                "Energy used per unit of GDP; an indicator of energy efficiency."
            }
            Metric::Co2Emissions => "Carbon dioxide emissions of the country in kilotons.",
            Metric::RenewablesPrimary => "Share of primary energy derived from renewable sources.",
            Metric::GdpGrowth => "Annual growth rate of GDP.",
            Metric::GdpPerCapita => "Economic output per person.",
            Metric::Density => "Population density in people per square kilometre.",
            Metric::LandArea => "Total land area in square kilometres.",
            Metric::Latitude => "Latitude of the country centroid.",
            Metric::Longitude => "Longitude of the country centroid.",
            Metric::Population => "Population, estimated as density times land area where missing.",
        }
    }

    /// Whether the dataset must carry this column.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            Metric::AccessToElectricity
                | Metric::RenewableShare
                | Metric::LowCarbonElectricity
                | Metric::PrimaryEnergyPerCapita
                | Metric::Co2Emissions
                | Metric::GdpPerCapita
                | Metric::Density
                | Metric::LandArea
                | Metric::Latitude
                | Metric::Longitude
                | Metric::Population
        )
    }

    /// Read this metric from an observation.
    pub fn value(self, obs: &Observation) -> Option<f64> {
        *self.slot(obs)
    }

    fn slot(self, obs: &Observation) -> &Option<f64> {
        match self {
            Metric::AccessToElectricity => &obs.access_to_electricity,
            Metric::CleanCookingFuels => &obs.clean_cooking_fuels,
            Metric::RenewableCapacityPerCapita => &obs.renewable_capacity_per_capita,
            Metric::FinancialFlows => &obs.financial_flows,
            Metric::RenewableShare => &obs.renewable_share,
            Metric::ElectricityFossil => &obs.electricity_fossil,
            Metric::ElectricityNuclear => &obs.electricity_nuclear,
            Metric::ElectricityRenewables => &obs.electricity_renewables,
            Metric::LowCarbonElectricity => &obs.low_carbon_electricity,
            Metric::PrimaryEnergyPerCapita => &obs.primary_energy_per_capita,
            Metric::EnergyIntensity => &obs.energy_intensity,
            Metric::Co2Emissions => &obs.co2_emissions,
            Metric::RenewablesPrimary => &obs.renewables_primary,
            Metric::GdpGrowth => &obs.gdp_growth,
            Metric::GdpPerCapita => &obs.gdp_per_capita,
            Metric::Density => &obs.density,
            Metric::LandArea => &obs.land_area,
            Metric::Latitude => &obs.latitude,
            Metric::Longitude => &obs.longitude,
            Metric::Population => &obs.population,
        }
    }

    fn slot_mut(self, obs: &mut Observation) -> &mut Option<f64> {
        match self {
            Metric::AccessToElectricity => &mut obs.access_to_electricity,
            Metric::CleanCookingFuels => &mut obs.clean_cooking_fuels,
            Metric::RenewableCapacityPerCapita => &mut obs.renewable_capacity_per_capita,
            Metric::FinancialFlows => &mut obs.financial_flows,
            Metric::RenewableShare => &mut obs.renewable_share,
            Metric::ElectricityFossil => &mut obs.electricity_fossil,
            Metric::ElectricityNuclear => &mut obs.electricity_nuclear,
            Metric::ElectricityRenewables => &mut obs.electricity_renewables,
            Metric::LowCarbonElectricity => &mut obs.low_carbon_electricity,
            Metric::PrimaryEnergyPerCapita => &mut obs.primary_energy_per_capita,
            Metric::EnergyIntensity => &mut obs.energy_intensity,
            Metric::Co2Emissions => &mut obs.co2_emissions,
            Metric::RenewablesPrimary => &mut obs.renewables_primary,
            Metric::GdpGrowth => &mut obs.gdp_growth,
            Metric::GdpPerCapita => &mut obs.gdp_per_capita,
            Metric::Density => &mut obs.density,
            Metric::LandArea => &mut obs.land_area,
            Metric::Latitude => &mut obs.latitude,
            Metric::Longitude => &mut obs.longitude,
            Metric::Population => &mut obs.population,
        }
    }

    /// Whether `header` names this metric (canonical header or alias).
    pub fn matches_header(self, header: &str) -> bool {
        let header = header.trim();
        self.header() == header || self.aliases().iter().any(|a| *a == header)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = QueryError;

    /// Accepts the snake_case key or the file header (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| {
                m.key().eq_ignore_ascii_case(wanted)
                    || m.header().eq_ignore_ascii_case(wanted)
                    || m.aliases().iter().any(|a| a.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| QueryError::UnknownField(wanted.to_string()))
    }
}

// =============================================================================
// Field
// =============================================================================

/// Any addressable column: the two identifiers or a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Field {
    Entity,
    Year,
    Metric(Metric),
}

impl Field {
    /// Key used in tables and over the wire.
    pub fn key(self) -> &'static str {
        match self {
            Field::Entity => "entity",
            Field::Year => "year",
            Field::Metric(m) => m.key(),
        }
    }

    /// Column header in the input file.
    pub fn header(self) -> &'static str {
        match self {
            Field::Entity => ENTITY_HEADER,
            Field::Year => YEAR_HEADER,
            Field::Metric(m) => m.header(),
        }
    }

    /// Display label for charts and tables.
    pub fn label(self) -> &'static str {
        match self {
            Field::Entity => "Country",
            Field::Year => "Year",
            Field::Metric(m) => m.label(),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Field::Entity => "Name of the country or region.",
            Field::Year => "Year of the observation (2000-2020).",
            Field::Metric(m) => m.description(),
        }
    }

    pub fn is_required(self) -> bool {
        match self {
            Field::Entity | Field::Year => true,
            Field::Metric(m) => m.is_required(),
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Field::Entity)
    }

    /// Fail with [`QueryError::NotNumeric`] for text fields.
    pub fn require_numeric(self) -> Result<Self, QueryError> {
        if self.is_numeric() {
            Ok(self)
        } else {
            Err(QueryError::NotNumeric(self.key().to_string()))
        }
    }

    /// Numeric value of this field, `None` when missing or non-numeric.
    pub fn numeric_value(self, obs: &Observation) -> Option<f64> {
        match self {
            Field::Entity => None,
            Field::Year => Some(f64::from(obs.year)),
            Field::Metric(m) => m.value(obs),
        }
    }

    /// Typed table cell for this field.
    pub fn cell(self, obs: &Observation) -> Cell {
        match self {
            Field::Entity => Cell::Text(obs.entity.clone()),
            Field::Year => Cell::Int(i64::from(obs.year)),
            Field::Metric(m) => Cell::Number(m.value(obs)),
        }
    }

    /// Every field in file column order.
    pub fn all() -> Vec<Field> {
        let mut fields = vec![Field::Entity, Field::Year];
        fields.extend(Metric::ALL.into_iter().map(Field::Metric));
        fields
    }
}

impl From<Metric> for Field {
    fn from(m: Metric) -> Self {
        Field::Metric(m)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("entity") {
            Ok(Field::Entity)
        } else if wanted.eq_ignore_ascii_case("year") {
            Ok(Field::Year)
        } else {
            wanted.parse::<Metric>().map(Field::Metric)
        }
    }
}

impl TryFrom<String> for Field {
    type Error = QueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        field.key().to_string()
    }
}

// =============================================================================
// Observation
// =============================================================================

/// One row of the dataset: an entity observed in a given year.
///
/// Headers are mapped by serde; every indicator is optional because the
/// source data has gaps. Non-numeric text in an indicator column is a
/// decoding error, never a silent `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Observation {
    #[serde(rename = "Entity")]
    pub entity: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Access to electricity (% of population)", default, deserialize_with = "numeric")]
    pub access_to_electricity: Option<f64>,
    #[serde(
        rename = "Access to clean fuels for cooking",
        alias = "Access to clean fuels for cooking (% of population)",
        default,
        deserialize_with = "numeric"
    )]
    pub clean_cooking_fuels: Option<f64>,
    #[serde(rename = "Renewable-electricity-generating-capacity-per-capita", default, deserialize_with = "numeric")]
    pub renewable_capacity_per_capita: Option<f64>,
    #[serde(rename = "Financial flows to developing countries (US $)", default, deserialize_with = "numeric")]
    pub financial_flows: Option<f64>,
    #[serde(
        rename = "Renewable energy share in the total final energy consumption (%)",
        default,
        deserialize_with = "numeric"
    )]
    pub renewable_share: Option<f64>,
    #[serde(rename = "Electricity from fossil fuels (TWh)", default, deserialize_with = "numeric")]
    pub electricity_fossil: Option<f64>,
    #[serde(rename = "Electricity from nuclear (TWh)", default, deserialize_with = "numeric")]
    pub electricity_nuclear: Option<f64>,
    #[serde(rename = "Electricity from renewables (TWh)", default, deserialize_with = "numeric")]
    pub electricity_renewables: Option<f64>,
    #[serde(rename = "Low-carbon electricity (% electricity)", default, deserialize_with = "numeric")]
    pub low_carbon_electricity: Option<f64>,
    #[serde(rename = "Primary energy consumption per capita (kWh/person)", default, deserialize_with = "numeric")]
    pub primary_energy_per_capita: Option<f64>,
    #[serde(
        rename = "Energy intensity level of primary energy (MJ/$2011 PPP GDP)",
        default,
        deserialize_with = "numeric"
    )]
    pub energy_intensity: Option<f64>,
    #[serde(rename = "Value_co2_emissions_kt_by_country", default, deserialize_with = "numeric")]
    pub co2_emissions: Option<f64>,
    #[serde(rename = "Renewables (% equivalent primary energy)", default, deserialize_with = "numeric")]
    pub renewables_primary: Option<f64>,
    #[serde(rename = "gdp_growth", default, deserialize_with = "numeric")]
    pub gdp_growth: Option<f64>,
    #[serde(rename = "gdp_per_capita", default, deserialize_with = "numeric")]
    pub gdp_per_capita: Option<f64>,
    #[serde(
        rename = "Density",
        alias = "Density\n(P/Km2)",
        alias = "Density (P/Km2)",
        default,
        deserialize_with = "numeric"
    )]
    pub density: Option<f64>,
    #[serde(rename = "Land Area(Km2)", default, deserialize_with = "numeric")]
    pub land_area: Option<f64>,
    #[serde(rename = "Latitude", default, deserialize_with = "numeric")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", default, deserialize_with = "numeric")]
    pub longitude: Option<f64>,
    #[serde(rename = "Population", default, deserialize_with = "numeric")]
    pub population: Option<f64>,
}

impl Observation {
    /// Observation with every indicator missing.
    pub fn new(entity: impl Into<String>, year: i32) -> Self {
        Self {
            entity: entity.into(),
            year,
            access_to_electricity: None,
            clean_cooking_fuels: None,
            renewable_capacity_per_capita: None,
            financial_flows: None,
            renewable_share: None,
            electricity_fossil: None,
            electricity_nuclear: None,
            electricity_renewables: None,
            low_carbon_electricity: None,
            primary_energy_per_capita: None,
            energy_intensity: None,
            co2_emissions: None,
            renewables_primary: None,
            gdp_growth: None,
            gdp_per_capita: None,
            density: None,
            land_area: None,
            latitude: None,
            longitude: None,
            population: None,
        }
    }

    /// Builder-style setter for one metric.
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        *metric.slot_mut(&mut self) = Some(value);
        self
    }
}

/// Deserialize an optional number, accepting digit grouping and `NaN` markers.
fn numeric<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_number(&s).map_err(serde::de::Error::custom),
    }
}
