// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rotables Kit Engine - Type Definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Index, IndexMut};
use std::str::FromStr;

pub const HOURS_PER_DAY: u32 = 24;

// ─── Service Class ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceClass {
    First = 0,
    Business = 1,
    PremiumEconomy = 2,
    Economy = 3,
}

impl ServiceClass {
    /// Priority order: scarce high-value kits first.
    pub const ALL: [ServiceClass; 4] = [
        Self::First,
        Self::Business,
        Self::PremiumEconomy,
        Self::Economy,
    ];

    /// The class whose late purchases are cut off earliest.
    pub const LOWEST_VALUE: ServiceClass = Self::Economy;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "FIRST",
            Self::Business => "BUSINESS",
            Self::PremiumEconomy => "PREMIUM_ECONOMY",
            Self::Economy => "ECONOMY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown service class {0:?}")]
pub struct UnknownClass(pub String);

impl FromStr for ServiceClass {
    type Err = UnknownClass;

    /// Accepts the wire spelling (`FIRST`) and the JSON key (`premiumEconomy`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FIRST" | "first" => Ok(Self::First),
            "BUSINESS" | "business" => Ok(Self::Business),
            "PREMIUM_ECONOMY" | "premiumEconomy" => Ok(Self::PremiumEconomy),
            "ECONOMY" | "economy" => Ok(Self::Economy),
            other => Err(UnknownClass(other.to_string())),
        }
    }
}

impl fmt::Display for ServiceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── PerClass ────────────────────────────────────────────────────────────────

/// One value per service class. Wire keys match the round API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerClass<T> {
    #[serde(default)]
    pub first: T,
    #[serde(default)]
    pub business: T,
    #[serde(default)]
    pub premium_economy: T,
    #[serde(default)]
    pub economy: T,
}

impl<T> PerClass<T> {
    pub fn new(first: T, business: T, premium_economy: T, economy: T) -> Self {
        Self { first, business, premium_economy, economy }
    }

    pub fn from_fn(mut f: impl FnMut(ServiceClass) -> T) -> Self {
        Self {
            first: f(ServiceClass::First),
            business: f(ServiceClass::Business),
            premium_economy: f(ServiceClass::PremiumEconomy),
            economy: f(ServiceClass::Economy),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(ServiceClass, &T) -> U) -> PerClass<U> {
        PerClass::from_fn(|class| f(class, &self[class]))
    }

    /// Iterate in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (ServiceClass, &T)> {
        ServiceClass::ALL.into_iter().map(move |class| (class, &self[class]))
    }
}

impl<T: Copy> PerClass<T> {
    pub fn splat(value: T) -> Self {
        Self::new(value, value, value, value)
    }
}

impl PerClass<u32> {
    pub fn total(&self) -> u64 {
        self.iter().map(|(_, &v)| v as u64).sum()
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, &v)| v == 0)
    }
}

impl<T> Index<ServiceClass> for PerClass<T> {
    type Output = T;
    fn index(&self, class: ServiceClass) -> &T {
        match class {
            ServiceClass::First => &self.first,
            ServiceClass::Business => &self.business,
            ServiceClass::PremiumEconomy => &self.premium_economy,
            ServiceClass::Economy => &self.economy,
        }
    }
}

impl<T> IndexMut<ServiceClass> for PerClass<T> {
    fn index_mut(&mut self, class: ServiceClass) -> &mut T {
        match class {
            ServiceClass::First => &mut self.first,
            ServiceClass::Business => &mut self.business,
            ServiceClass::PremiumEconomy => &mut self.premium_economy,
            ServiceClass::Economy => &mut self.economy,
        }
    }
}

// ─── Tick ────────────────────────────────────────────────────────────────────

/// One simulated hour, stored as absolute hours since day 0 hour 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tick(u32);

impl Tick {
    /// Build from a (day, hour) pair; an hour past 23 rolls into later days.
    /// Out-of-range input saturates at the last representable hour.
    pub fn new(day: u32, hour: u32) -> Self {
        Self(day.saturating_mul(HOURS_PER_DAY).saturating_add(hour))
    }

    pub fn from_absolute(hours: u32) -> Self {
        Self(hours)
    }

    pub fn absolute(&self) -> u32 {
        self.0
    }

    pub fn day(&self) -> u32 {
        self.0 / HOURS_PER_DAY
    }

    pub fn hour(&self) -> u32 {
        self.0 % HOURS_PER_DAY
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Hours from `self` until `later`, zero if `later` is not after `self`.
    pub fn hours_until(&self, later: Tick) -> u32 {
        later.0.saturating_sub(self.0)
    }
}

impl Add<u32> for Tick {
    type Output = Tick;
    fn add(self, hours: u32) -> Tick {
        Tick(self.0.saturating_add(hours))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}:{:02}", self.day(), self.hour())
    }
}

// ─── Identifiers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightId(pub String);

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FlightId {
    fn from(s: &str) -> Self { FlightId(s.to_string()) }
}

impl From<String> for FlightId {
    fn from(s: String) -> Self { FlightId(s) }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AirportCode(pub String);

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AirportCode {
    fn from(s: &str) -> Self { AirportCode(s.to_string()) }
}

impl From<String> for AirportCode {
    fn from(s: String) -> Self { AirportCode(s) }
}

// ─── FlightEvent ─────────────────────────────────────────────────────────────

/// Latest known state of one flight, superseded by every newer event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightEvent {
    pub id: FlightId,
    pub origin: AirportCode,
    pub destination: AirportCode,
    pub departure: Tick,
    pub arrival: Tick,
    pub passengers: PerClass<u32>,
    pub aircraft_type: String,
}

// ─── Decisions ───────────────────────────────────────────────────────────────

/// Kits loaded on one departing flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightLoad {
    pub flight_id: FlightId,
    pub loaded_kits: PerClass<u32>,
}

impl FlightLoad {
    pub fn empty(flight_id: FlightId) -> Self {
        Self { flight_id, loaded_kits: PerClass::default() }
    }
}

/// Everything the engine decided for a single tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickDecision {
    pub tick: Tick,
    pub loads: Vec<FlightLoad>,
    pub purchases: PerClass<u32>,
}

// ─── EngineStats ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub ticks_played: u32,
    pub flights_allocated: u32,
    pub unknown_aircraft: u32,
    pub jobs_released: u64,
    pub kits_loaded: PerClass<u64>,
    pub kits_purchased: PerClass<u64>,
}
