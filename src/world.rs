// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rotables Kit Engine - World Reference
//
// Immutable per-run facts: airport processing times, capacities and seed
// stock, and aircraft kit capacities. Loaded once, never mutated.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::types::{AirportCode, PerClass, ServiceClass};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("failed to read world file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed world data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate airport code {0}")]
    DuplicateAirport(AirportCode),

    #[error("duplicate aircraft type {0}")]
    DuplicateAircraft(String),

    #[error("hub airport {0} is not part of the network")]
    MissingHub(AirportCode),
}

// ---------------------------------------------------------------------------
// Static entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub code: AirportCode,
    /// Hours needed to turn a used kit around after landing.
    pub processing_time: PerClass<u32>,
    pub capacity: PerClass<u32>,
    /// Initial ledger seed.
    #[serde(default)]
    pub stock: PerClass<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AircraftType {
    pub type_code: String,
    pub kit_capacity: PerClass<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorldFile {
    airports: Vec<Airport>,
    aircraft_types: Vec<AircraftType>,
}

// ---------------------------------------------------------------------------
// WorldReference
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct WorldReference {
    airports: HashMap<AirportCode, Airport>,
    aircraft: HashMap<String, AircraftType>,
}

impl WorldReference {
    pub fn new(airports: Vec<Airport>, aircraft: Vec<AircraftType>) -> Result<Self, WorldError> {
        let mut world = Self::default();
        for airport in airports {
            if world.airports.contains_key(&airport.code) {
                return Err(WorldError::DuplicateAirport(airport.code));
            }
            world.airports.insert(airport.code.clone(), airport);
        }
        for ac in aircraft {
            if world.aircraft.contains_key(&ac.type_code) {
                return Err(WorldError::DuplicateAircraft(ac.type_code));
            }
            world.aircraft.insert(ac.type_code.clone(), ac);
        }
        Ok(world)
    }

    /// Parse `{ "airports": [...], "aircraftTypes": [...] }`.
    pub fn from_json_str(json: &str) -> Result<Self, WorldError> {
        let file: WorldFile = serde_json::from_str(json)?;
        Self::new(file.airports, file.aircraft_types)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Fails unless `hub` is a known airport.
    pub fn require_hub(&self, hub: &AirportCode) -> Result<(), WorldError> {
        if self.airports.contains_key(hub) {
            Ok(())
        } else {
            Err(WorldError::MissingHub(hub.clone()))
        }
    }

    pub fn airport(&self, code: &AirportCode) -> Option<&Airport> {
        self.airports.get(code)
    }

    pub fn aircraft(&self, type_code: &str) -> Option<&AircraftType> {
        self.aircraft.get(type_code)
    }

    pub fn airports(&self) -> impl Iterator<Item = &Airport> {
        self.airports.values()
    }

    pub fn processing_time(&self, code: &AirportCode, class: ServiceClass) -> Option<u32> {
        self.airports.get(code).map(|a| a.processing_time[class])
    }

    pub fn capacity(&self, code: &AirportCode, class: ServiceClass) -> Option<u32> {
        self.airports.get(code).map(|a| a.capacity[class])
    }
}
