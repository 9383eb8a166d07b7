// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rotables Kit Engine - Round Wire Protocol
//
// Request/response bodies exchanged with the round-submission service once
// per simulated hour. Field names follow the service's camelCase JSON.

use serde::{Deserialize, Serialize};

use crate::types::{AirportCode, FlightEvent, FlightId, FlightLoad, PerClass, Tick};

// ─── DayHour ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHour {
    #[serde(default)]
    pub day: u32,
    #[serde(default)]
    pub hour: u32,
}

impl From<DayHour> for Tick {
    fn from(dh: DayHour) -> Tick {
        Tick::new(dh.day, dh.hour)
    }
}

impl From<Tick> for DayHour {
    fn from(t: Tick) -> DayHour {
        DayHour { day: t.day(), hour: t.hour() }
    }
}

// ─── Outbound ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRequest {
    pub day: u32,
    pub hour: u32,
    pub flight_loads: Vec<FlightLoad>,
    pub kit_purchasing_orders: PerClass<u32>,
}

impl RoundRequest {
    pub fn new(tick: Tick, flight_loads: Vec<FlightLoad>, orders: PerClass<u32>) -> Self {
        Self {
            day: tick.day(),
            hour: tick.hour(),
            flight_loads,
            kit_purchasing_orders: orders,
        }
    }

    pub fn tick(&self) -> Tick {
        Tick::new(self.day, self.hour)
    }
}

// ─── Inbound ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightEventKind {
    /// Flight announced, passenger counts are early estimates.
    Scheduled,
    /// Passenger counts refined close to departure.
    CheckedIn,
    /// Flight is down; carries the actual arrival.
    Landed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightUpdate {
    pub event_type: FlightEventKind,
    pub flight_id: FlightId,
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub origin_airport: String,
    #[serde(default)]
    pub destination_airport: String,
    #[serde(default)]
    pub aircraft_type: String,
    #[serde(default)]
    pub departure: DayHour,
    #[serde(default)]
    pub arrival: DayHour,
    #[serde(default)]
    pub passengers: PerClass<u32>,
}

impl FlightUpdate {
    pub fn to_event(&self) -> FlightEvent {
        FlightEvent {
            id: self.flight_id.clone(),
            origin: AirportCode(self.origin_airport.clone()),
            destination: AirportCode(self.destination_airport.clone()),
            departure: self.departure.into(),
            arrival: self.arrival.into(),
            passengers: self.passengers,
            aircraft_type: self.aircraft_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Penalty {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub flight_id: Option<FlightId>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub penalty: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResponse {
    #[serde(default)]
    pub flight_updates: Vec<FlightUpdate>,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub penalties: Vec<Penalty>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let req = RoundRequest::new(
            Tick::new(2, 5),
            vec![FlightLoad {
                flight_id: "f-1".into(),
                loaded_kits: PerClass::new(1, 2, 3, 4),
            }],
            PerClass::new(0, 0, 0, 10),
        );
        let v: serde_json::Value = serde_json::to_value(&req).unwrap();
        assert_eq!(v["day"], 2);
        assert_eq!(v["hour"], 5);
        assert_eq!(v["flightLoads"][0]["flightId"], "f-1");
        assert_eq!(v["flightLoads"][0]["loadedKits"]["premiumEconomy"], 3);
        assert_eq!(v["kitPurchasingOrders"]["economy"], 10);
    }

    #[test]
    fn test_response_tolerates_partial_records() {
        let json = r#"{
            "flightUpdates": [
                { "eventType": "CHECKED_IN", "flightId": "f-9",
                  "originAirport": "HUB1", "destinationAirport": "OUT1",
                  "aircraftType": "A320",
                  "departure": { "day": 1, "hour": 4 },
                  "arrival": { "day": 1, "hour": 30 },
                  "passengers": { "economy": 140 } },
                { "eventType": "DIVERTED", "flightId": "f-10" }
            ],
            "totalCost": 1250.5
        }"#;
        let resp: RoundResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.flight_updates.len(), 2);
        let ev = resp.flight_updates[0].to_event();
        assert_eq!(ev.departure, Tick::new(1, 4));
        assert_eq!(ev.arrival, Tick::new(2, 6));
        assert_eq!(ev.passengers, PerClass::new(0, 0, 0, 140));
        assert_eq!(resp.flight_updates[1].event_type, FlightEventKind::Unknown);
        assert!(resp.penalties.is_empty());
    }
}
