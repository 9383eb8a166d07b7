// Scenario Definitions — synthetic hub-and-spoke networks
// Each scenario fixes the network shape; the seed varies schedule, block times and passengers

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub days: u32,
    pub outstations: u32,
    pub rotations_per_day: u32,
    /// Mean booked share of seats.
    pub load_factor: f64,
    /// Probability that a flight lands late.
    pub delay_prob: f64,
    pub max_delay_hours: u32,
    /// Initial hub stock as a share of hub capacity.
    pub hub_stock_share: f64,
    /// Economy kit capacity at each outstation; other classes scale from it.
    pub outstation_capacity: u32,
    pub criteria: PassCriteria,
}

pub struct PassCriteria {
    pub max_negative_stock_events: u32,
    pub max_overloads: u32,
    pub min_service_rate: f64,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            max_negative_stock_events: 0,
            max_overloads: 0,
            min_service_rate: 0.90,
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "BASELINE",
            label: "Baseline 6-spoke network",
            days: 10,
            outstations: 6,
            rotations_per_day: 2,
            load_factor: 0.80,
            delay_prob: 0.0,
            max_delay_hours: 0,
            hub_stock_share: 0.5,
            outstation_capacity: 600,
            criteria: PassCriteria::default(),
        }
    }
}

impl Scenario {
    pub fn end_hours(&self) -> u32 {
        self.days * 24
    }
}

// ─── Scenario Registry ──────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::default(),
        Scenario {
            name: "LATE_ARRIVALS",
            label: "30% of flights land up to 3h late",
            delay_prob: 0.30,
            max_delay_hours: 3,
            ..Default::default()
        },
        Scenario {
            name: "HUB_SCARCITY",
            label: "Hub starts at 5% stock",
            hub_stock_share: 0.05,
            criteria: PassCriteria { min_service_rate: 0.70, ..Default::default() },
            ..Default::default()
        },
        Scenario {
            name: "TIGHT_OUTSTATIONS",
            label: "Outstations hold 200 economy kits",
            outstation_capacity: 200,
            load_factor: 0.90,
            ..Default::default()
        },
        Scenario {
            name: "DENSE_SCHEDULE",
            label: "12 spokes, 4 rotations per day",
            outstations: 12,
            rotations_per_day: 4,
            criteria: PassCriteria { min_service_rate: 0.80, ..Default::default() },
            ..Default::default()
        },
        Scenario {
            name: "FULL_MONTH",
            label: "30-day run with delays",
            days: 30,
            delay_prob: 0.15,
            max_delay_hours: 3,
            ..Default::default()
        },
    ]
}
