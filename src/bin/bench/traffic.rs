// Passenger Demand Generator — seedable bookings and check-in no-shows
// Bookings are drawn once at schedule time; no-shows are Poisson at check-in

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rotables_engine::{PerClass, ServiceClass};

/// Expected no-show share of booked passengers.
const NO_SHOW_RATE: f64 = 0.04;

pub struct DemandGenerator {
    rng: ChaCha8Rng,
    load_factor: f64,
}

impl DemandGenerator {
    pub fn new(rng: ChaCha8Rng, load_factor: f64) -> Self {
        Self { rng, load_factor }
    }

    /// Booked passengers per class, never above the seats on board.
    pub fn bookings(&mut self, seats: &PerClass<u32>) -> PerClass<u32> {
        let mut booked = PerClass::default();
        for class in ServiceClass::ALL {
            let jitter = self.rng.gen_range(0.75..1.10);
            let pax = (seats[class] as f64 * self.load_factor * jitter).round() as u32;
            booked[class] = pax.min(seats[class]);
        }
        booked
    }

    /// Checked-in passengers: bookings minus Poisson no-shows.
    pub fn check_in(&mut self, booked: &PerClass<u32>) -> PerClass<u32> {
        booked.map(|_, &pax| {
            let no_shows = poisson_sample(&mut self.rng, pax as f64 * NO_SHOW_RATE);
            pax.saturating_sub(no_shows)
        })
    }
}

/// Poisson sampling via Knuth algorithm.
/// For λ < 30, uses direct method. For larger λ, uses normal approximation.
fn poisson_sample(rng: &mut ChaCha8Rng, lambda: f64) -> u32 {
    if lambda <= 0.0 {
        return 0;
    }
    if lambda < 30.0 {
        let l = (-lambda).exp();
        let mut k: u32 = 0;
        let mut p: f64 = 1.0;
        loop {
            k += 1;
            p *= rng.gen::<f64>();
            if p <= l {
                return k - 1;
            }
        }
    } else {
        let u1: f64 = rng.gen();
        let u2: f64 = rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        let result = lambda + lambda.sqrt() * z;
        result.round().max(0.0) as u32
    }
}
