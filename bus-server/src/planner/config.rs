//! Journey planner configuration.

/// Parameters for journey time estimation.
#[derive(Debug, Clone)]
pub struct JourneyConfig {
    /// Assumed average bus speed (km/h).
    pub bus_speed_kmh: f64,

    /// Time added for every change between services (minutes).
    pub transfer_penalty_mins: f64,
}

impl JourneyConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(bus_speed_kmh: f64, transfer_penalty_mins: f64) -> Self {
        Self {
            bus_speed_kmh,
            transfer_penalty_mins,
        }
    }

    /// Minutes needed to ride `distance_km` at the configured speed.
    pub fn ride_minutes(&self, distance_km: f64) -> f64 {
        distance_km / self.bus_speed_kmh * 60.0
    }

    /// Total transfer time for a journey with `segments` rides.
    pub fn transfer_minutes(&self, segments: usize) -> f64 {
        segments.saturating_sub(1) as f64 * self.transfer_penalty_mins
    }
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            bus_speed_kmh: 20.0,
            transfer_penalty_mins: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = JourneyConfig::default();
        assert_eq!(config.bus_speed_kmh, 20.0);
        assert_eq!(config.transfer_penalty_mins, 10.0);
    }

    #[test]
    fn ride_minutes() {
        let config = JourneyConfig::default();
        assert_eq!(config.ride_minutes(10.0), 30.0);
        assert_eq!(config.ride_minutes(0.0), 0.0);
    }

    #[test]
    fn transfer_minutes() {
        let config = JourneyConfig::new(20.0, 7.5);
        assert_eq!(config.transfer_minutes(0), 0.0);
        assert_eq!(config.transfer_minutes(1), 0.0);
        assert_eq!(config.transfer_minutes(3), 15.0);
    }
}
