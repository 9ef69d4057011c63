use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Share of healthy components required for an overall healthy status
const HEALTHY_THRESHOLD: f64 = 0.8;

/// Overall status of the client stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub is_healthy: bool,
    /// Fraction of healthy components, 0.0 to 1.0
    pub score: f64,
    pub message: Option<String>,
    pub components: Vec<ComponentHealth>,
    /// Seconds since the Unix epoch
    pub checked_at: u64,
}

impl HealthStatus {
    pub fn from_components(components: Vec<ComponentHealth>) -> Self {
        let healthy = components.iter().filter(|c| c.is_healthy).count();
        let score = if components.is_empty() {
            1.0
        } else {
            healthy as f64 / components.len() as f64
        };

        let failing: Vec<&str> =
            components.iter().filter(|c| !c.is_healthy).map(|c| c.name.as_str()).collect();
        let message = (!failing.is_empty()).then(|| format!("degraded: {}", failing.join(", ")));

        Self {
            is_healthy: score >= HEALTHY_THRESHOLD,
            score,
            message,
            components,
            checked_at: unix_now(),
        }
    }

    pub fn component(&self, name: &str) -> Option<&ComponentHealth> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Status of a single component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub is_healthy: bool,
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }
}

fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_components_healthy() {
        let status = HealthStatus::from_components(vec![
            ComponentHealth::healthy("backend"),
            ComponentHealth::healthy("session"),
        ]);

        assert!(status.is_healthy);
        assert_eq!(status.score, 1.0);
        assert!(status.message.is_none());
        assert!(status.checked_at > 0);
    }

    #[test]
    fn one_failure_in_three_is_unhealthy() {
        let status = HealthStatus::from_components(vec![
            ComponentHealth::healthy("backend"),
            ComponentHealth::unhealthy("credentials", "no stored tokens"),
            ComponentHealth::healthy("session"),
        ]);

        assert!(!status.is_healthy);
        assert!((status.score - 2.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(status.message.as_deref(), Some("degraded: credentials"));
        assert_eq!(
            status.component("credentials").and_then(|c| c.message.as_deref()),
            Some("no stored tokens")
        );
    }

    #[test]
    fn no_components_is_healthy() {
        assert!(HealthStatus::from_components(Vec::new()).is_healthy);
    }
}
