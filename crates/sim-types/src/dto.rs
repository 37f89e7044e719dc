//! Request, payload and metadata DTOs (JSON-compatible with the worker).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Simulation parameters as submitted by a client. Every field is optional;
/// `None` means "unset" and is distinct from a zero value. Unset fields are
/// filled by [`SimulationParams::with_defaults`] at submission time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal_mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal_mass_kg: Option<f64>,
    /// Specific heat of the thermal mass, J/kgK.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp_mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ventilation_rate: Option<f64>,
    #[serde(rename = "U_day", default, skip_serializing_if = "Option::is_none")]
    pub u_day: Option<f64>,
    #[serde(rename = "U_night", default, skip_serializing_if = "Option::is_none")]
    pub u_night: Option<f64>,
    #[serde(rename = "A_glass", default, skip_serializing_if = "Option::is_none")]
    pub a_glass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tau_glass: Option<f64>,
    /// Air changes per hour.
    #[serde(rename = "ACH", default, skip_serializing_if = "Option::is_none")]
    pub ach: Option<f64>,
    /// Greenhouse volume, m3.
    #[serde(rename = "V", default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Direct heat capacity, J/K (alternative to thermal_mass_kg).
    #[serde(rename = "C", default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
    #[serde(rename = "T_init", default, skip_serializing_if = "Option::is_none")]
    pub t_init: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setpoint: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heater_max_w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evap_rate: Option<f64>,
    #[serde(
        rename = "fraction_solar_to_air",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fraction_solar_air: Option<f64>,
}

impl SimulationParams {
    /// Fill every unset field with the model default. Pure and total: fields
    /// that are already set are never overwritten, so applying this twice
    /// yields the same record. lat/lon and the date range stay unset.
    pub fn with_defaults(mut self) -> Self {
        self.a_glass.get_or_insert(50.0);
        self.tau_glass.get_or_insert(0.85);
        self.u_day.get_or_insert(3.0);
        self.u_night.get_or_insert(0.6);
        self.ach.get_or_insert(0.5);
        self.volume.get_or_insert(100.0);
        // C is only defaulted when neither form of thermal mass was given.
        if self.c.is_none() && self.thermal_mass_kg.is_none() {
            self.c = Some(2e7);
        }
        self.cp_mass.get_or_insert(4186.0);
        self.t_init.get_or_insert(15.0);
        self.setpoint.get_or_insert(12.0);
        self.heater_max_w.get_or_insert(5000.0);
        self.fraction_solar_air.get_or_insert(0.5);
        self
    }
}

/// Lifecycle state of a job. The external worker owns every transition out
/// of `Queued`; this crate never moves a job backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Error,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        }
    }

    /// Terminal states stop a polling client.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata record persisted per job, independent of its result blob.
/// `error` is set by the worker on failure; `result_key` is fixed at
/// submission and names where the result blob will be written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMeta {
    pub job_id: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub params: SimulationParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_key: Option<String>,
}

/// The record placed on the FIFO queue for the worker. A separate persisted
/// copy from [`JobMeta`]; both carry the same id and params at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedPayload {
    pub job_id: String,
    pub created_at: DateTime<Utc>,
    pub params: SimulationParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_unset_fields() {
        let p = SimulationParams::default().with_defaults();
        assert_eq!(p.a_glass, Some(50.0));
        assert_eq!(p.tau_glass, Some(0.85));
        assert_eq!(p.u_day, Some(3.0));
        assert_eq!(p.u_night, Some(0.6));
        assert_eq!(p.ach, Some(0.5));
        assert_eq!(p.volume, Some(100.0));
        assert_eq!(p.c, Some(2e7));
        assert_eq!(p.cp_mass, Some(4186.0));
        assert_eq!(p.t_init, Some(15.0));
        assert_eq!(p.setpoint, Some(12.0));
        assert_eq!(p.heater_max_w, Some(5000.0));
        assert_eq!(p.fraction_solar_air, Some(0.5));
        assert_eq!(p.lat, None);
        assert_eq!(p.lon, None);
        assert_eq!(p.start_date, None);
    }

    #[test]
    fn defaults_preserve_set_fields() {
        let p = SimulationParams {
            a_glass: Some(75.0),
            setpoint: Some(0.0),
            ..Default::default()
        }
        .with_defaults();
        assert_eq!(p.a_glass, Some(75.0));
        // Zero is a set value, not "unset".
        assert_eq!(p.setpoint, Some(0.0));
        assert_eq!(p.u_day, Some(3.0));
    }

    #[test]
    fn defaults_are_idempotent() {
        let once = SimulationParams {
            lat: Some(41.8781),
            lon: Some(-87.6298),
            ..Default::default()
        }
        .with_defaults();
        let twice = once.clone().with_defaults();
        assert_eq!(once, twice);
    }

    #[test]
    fn c_not_defaulted_when_thermal_mass_kg_set() {
        let p = SimulationParams {
            thermal_mass_kg: Some(1000.0),
            ..Default::default()
        }
        .with_defaults();
        assert_eq!(p.c, None);
        assert_eq!(p.thermal_mass_kg, Some(1000.0));
    }

    #[test]
    fn unset_fields_are_omitted_from_json() {
        let p = SimulationParams {
            lat: Some(41.8781),
            ..Default::default()
        };
        let j = serde_json::to_value(&p).unwrap();
        assert_eq!(j, serde_json::json!({ "lat": 41.8781 }));
    }

    #[test]
    fn params_use_worker_field_names() {
        let p = SimulationParams::default().with_defaults();
        let j = serde_json::to_value(&p).unwrap();
        assert_eq!(j["A_glass"], 50.0);
        assert_eq!(j["U_day"], 3.0);
        assert_eq!(j["ACH"], 0.5);
        assert_eq!(j["V"], 100.0);
        assert_eq!(j["C"], 2e7);
        assert_eq!(j["fraction_solar_to_air"], 0.5);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Queued).unwrap(),
            "\"queued\""
        );
        let s: JobStatus = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(s, JobStatus::Error);
        assert!(s.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }
}
