//! # DC motor
//!
//! Linear brushed DC motor model built from nameplate data.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

use super::{DcTransmission, TransmissionError};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A brushed DC motor (or a gearbox of identical motors, given the combined constants).
///
/// The model is
///
/// ```text
/// V = w * kv + I * R
/// T = I * kt
/// ```
///
/// with `R = V_nom / I_stall`, `kv = V_nom / w_free` and `kt = T_stall / I_stall`. The free
/// current is kept as nameplate data only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DcMotor {
    nominal_voltage: f64,
    free_speed: f64,
    free_current: f64,
    stall_current: f64,
    stall_torque: f64,

    resistance: f64,
    kv: f64,
    kt: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl DcMotor {
    /// Create a new motor model.
    ///
    /// - `nominal_voltage`: Units: volts
    /// - `free_speed`: speed at nominal voltage with no load. Units: radians/second
    /// - `free_current`: current at free speed. Units: amps
    /// - `stall_current`: current at nominal voltage with the shaft held. Units: amps
    /// - `stall_torque`: torque at nominal voltage with the shaft held. Units: newton-meters
    pub fn new(
        nominal_voltage: f64,
        free_speed: f64,
        free_current: f64,
        stall_current: f64,
        stall_torque: f64,
    ) -> Result<Self, TransmissionError> {
        positive("nominal_voltage", nominal_voltage)?;
        positive("free_speed", free_speed)?;
        positive("stall_current", stall_current)?;
        positive("stall_torque", stall_torque)?;

        if !(free_current >= 0.0 && free_current < stall_current) {
            return Err(TransmissionError::InvalidConstant {
                name: "free_current",
                value: free_current,
                reason: "must be at least zero and less than the stall current",
            });
        }

        Ok(Self {
            nominal_voltage,
            free_speed,
            free_current,
            stall_current,
            stall_torque,
            resistance: nominal_voltage / stall_current,
            kv: nominal_voltage / free_speed,
            kt: stall_torque / stall_current,
        })
    }

    /// Speed at nominal voltage with no load.
    ///
    /// Units: radians/second
    pub fn nominal_free_speed(&self) -> f64 {
        self.free_speed
    }

    /// Units: amps
    pub fn free_current(&self) -> f64 {
        self.free_current
    }

    /// Units: amps
    pub fn stall_current(&self) -> f64 {
        self.stall_current
    }

    /// Units: newton-meters
    pub fn stall_torque(&self) -> f64 {
        self.stall_torque
    }

    /// Winding resistance.
    ///
    /// Units: ohms
    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    /// Back-EMF constant.
    ///
    /// Units: volt-seconds/radian
    pub fn kv(&self) -> f64 {
        self.kv
    }

    /// Torque constant.
    ///
    /// Units: newton-meters/amp
    pub fn kt(&self) -> f64 {
        self.kt
    }
}

impl DcTransmission for DcMotor {
    fn nominal_voltage(&self) -> f64 {
        self.nominal_voltage
    }

    fn free_speed(&self, voltage: f64) -> f64 {
        voltage / self.kv
    }

    fn current(&self, voltage: f64, speed: f64) -> f64 {
        (voltage - speed * self.kv) / self.resistance
    }

    fn torque(&self, current: f64) -> f64 {
        current * self.kt
    }

    fn free_voltage(&self, speed: f64) -> f64 {
        speed * self.kv
    }

    fn current_voltage(&self, current: f64) -> f64 {
        current * self.resistance
    }

    fn torque_current(&self, torque: f64) -> f64 {
        torque / self.kt
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn positive(name: &'static str, value: f64) -> Result<(), TransmissionError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TransmissionError::InvalidConstant {
            name,
            value,
            reason: "must be finite and greater than zero",
        })
    }
}
