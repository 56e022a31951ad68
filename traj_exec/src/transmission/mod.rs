//! # Transmissions
//!
//! Electromechanical models relating the voltage applied to a motor, its speed, the current it
//! draws and the torque it produces.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod dc_motor;

pub use dc_motor::DcMotor;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransmissionError {
    #[error("Invalid motor constant {name} = {value}: {reason}")]
    InvalidConstant {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A DC transmission (motor plus gearing) model.
///
/// Speeds are output shaft speeds in radians/second, torques are output shaft torques in
/// newton-meters.
pub trait DcTransmission {
    /// Units: volts
    fn nominal_voltage(&self) -> f64;

    /// Speed with no load at the given voltage.
    fn free_speed(&self, voltage: f64) -> f64;

    /// Current drawn at the given voltage and speed.
    fn current(&self, voltage: f64, speed: f64) -> f64;

    /// Torque produced by the given current.
    fn torque(&self, current: f64) -> f64;

    /// Voltage needed to spin freely at the given speed (the back-EMF).
    fn free_voltage(&self, speed: f64) -> f64;

    /// Voltage needed to drive the given current through the windings.
    fn current_voltage(&self, current: f64) -> f64;

    /// Current needed to produce the given torque.
    fn torque_current(&self, torque: f64) -> f64;
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl<T: DcTransmission + ?Sized> DcTransmission for &T {
    fn nominal_voltage(&self) -> f64 {
        (**self).nominal_voltage()
    }

    fn free_speed(&self, voltage: f64) -> f64 {
        (**self).free_speed(voltage)
    }

    fn current(&self, voltage: f64, speed: f64) -> f64 {
        (**self).current(voltage, speed)
    }

    fn torque(&self, current: f64) -> f64 {
        (**self).torque(current)
    }

    fn free_voltage(&self, speed: f64) -> f64 {
        (**self).free_voltage(speed)
    }

    fn current_voltage(&self, current: f64) -> f64 {
        (**self).current_voltage(current)
    }

    fn torque_current(&self, torque: f64) -> f64 {
        (**self).torque_current(torque)
    }
}

impl<T: DcTransmission + ?Sized> DcTransmission for Box<T> {
    fn nominal_voltage(&self) -> f64 {
        (**self).nominal_voltage()
    }

    fn free_speed(&self, voltage: f64) -> f64 {
        (**self).free_speed(voltage)
    }

    fn current(&self, voltage: f64, speed: f64) -> f64 {
        (**self).current(voltage, speed)
    }

    fn torque(&self, current: f64) -> f64 {
        (**self).torque(current)
    }

    fn free_voltage(&self, speed: f64) -> f64 {
        (**self).free_voltage(speed)
    }

    fn current_voltage(&self, current: f64) -> f64 {
        (**self).current_voltage(current)
    }

    fn torque_current(&self, torque: f64) -> f64 {
        (**self).torque_current(torque)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Convert revolutions per minute to radians per second.
pub fn rpm_to_rad(rpm: f64) -> f64 {
    rpm * std::f64::consts::TAU / 60.0
}

/// Convert radians per second to revolutions per minute.
pub fn rad_to_rpm(rad: f64) -> f64 {
    rad * 60.0 / std::f64::consts::TAU
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rpm_conversion() {
        assert_relative_eq!(rpm_to_rad(60.0), std::f64::consts::TAU);
        assert_relative_eq!(rad_to_rpm(rpm_to_rad(5330.0)), 5330.0, max_relative = 1e-12);
    }
}
