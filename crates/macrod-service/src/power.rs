//! Power-exemption environment capability
//!
//! Aggressive OS power management can suspend or kill a background
//! process. The bridge exposes three environment operations: query whether
//! this process is exempt, request an exemption prompt, and open the
//! relevant settings surface. All three are black-box system calls behind
//! this trait.

use macrod_core::prelude::*;

/// OS power-exemption surface
pub trait PowerEnvironment: Send + Sync {
    /// Whether the process is currently exempt from power optimization
    fn is_exemption_granted(&self) -> bool;

    /// Ask the OS to prompt the user for an exemption
    fn request_exemption(&self) -> Result<()>;

    /// Open the OS settings surface for power exemptions
    fn open_exemption_settings(&self) -> Result<()>;
}

/// Environment for platforms without a power-optimization concept
///
/// Reports the exemption as already granted and treats both actions as
/// successful no-ops, so callers need no platform branching.
#[derive(Debug, Default)]
pub struct UnsupportedPower;

impl UnsupportedPower {
    pub fn new() -> Self {
        Self
    }
}

impl PowerEnvironment for UnsupportedPower {
    fn is_exemption_granted(&self) -> bool {
        true
    }

    fn request_exemption(&self) -> Result<()> {
        debug!("Power optimization not a concept here, exemption request is a no-op");
        Ok(())
    }

    fn open_exemption_settings(&self) -> Result<()> {
        debug!("Power optimization not a concept here, settings surface is a no-op");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_power_reports_exempt() {
        let power = UnsupportedPower::new();
        assert!(power.is_exemption_granted());
    }

    #[test]
    fn test_unsupported_power_actions_succeed() {
        let power = UnsupportedPower::new();
        assert!(power.request_exemption().is_ok());
        assert!(power.open_exemption_settings().is_ok());
    }
}
