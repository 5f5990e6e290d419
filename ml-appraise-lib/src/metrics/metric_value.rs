use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Round to two decimal places, the precision at which scores are reported.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Device classes the size metric scores against, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Device {
    RaspberryPi,
    JetsonNano,
    DesktopPc,
    AwsServer,
}

impl Device {
    /// Model size, in MB, up to which the device is considered comfortable.
    #[must_use]
    pub const fn threshold_mb(self) -> f64 {
        match self {
            Self::RaspberryPi => 50.0,
            Self::JetsonNano => 200.0,
            Self::DesktopPc => 2000.0,
            Self::AwsServer => 10_000.0,
        }
    }
}

/// One score per [`Device`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviceScores {
    pub raspberry_pi: f64,
    pub jetson_nano: f64,
    pub desktop_pc: f64,
    pub aws_server: f64,
}

impl DeviceScores {
    /// The same score for every device.
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            raspberry_pi: value,
            jetson_nano: value,
            desktop_pc: value,
            aws_server: value,
        }
    }

    /// Build scores by evaluating `f` for every device.
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(Device) -> f64) -> Self {
        Self {
            raspberry_pi: f(Device::RaspberryPi),
            jetson_nano: f(Device::JetsonNano),
            desktop_pc: f(Device::DesktopPc),
            aws_server: f(Device::AwsServer),
        }
    }

    #[must_use]
    pub const fn get(&self, device: Device) -> f64 {
        match device {
            Device::RaspberryPi => self.raspberry_pi,
            Device::JetsonNano => self.jetson_nano,
            Device::DesktopPc => self.desktop_pc,
            Device::AwsServer => self.aws_server,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Device, f64)> + '_ {
        Device::iter().map(|device| (device, self.get(device)))
    }

    /// Unweighted mean over all devices.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.iter().map(|(_, score)| score).sum::<f64>() / 4.0
    }
}

/// What a metric reports: a single score, or one score per device class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Score(f64),
    Devices(DeviceScores),
}

impl MetricValue {
    #[must_use]
    pub const fn as_score(&self) -> Option<f64> {
        match self {
            Self::Score(v) => Some(*v),
            Self::Devices(_) => None,
        }
    }

    #[must_use]
    pub const fn as_devices(&self) -> Option<&DeviceScores> {
        match self {
            Self::Devices(scores) => Some(scores),
            Self::Score(_) => None,
        }
    }

    /// The scalar this value contributes to the net score, or `None` if it is a sentinel or not a number.
    ///
    /// Device scores contribute their mean, provided every device has a usable score.
    #[must_use]
    pub fn contribution(&self) -> Option<f64> {
        let usable = |v: f64| v.is_finite() && v >= 0.0;
        match self {
            Self::Score(v) => usable(*v).then_some(*v),
            Self::Devices(scores) => scores.iter().all(|(_, v)| usable(v)).then(|| scores.mean()),
        }
    }

    /// The value with every score rounded to two decimal places.
    #[must_use]
    pub fn rounded(&self) -> Self {
        match self {
            Self::Score(v) => Self::Score(round2(*v)),
            Self::Devices(scores) => Self::Devices(DeviceScores::from_fn(|device| round2(scores.get(device)))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert!((round2(0.456) - 0.46).abs() < 1e-12);
        assert!((round2(0.454) - 0.45).abs() < 1e-12);
        assert!((round2(-1.0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_device_names() {
        let names: Vec<_> = Device::iter().map(|d| d.to_string()).collect();
        assert_eq!(names, vec!["raspberry_pi", "jetson_nano", "desktop_pc", "aws_server"]);
    }

    #[test]
    fn test_contribution_of_scores() {
        assert_eq!(MetricValue::Score(0.4).contribution(), Some(0.4));
        assert_eq!(MetricValue::Score(0.0).contribution(), Some(0.0));
        assert_eq!(MetricValue::Score(-1.0).contribution(), None);
        assert_eq!(MetricValue::Score(f64::NAN).contribution(), None);
    }

    #[test]
    fn test_contribution_of_devices() {
        let scores = DeviceScores {
            raspberry_pi: 0.2,
            jetson_nano: 0.4,
            desktop_pc: 0.6,
            aws_server: 0.8,
        };
        assert!((MetricValue::Devices(scores).contribution().unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(MetricValue::Devices(DeviceScores::uniform(-1.0)).contribution(), None);
    }

    #[test]
    fn test_serialization_shapes() {
        assert_eq!(serde_json::to_string(&MetricValue::Score(0.5)).unwrap(), "0.5");
        assert_eq!(
            serde_json::to_string(&MetricValue::Devices(DeviceScores::uniform(1.0))).unwrap(),
            r#"{"raspberry_pi":1.0,"jetson_nano":1.0,"desktop_pc":1.0,"aws_server":1.0}"#
        );
    }

    #[test]
    fn test_rounded() {
        assert_eq!(MetricValue::Score(0.126).rounded(), MetricValue::Score(0.13));
    }
}
