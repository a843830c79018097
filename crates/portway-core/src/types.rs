use crate::{Result, constants::MIN_BAUD_RATE, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serial line speed in bits per second.
///
/// A validated newtype around `u32`: construction guarantees the rate is
/// positive, so every `BaudRate` held by the bridge is usable as-is by the
/// device layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaudRate(u32);

impl BaudRate {
    /// Create a new baud rate with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidBaudRate` if the rate is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use portway_core::BaudRate;
    ///
    /// let rate = BaudRate::new(115_200).unwrap();
    /// assert_eq!(rate.as_u32(), 115_200);
    ///
    /// assert!(BaudRate::new(0).is_err());
    /// ```
    pub fn new(rate: u32) -> Result<Self> {
        if rate < MIN_BAUD_RATE {
            return Err(Error::InvalidBaudRate(format!(
                "Baud rate must be positive, got {rate}"
            )));
        }
        Ok(BaudRate(rate))
    }

    /// Get the raw rate as u32.
    #[must_use]
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BaudRate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rate: u32 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidBaudRate(format!("Not a number: {s:?}")))?;
        BaudRate::new(rate)
    }
}

/// Descriptive metadata for one discoverable serial device.
///
/// A read-only snapshot produced by port enumeration. Field names follow the
/// wire protocol: `DEVICE` (the path handed back to `OPEN`) is uppercase,
/// the descriptive fields are lowercase, and absent metadata serializes as
/// `null` rather than being omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortInfo {
    /// System path of the device, e.g. `/dev/ttyUSB0` or `COM3`.
    #[serde(rename = "DEVICE")]
    pub device: String,

    /// Short device name (path basename on Unix).
    pub name: Option<String>,

    /// Human-readable description.
    pub description: Option<String>,

    /// Hardware identifier string, e.g. `USB VID:PID=0403:6001`.
    pub hwid: Option<String>,

    /// USB vendor ID.
    pub vid: Option<u16>,

    /// USB product ID.
    pub pid: Option<u16>,

    /// USB serial number.
    pub serial: Option<String>,

    /// Physical location string, when the platform reports one.
    pub location: Option<String>,

    /// Manufacturer string.
    pub manufacturer: Option<String>,

    /// Product string.
    pub product: Option<String>,

    /// USB interface description.
    pub interface: Option<String>,
}

impl PortInfo {
    /// Create a port snapshot with only the device path set.
    ///
    /// # Examples
    ///
    /// ```
    /// use portway_core::PortInfo;
    ///
    /// let info = PortInfo::new("/dev/ttyUSB0");
    /// assert_eq!(info.device, "/dev/ttyUSB0");
    /// assert!(info.manufacturer.is_none());
    /// ```
    pub fn new(device: impl Into<String>) -> Self {
        PortInfo {
            device: device.into(),
            name: None,
            description: None,
            hwid: None,
            vid: None,
            pid: None,
            serial: None,
            location: None,
            manufacturer: None,
            product: None,
            interface: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_baud_rate_valid() {
        let rate = BaudRate::new(9600).unwrap();
        assert_eq!(rate.as_u32(), 9600);
        assert_eq!(rate.to_string(), "9600");
    }

    #[test]
    fn test_baud_rate_zero_rejected() {
        assert!(BaudRate::new(0).is_err());
    }

    #[test]
    fn test_baud_rate_from_str() {
        let rate = BaudRate::from_str("115200").unwrap();
        assert_eq!(rate.as_u32(), 115_200);

        // Surrounding whitespace is tolerated
        let rate = BaudRate::from_str(" 9600 ").unwrap();
        assert_eq!(rate.as_u32(), 9600);
    }

    #[test]
    fn test_baud_rate_from_str_invalid() {
        assert!(BaudRate::from_str("fast").is_err());
        assert!(BaudRate::from_str("").is_err());
        assert!(BaudRate::from_str("-9600").is_err());
        assert!(BaudRate::from_str("0").is_err());
    }

    #[test]
    fn test_port_info_serializes_null_fields() {
        let info = PortInfo::new("/dev/ttyACM0");
        let json = serde_json::to_value(&info).unwrap();

        assert_eq!(json["DEVICE"], "/dev/ttyACM0");
        assert!(json["manufacturer"].is_null());
        assert!(json["vid"].is_null());
        // Absent metadata is serialized explicitly, not omitted
        assert!(json.as_object().unwrap().contains_key("interface"));
    }

    #[test]
    fn test_port_info_field_casing() {
        let mut info = PortInfo::new("COM3");
        info.vid = Some(0x0403);
        info.pid = Some(0x6001);
        let json = serde_json::to_value(&info).unwrap();

        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert!(keys.contains(&"DEVICE"));
        assert!(keys.contains(&"vid"));
        assert!(!keys.contains(&"VID"));
        assert_eq!(json["vid"], 0x0403);
    }
}
