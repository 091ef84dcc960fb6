use serde::{Deserialize, Serialize};
use std::fmt;

/// OS version as the platform reports it: a release string or an API level.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OsVersion {
    Number(f64),
    Text(String),
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeviceInfo {
    pub platform: String,
    pub version: OsVersion,
    #[serde(rename = "isTV")]
    pub is_tv: bool,
}

impl DeviceInfo {
    /// Describes the host this process runs on. The standard library does not
    /// expose an OS release, so the version is reported as unknown.
    pub fn current() -> Self {
        Self {
            platform: std::env::consts::OS.to_string(),
            version: OsVersion::Text("Unknown".to_string()),
            is_tv: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_version_accepts_string_or_number() {
        let ios: DeviceInfo =
            serde_json::from_value(json!({"platform": "ios", "version": "17.1", "isTV": false}))
                .unwrap();
        assert_eq!(ios.version, OsVersion::Text("17.1".into()));
        assert_eq!(ios.version.to_string(), "17.1");

        let android: DeviceInfo =
            serde_json::from_value(json!({"platform": "android", "version": 34, "isTV": false}))
                .unwrap();
        assert_eq!(android.version, OsVersion::Number(34.0));
        assert_eq!(android.version.to_string(), "34");
    }

    #[test]
    fn test_current_device_has_platform() {
        let device = DeviceInfo::current();
        assert!(!device.platform.is_empty());
        assert!(!device.is_tv);
    }
}
