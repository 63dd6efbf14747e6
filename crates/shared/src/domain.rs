use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};

use tracing::warn;

use crate::error::DecodeError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(GarageId);

impl fmt::Display for GarageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two resource types exposed by the fleet API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Garage,
    Bus,
}

impl EntityKind {
    pub fn singular(self) -> &'static str {
        match self {
            Self::Garage => "garage",
            Self::Bus => "bus",
        }
    }

    /// Plural name, also the collection segment of the API path.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Garage => "garages",
            Self::Bus => "buses",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// A read-only projection served by one of the API collections.
pub trait Entity: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: EntityKind;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Garage {
    pub id: GarageId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub garage_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub garage_code: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub coordinate: String,
}

impl Entity for Garage {
    const KIND: EntityKind = EntityKind::Garage;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub door_no: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub operator: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub garage: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub license_plate: String,
    /// `None` when the server sent no timestamp or one that does not decode.
    #[serde(default, deserialize_with = "lenient_bus_time")]
    pub time: Option<BusTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_garage_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_garage_name: Option<String>,
    /// Kilometres to the nearest garage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_to_nearest_garage: Option<f64>,
}

impl Entity for Bus {
    const KIND: EntityKind = EntityKind::Bus;
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBusTime {
    Components(Vec<i64>),
    Other(serde::de::IgnoredAny),
}

fn lenient_bus_time<'de, D>(deserializer: D) -> Result<Option<BusTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let parts = match Option::<RawBusTime>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawBusTime::Components(parts)) => parts,
        Some(RawBusTime::Other(_)) => {
            warn!("bus timestamp is not a component array; treating as missing");
            return Ok(None);
        }
    };
    match BusTime::from_components(&parts) {
        Ok(time) => Ok(Some(time)),
        Err(err) => {
            warn!(?parts, error = %err, "unreadable bus timestamp; treating as missing");
            Ok(None)
        }
    }
}

/// Wall-clock timestamp of a bus position report.
///
/// The server encodes it as `[year, month, day, hour, minute, second, nanos]`
/// without a timezone, dropping trailing zero `second`/`nanos` components.
/// Precision is kept to the millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BusTime(NaiveDateTime);

impl BusTime {
    pub fn from_components(parts: &[i64]) -> Result<Self, DecodeError> {
        if !(5..=7).contains(&parts.len()) {
            return Err(DecodeError::ComponentCount(parts.len()));
        }
        let field = |index: usize| parts.get(index).copied().unwrap_or(0);

        let year = i32::try_from(field(0)).map_err(|_| DecodeError::OutOfRange("year"))?;
        let month = u32::try_from(field(1)).map_err(|_| DecodeError::OutOfRange("month"))?;
        let day = u32::try_from(field(2)).map_err(|_| DecodeError::OutOfRange("day"))?;
        let hour = u32::try_from(field(3)).map_err(|_| DecodeError::OutOfRange("hour"))?;
        let minute = u32::try_from(field(4)).map_err(|_| DecodeError::OutOfRange("minute"))?;
        let second = u32::try_from(field(5)).map_err(|_| DecodeError::OutOfRange("second"))?;
        let nanos = field(6);
        if !(0..1_000_000_000).contains(&nanos) {
            return Err(DecodeError::OutOfRange("nanosecond"));
        }
        let millis = (nanos / 1_000_000) as u32;

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(DecodeError::InvalidDate { year, month, day })?;
        let time = NaiveTime::from_hms_milli_opt(hour, minute, second, millis).ok_or(
            DecodeError::InvalidTime {
                hour,
                minute,
                second,
            },
        )?;
        Ok(Self(date.and_time(time)))
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    pub fn millisecond(&self) -> u32 {
        self.0.nanosecond() / 1_000_000
    }

    /// `M/D/YYYY`, no zero padding.
    pub fn date_label(&self) -> String {
        self.0.format("%-m/%-d/%Y").to_string()
    }

    /// `HH:MM:SS` on a 24-hour clock.
    pub fn time_label(&self) -> String {
        self.0.format("%H:%M:%S").to_string()
    }

    fn components(&self) -> [i64; 7] {
        let date = self.0.date();
        let time = self.0.time();
        [
            i64::from(date.year()),
            i64::from(date.month()),
            i64::from(date.day()),
            i64::from(time.hour()),
            i64::from(time.minute()),
            i64::from(time.second()),
            i64::from(time.nanosecond()),
        ]
    }
}

impl From<NaiveDateTime> for BusTime {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl fmt::Display for BusTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date_label(), self.time_label())
    }
}

impl Serialize for BusTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.components().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BusTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = Vec::<i64>::deserialize(deserializer)?;
        Self::from_components(&parts).map_err(serde::de::Error::custom)
    }
}
