//! The weather observation collection shared by the ingest and query sides of
//! the service.

use crate::collection::{
    BsonType, CollectionDescriptor, JsonSchema, Property, ValidationAction, ValidationLevel,
    Validator,
};
use crate::index::IndexDescriptor;

pub const COLLECTION: &str = "weather_observations";

pub const CITY: &str = "city";
pub const PROVIDER: &str = "provider";
pub const OBSERVATION_TIME: &str = "observation_time";
pub const FETCHED_AT: &str = "fetched_at";
pub const TEMP_C: &str = "temp_c";
pub const HUMIDITY_PCT: &str = "humidity_pct";
pub const WIND_SPEED_MS: &str = "wind_speed_ms";
pub const CONDITIONS: &str = "conditions";
pub const RAW: &str = "raw";

pub fn schema() -> JsonSchema {
    use BsonType::*;

    JsonSchema {
        required: vec![CITY.into(), OBSERVATION_TIME.into(), TEMP_C.into()],
        properties: vec![
            Property::new(CITY, &[String]),
            Property::new(PROVIDER, &[String]),
            Property::new(OBSERVATION_TIME, &[Date]),
            Property::new(FETCHED_AT, &[Date]),
            Property::new(TEMP_C, &[Double, Int, Decimal]),
            Property::new(HUMIDITY_PCT, &[Int, Double, Decimal, Null]),
            Property::new(WIND_SPEED_MS, &[Double, Int, Decimal, Null]),
            Property::new(CONDITIONS, &[String, Null]),
            Property::new(RAW, &[Object, Null]),
        ],
    }
}

/// Moderate + warn: schema drift is logged by the engine, never blocks ingest.
pub fn validator() -> Validator {
    Validator {
        schema: schema(),
        level: ValidationLevel::Moderate,
        action: ValidationAction::Warn,
    }
}

/// Serves range queries for one city over a time window.
pub fn city_time_index() -> IndexDescriptor {
    IndexDescriptor::ascending(&[CITY, OBSERVATION_TIME])
}

pub fn collection() -> CollectionDescriptor {
    CollectionDescriptor {
        name: COLLECTION.to_string(),
        validator: Some(validator()),
        indexes: vec![city_time_index()],
    }
}
