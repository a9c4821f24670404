//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them to
//! domain types on the way out.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{user_locations, users, weather_records};

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = weather_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WeatherRecordRow {
    pub coordinate_key: String,
    pub location: String,
    pub payload: serde_json::Value,
    pub payload_version: i16,
    pub show_on_home_page: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = weather_records)]
pub(crate) struct NewWeatherRecordRow<'a> {
    pub coordinate_key: &'a str,
    pub location: &'a str,
    pub payload: serde_json::Value,
    pub payload_version: i16,
    pub show_on_home_page: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserLocationRow {
    pub user_id: String,
    pub coordinate_key: String,
    pub location: String,
    pub show_on_home_page: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_locations)]
pub(crate) struct NewUserLocationRow<'a> {
    pub user_id: &'a str,
    pub coordinate_key: &'a str,
    pub location: &'a str,
    pub show_on_home_page: bool,
}
