//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly; `diesel print-schema` can
//! regenerate them from a migrated database.

diesel::table! {
    /// Users provisioned lazily on their first mutation.
    users (id) {
        /// Identity-provider subject.
        id -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One weather observation per canonical coordinate key.
    weather_records (coordinate_key) {
        coordinate_key -> Varchar,
        location -> Varchar,
        /// Provider payload as JSON.
        payload -> Jsonb,
        /// Schema version of `payload`.
        payload_version -> Int2,
        show_on_home_page -> Bool,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// A user's tracked locations.
    user_locations (user_id, coordinate_key) {
        user_id -> Varchar,
        coordinate_key -> Varchar,
        location -> Varchar,
        show_on_home_page -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(user_locations -> users (user_id));
diesel::joinable!(user_locations -> weather_records (coordinate_key));

diesel::allow_tables_to_appear_in_same_query!(users, weather_records, user_locations);
