// Mirrors the tables of hawaii.sqlite; the service never migrates them.

diesel::table! {
    station (id) {
        id -> Integer,
        #[sql_name = "station"]
        station_code -> Text,
        name -> Nullable<Text>,
        latitude -> Nullable<Double>,
        longitude -> Nullable<Double>,
        elevation -> Nullable<Double>,
    }
}

diesel::table! {
    measurement (id) {
        id -> Integer,
        station -> Text,
        date -> Date,
        prcp -> Nullable<Double>,
        tobs -> Double,
    }
}

diesel::allow_tables_to_appear_in_same_query!(measurement, station);
