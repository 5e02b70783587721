pub mod columns;
pub mod weather_table;
