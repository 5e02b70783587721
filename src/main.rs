use std::env;
use weather_pipeline::{WeatherPipeline, WeatherPipelineError};

fn main() -> Result<(), WeatherPipelineError> {
    // Set RUST_LOG=info (or debug) to see per-stage logging
    env_logger::init();
    configure_polars_display();

    let report = WeatherPipeline::default().run()?;
    println!("{}", report);

    Ok(())
}

fn configure_polars_display() {
    // show every column of the head rows
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
}
