use anyhow::{Context, Result};
use tripcast::{TripcastConfig, WeatherService};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!("usage: tripcast <city> <start:YYYY-MM-DD> <end:YYYY-MM-DD>");
        std::process::exit(2);
    }

    let config = TripcastConfig::load().with_context(|| "Failed to load configuration")?;
    let service = WeatherService::new(config)
        .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;

    let (series, notes) = service
        .get_weather_forecast_with_notes(&args[1], &args[2], &args[3])
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;

    println!("Weather forecast for {} ({} days):", args[1], series.len());
    for day in &series {
        println!(
            "  {}  {:>5.1}°C / {:>5.1}°C  {:<13}  {:>3}% humidity  {:>4.1} km/h wind  {:>4.1} mm",
            day.date,
            day.high_temp,
            day.low_temp,
            day.condition.to_string(),
            day.humidity,
            day.wind_speed,
            day.precipitation
        );
    }

    if !notes.is_empty() {
        println!();
        for note in &notes {
            println!("- {note}");
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
