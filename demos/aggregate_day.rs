use aire_cyl::{AireCyl, AireCylError, MapRequest, MissingValuePolicy};
use std::env;

#[tokio::main]
async fn main() -> Result<(), AireCylError> {
    configure_polars_display();

    let request = MapRequest::normalize(Some("15"), Some("06"), Some("2021"), Some("pm10_ug_m3"));

    for policy in [MissingValuePolicy::FillZero, MissingValuePolicy::Exclude] {
        let client = AireCyl::builder().missing_values(policy).build()?;
        let aggregates = client.aggregate(&request).await?;
        println!("{:?} on {}:\n{}", policy, request.row_date(), aggregates.frame);
    }

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
}
