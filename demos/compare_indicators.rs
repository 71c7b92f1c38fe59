use aire_cyl::{AireCyl, AireCylError, Indicator, MapRequest};

#[tokio::main]
async fn main() -> Result<(), AireCylError> {
    let client = AireCyl::builder().build()?;
    let request = MapRequest::normalize(Some("15"), Some("06"), Some("2021"), None);
    let aggregates = client.aggregate(&request).await?;

    for indicator in Indicator::ALL {
        println!("{}", indicator.legend());
        for row in aggregates.rows() {
            match row.value(indicator) {
                Some(value) => println!("  {:<12} {:>8.2}", row.province, value),
                None => println!("  {:<12} {:>8}", row.province, "-"),
            }
        }
    }
    Ok(())
}
