use aire_cyl::{AireCyl, MapRequest};
use std::env;

/// Renders the map for `[day] [month] [year] [indicator]` and writes it to `map.html`.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let arg = |i: usize| args.get(i).map(String::as_str);
    let request = MapRequest::normalize(arg(0), arg(1), arg(2), arg(3));

    let client = AireCyl::builder().build()?;
    let map = client.render_map(&request).await?;
    let page = map.to_html()?;

    std::fs::write("map.html", page)?;
    println!(
        "Wrote map.html for {} ({})",
        request.filter_date(),
        map.legend()
    );
    Ok(())
}
