use results_importer::{FfdanseConfig, FfdanseProvider, ResultsProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let year = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(2024);

    let provider = FfdanseProvider::new(FfdanseConfig::from_env())?;

    println!("Listing season {}-{} from {}", year, year + 1, provider.name());

    for competition in provider.list_results(year).await? {
        println!(
            "{}  {:<30} {} detail page(s)",
            competition.date,
            competition.place,
            competition.data_urls.len()
        );
    }

    Ok(())
}
