use intervals_client::{DateRange, IntervalsApi, config::Config, http_client::ReqwestIntervalsClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Expects INTERVALS_ICU_API_KEY in the environment (or an env/config file).
    let cfg = Config::resolve()?;
    let client = ReqwestIntervalsClient::from_config(&cfg);

    let newest = chrono::Utc::now().date_naive();
    let range = DateRange {
        oldest: newest - chrono::Duration::days(7),
        newest,
    };
    let activities = client.list_activities("me", &range).await?;
    if activities.is_empty() {
        println!("No activities in the last week (check date range or credentials)");
        return Ok(());
    }
    for a in activities {
        println!(
            "- {} {} {}",
            a.id,
            a.activity_type.unwrap_or_else(|| "?".into()),
            a.start_date_local.unwrap_or_default()
        );
    }
    Ok(())
}
