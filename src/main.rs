use anyhow::Context;
use cinema_guide::{
    configuration::Config,
    state::Session,
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("cinema-guide".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = Config::new().context("Failed to read configuration.")?;
    let mut session = Session::build(config).context("Failed creating session.")?;

    match session.init().await {
        Ok(outcome) if outcome.is_success() => {
            let user = session.auth.user();
            tracing::info!(
                user.id = ?user.and_then(|u| u.id),
                user.name = ?user.and_then(|u| u.name.as_deref()),
                "Signed in"
            );
        }
        Ok(_) => tracing::info!("Browsing anonymously"),
        Err(error) => tracing::warn!(err.msg = %error, "Could not revalidate session"),
    }

    let top10 = session.catalog.load_top10().await.len();
    let genres = session.genres().await;
    let movies = session.catalog.load_all_movies(false).await.len();

    tracing::info!(
        top10,
        genres = genres.len(),
        movies,
        base_url = %session.config().api.base_url,
        "Catalog ready"
    );

    for genre in &genres {
        let count = session.catalog.get_movies_by_genre(genre.slug.as_str()).len();
        println!("{:>3}  {:<24} {}", genre.id, genre.name_ru, count);
    }

    Ok(())
}
