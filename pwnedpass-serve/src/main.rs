use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use pwnedpass::OfflineDatabase;
use pwnedpass_serve::router;

#[derive(Parser, Debug)]
#[command(name = "pwnedpass-serve")]
#[command(about = "Offline Pwned Passwords HTTP server")]
struct Args {
    /// Path to the database file
    #[arg(long, default_value = pwnedpass::DATABASE_FILENAME)]
    database: PathBuf,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0:8889")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pwnedpass_serve=info".parse().unwrap())
                .add_directive("tower_http=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let db = match OfflineDatabase::open(&args.database) {
        Ok(db) => db,
        Err(err) => {
            error!(%err, database = %args.database.display(), "cannot open database");
            std::process::exit(1);
        }
    };

    info!(
        database = %args.database.display(),
        records = db.record_count(),
        "database opened"
    );

    let app = router(Arc::new(db));

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .expect("Failed to bind address");

    info!(address = %args.listen, "Server listening");

    axum::serve(listener, app).await.expect("Server error");
}
