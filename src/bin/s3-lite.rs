//! ```shell
//! s3-lite 0.1.0
//!
//! USAGE:
//!     s3-lite [OPTIONS] --access-key <access-key> --secret-key <secret-key>
//!
//! OPTIONS:
//!         --data-dir <data-dir>         [default: ./data]
//!         --host <host>                 [default: localhost]
//!         --port <port>                 [default: 9000]
//!         --access-key <access-key>
//!         --secret-key <secret-key>
//! ```

use s3_lite::storages::fs::FileSystem;
use s3_lite::{S3Service, SimpleAuth};

use std::net::TcpListener;
use std::path::PathBuf;

use anyhow::Result;
use futures::future;
use hyper::server::Server;
use hyper::service::make_service_fn;
use structopt::StructOpt;
use tracing::{debug, info};

#[derive(StructOpt)]
struct Args {
    /// Directory the objects are stored in; created if missing
    #[structopt(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Address to listen on
    #[structopt(long, default_value = "localhost")]
    host: String,

    /// Port to listen on
    #[structopt(long, default_value = "9000")]
    port: u16,

    /// Access key of the single credential pair
    #[structopt(long, display_order = 1000)]
    access_key: String,

    /// Secret key of the single credential pair
    #[structopt(long, display_order = 1000)]
    secret_key: String,
}

fn setup_tracing() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{fmt, EnvFilter};

    tracing_subscriber::fmt()
        .event_format(fmt::format::Format::default().pretty())
        .with_env_filter(EnvFilter::from_default_env())
        .finish()
        .with(ErrorLayer::default())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_tracing();

    let args: Args = Args::from_args();

    // setup the storage
    let fs = FileSystem::new(&args.data_dir)?;
    debug!(?fs);

    // setup the service
    let mut service = S3Service::new(fs);

    let mut auth = SimpleAuth::new();
    auth.register(args.access_key, args.secret_key);
    service.set_auth(auth);

    let server = {
        let service = service.into_shared();
        let listener = TcpListener::bind((args.host.as_str(), args.port))?;
        let make_service: _ =
            make_service_fn(move |_| future::ready(Ok::<_, anyhow::Error>(service.clone())));
        Server::from_tcp(listener)?
            .http1_max_buf_size(s3_lite::limits::MAX_HEADER_SIZE)
            .serve(make_service)
    };

    info!("server is running at http://{}:{}/", args.host, args.port);
    server.await?;

    Ok(())
}
