mod app;

use std::{env, path::PathBuf, process::ExitCode};

use log::{error, info};

use quizduel_client::QuizConfig;

use app::App;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(document) = args.next().map(PathBuf::from) else {
        error!("Usage: local_duel <document.pdf|document.pptx> [service base url]");
        return ExitCode::FAILURE;
    };

    let mut config = QuizConfig::default();
    if let Some(base) = args.next() {
        config = config.with_service_base(&base);
    }
    if let Err(err) = config.validate() {
        error!("Invalid configuration: {}", err);
        return ExitCode::FAILURE;
    }

    info!("Quizduel Local Duel Demo started");

    let app = match App::new(config, &document).await {
        Ok(app) => app,
        Err(err) => {
            error!("Could not set up the duel: {}", err);
            return ExitCode::FAILURE;
        }
    };
    app.run().await;

    ExitCode::SUCCESS
}
