use std::env;
use std::path::PathBuf;
use thumbgen::logger::{self, LogLevel, LoggerConfig};
use thumbgen::{
    build_client, GenerationOrchestrator, GenerationOutcome, GenerationParameters,
    GeneratorConfig, SessionState, UploadedFile,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let level = env::var("THUMBGEN_LOG")
        .ok()
        .and_then(|value| LogLevel::parse(&value))
        .unwrap_or(LogLevel::Info);
    logger::init_with_config(LoggerConfig::new().with_level(level))?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let mut args = env::args().skip(1);
    let title = match args.next() {
        Some(title) => title,
        None => {
            eprintln!("usage: thumbgen <video title> <headshot> [headshot...]");
            std::process::exit(2);
        }
    };
    let files: Vec<UploadedFile> = args.map(UploadedFile::from_path).collect();

    let params = parameters_from_env(title)?;
    let out_dir = PathBuf::from(env::var("THUMBNAIL_OUT_DIR").unwrap_or_else(|_| ".".into()));

    let config = GeneratorConfig::from_env()?;
    logger::log_config_info(&config);

    let client = match build_client(&config).await {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Failed to initialize {} client: {}", config.provider, e);
            return Err(e.into());
        }
    };

    let mut session = SessionState::new();
    match session.add_references(&files).await {
        Ok(added) => log::info!("📸 Loaded {} headshot(s)", added),
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(e.into());
        }
    }

    log::info!(
        "🎨 Generating {} {} thumbnail(s) at {} for \"{}\"",
        params.variation_count,
        params.style,
        params.aspect_ratio,
        params.title
    );

    let orchestrator = GenerationOrchestrator::new(client);
    let outcome = match orchestrator.run(&session, &params).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(e.into());
        }
    };

    match &outcome {
        GenerationOutcome::Success(_) => {
            tokio::fs::create_dir_all(&out_dir).await?;
            for artifact in outcome.artifacts(&params.title) {
                let path = out_dir.join(&artifact.file_name);
                tokio::fs::write(&path, artifact.image.decode()?).await?;
                log::info!("💾 Thumbnail saved to: {}", path.display());
                println!("{}", path.display());
            }
            Ok(())
        }
        GenerationOutcome::Failure(message) => {
            log::error!("❌ {}", message);
            Err(message.clone().into())
        }
        GenerationOutcome::Idle | GenerationOutcome::Loading => {
            Err("generation finished without a result".into())
        }
    }
}

fn parameters_from_env(title: String) -> thumbgen::Result<GenerationParameters> {
    let mut params = GenerationParameters::new(title);
    if let Ok(ratio) = env::var("THUMBNAIL_ASPECT_RATIO") {
        params = params.with_aspect_ratio(ratio.parse()?);
    }
    if let Ok(style) = env::var("THUMBNAIL_STYLE") {
        params = params.with_style(style.parse()?);
    }
    if let Ok(count) = env::var("THUMBNAIL_COUNT") {
        let count = count.trim().parse::<u32>().map_err(|_| {
            thumbgen::ThumbnailError::Validation(thumbgen::INVALID_VARIATION_COUNT.into())
        })?;
        params = params.with_variation_count(count);
    }
    Ok(params)
}
