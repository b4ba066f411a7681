use thumbgen::{
    build_client, AspectRatio, GeminiConfig, GenerationOrchestrator, GenerationParameters,
    GeneratorConfig, SessionState, ThumbnailStyle, UploadedFile,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }
    thumbgen::logger::init()?;

    let api_key = env::var("GEMINI_API_KEY")?;
    let headshot = env::var("HEADSHOT_PATH").unwrap_or_else(|_| "headshot.jpg".to_string());
    let config = GeneratorConfig::new().with_gemini(GeminiConfig::new().with_api_key(api_key));

    let mut session = SessionState::new();
    session
        .add_references(&[UploadedFile::from_path(headshot)])
        .await?;

    let params = GenerationParameters::new("I Survived 7 Days in the Andes")
        .with_aspect_ratio(AspectRatio::Widescreen)
        .with_style(ThumbnailStyle::Cinematic)
        .with_variation_count(2);

    let orchestrator = GenerationOrchestrator::new(build_client(&config).await?);
    let outcome = orchestrator.run(&session, &params).await?;

    for artifact in outcome.artifacts(&params.title) {
        std::fs::write(&artifact.file_name, artifact.image.decode()?)?;
        println!("saved {}", artifact.file_name);
    }
    if let Some(message) = outcome.error() {
        println!("{}", message);
    }

    Ok(())
}
