use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ai_playlist_maker::assembler::export_to_current_user;
use ai_playlist_maker::storage::{self, PLAYLISTS_DIR, SESSION_FILE, StoredSession};
use ai_playlist_maker::{
    Config, GeminiClient, GeneratedPlaylist, GenerationRequest, IdeaRequest, Language,
    PlaylistAssembler, SongCount, SpotifyClient,
};

#[derive(Parser)]
#[command(name = "ai-playlist-maker")]
#[command(about = "Generate AI-curated playlists and export them to Spotify")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a playlist from a description
    Generate {
        /// What the playlist should feel like, e.g. "rainy evening chai"
        prompt: String,

        /// English, Hindi or Gujarati
        #[arg(short, long, default_value = "English")]
        language: Language,

        /// Number of songs: 10, 20 or 30
        #[arg(short, long, default_value_t = 20, value_parser = parse_song_count)]
        songs: u32,

        /// Save the playlist as JSON under ./playlists
        #[arg(long)]
        save: bool,
    },

    /// Suggest playlist ideas for a theme
    Suggest {
        prompt: String,

        #[arg(short, long, default_value = "English")]
        language: Language,
    },

    /// Connect your Spotify account
    Connect,

    /// Refresh the stored Spotify authorization
    Refresh,

    /// Show which Spotify account is connected
    Status,

    /// Forget the connected Spotify account
    Disconnect,

    /// List saved playlists
    List,

    /// Export a saved playlist to your Spotify account
    Export {
        /// Playlist JSON written by `generate --save`
        playlist: PathBuf,

        /// Export again even if the playlist was already exported
        #[arg(long)]
        force: bool,
    },

    /// Show setup guide
    Setup,
}

fn parse_song_count(value: &str) -> std::result::Result<u32, String> {
    let count: u32 = value.parse().map_err(|_| format!("not a number: {}", value))?;
    SongCount::try_from(count)
        .map(u32::from)
        .map_err(|e| e.to_string())
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            prompt,
            language,
            songs,
            save,
        } => {
            let song_count = SongCount::try_from(songs)?;
            generate(&prompt, language, song_count, save).await?;
        }
        Commands::Suggest { prompt, language } => {
            suggest(&prompt, language).await?;
        }
        Commands::Connect => {
            connect().await?;
        }
        Commands::Refresh => {
            refresh().await?;
        }
        Commands::Status => {
            show_status()?;
        }
        Commands::Disconnect => {
            disconnect()?;
        }
        Commands::List => {
            list_playlists()?;
        }
        Commands::Export { playlist, force } => {
            export(&playlist, force).await?;
        }
        Commands::Setup => {
            show_setup_guide();
        }
    }

    Ok(())
}

/// Loads configuration and exits listing the missing keys. Only `generate`
/// and `suggest` need the Gemini key.
fn load_config(needs_model: bool) -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let missing = if needs_model {
        config.get_missing_config()
    } else {
        config.missing_spotify_config()
    };
    if !missing.is_empty() {
        println!("{}", "Missing configuration:".red());
        for item in &missing {
            println!("   - {}", item);
        }
        println!(
            "\n{}",
            "Please copy .env.example to .env and fill in your credentials.".yellow()
        );
        std::process::exit(1);
    }

    Ok(config)
}

fn build_assembler(config: &Config) -> Result<PlaylistAssembler<GeminiClient, SpotifyClient>> {
    let model = GeminiClient::new(config).context("Failed to initialize Gemini client")?;
    println!("{} {}", "Model:".dimmed(), model.model());
    let catalog = SpotifyClient::new(config).context("Failed to initialize Spotify client")?;
    Ok(PlaylistAssembler::new(model, catalog))
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn generate(prompt: &str, language: Language, song_count: SongCount, save: bool) -> Result<()> {
    println!("{}", "AI Playlist Maker".cyan().bold());
    println!("{}", "=".repeat(50));

    let config = load_config(true)?;
    let request = GenerationRequest::new(prompt, language, song_count)?;
    let assembler = build_assembler(&config)?;

    let pb = spinner("Curating songs...");
    let result = assembler.generate(&request).await;
    pb.finish_and_clear();

    let playlist = result.context("Failed to generate playlist")?;
    print_playlist(&playlist);

    if save {
        let path = storage::save_playlist(Path::new(PLAYLISTS_DIR), &playlist)?;
        println!("\n{} {}", "Saved to".green(), path.display());
        println!(
            "Export it with: ai-playlist-maker export {}",
            path.display()
        );
    }

    Ok(())
}

fn print_playlist(playlist: &GeneratedPlaylist) {
    println!("\n{}", playlist.name.green().bold());
    println!("{}", playlist.description.cyan());
    println!(
        "Mood: {} | Genre: {} | Language: {}",
        playlist.mood, playlist.genre, playlist.language
    );
    println!("{}", "-".repeat(50));

    for (i, song) in playlist.songs.iter().enumerate() {
        let marker = if song.spotify_id.is_some() {
            "✓".green()
        } else {
            "✗".red()
        };
        println!(
            "{:2}. {} {} - {}{}",
            i + 1,
            marker,
            song.name,
            song.artist.cyan(),
            song.duration
                .as_deref()
                .map(|d| format!(" ({})", d))
                .unwrap_or_default()
        );
        println!("       {}", song.reason.dimmed());
    }

    let found = playlist
        .songs
        .iter()
        .filter(|s| s.spotify_id.is_some())
        .count();
    println!(
        "\n{}",
        format!("{}/{} songs found on Spotify", found, playlist.songs.len()).cyan()
    );
}

async fn suggest(prompt: &str, language: Language) -> Result<()> {
    println!("{}", "Playlist Ideas".cyan().bold());
    println!("{}", "=".repeat(50));

    let config = load_config(true)?;
    let request = IdeaRequest::new(prompt, language)?;
    let assembler = build_assembler(&config)?;

    let pb = spinner("Thinking of ideas...");
    let ideas = assembler.suggest(&request).await;
    pb.finish_and_clear();

    for (i, idea) in ideas.iter().enumerate() {
        println!("{:2}. {} [{}]", i + 1, idea.name.green(), idea.mood);
        println!("     {}", idea.theme.cyan());
    }

    Ok(())
}

async fn connect() -> Result<()> {
    println!("{}", "Connect Spotify".cyan().bold());
    println!("{}", "=".repeat(50));

    let config = load_config(false)?;
    let client = SpotifyClient::new(&config)?;

    let url = client.authorize_url()?;
    println!("Open this URL in your browser and approve access:\n");
    println!("  {}\n", url.underline());
    print!("Paste the URL you were redirected to: ");
    io::stdout().flush()?;

    let mut redirect = String::new();
    io::stdin()
        .lock()
        .read_line(&mut redirect)
        .context("Failed to read redirect URL")?;

    let code = SpotifyClient::parse_redirect_code(&redirect)?;
    let token = client
        .exchange_code(&code)
        .await
        .context("Failed to authorize with Spotify")?;
    let profile = client
        .get_user_profile(&token.access_token)
        .await
        .context("Failed to fetch Spotify profile")?;

    storage::save_session(
        Path::new(SESSION_FILE),
        &StoredSession {
            spotify_user_id: profile.id.clone(),
            display_name: profile.display_name.clone(),
            token,
        },
    )?;

    println!(
        "\n{} {}",
        "Connected as".green(),
        profile.display_name.as_deref().unwrap_or(&profile.id)
    );

    Ok(())
}

fn load_stored_session() -> Result<StoredSession> {
    match storage::load_session(Path::new(SESSION_FILE))? {
        Some(session) => Ok(session),
        None => {
            println!(
                "{}",
                "No Spotify account connected. Run `ai-playlist-maker connect` first.".yellow()
            );
            std::process::exit(1);
        }
    }
}

async fn refresh_session(
    client: &SpotifyClient,
    session: &mut StoredSession,
) -> ai_playlist_maker::Result<()> {
    session.token = client.refresh_user_token(&session.token).await?;
    storage::save_session(Path::new(SESSION_FILE), session)
}

fn retry_hint(e: &ai_playlist_maker::AppError) {
    if e.is_retryable() {
        println!(
            "{}",
            "Spotify is unavailable or rate limiting requests. Try again in a moment.".yellow()
        );
    }
}

fn exit_reconnect() -> ! {
    println!(
        "{}",
        "Spotify authorization has expired or was revoked. Run `ai-playlist-maker connect` again."
            .red()
    );
    std::process::exit(2);
}

async fn refresh() -> Result<()> {
    let config = load_config(false)?;
    let client = SpotifyClient::new(&config)?;
    let mut session = load_stored_session()?;

    match refresh_session(&client, &mut session).await {
        Ok(()) => {
            println!("{}", "Spotify authorization refreshed".green());
            Ok(())
        }
        Err(e) if e.requires_reauth() => exit_reconnect(),
        Err(e) => {
            retry_hint(&e);
            Err(e).context("Failed to refresh Spotify authorization")
        }
    }
}

fn show_status() -> Result<()> {
    println!("{}", "Spotify Connection".cyan().bold());
    println!("{}", "=".repeat(50));

    match storage::load_session(Path::new(SESSION_FILE))? {
        Some(session) => {
            println!(
                "{} {} ({})",
                "Connected as".green(),
                session
                    .display_name
                    .as_deref()
                    .unwrap_or(&session.spotify_user_id),
                session.spotify_user_id
            );
            if session.token.is_expired(Utc::now()) {
                println!(
                    "{}",
                    "Access token expired, it is refreshed on the next export".yellow()
                );
            }
        }
        None => println!("{}", "Not connected".yellow()),
    }

    Ok(())
}

fn disconnect() -> Result<()> {
    if storage::delete_session(Path::new(SESSION_FILE))? {
        println!("{}", "Spotify account disconnected".green());
    } else {
        println!("{}", "No Spotify account was connected".yellow());
    }
    Ok(())
}

fn list_playlists() -> Result<()> {
    println!("{}", "Saved Playlists".cyan().bold());
    println!("{}", "=".repeat(50));

    let playlists = storage::list_playlists(Path::new(PLAYLISTS_DIR))
        .context("Failed to read saved playlists")?;

    if playlists.is_empty() {
        println!("{}", "No playlists saved yet".yellow());
        return Ok(());
    }

    for (i, (path, playlist)) in playlists.iter().enumerate() {
        let exported = if playlist.spotify_playlist_id.is_some() {
            " [on Spotify]".green().to_string()
        } else {
            String::new()
        };
        println!(
            "{:2}. {} ({} songs, {}){}",
            i + 1,
            playlist.name.green(),
            playlist.songs.len(),
            playlist.language,
            exported
        );
        println!(
            "     {} | {}",
            playlist.generated_at.format("%Y-%m-%d %H:%M"),
            path.display().to_string().dimmed()
        );
    }

    println!("\n{}", format!("Total: {} playlists", playlists.len()).cyan());

    Ok(())
}

async fn export(path: &Path, force: bool) -> Result<()> {
    println!("{}", "Export to Spotify".cyan().bold());
    println!("{}", "=".repeat(50));

    let config = load_config(false)?;
    let client = SpotifyClient::new(&config)?;
    let mut playlist = storage::load_playlist(path)
        .with_context(|| format!("Failed to read playlist {}", path.display()))?;

    if let Some(remote_id) = playlist.spotify_playlist_id.as_deref() {
        if !force {
            println!(
                "{} {}",
                "Already exported as Spotify playlist".yellow(),
                remote_id
            );
            println!("Use --force to create another copy.");
            return Ok(());
        }
    }

    let mut session = load_stored_session()?;

    if session.token.is_expired(Utc::now()) {
        match refresh_session(&client, &mut session).await {
            Ok(()) => {}
            Err(e) if e.requires_reauth() => exit_reconnect(),
            Err(e) => {
                retry_hint(&e);
                return Err(e).context("Failed to refresh Spotify authorization");
            }
        }
    }

    let pb = spinner(&format!("Creating \"{}\"...", playlist.name));
    let result = export_to_current_user(&client, &session.token.access_token, &playlist).await;
    pb.finish_and_clear();

    match result {
        Ok(remote) => {
            println!(
                "{} {} ({}/{} tracks)",
                "Created".green(),
                remote.name.bold(),
                remote.tracks_added,
                playlist.songs.len()
            );
            if let Some(url) = remote.url.as_deref() {
                println!("  {}", url.underline());
            }
            storage::record_export(path, &mut playlist, &remote)
                .context("Playlist was exported but the local file could not be updated")?;
            Ok(())
        }
        Err(e) if e.requires_reauth() => exit_reconnect(),
        Err(e) => {
            retry_hint(&e);
            Err(e).context("Failed to export playlist")
        }
    }
}

fn show_setup_guide() {
    println!("{}", "AI Playlist Maker Setup Guide".cyan().bold());
    println!("{}", "=".repeat(50));

    println!("\n{}", "1. Gemini API Setup".yellow());
    println!("   - Go to https://aistudio.google.com/app/apikey");
    println!("   - Create an API key");

    println!("\n{}", "2. Spotify API Setup".yellow());
    println!("   - Go to https://developer.spotify.com/dashboard/");
    println!("   - Create a new app");
    println!("   - Copy your Client ID and Client Secret");
    println!("   - Add 'http://127.0.0.1:8080/callback' as a redirect URI");

    println!("\n{}", "3. Configuration".yellow());
    println!("   - Create a .env file with:");
    println!("     GEMINI_API_KEY=your_gemini_api_key");
    println!("     GEMINI_MODEL=gemini-2.0-flash-lite   (optional)");
    println!("     SPOTIFY_CLIENT_ID=your_spotify_client_id");
    println!("     SPOTIFY_CLIENT_SECRET=your_spotify_client_secret");
    println!("     SPOTIFY_REDIRECT_URI=http://127.0.0.1:8080/callback");

    println!("\n{}", "4. Usage".yellow());
    println!("   - ai-playlist-maker generate \"rainy evening\" --songs 10 --save");
    println!("   - ai-playlist-maker suggest \"road trip\" --language Hindi");
    println!("   - ai-playlist-maker list");
    println!("   - ai-playlist-maker connect");
    println!("   - ai-playlist-maker status");
    println!("   - ai-playlist-maker export playlists/playlist_<timestamp>.json");
    println!("   - ai-playlist-maker disconnect");

    println!("\n{}", "Ready to make some playlists!".green());
}
