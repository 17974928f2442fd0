use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use turnscribe::cli::{Cli, Commands, ConfigAction, OutputFormat};
use turnscribe::config::Config;
use turnscribe::output;
use turnscribe::transcript::roles::RoleMap;
use turnscribe::transcript::segmenter::{SegmentOptions, segment_with};
use turnscribe::transcript::types::TranscriptResult;
use turnscribe::transcript::wire::TranscriptDocument;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Segment {
            input,
            format,
            roles,
            doctor_patient,
            attach_punctuation,
        } => {
            handle_segment(
                &config,
                input,
                format,
                roles,
                doctor_patient,
                attach_punctuation,
                cli.quiet,
            )?;
        }
        #[cfg(feature = "remote")]
        Commands::Run {
            media_uri,
            job_name,
            language,
            media_format,
            max_speakers,
            no_diarization,
            poll_interval,
            max_attempts,
            format,
            roles,
            doctor_patient,
            attach_punctuation,
        } => {
            handle_run(
                &config,
                media_uri,
                job_name,
                language,
                media_format,
                max_speakers,
                no_diarization,
                poll_interval,
                max_attempts,
                format,
                roles,
                doctor_patient,
                attach_punctuation,
                cli.quiet,
                cli.verbose,
            )
            .await?;
        }
        Commands::Config { action } => {
            handle_config_command(action, &config)?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "turnscribe",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Load configuration: explicit path must exist, default path may be absent.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => Config::default(),
        },
    };
    Ok(config.with_env_overrides())
}

fn handle_segment(
    config: &Config,
    input: Option<PathBuf>,
    format: OutputFormat,
    roles: Option<RoleMap>,
    doctor_patient: bool,
    attach_punctuation: bool,
    quiet: bool,
) -> Result<()> {
    let json = read_input(input.as_deref())?;
    let raw = TranscriptDocument::from_json(&json)?.into_raw()?;

    let options = SegmentOptions {
        attach_punctuation: attach_punctuation || config.segmenter.attach_punctuation,
    };
    let result = segment_with(&raw, &options);

    emit_result(config, &result, format, roles, doctor_patient, quiet)
}

#[cfg(feature = "remote")]
#[allow(clippy::too_many_arguments)]
async fn handle_run(
    config: &Config,
    media_uri: String,
    job_name: Option<String>,
    language: Option<String>,
    media_format: Option<String>,
    max_speakers: Option<u32>,
    no_diarization: bool,
    poll_interval: Option<std::time::Duration>,
    max_attempts: Option<u32>,
    format: OutputFormat,
    roles: Option<RoleMap>,
    doctor_patient: bool,
    attach_punctuation: bool,
    quiet: bool,
    verbose: u8,
) -> Result<()> {
    use turnscribe::job::{HttpJobService, JobRequest, PollPolicy, generate_job_name, run_job};

    if config.job.endpoint.is_empty() {
        bail!(
            "no transcription endpoint configured; set job.endpoint in the \
             config file or the TURNSCRIBE_ENDPOINT environment variable"
        );
    }

    let token = std::env::var("TURNSCRIBE_TOKEN")
        .ok()
        .filter(|t| !t.is_empty());
    let service = HttpJobService::new(&config.job.endpoint, token);

    let job_name = job_name.unwrap_or_else(|| {
        let identifier = media_uri.rsplit('/').next().unwrap_or(&media_uri);
        generate_job_name(identifier)
    });

    let mut request = JobRequest::new(&job_name, &media_uri)
        .with_language(language.as_deref().unwrap_or(&config.job.language))
        .with_media_format(media_format.as_deref().unwrap_or(&config.job.media_format));
    if no_diarization || !config.job.show_speaker_labels {
        request = request.without_diarization();
    } else {
        request =
            request.with_max_speakers(max_speakers.unwrap_or(config.job.max_speaker_labels));
    }

    let policy = PollPolicy {
        max_attempts: max_attempts.unwrap_or(config.job.max_poll_attempts),
        initial_delay: poll_interval
            .unwrap_or_else(|| std::time::Duration::from_secs(config.job.poll_delay_secs)),
        ..PollPolicy::default()
    };

    let options = SegmentOptions {
        attach_punctuation: attach_punctuation || config.segmenter.attach_punctuation,
    };

    if !quiet {
        eprintln!("Submitting job {job_name} for {media_uri}");
        if verbose > 0 {
            eprintln!(
                "  language={} format={} diarization={} max_attempts={} poll_delay={:?}",
                request.language_code,
                request.media_format,
                request.show_speaker_labels,
                policy.max_attempts,
                policy.initial_delay,
            );
        }
    }
    let session = run_job(&service, &request, &policy, &options).await?;
    if !quiet {
        eprintln!("Job {} completed", session.job_name);
    }

    emit_result(config, &session.result, format, roles, doctor_patient, quiet)
}

/// Print the result to stdout and, unless quiet, a summary line to stderr.
fn emit_result(
    config: &Config,
    result: &TranscriptResult,
    format: OutputFormat,
    roles: Option<RoleMap>,
    doctor_patient: bool,
    quiet: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", output::render_json(result)?);
        }
        OutputFormat::Text => {
            let roles = resolve_roles(config, roles, doctor_patient);
            let color = config.output.color && std::io::stdout().is_terminal();
            println!("{}", output::render_text(result, &roles, color));
        }
    }

    if !quiet {
        eprintln!("{}", output::summary_line(result));
    }
    Ok(())
}

/// Pick the role mapping: explicit `--roles`, then the two-party flag, then
/// the configured default, then passthrough.
fn resolve_roles(config: &Config, roles: Option<RoleMap>, doctor_patient: bool) -> RoleMap {
    match roles {
        Some(roles) => roles,
        None if doctor_patient || config.output.doctor_patient_roles => RoleMap::doctor_patient(),
        None => RoleMap::passthrough(),
    }
}

/// Read the result document from a file or stdin.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read result document from stdin")?;
            Ok(buffer)
        }
    }
}

fn handle_config_command(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Path => match Config::default_path() {
            Some(path) => println!("{}", path.display()),
            None => bail!("could not determine the config directory"),
        },
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(config)?);
        }
    }
    Ok(())
}
