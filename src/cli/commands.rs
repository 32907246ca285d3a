use crate::cli::args::{Args, Command, ConfigCommand};
use crate::cli::editor::LineEditor;
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::cli::shell::Shell;
use crate::core::command::{CommandDispatcher, CommandRegistry};
use crate::core::results::RemoteResponse;
use crate::domain::config::{OutputMode, ProfileConfig, DEFAULT_PROFILE};
use crate::domain::error::{HavocError, HavocResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::remote::HttpClient;
use tracing::info;

/// Execute CLI command
pub async fn execute_command(args: Args) -> HavocResult<()> {
    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let requested_mode = args.output.map(OutputMode::from);

    match args.command.unwrap_or(Command::Shell) {
        Command::Config { command: ConfigCommand::Init } => {
            init_logging("warn", args.verbose);
            config_manager.init_config()?;
            let mut writer = ConsoleWriter::new(requested_mode.unwrap_or_default());
            writer.write_message(&format!(
                "Configuration initialized at '{}'",
                config_manager.config_path().display()
            ))?;
            Ok(())
        }
        Command::Commands => {
            init_logging("warn", args.verbose);
            list_commands(&mut ConsoleWriter::new(requested_mode.unwrap_or_default()))
        }
        Command::Config { command: ConfigCommand::Show } => {
            let (profile, mut writer) =
                load_profile(&config_manager, args.profile.as_deref(), requested_mode, args.verbose)?;
            show_profile(&mut writer, &profile)
        }
        Command::Shell => {
            let (profile, writer) =
                load_profile(&config_manager, args.profile.as_deref(), requested_mode, args.verbose)?;
            let mut editor = LineEditor::new(
                CommandRegistry::standard(),
                Some(config_manager.history_path()),
            )?;
            let mut shell = Shell::new(dispatcher(&profile)?, writer);
            shell.run(&mut editor).await
        }
        Command::Run { line } => {
            let (profile, writer) =
                load_profile(&config_manager, args.profile.as_deref(), requested_mode, args.verbose)?;
            let mut shell = Shell::new(dispatcher(&profile)?, writer);
            shell.execute_line(&line.join(" ")).await?;
            Ok(())
        }
    }
}

/// Load the selected profile, start logging and pick the output mode
fn load_profile(
    config_manager: &ConfigManager,
    name: Option<&str>,
    requested_mode: Option<OutputMode>,
    verbose: bool,
) -> HavocResult<(ProfileConfig, ConsoleWriter)> {
    let profile = config_manager.load_profile(name)?;
    init_logging(&profile.log_level, verbose);
    let mode = requested_mode.unwrap_or(profile.output);
    info!(
        "Using profile '{}' against {} (output {}, tokenizer {})",
        name.unwrap_or(DEFAULT_PROFILE),
        profile.api_domain_name,
        mode,
        profile.tokenizer
    );
    Ok((profile, ConsoleWriter::new(mode)))
}

fn dispatcher(profile: &ProfileConfig) -> HavocResult<CommandDispatcher<HttpClient>> {
    let client = HttpClient::new(profile)?;
    Ok(CommandDispatcher::new(
        CommandRegistry::standard(),
        client,
        profile.tokenizer,
    ))
}

fn list_commands(writer: &mut ConsoleWriter) -> HavocResult<()> {
    for spec in CommandRegistry::standard().iter() {
        writer.write_text(&format!("{:24} {}", spec.name, spec.summary))?;
    }
    Ok(())
}

fn show_profile(writer: &mut ConsoleWriter, profile: &ProfileConfig) -> HavocResult<()> {
    let masked = serde_json::to_value(profile.masked())?;
    let response = RemoteResponse::from_value(masked).ok_or_else(|| {
        HavocError::Output("Profile did not serialize to an object".to_string())
    })?;
    writer.write_response("config", &response)?;
    Ok(())
}
