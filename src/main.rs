use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{debug, error};
use tokio::io::{AsyncBufReadExt, BufReader};

use zona_client::{ClientConfig, Error, Provider, Session};

#[derive(Parser)]
#[command(name = "zona")]
#[command(author, version, about = "Terminal client for the Zona backend", long_about = None)]
struct Cli
{   #[arg(short, long, global = true)]
    verbose: bool

  , /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>

  , #[arg(long, global = true)]
    base_url: Option<String>

  , #[arg(short, long, global = true)]
    session: Option<String>

  , #[arg(short, long, global = true)]
    provider: Option<String>

  , /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>

  , #[command(subcommand)]
    command: Option<Commands>
}

#[derive(Subcommand)]
enum Commands
{   /// Send one prompt and print the answer
    Prompt
    {   text: String

      , #[arg(long)]
        obfuscate: bool
    }
  , /// List systems the backend can integrate with
    Systems
  , /// Register an API key for a system
    Add
    {   system: String
      , api_key: String
    }
  , /// Clear the backend's memory for a session
    Forget
    {   session_id: String
    }
  , /// Interactive prompt loop (default)
    Repl
}

#[tokio::main]
async fn main() -> ExitCode
{   let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await
    {   Ok(()) => ExitCode::SUCCESS
      , Err(e) => {
          eprintln!("Error: {}", e);
          ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool)
{   let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or(level)
    ).init();
}

/// Defaults, then config file, then environment, then flags
fn load_config(cli: &Cli) -> Result<ClientConfig, Error>
{   let base = match &cli.config
    {   Some(path) => ClientConfig::from_file(path)?
      , None => ClientConfig::default()
    };
    let mut config = base.apply_env()?;

    if let Some(url) = &cli.base_url
    {   config.base_url = url.clone();
    }
    if let Some(session) = &cli.session
    {   config.session_id = Some(session.clone());
    }
    if let Some(provider) = &cli.provider
    {   config.provider = Some(Provider::from(provider.as_str()));
    }
    if let Some(timeout) = cli.timeout
    {   config.timeout_secs = timeout;
    }

    config.validate()?;
    debug!("Effective config: {:?}", config);
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), Error>
{   let config = load_config(&cli)?;
    let mut session = Session::new(&config)?;

    match cli.command.unwrap_or(Commands::Repl)
    {   Commands::Prompt { text, obfuscate } => {
          let request = session.prompts()
            .request(text)
            .with_obfuscated_output(obfuscate);
          let answer = session.prompts().submit_prompt(request).await?;
          println!("{}", answer.response);
        }
      , Commands::Systems => {
          for system in session.refresh_systems().await?
          {   println!("{}", system);
          }
        }
      , Commands::Add { system, api_key } => {
          let added = session.integrations()
            .add_integration(&system, &api_key)
            .await?;
          println!(
            "{}",
            added.message.unwrap_or_else(|| format!("{} added", system))
          );
        }
      , Commands::Forget { session_id } => {
          session.prompts().clear_memory(&session_id).await?;
          println!("Memory cleared for {}", session_id);
        }
      , Commands::Repl => repl(&mut session).await
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
enum Line
{   Quit
  , Help
  , Systems
  , Select(String)
  , Add(String)
  , Forget
  , Unknown(String)
  , Prompt(String)
}

fn parse_line(line: &str) -> Line
{   let Some(command) = line.strip_prefix('/')
    else
    {   return Line::Prompt(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace)
    {   Some((name, arg)) => (name, arg.trim())
      , None => (command, "")
    };

    match name
    {   "quit" | "exit" => Line::Quit
      , "help" => Line::Help
      , "systems" => Line::Systems
      , "select" => Line::Select(arg.to_string())
      , "add" => Line::Add(arg.to_string())
      , "forget" => Line::Forget
      , other => Line::Unknown(other.to_string())
    }
}

const HELP: &str = "\
/systems          rescan detected systems
/select <name>    pick a system
/add <api-key>    register a key for the selected system
/forget           clear backend memory for this session
/quit             leave
anything else is sent as a prompt";

/// Errors are printed and the loop carries on with its prior state
async fn repl(session: &mut Session)
{   match session.refresh_systems().await
    {   Ok(systems) if systems.is_empty() => {
          println!("No systems detected");
        }
      , Ok(systems) => println!("Detected systems: {}", systems.join(", "))
      , Err(e) => eprintln!("Could not scan systems: {}", e)
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop
    {   print!("> ");
        let _ = std::io::stdout().flush();

        let line = match lines.next_line().await
        {   Ok(Some(line)) => line
          , Ok(None) => break
          , Err(e) => {
              error!("Failed to read stdin: {}", e);
              break;
            }
        };

        let outcome = match parse_line(&line)
        {   Line::Quit => break
          , Line::Help => {
              println!("{}", HELP);
              Ok(())
            }
          , Line::Systems => session.refresh_systems().await
              .map(|systems| println!("{}", systems.join(", ")))
          , Line::Select(name) => session.select_system(&name)
              .map(|()| println!("Selected {}", name))
          , Line::Add(api_key) => session.add_integration(&api_key).await
              .map(|_| println!("Integration added"))
          , Line::Forget => session.forget().await
              .map(|()| println!("Memory cleared"))
          , Line::Unknown(name) => {
              eprintln!("Unknown command /{} (try /help)", name);
              Ok(())
            }
          , Line::Prompt(text) => session.send(&text).await
              .map(|answer| println!("{}", answer))
        };

        if let Err(e) = outcome
        {   eprintln!("Error: {}", e);
        }
    }
}
