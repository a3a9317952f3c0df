//! Interactive REPL for Forseti
//!
//! Reads one command, prints its reply, and only then reads the next.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::agent::{Dispatcher, OperationExecutor};
use crate::browser::AgentBrowser;
use crate::cli::commands::{handle_command, CommandContext, CommandResult};
use crate::core::{ChainedCredentials, Config, CredentialSource, EnvCredentials, KeyFile, Result};

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    config: Config,
    dispatcher: Dispatcher,
    key_file: KeyFile,
    browser_available: bool,
}

impl Repl {
    /// Create a REPL with custom configuration
    pub async fn with_config(config: Config) -> Result<Self> {
        let key_file = KeyFile::default_location();
        let credentials: Arc<dyn CredentialSource> = Arc::new(ChainedCredentials::new(vec![
            Box::new(EnvCredentials),
            Box::new(key_file.clone()),
        ]));

        let browser = AgentBrowser::from_config(&config.browser);
        let browser_available = browser.is_available().await;
        let executor = OperationExecutor::with_agent_browser(browser);
        let dispatcher = Dispatcher::from_config(&config, credentials, executor)?;

        Ok(Self {
            config,
            dispatcher,
            key_file,
            browser_available,
        })
    }

    /// Run a single command and return its reply
    pub async fn run_once(&mut self, command: &str) -> String {
        self.dispatcher.dispatch(command).await
    }

    /// Run the REPL
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        if !self.browser_available {
            println!("⚠️  agent-browser not found. Page commands will fail until it is installed.");
            println!("   To enable: npm install -g agent-browser && agent-browser install\n");
        }

        if !self.config.is_offline() && !self.dispatcher.has_credential() {
            println!("⚠️  No API key configured. Use '/key <api-key>' or set FORSETI_API_KEY.\n");
        }

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            print!("You: ");
            stdout.flush()?;

            let mut input = String::new();
            match stdin.lock().read_line(&mut input) {
                Ok(0) => {
                    // EOF (Ctrl+D)
                    println!("\nGoodbye!");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    continue;
                }
            }

            let input = input.trim();
            if input.is_empty() {
                continue;
            }

            let ctx = CommandContext {
                config: &self.config,
                dispatcher: &self.dispatcher,
                key_file: &self.key_file,
                browser_available: self.browser_available,
            };

            match handle_command(input, &ctx) {
                CommandResult::Exit => {
                    println!("\nGoodbye!");
                    break;
                }
                CommandResult::Handled(output) => println!("{}\n", output),
                CommandResult::Continue(command) => {
                    let reply = self.dispatcher.dispatch(&command).await;
                    println!("Forseti: {}\n", reply);
                }
            }
        }

        Ok(())
    }

    /// Print the startup banner
    fn print_banner(&self) {
        println!();
        println!("Forseti - natural-language browser control");
        println!("Translator: {}", self.dispatcher.translator_name());
        if !self.config.is_offline() {
            println!("Endpoint:   {}", self.config.translator.base_url);
            println!("Model:      {}", self.config.translator.model);
        }
        println!("Session:    {}", self.config.browser.session_name);
        println!();
        println!("Commands: help, status, /key <api-key>, exit");
        println!("───────────────────────────────────────────────");
    }
}
