//! CLI entry configuration and the REPL loop.

use std::io::{self, BufRead, Write as _};
use std::str::FromStr;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use corelib::cache::InMemoryCacheClientFactory;
use corelib::Ring;

use crate::commands::{Command, CommandResult, HELP_TEXT};

/// `ringcoord --size <N> [--seed <SEED>]`: a line-oriented REPL over a
/// freshly constructed ring.
#[derive(Debug, Parser)]
#[command(name = "ringcoord", about = "DHT ring-membership coordinator REPL")]
pub struct CliConfig {
    /// Ring size `N` (the modulus every key and node position is reduced
    /// against).
    #[arg(long, default_value_t = 1024)]
    pub size: u32,

    /// Seed for the position-selection PRNG, for a reproducible session.
    /// Omit for a session seeded from the OS's entropy source.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl CliConfig {
    pub fn run(self) -> anyhow::Result<()> {
        tracing_subscriber::fmt::try_init().ok();

        let span = tracing::info_span!("repl", size = self.size, seeded = self.seed.is_some());
        let _guard = span.enter();

        let mut ring = match self.seed {
            Some(seed) => Ring::with_rng(
                self.size,
                Box::new(InMemoryCacheClientFactory),
                Box::new(StdRng::seed_from_u64(seed)),
            )?,
            None => Ring::new(self.size, Box::new(InMemoryCacheClientFactory))?,
        };
        tracing::info!("session started");

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        println!("ringcoord ready (size={}). Type 'help' for commands.", self.size);

        for line in stdin.lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match Command::from_str(&line) {
                Ok(command) => {
                    tracing::debug!(?command, "dispatching command");
                    match run_command(&mut ring, command) {
                        CommandResult::Text(text) => {
                            println!("{text}");
                        }
                        CommandResult::Quit => {
                            println!("bye");
                            break;
                        }
                    }
                }
                Err(e) => println!("error: {e}"),
            }
            stdout.flush()?;
        }

        tracing::info!("session ended");
        Ok(())
    }
}

fn run_command(ring: &mut Ring, command: Command) -> CommandResult {
    match command {
        Command::Add { name, host, port } => match ring.add_node(name.clone(), host, port) {
            Ok(plan) => CommandResult::Text(format!(
                "{name} joined, {} key(s) migrated",
                plan.len()
            )),
            Err(e) => CommandResult::Text(format!("error: {e}")),
        },
        Command::Remove { name } => match ring.remove_node(&name) {
            Ok(plan) => CommandResult::Text(format!(
                "{name} left, {} key(s) migrated",
                plan.len()
            )),
            Err(e) => CommandResult::Text(format!("error: {e}")),
        },
        Command::Put { key, value } => match ring.put(&key, &value) {
            Ok((primary, secondary)) => {
                CommandResult::Text(format!("stored on {primary} (secondary {secondary})"))
            }
            Err(e) => CommandResult::Text(format!("error: {e}")),
        },
        Command::Get { key } => match ring.get(&key) {
            Ok(Some(value)) => CommandResult::Text(value),
            Ok(None) => CommandResult::Text("(nil)".to_string()),
            Err(e) => CommandResult::Text(format!("error: {e}")),
        },
        Command::Describe => CommandResult::Text(ring.describe()),
        Command::Help => CommandResult::Text(HELP_TEXT.to_string()),
        Command::Quit => CommandResult::Quit,
    }
}
