use std::io::BufRead;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{anyhow, Result};
use log::info;
use rustyline::config::Builder;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Editor};

use mvcc::dispatcher::Connection;
use mvcc::error::Error;
use mvcc::mvcc::{Database, Isolation};

use crate::config::{ConfigLoad, DEFAULT_PROMPT};
use crate::rusty::CliHelper;
use crate::show::Show;

/// Owns the shared engine and one REPL-facing connection into it, and drives
/// both the interactive prompt and the non-interactive line-at-a-time reader.
pub struct Session {
    settings: ConfigLoad,
    conn: Connection,
}

impl Session {
    pub fn try_new(settings: ConfigLoad, is_repl: bool) -> Result<Self> {
        if is_repl {
            println!("Welcome to {}.", DEFAULT_PROMPT);
            println!();
        }

        let default_isolation: Isolation = settings
            .default_isolation
            .as_deref()
            .unwrap_or("read-committed")
            .parse()
            .map_err(|e: mvcc::mvcc::ParseIsolationError| anyhow!(e.to_string()))?;
        let db = Arc::new(Mutex::new(Database::new(default_isolation)));

        Ok(Self { settings, conn: Connection::new(db) })
    }

    fn prompt(&self) -> String {
        match self.settings.prompt.as_deref() {
            Some(p) => format!("{} > ", p.trim_end()),
            None => format!("{} > ", DEFAULT_PROMPT),
        }
    }

    pub fn handle_repl(&mut self) {
        let config = Builder::new().completion_prompt_limit(5).completion_type(CompletionType::Circular).build();
        let mut rl = Editor::<CliHelper, DefaultHistory>::with_config(config).unwrap();

        let keywords = Arc::new(crate::rusty::KEYWORDS.iter().map(|s| s.to_string()).collect());
        rl.set_helper(Some(CliHelper::with_keywords(keywords)));
        rl.load_history(&history_path()).ok();

        'repl: loop {
            match rl.readline(&self.prompt()) {
                Ok(line) => {
                    let _ = rl.add_history_entry(&line);
                    match self.handle_query(true, &line) {
                        Ok(false) => break 'repl,
                        Ok(true) => {}
                        Err(e) => eprintln!("error: {e}"),
                    }
                }
                Err(ReadlineError::Io(err)) => eprintln!("io err: {err}"),
                Err(ReadlineError::Interrupted) => println!("^C"),
                Err(ReadlineError::Eof) => break,
                Err(_) => {}
            }
        }

        println!("Bye~");
        let _ = rl.save_history(&history_path());
    }

    pub fn handle_reader<R: BufRead>(&mut self, r: R) -> Result<()> {
        let start = Instant::now();

        for line in r.lines() {
            let line = line.map_err(|e| anyhow!("read lines err: {e}"))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.handle_query(false, line)?;
        }

        println!("{:.3}", start.elapsed().as_secs_f64());
        Ok(())
    }

    /// Runs one line. Returns `Ok(false)` on `exit`/`quit` to signal the REPL
    /// should stop; `Ok(true)` otherwise.
    fn handle_query(&mut self, is_repl: bool, query: &str) -> Result<bool> {
        let query = query.trim_end_matches(';').trim();
        if is_repl && (query == "exit" || query == "quit") {
            return Ok(false);
        }

        if query.starts_with('.') {
            let parts = query.trim_start_matches('.').split_whitespace().collect::<Vec<_>>();
            if parts.len() != 2 {
                return Err(anyhow!("control command error, must be `.cmd_name cmd_value`"));
            }
            self.settings.inject_cmd(parts[0], parts[1])?;
            info!("refresh config: {:?}", &self.settings);
            if is_repl {
                eprintln!("OK ~");
            }
            return Ok(true);
        }

        let start = Instant::now();
        let show = Show::new_with_start(self.settings.show_stats.unwrap_or(false), is_repl, start);

        match self.conn.execute(query) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}");
                }
                show.output(1);
            }
            Err(Error::NoSuchKey) => {
                println!("N/A ~");
                show.output(0);
            }
            Err(err) => {
                eprintln!("{err}");
                show.output(0);
            }
        }

        Ok(true)
    }
}

fn history_path() -> String {
    format!("{}/.mvcc_cli_history", std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}
