// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An interactive shell for playing with an `RmqTree`.
//!
//! The shell keeps one tree over the keys `1..=N`, where key `i` starts out with value `i`, and
//! reads commands from standard input:
//!
//! - `update KEY VALUE` lowers the value of `KEY` to `VALUE`
//! - `rmq KEY1 KEY2` prints the smallest value in `[KEY1, KEY2]`
//! - `print` dumps the tree level by level
//! - `new SIZE` replaces the tree with a fresh one over `1..=SIZE`
//! - `help` lists the commands
//! - `quit` or `exit` leaves

use std::io::{self, BufRead, Write};
use std::num::ParseIntError;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use clap::Parser;
use semi_dynamic_rmq::{Error as RmqError, RmqTree};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const HELP: &str = "\
update KEY VALUE
rmq KEY1 KEY2
print
new TREE_SIZE
help
quit";

/// Interactive range minimum query shell
#[derive(Parser)]
#[command(name = "rmq-shell", version, about, long_about = None)]
struct Cli {
    /// Number of keys in the initial tree
    #[arg(short, long, default_value_t = 4)]
    size: i32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Update { key: i32, value: i64 },
    Rmq { left: i32, right: i32 },
    Print,
    New { size: i32 },
    Help,
    Quit,
}

#[derive(Debug, Error)]
enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),

    #[error("`{command}` takes {expected} argument(s)")]
    Arity {
        command: &'static str,
        expected: usize,
    },

    #[error("invalid number: {0}")]
    Number(#[from] ParseIntError),

    #[error(transparent)]
    Tree(#[from] RmqError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Command, CommandError> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or("");
        let args: Vec<&str> = words.collect();

        let arity = |command: &'static str, expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(CommandError::Arity { command, expected })
            }
        };

        match name {
            "update" => {
                arity("update", 2)?;
                Ok(Command::Update { key: args[0].parse()?, value: args[1].parse()? })
            }
            "rmq" => {
                arity("rmq", 2)?;
                Ok(Command::Rmq { left: args[0].parse()?, right: args[1].parse()? })
            }
            "print" => arity("print", 0).map(|_| Command::Print),
            "new" => {
                arity("new", 1)?;
                Ok(Command::New { size: args[0].parse()? })
            }
            "help" => arity("help", 0).map(|_| Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// The state of one shell run: the tree all commands operate on.
struct Session {
    tree: RmqTree<i32, i64>,
}

/// Builds a tree over the keys `1..=size`, each mapped to itself.
fn build_tree(size: i32) -> Result<RmqTree<i32, i64>, RmqError> {
    RmqTree::new((1..=size).map(|key| (key, i64::from(key))))
}

impl Session {
    fn new<W: Write>(size: i32, out: &mut W) -> Result<Session, CommandError> {
        let tree = Self::timed_build(size, out)?;
        Ok(Session { tree })
    }

    fn timed_build<W: Write>(size: i32, out: &mut W) -> Result<RmqTree<i32, i64>, CommandError> {
        let start = Instant::now();
        let tree = build_tree(size)?;
        let elapsed = start.elapsed();
        debug!(size, height = tree.height(), ?elapsed, "built tree");
        writeln!(out, "Built the RMQ tree in {} nanoseconds.", elapsed.as_nanos())?;
        Ok(tree)
    }

    fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow, CommandError> {
        debug!(?command, "executing");
        match command {
            Command::Update { key, value } => {
                let start = Instant::now();
                self.tree.update(&key, value)?;
                writeln!(out, "update in {} nanoseconds.", start.elapsed().as_nanos())?;
            }
            Command::Rmq { left, right } => {
                let start = Instant::now();
                let min = *self.tree.range_minimum(&left, &right)?;
                writeln!(out, "rmq in {} nanoseconds.", start.elapsed().as_nanos())?;
                writeln!(out, "{}", min)?;
            }
            Command::Print => write!(out, "{}", self.tree)?,
            Command::New { size } => {
                // A failed build keeps the current tree.
                self.tree = Self::timed_build(size, out)?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => {
                writeln!(out, "Bye!")?;
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }
}

/// Reads commands from `input` until `quit`, `exit` or end of input.
///
/// Bad commands are reported to `out` and skipped; only I/O errors end the loop early.
fn run<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W) -> io::Result<()> {
    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };
        let line = line.trim();
        if line.is_empty() { continue; }

        match line.parse::<Command>().and_then(|command| session.execute(command, out)) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => return Ok(()),
            Err(CommandError::Io(e)) => return Err(e),
            Err(e) => {
                warn!(command = line, error = %e, "command failed");
                writeln!(out, "ERROR: Could not execute command \"{}\": {}", line, e)?;
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut session = match Session::new(cli.size, &mut out) {
        Ok(session) => session,
        Err(e) => {
            error!(size = cli.size, error = %e, "could not build the initial tree");
            return ExitCode::FAILURE;
        }
    };
    info!(size = cli.size, "tree ready, type `help` for commands");

    match run(&mut session, io::stdin().lock(), &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "shell terminated");
            ExitCode::FAILURE
        }
    }
}
