//! Command-line front end for the kestrel move generator and king-safety evaluator.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]
#![warn(clippy::unimplemented, clippy::todo)]
#![warn(clippy::option_unwrap_used, clippy::result_unwrap_used)]

use std::fs::File;
use std::io::BufReader;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use clap::{App, Arg, ArgMatches, SubCommand, crate_version};
use log::info;
use simplelog::{WriteLogger, LevelFilter, Config as LogConfig};
use kestrel::chess::{variations, Position};
use kestrel::engine::Game;
use kestrel::engine::config::Config;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn main() -> Result<(), Error> {
    let app_dir = dirs::home_dir()
        .map(|home| { home.join(".kestrel") })
        .unwrap_or_else(|| PathBuf::from("."));

    let fen_arg = Arg::with_name("fen")
        .value_name("FEN_STRING")
        .default_value(START_FEN)
        .hide_default_value(true)
        .help("Position in Forsyth-Edwards Notation (FEN)");

    let matches =
        App::new("Kestrel")
            .version(crate_version!())
            .author("Mike Leany")
            .arg(Arg::with_name("log")
                .long("log")
                .short("l")
                .global(true)
                .help("Turns on logging"))
            .arg(Arg::with_name("log-file")
                .long("log-file")
                .global(true)
                .value_name("LOG_FILE")
                .takes_value(true)
                .default_value("kestrel.log")
                .help("Sets the log file if logging is turned on"))
            .arg(Arg::with_name("log-level")
                .long("log-level")
                .global(true)
                .value_name("LEVEL")
                .takes_value(true)
                .default_value("info")
                .help("Sets the log level if logging is turned on"))
            .arg(Arg::with_name("config")
                .long("config")
                .short("c")
                .global(true)
                .value_name("CONFIG_FILE")
                .takes_value(true)
                .help("Reads settings from a YAML file instead of ~/.kestrel/config.yaml"))
            .subcommand(SubCommand::with_name("counts")
                .about("Counts the number of variations from a given starting position \
                        to a specified\ndepth. Defaults to the standard starting position.")
                .arg(Arg::with_name("depth")
                    .long("depth")
                    .short("d")
                    .value_name("DEPTH")
                    .takes_value(true)
                    .required_unless("file")
                    .conflicts_with("file")
                    .help("Depth to search the position"))
                .arg(Arg::with_name("file")
                    .long("file")
                    .short("f")
                    .value_name("EPD_FILE")
                    .takes_value(true)
                    .help("An EPD file of positions and expected counts to verify"))
                .arg(fen_arg.clone()
                    .multiple(true)
                    .conflicts_with("file")
                    .help("Positions to search in Forsyth-Edwards Notation (FEN)")))
            .subcommand(SubCommand::with_name("moves")
                .about("Lists the pseudo-legal moves of a position in the order they would be \
                        searched.")
                .arg(Arg::with_name("best")
                    .long("best")
                    .short("b")
                    .value_name("MOVE")
                    .takes_value(true)
                    .help("Move to try first, in coordinate notation"))
                .arg(Arg::with_name("killer")
                    .long("killer")
                    .short("k")
                    .value_name("MOVE")
                    .takes_value(true)
                    .multiple(true)
                    .number_of_values(1)
                    .max_values(2)
                    .help("Killer move, in coordinate notation; may be given twice"))
                .arg(Arg::with_name("captures")
                    .long("captures")
                    .help("Lists only captures and capturing promotions"))
                .arg(fen_arg.clone()))
            .subcommand(SubCommand::with_name("eval")
                .about("Prints the king-safety score of a position as (midgame, endgame).")
                .arg(fen_arg))
            .get_matches();

    let log_file = PathBuf::from(matches.value_of_os("log-file").expect("INFALLIBLE"));
    let log_level = match matches.value_of("log-level") {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        Some(level) => return Err(Error(format!("{}: invalid log level", level))),
        None => unreachable!(),
    };

    let _logger = if matches.is_present("log") {
        WriteLogger::init(
            log_level,
            LogConfig::default(),
            File::create(&log_file).map_err(|err| {
                Error(format!("{}: {}", log_file.display(), err))
            })?)
    } else {
        WriteLogger::init(LevelFilter::Off, LogConfig::default(), std::io::sink())
    };

    let config = load_config(&matches, &app_dir)?;

    match matches.subcommand() {
        ("counts", Some(matches)) => {
            if let Some(file) = matches.value_of("file") {
                return read_epd(Path::new(file));
            }

            let depth = matches
                .value_of("depth")
                .expect("INFALLIBLE")
                .parse()
                .map_err(|_| {Error("depth must be numeric".to_owned())})?;

            println!();
            for fen in matches.values_of("fen").expect("INFALLIBLE") {
                let pos = parse_fen(fen)?;
                println!("{}", fen);
                let count = variations::print(&pos, depth);
                println!("Depth {} total:\t{:12}\n", depth, count);
            }
        },
        ("moves", Some(matches)) => {
            let pos = parse_fen(matches.value_of("fen").expect("INFALLIBLE"))?;
            let mut game = Game::with_config(&config);

            if let Some(best) = matches.value_of("best") {
                game.set_best_move(0, parse_move(&pos, best)?);
            }
            if let Some(killers) = matches.values_of("killer") {
                // added in reverse so the first one given ends up in the first slot
                let killers = killers.map(|s| parse_move(&pos, s)).collect::<Result<Vec<_>, _>>()?;
                for mv in killers.into_iter().rev() {
                    game.add_killer(0, mv);
                }
            }

            let list = if matches.is_present("captures") {
                game.generate_captures(&pos, 0)
            } else {
                game.generate_moves(&pos, 0)
            };
            info!("{} moves generated for {}", list.len(), pos);

            let mut n = 0;
            while let Some(mv) = list.next_move() {
                n += 1;
                println!("{:3}. {:7}\t{:#}", n, mv, mv);
            }
        },
        ("eval", Some(matches)) => {
            let pos = parse_fen(matches.value_of("fen").expect("INFALLIBLE"))?;
            let game = Game::with_config(&config);
            println!("{}", game.evaluate_king_safety(&pos));
        },
        _ => {
            println!("{}", matches.usage());
        },
    }

    Ok(())
}

/// Reads the configuration named on the command line, or the one in the application directory if
/// it exists.
fn load_config(matches: &ArgMatches<'_>, app_dir: &Path) -> Result<Config, Error> {
    if let Some(path) = matches.value_of_os("config") {
        return Ok(Config::load(Path::new(path))?);
    }

    let path = app_dir.join("config.yaml");
    if path.is_file() {
        Ok(Config::load(&path)?)
    } else {
        Ok(Config::default())
    }
}

fn parse_fen(fen: &str) -> Result<Position, Error> {
    fen.parse().map_err(|err| {Error(format!("{}: {}", fen, err))})
}

fn parse_move(pos: &Position, s: &str) -> Result<kestrel::chess::Move, Error> {
    pos.parse_move(s).map_err(|err| {Error(format!("{}: {}", s, err))})
}

/// Checks every position in an EPD file against its expected counts, stopping at the first
/// mismatch.
fn read_epd(path: &Path) -> Result<(), Error> {
    let file = File::open(path).map_err(|err| Error(format!("{}: {}", path.display(), err)))?;

    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|err| {
            Error(format!("{}: line {}: {}", path.display(), line_num + 1, err))
        })?;
        check_epd_line(&line, line_num + 1).map_err(|err| {
            Error(format!("{}: line {}: {}", path.display(), line_num + 1, err))
        })?;
    }

    Ok(())
}

/// Checks one EPD line of the form `FEN ;D1 20 ;D2 400`
fn check_epd_line(line: &str, line_num: usize) -> Result<(), String> {
    let mut fields = line.split(';');
    let fen = match fields.next().map(str::trim) {
        Some(fen) if !fen.is_empty() => fen,
        _ => return Ok(()),
    };
    let pos: Position = fen.parse().map_err(|err| format!("{}: {}", fen, err))?;
    println!("\nLine {:3}:\t{}", line_num, fen);

    for field in fields {
        let nums: Vec<&str> = field.trim().trim_start_matches('D').split_whitespace().collect();
        if nums.len() < 2 {
            return Err(format!("\"{}\": not enough fields", field));
        } else if nums.len() > 2 {
            return Err(format!("\"{}\": too many fields", field));
        }

        let depth: usize = nums[0].parse().map_err(|err| format!("\"{}\": {}", nums[0], err))?;
        let expected: usize = nums[1].parse().map_err(|err| format!("\"{}\": {}", nums[1], err))?;

        println!("Depth {} expected:\t{:12}", depth, expected);
        let count = variations::count(&pos, depth);
        println!("Depth {} result:  \t{:12}", depth, count);
        if count != expected {
            return Err(format!("depth {}: expected {} but counted {}", depth, expected, count));
        }
    }

    Ok(())
}

struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.0.fmt(f)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Error { }

impl From<kestrel::engine::config::Error> for Error {
    fn from(err: kestrel::engine::config::Error) -> Self {
        Error(err.to_string())
    }
}
