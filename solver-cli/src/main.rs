mod config;

use std::env;
use std::fs::File;
use std::io::{self, prelude::*};
use std::path::PathBuf;
use std::process::exit;

use anyhow::{bail, Context, Result};
use clap::{value_t, App, Arg};
use env_logger::{fmt, Builder, Target};
use itertools::Itertools;
use log::{error, info, warn, Level, LevelFilter, Record};

use config::{Algorithm, Config, Format};
use solver::{Assignment, ParallelSolver, Problem, RecursiveSolver, Solver};
use sudoku::Sudoku;

fn init_logging() {
    let format = |buf: &mut fmt::Formatter, record: &Record| {
        if record.level() == Level::Info {
            writeln!(buf, "c {}", record.args())
        } else {
            writeln!(buf, "c {}: {}", record.level(), record.args())
        }
    };

    let mut builder = Builder::new();
    builder
        .target(Target::Stderr)
        .format(format)
        .filter(None, LevelFilter::Info);

    if let Ok(ref filters) = env::var("SATISFACTION_LOG") {
        builder.parse_filters(filters);
    }

    builder.init();
}

fn make_config() -> Result<Config> {
    let matches = App::new("satisfaction")
        .version("1.0")
        .author("Alex&Korbi&Radek inc.")
        .about("Lists every way to satisfy your desires (or proves there is none)")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .help("Input file (standard input if omitted)"),
        )
        .arg(
            Arg::with_name("format")
                .long("format")
                .value_name("FORMAT")
                .help("Input format")
                .takes_value(true)
                .possible_values(&["dimacs", "sudoku"])
                .default_value("dimacs"),
        )
        .arg(
            Arg::with_name("algorithm")
                .long("algorithm")
                .value_name("ALGORITHM")
                .help("Search strategy")
                .takes_value(true)
                .possible_values(&["recursive", "iterative", "parallel"])
                .default_value("iterative"),
        )
        .arg(
            Arg::with_name("limit")
                .short("n")
                .long("limit")
                .value_name("COUNT")
                .takes_value(true)
                .help("Stop after this many solutions (the parallel search still finds all of them first)"),
        )
        .arg(
            Arg::with_name("first")
                .long("first")
                .conflicts_with("limit")
                .help("Report a single solution; the parallel search returns whichever it finds first"),
        )
        .arg(
            Arg::with_name("complete")
                .long("complete")
                .help("Assign false to every variable a solution leaves open"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("File name for the output"),
        )
        .arg(
            Arg::with_name("return_code")
                .long("return-code")
                .short("r")
                .help("Will return 1 if satisfiable and 0 if not (useful for scripting)")
                .takes_value(false),
        )
        .get_matches();

    let format = match matches.value_of("format") {
        Some("sudoku") => Format::Sudoku,
        _ => Format::Dimacs,
    };

    let algorithm = match matches.value_of("algorithm") {
        Some("recursive") => Algorithm::Recursive,
        Some("parallel") => Algorithm::Parallel,
        _ => Algorithm::Iterative,
    };

    let limit = if matches.is_present("first") {
        Some(1)
    } else if matches.is_present("limit") {
        let limit = value_t!(matches, "limit", usize)?;
        if limit == 0 {
            bail!("--limit must be at least 1");
        }
        Some(limit)
    } else {
        None
    };

    Ok(Config {
        input: matches.value_of("input").map(PathBuf::from),
        output: matches.value_of("output").map(PathBuf::from),
        format,
        algorithm,
        limit,
        complete: matches.is_present("complete"),
        return_code: matches.is_present("return_code"),
    })
}

fn get_input(handle: &mut impl Read) -> io::Result<String> {
    let mut buffer = String::new();
    handle.read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn find_assignments(config: &Config, problem: Problem) -> Vec<Assignment> {
    info!("Searching with the {:?} strategy", config.algorithm);
    let limit = config.limit.unwrap_or(usize::MAX);

    match config.algorithm {
        _ if config.wants_any() => ParallelSolver::new().solve_any(problem).into_iter().collect(),
        Algorithm::Parallel => {
            if config.limit.is_some() {
                warn!("The parallel search enumerates every solution before applying --limit");
            }
            ParallelSolver::new().solve_all(problem).into_iter().take(limit).collect()
        }
        Algorithm::Recursive => RecursiveSolver::new().solve(problem).take(limit).collect(),
        Algorithm::Iterative => solver::solve(problem).take(limit).collect(),
    }
}

fn dimacs_report(config: &Config, problem: Problem) -> (bool, String) {
    let formula = problem.clone();
    let assignments = find_assignments(config, problem);
    info!("Found {} solution(s)", assignments.len());

    if assignments.is_empty() {
        return (false, "s UNSATISFIABLE\n".to_owned());
    }
    let models = assignments.iter()
        .map(|assignment| if config.complete {
            assignment.completed(&formula, false).to_dimacs()
        } else {
            assignment.to_dimacs()
        })
        .join("");
    (true, format!("s SATISFIABLE\n{}", models))
}

fn sudoku_report(config: &Config, sudoku: &Sudoku) -> (bool, String) {
    let grids = find_assignments(config, sudoku.problem().clone())
        .iter()
        .map(sudoku::sat_conversion::grid_from)
        .collect::<Vec<_>>();
    info!("Found {} solution(s)", grids.len());

    if grids.is_empty() {
        return (false, "s UNSATISFIABLE\n".to_owned());
    }
    (true, format!("s SATISFIABLE\n{}\n", grids.iter().join("\n\n")))
}

fn main_with_err() -> Result<i32> {
    let config = make_config()?;

    let input = match &config.input {
        None => {
            info!("Reading from standard input");
            get_input(&mut io::stdin())
        }
        Some(path) => {
            info!("Reading file '{}'", path.display());
            get_input(&mut File::open(path).with_context(|| format!("cannot open {}", path.display()))?)
        }
    }?;

    let (satisfiable, report) = match config.format {
        Format::Dimacs => dimacs_report(&config, Problem::from_dimacs(&input)?),
        Format::Sudoku => sudoku_report(&config, &input.parse::<Sudoku>()?),
    };

    match &config.output {
        Some(path) => std::fs::write(path, report)?,
        None => print!("{}", report),
    }

    Ok(if config.return_code && satisfiable { 1 } else { 0 })
}

fn main() {
    init_logging();
    let exit_code = match main_with_err() {
        Err(err) => {
            error!("{:#}", err);
            2
        }
        Ok(exit_code) => exit_code,
    };
    exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(algorithm: Algorithm, limit: Option<usize>) -> Config {
        Config {
            input: None,
            output: None,
            format: Format::Dimacs,
            algorithm,
            limit,
            complete: false,
            return_code: false,
        }
    }

    #[test]
    fn limit_applies_to_every_strategy() {
        let problem = Problem::from_ints(&[vec![1, 2], vec![3, 4]]).unwrap();
        let all = find_assignments(&config(Algorithm::Iterative, None), problem.clone());
        assert_eq!(all.len(), 4);

        for &algorithm in &[Algorithm::Recursive, Algorithm::Iterative, Algorithm::Parallel] {
            let limited = find_assignments(&config(algorithm, Some(2)), problem.clone());
            assert_eq!(limited, all[..2].to_vec());
        }

        let any = find_assignments(&config(Algorithm::Parallel, Some(1)), problem.clone());
        assert_eq!(any.len(), 1);
        assert!(any[0].satisfies(&problem));
    }

    #[test]
    fn report_lists_models() {
        let problem = Problem::from_ints(&[vec![1], vec![-2]]).unwrap();
        let (satisfiable, report) = dimacs_report(&config(Algorithm::Recursive, None), problem);
        assert!(satisfiable);
        assert_eq!(report, "s SATISFIABLE\nv 1 -2 \nv 0\n");

        let problem = Problem::from_ints(&[vec![1], vec![-1]]).unwrap();
        let (satisfiable, report) = dimacs_report(&config(Algorithm::Iterative, None), problem);
        assert!(!satisfiable);
        assert_eq!(report, "s UNSATISFIABLE\n");
    }
}
