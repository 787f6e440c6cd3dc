
extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate term_grid;

pub mod assembler;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tHex Output: {}\n\tOutfile: {}\n\tInfile: {}",
        match args.occurrences_of("verbose") {
            0 => log::LevelFilter::Error.to_string(),
            1 => log::LevelFilter::Warn.to_string(),
            2 => log::LevelFilter::Info.to_string(),
            3 | _ => log::LevelFilter::Debug.to_string(),
        },
        args.is_present("hex"),
        args.value_of("output").unwrap_or("None"),
        args.value_of("INPUT").unwrap_or("None")
    );

    // INPUT is required, so clap has already rejected a missing one.
    let ipath = Path::new(args.value_of("INPUT").unwrap_or_default());

    let source = match std::fs::read_to_string(&ipath) {
        Err(err) => {
            error!("fatal: unable to open input file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(source) => source,
    };

    let ast = match assembler::parser::Parser::new(&source).run() {
        // Each error has already been logged by the parser.
        Err(_) => std::process::exit(1),
        Ok(ast) => ast,
    };
    info!("Assembled {} instruction(s) from `{}`", ast.len(), ipath.display());

    if args.is_present("print-debug") {
        let mut grid = Grid::new(GridOptions {
            filling:     Filling::Spaces(1),
            direction:   Direction::LeftToRight,
        });

        for (idx, ins) in ast.iter().enumerate() {
            grid.add(Cell::from(format!("0x{:02X}:", idx)));
            grid.add(Cell::from(format!("{}", ins)));
            grid.add(Cell::from("=>".to_string()));
            grid.add(Cell::from(format!("0x{:02X}", ins.assemble())));
        }

        println!("{}", grid.fit_into_columns(4));
    }

    if args.is_present("hex") {
        for ins in ast.iter() {
            println!("{:#x}", ins.assemble());
        }
    }

    let opath = match args.value_of("output") {
        Some(filename) => PathBuf::from(filename),
        None => default_output(ipath),
    };

    if clobbers_input(ipath, &opath) {
        error!("fatal: output file `{}` would overwrite the input file, use -o", opath.display());
        std::process::exit(1);
    }

    let mut ofile = match File::create(&opath) {
        Err(err) => {
            error!("fatal: unable to open output file `{}`: {}", opath.display(), err);
            std::process::exit(1);
        },
        Ok(file) => file,
    };

    let words: Vec<u8> = ast.iter().map(|ins| ins.assemble()).collect();
    if let Err(err) = ofile.write_all(&words) {
        error!("fatal: unable to write to output file `{}`: {}", opath.display(), err);
        std::process::exit(1);
    }
    info!("Wrote {} byte(s) to `{}`", words.len(), opath.display());
}

/// The output sits next to the input with a `.bin` extension.
fn default_output(ipath: &Path) -> PathBuf {
    ipath.with_extension("bin")
}

fn clobbers_input(ipath: &Path, opath: &Path) -> bool {
    if ipath == opath {
        return true;
    }
    match (std::fs::canonicalize(ipath), std::fs::canonicalize(opath)) {
        (Ok(i), Ok(o)) => i == o,
        _ => false,
    }
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(option_env!("CARGO_PKG_NAME").unwrap_or("nibasm"))
        .version(option_env!("CARGO_PKG_VERSION").unwrap_or("unknown"))
        .author(option_env!("CARGO_PKG_AUTHORS").unwrap_or(""))
        .about(option_env!("CARGO_PKG_DESCRIPTION").unwrap_or(""))
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use")
            .required(true)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .help("write output to an outfile"))
        .arg(Arg::with_name("hex")
            .short("x")
            .takes_value(false)
            .help("prints each machine word as a hex literal to STDOUT"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("prints the debug information alongside the assembly to STDOUT"))
        .get_matches()
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(match verbosity {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 | _ => log::LevelFilter::Debug,
        })
        .chain(std::io::stdout())
        .apply().ok();
}
