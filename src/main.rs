//! # decafc
//!
//! Command-line driver: parses a Decaf source file, writes the generated
//! three-address code next to it, and optionally dumps the AST and the
//! symbol table.

use std::{fs, path::PathBuf, process};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::{error, info};

use decafc::analyzer::Analyzer;
use decafc::lexer::{Lexer, RuleSet, TokenKind};
use decafc::parser::{ast, Parser as DecafParser};
use decafc::symbol_table::SymbolTable;

/// CLI configuration for the Decaf compiler.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Dump the symbol table after compilation.
    #[arg(short = 's', long)]
    symbols: bool,

    /// Dump the abstract syntax tree of the parsed program.
    #[arg(short = 'a', long)]
    ast: bool,

    /// Dump the token stream and the lexer's symbol table, then stop.
    #[arg(short = 't', long)]
    tokens: bool,

    /// Load the lexer rules from a file instead of the builtin Decaf table.
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// The Decaf source file to compile.
    #[arg(default_value = "test.decaf")]
    file: PathBuf,

    /// Specify the log level of the compiler.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    verbosity: LogLevel,
}

impl Cli {
    fn init() -> Self {
        Cli::parse()
    }
}

/// Enum for specifying the log level of the compiler.
#[derive(ValueEnum, Clone, Default, Debug)]
enum LogLevel {
    /// Only critical errors are logged.
    #[default]
    #[value(alias("0"))]
    Error,

    /// Also log warnings.
    #[value(alias("1"))]
    Warn,

    /// Also log information about the general state of the compiler.
    #[value(alias("2"))]
    Info,

    /// Log everything which happens internally in the compiler.
    #[value(alias("3"))]
    Debug,

    /// Log extra information.
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::init();

    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(_) => {
            error!("Could not open input file '{}'.", args.file.display());
            process::exit(-1);
        }
    };

    let loaded;
    let rules = match &args.rules {
        Some(path) => {
            loaded = match RuleSet::from_file(path) {
                Ok(rules) => rules,
                Err(rule_error) => {
                    println!("{} {rule_error}", "ERROR:".red());
                    process::exit(1);
                }
            };
            &loaded
        }
        None => RuleSet::decaf(),
    };

    if args.tokens {
        dump_tokens(&source, rules);
        return Ok(());
    }

    println!("====> PARSING FILE {}", args.file.display());
    let program = match DecafParser::new(Lexer::new(&source, rules)).parse() {
        Ok(program) => program,
        Err(parse_error) => {
            println!("{} {parse_error}", "ERROR:".red());
            process::exit(1);
        }
    };

    if args.ast {
        println!("====> AST");
        print!("{}", ast::pretty(&program.to_string()));
    }

    let tac_file = args.file.with_extension("tac");
    println!("====> TAC --> {}", tac_file.display());

    let mut table = SymbolTable::new();
    let analysis = match Analyzer::new(&mut table).analyze(&program) {
        Ok(analysis) => analysis,
        Err(semantic_error) => {
            println!("{} {semantic_error}", "ERROR:".red());
            process::exit(1);
        }
    };
    for warning in &analysis.warnings {
        println!("{} {warning}", "WARNING:".yellow());
    }

    fs::write(&tac_file, analysis.tac.to_string())?;
    info!(
        "wrote {} instructions to '{}'",
        analysis.tac.len(),
        tac_file.display()
    );

    if args.symbols {
        println!("====> SYMBOL-TABLE");
        println!("\nSymbol table ({}):", table.len());
        for entry in table.entries() {
            println!("{entry}");
        }
    }

    Ok(())
}

/// Lexer-only mode: one `(code,lexeme,line,entry)` line per token, then the
/// interning table.
fn dump_tokens(source: &str, rules: &RuleSet) {
    let mut lexer = Lexer::new(source, rules);
    loop {
        let token = lexer.next_token();
        if token.kind == TokenKind::Eoi {
            break;
        }
        let entry = match &token.entry {
            Some(name) => format!("{{{name}}}"),
            None => "null".to_string(),
        };
        println!(
            "({},{},{},{})",
            token.kind.code(),
            token.lexeme,
            token.line,
            entry
        );
    }

    println!("\nSymbol table ({}):", lexer.symbols().len());
    for entry in lexer.symbols().entries() {
        println!("{}", entry.name);
    }
}
