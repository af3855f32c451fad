use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use yangcond::assignments::{build_store, build_tree};
use yangcond::{
    AppError, ConditionError, EvalConfig, EvalOutcome, Evaluator, SchemaTree, TreeBuilder, load_schema,
    parse_with,
};

#[derive(Parser)]
#[command(name = "yangcond")]
#[command(version, about = "Parse and evaluate YANG when/must/if-feature conditions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an expression and print its canonical form, AST and diagnostics
    Parse {
        /// The expression to parse
        expr: String,
    },

    /// Evaluate an expression against a data tree built from assignments
    Eval {
        /// The expression to evaluate
        expr: String,

        /// Path of the context node that current() refers to
        #[arg(long)]
        path: String,

        /// Data tree entry, as PATH=VALUE (repeatable)
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<String>,

        /// Backing store entry, consulted for paths missing from the tree (repeatable)
        #[arg(long = "store", value_name = "PATH=VALUE")]
        store: Vec<String>,

        /// Schema XML file
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Evaluation settings as JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check every condition declared in a schema against a data tree
    Check {
        /// Schema XML file
        #[arg(long)]
        schema: PathBuf,

        /// Data tree entry, as PATH=VALUE (repeatable)
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<String>,

        /// Evaluation settings as JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<EvalConfig, AppError> {
    match path {
        Some(path) => Ok(EvalConfig::from_json(&fs::read_to_string(path)?)?),
        None => Ok(EvalConfig::default()),
    }
}

fn load_schema_file(path: Option<&Path>) -> Result<SchemaTree, AppError> {
    match path {
        Some(path) => load_schema(&fs::read_to_string(path)?),
        None => Ok(SchemaTree::new()),
    }
}

fn run(cli: Cli) -> Result<bool, AppError> {
    match cli.command {
        Commands::Parse { expr } => {
            let parsed = parse_with(&expr, &mut TreeBuilder);
            let Some(ast) = parsed.ast.as_ref() else {
                for issue in &parsed.issues {
                    eprintln!("error: {issue}");
                }
                return Err(AppError::Parse(expr));
            };
            println!("{ast}");
            println!("{ast:#?}");
            for issue in &parsed.issues {
                eprintln!("warning: {issue}");
            }
            Ok(parsed.is_clean())
        }
        Commands::Eval {
            expr,
            path,
            set,
            store,
            schema,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let schema = load_schema_file(schema.as_deref())?;
            let data = build_tree(&set)?;
            let store = build_store(&store)?;
            let Some(ast) = yangcond::parse(&expr) else {
                return Err(AppError::Parse(expr));
            };

            let evaluator = Evaluator::new(schema.root(), &store).with_config(config);
            match evaluator.outcome(&ast, &path, &data) {
                EvalOutcome::Success(resolved) => {
                    println!("true");
                    if let Some(value) = resolved.value {
                        println!("  value: {value}");
                    }
                    if let Some(step_value) = resolved.step_value {
                        println!("  stored: {step_value}");
                    }
                    Ok(true)
                }
                EvalOutcome::Fail(reason) => {
                    println!("false ({reason})");
                    Ok(false)
                }
            }
        }
        Commands::Check { schema, set, config } => {
            let config = load_config(config.as_deref())?;
            let schema = load_schema_file(Some(&schema))?;
            check(&schema, &set, config)
        }
    }
}

/// Runs every schema condition over the tree built from `set`. A violated
/// condition is a `false` answer, not an error.
fn check<S: AsRef<str>>(schema: &SchemaTree, set: &[S], config: EvalConfig) -> Result<bool, AppError> {
    let data = build_tree(set)?;
    let store = yangcond::NoStore;
    match Evaluator::new(schema.root(), &store)
        .with_config(config)
        .apply_conditions(&data)
    {
        Ok(()) => {
            println!("all conditions hold");
            Ok(true)
        }
        Err(violation @ ConditionError::Violated { .. }) => {
            println!("false ({violation})");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// 0 when the answer is true, 1 when it is false, 2 on error.
fn exit_status(result: &Result<bool, AppError>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let result = run(Cli::parse());
    if let Err(e) = &result {
        eprintln!("{e}");
    }
    ExitCode::from(exit_status(&result))
}
