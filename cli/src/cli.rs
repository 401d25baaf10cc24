use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "graphql-ld")]
/// GraphQL-LD command line toolkit
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Translate a GraphQL query into SPARQL
    ///
    /// The SPARQL query is written to stdout, followed by a comment listing the result paths
    /// that are singular.
    Translate {
        #[command(flatten)]
        input: QueryInput,
    },
    /// Execute a GraphQL query against a SPARQL endpoint
    ///
    /// The result is written to stdout as JSON.
    Query {
        /// URL of the SPARQL endpoint
        #[arg(short, long, value_hint = ValueHint::Url)]
        endpoint: String,
        #[command(flatten)]
        input: QueryInput,
        /// Options passed to the query engine, as a JSON object
        ///
        /// A "headers" object is added to the HTTP request headers.
        #[arg(long)]
        engine_options: Option<String>,
        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(clap::Args)]
pub struct QueryInput {
    /// File holding the JSON-LD context
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub context: PathBuf,
    /// Base IRI of the JSON-LD context
    #[arg(long, value_hint = ValueHint::Url)]
    pub base: Option<String>,
    /// Values of the query variables, as a JSON object
    #[arg(long)]
    pub variables: Option<String>,
    /// The GraphQL query
    ///
    /// If neither a query nor a query file is given, stdin is read.
    #[arg(short, long, conflicts_with = "query_file")]
    pub query: Option<String>,
    /// File holding the GraphQL query
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub query_file: Option<PathBuf>,
}
