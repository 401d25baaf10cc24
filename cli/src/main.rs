#![allow(clippy::print_stdout, reason = "The results are written to stdout")]
use crate::cli::{Args, Command, QueryInput};
use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use graphql_ld::model::{EngineOptions, Query, QuerySolutions, Variables};
use graphql_ld::{
    Client, EngineError, GraphQlQueryArgs, QueryArgs, QueryEngine, SparqlEndpointEngine,
};
use serde_json::Value;
use std::fs;
use std::io::{stdin, Read};
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = Args::parse();
    match matches.command {
        Command::Translate { input } => translate(&input).await,
        Command::Query {
            endpoint,
            input,
            engine_options,
            pretty,
        } => {
            let engine_options = engine_options
                .map(|options| {
                    serde_json::from_str::<EngineOptions>(&options)
                        .context("The engine options must be valid JSON")
                })
                .transpose()?;

            let client = client(&input, SparqlEndpointEngine::new(endpoint))?;

            let result = client
                .query(QueryArgs::BySource {
                    query: read_query(&input)?.into(),
                    variables: read_variables(&input)?,
                    query_engine_options: engine_options,
                })
                .await?;
            let output = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{output}");
            Ok(())
        }
    }
}

/// Prints the SPARQL query and, as a comment, the singularization record.
async fn translate(input: &QueryInput) -> anyhow::Result<()> {
    let client = client(input, TranslationOnly)?;
    let result = client
        .graphql_to_sparql(
            GraphQlQueryArgs::new(read_query(input)?).with_variables(read_variables(input)?),
        )
        .await?;
    println!("{}", result.algebra);
    println!(
        "# singularize: {}",
        serde_json::to_string(&result.singularize_variables)?
    );
    Ok(())
}

/// The engine of the client used by `translate`, which never executes queries.
struct TranslationOnly;

#[async_trait]
impl QueryEngine for TranslationOnly {
    async fn query(
        &self,
        _algebra: &Query,
        _options: Option<&EngineOptions>,
    ) -> Result<QuerySolutions, EngineError> {
        Err(EngineError::Other(
            "The translate command does not execute queries".into(),
        ))
    }
}

fn client(input: &QueryInput, engine: impl QueryEngine + 'static) -> anyhow::Result<Client> {
    let mut builder = Client::builder(read_context(input)?, engine);
    if let Some(base) = &input.base {
        builder = builder.with_base_iri(base);
    }
    Ok(builder.build())
}

fn read_context(input: &QueryInput) -> anyhow::Result<Value> {
    let context = fs::read_to_string(&input.context).with_context(|| {
        format!(
            "Failed to read the context file {}",
            input.context.display()
        )
    })?;
    serde_json::from_str(&context).context("The context file is not valid JSON")
}

fn read_variables(input: &QueryInput) -> anyhow::Result<Variables> {
    let Some(variables) = &input.variables else {
        return Ok(Variables::new());
    };
    serde_json::from_str(variables).context("The variables must be a JSON object")
}

fn read_query(input: &QueryInput) -> anyhow::Result<String> {
    if let Some(query) = &input.query {
        return Ok(query.clone());
    }
    if let Some(file) = &input.query_file {
        return fs::read_to_string(file)
            .with_context(|| format!("Failed to read the query file {}", file.display()));
    }
    let mut query = String::new();
    stdin()
        .read_to_string(&mut query)
        .context("Failed to read the query from stdin")?;
    Ok(query)
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn, reason = "Tests")]
mod tests {
    use super::*;
    use anyhow::Result;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use assert_fs::NamedTempFile;
    use predicates::prelude::*;

    fn cli_command() -> Command {
        let mut command = Command::new(env!("CARGO"));
        command.arg("run").arg("--bin").arg("graphql-ld");
        command.arg("--");
        command
    }

    fn context_file() -> Result<NamedTempFile> {
        let file = NamedTempFile::new("context.json")?;
        file.write_str(r#"{ "@context": { "ex": "http://ex.org/", "name": "ex:name" } }"#)?;
        Ok(file)
    }

    #[test]
    fn cli_help() {
        cli_command()
            .assert()
            .failure()
            .stdout("")
            .stderr(predicate::str::contains("GraphQL-LD"));
    }

    #[test]
    fn cli_translate() -> Result<()> {
        let context = context_file()?;
        cli_command()
            .arg("translate")
            .arg("--context")
            .arg(context.path())
            .arg("--query")
            .arg("{ name @single }")
            .assert()
            .success()
            .stdout(predicate::str::contains("<http://ex.org/name>"))
            .stdout(predicate::str::contains(r#"# singularize: {"name":true}"#));
        Ok(())
    }

    #[test]
    fn cli_translate_from_stdin() -> Result<()> {
        let context = context_file()?;
        cli_command()
            .arg("translate")
            .arg("--context")
            .arg(context.path())
            .arg("--variables")
            .arg(r#"{ "n": "Alice" }"#)
            .write_stdin("query($n: String) { name(_: $n) }")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"Alice\""))
            .stdout(predicate::str::contains("# singularize: {}"));
        Ok(())
    }

    #[test]
    fn cli_translate_missing_context_entry() -> Result<()> {
        let context = context_file()?;
        cli_command()
            .arg("translate")
            .arg("--context")
            .arg(context.path())
            .arg("--query")
            .arg("{ name age }")
            .assert()
            .failure()
            .stderr(predicate::str::contains("age"));
        Ok(())
    }

    #[test]
    fn cli_translate_resolves_ids_against_base() -> Result<()> {
        let context = NamedTempFile::new("context.json")?;
        context.write_str(r#"{ "@vocab": "http://ex.org/" }"#)?;
        cli_command()
            .arg("translate")
            .arg("--context")
            .arg(context.path())
            .arg("--base")
            .arg("http://ex.org/people/")
            .arg("--query")
            .arg(r#"{ knows(id: "bob") { name @single } }"#)
            .assert()
            .success()
            .stdout(predicate::str::contains("<http://ex.org/people/bob>"))
            .stdout(predicate::str::contains(
                r#"# singularize: {"knows_name":true}"#,
            ));
        Ok(())
    }

    #[test]
    fn clap_debug() {
        use clap::CommandFactory;

        Args::command().debug_assert()
    }
}
