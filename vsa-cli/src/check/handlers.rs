use std::str::FromStr;

use anyhow::Result;
use clap::ArgMatches;

use vsa_compare::{CompareOptions, ValidationError, VariantTypeSchema, compare_documents};
use vsa_core::store;

///
/// Compare two documents. Returns whether every section passed.
///
pub fn run_check(matches: &ArgMatches) -> Result<bool> {
    let expected = matches
        .get_one::<String>("expected")
        .expect("A path to the golden document is required.");

    let observed = matches
        .get_one::<String>("observed")
        .expect("A path to the regenerated artifact is required.");

    let variant_types = match matches.get_one::<String>("variant-types") {
        Some(schema) => match VariantTypeSchema::from_str(schema) {
            Ok(schema) => schema,
            Err(err) => anyhow::bail!(err),
        },
        None => VariantTypeSchema::default(),
    };

    let expected = store::load(expected)?;
    let observed = store::load(observed)?;

    let results = compare_documents(&expected, &observed, &CompareOptions { variant_types });
    let failures: Vec<&ValidationError> = results.iter().filter_map(|(_, r)| r.as_ref().err()).collect();

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&failures)?);
    } else {
        for (section, result) in &results {
            match result {
                Ok(()) => println!("PASS {}", section),
                Err(err) => println!("FAIL {}: {}", section, err),
            }
        }
    }

    Ok(failures.is_empty())
}
