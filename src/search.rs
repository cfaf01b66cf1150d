//! Accent- and case-insensitive individual search.
//!
//! An individual matches when its normalized identifier (or one of its
//! name-attribute values) contains the normalized keywords, or when any other
//! attribute holds a matching literal. Attribute matches are reported per
//! attribute; the name attribute only ever drives the identifier match.

use std::collections::BTreeMap;

use rayon::prelude::*;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::assemble::Assembler;
use crate::error::{QueryError, QueryResult};
use crate::model::{Pair, SearchHit};
use crate::oracle::{AttributeRef, IndividualRef, Oracle};

/// Fold text for matching: `_` to space, `đ`/`Đ` to `d`, combining marks
/// stripped after NFD decomposition, lower-cased, whitespace collapsed.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'đ' | 'Đ' => 'd',
            '_' => ' ',
            other => other,
        })
        .collect::<String>()
        .to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

type Matches = Vec<(AttributeRef, Vec<String>)>;

/// Search over every individual of the ontology.
pub struct SearchEngine<'a> {
    oracle: &'a dyn Oracle,
    assembler: Assembler<'a>,
}

impl<'a> SearchEngine<'a> {
    pub fn new(oracle: &'a dyn Oracle, name_attribute: &'a str) -> Self {
        Self {
            oracle,
            assembler: Assembler::new(oracle, name_attribute),
        }
    }

    /// Individuals matching `keywords`, each with the attribute values that
    /// matched, ordered by individual id.
    pub fn search(&self, keywords: &str) -> QueryResult<Vec<SearchHit>> {
        let needle = normalize(keywords);
        if needle.is_empty() {
            return Err(QueryError::malformed("Keywords must not be blank."));
        }

        let individuals: Vec<IndividualRef> = self.oracle.individuals()?.into_iter().collect();
        let attributes: Vec<AttributeRef> = self.oracle.attributes()?.into_iter().collect();

        let hits: Vec<Option<(IndividualRef, Matches)>> = individuals
            .par_iter()
            .map(|individual| self.match_individual(individual, &attributes, &needle))
            .collect::<QueryResult<_>>()?;

        let merged: BTreeMap<IndividualRef, Matches> = hits.into_iter().flatten().collect();
        tracing::debug!(keywords, needle = %needle, hits = merged.len(), "search finished");

        if merged.is_empty() {
            return Err(QueryError::not_found(format!(
                "Individuals matching \"{keywords}\" not found."
            )));
        }

        merged
            .into_iter()
            .map(|(individual, matches)| {
                Ok(Pair::new(
                    self.assembler.individual(&individual)?,
                    self.assembler.attribute_values(matches)?,
                ))
            })
            .collect()
    }

    fn match_individual(
        &self,
        individual: &IndividualRef,
        attributes: &[AttributeRef],
        needle: &str,
    ) -> QueryResult<Option<(IndividualRef, Matches)>> {
        let name_attribute = self.assembler.name_attribute();
        let mut by_identifier = normalize(individual.id()).contains(needle);
        let mut matches = Vec::new();

        for attribute in attributes {
            let values = self.oracle.attribute_values(individual, attribute)?;
            if attribute.id() == name_attribute {
                by_identifier |= values.iter().any(|v| normalize(v).contains(needle));
                continue;
            }
            let matching: Vec<String> = values
                .into_iter()
                .filter(|v| normalize(v).contains(needle))
                .collect();
            if !matching.is_empty() {
                matches.push((attribute.clone(), matching));
            }
        }

        Ok((by_identifier || !matches.is_empty()).then(|| (individual.clone(), matches)))
    }
}
