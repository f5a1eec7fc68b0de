use regex::NoExpand;

use crate::core::rules::RuleChain;

/// Vocabulary expansions, applied top to bottom.
///
/// A later rule sees the output of every earlier rule, so reordering this
/// table changes the enhanced text.
const ENHANCEMENT_RULES: &[(&str, &str)] = &[
    (r"doctor|physician|medical", "doctor physician medical healthcare"),
    (r"engineer|tech|software", "engineer technology software programming"),
    (r"artist|creative|design", "artist creative designer artistic"),
    (r"fitness|gym|workout", "fitness gym workout sports athletic"),
    (r"travel|adventure", "travel adventure explore wanderlust"),
    (r"music|musician", "music musician singer instrument"),
    (r"outdoors|nature|hiking", "outdoors nature hiking camping adventure"),
    (r"foodie|cooking|chef", "food cooking culinary restaurant chef"),
    (r"serious|long.?term", "serious relationship long-term commitment"),
    (r"casual|fun|hookup", "casual dating fun no-strings"),
    (r"young|twenties", "young 20s twenties"),
    (r"professional|career", "professional career ambitious"),
];

/// Lexical query rewriter
///
/// Expands recognised words into a bag of near-synonyms so the query lands
/// closer to profile texts in embedding space.
#[derive(Debug, Clone)]
pub struct QueryEnhancer {
    rules: RuleChain<&'static str>,
}

impl QueryEnhancer {
    pub fn new() -> Result<Self, regex::Error> {
        let rules = ENHANCEMENT_RULES
            .iter()
            .fold(
                RuleChain::builder().case_insensitive(true).whole_word(true),
                |builder, (pattern, expansion)| builder.rule(pattern, *expansion),
            )
            .build()?;

        Ok(Self { rules })
    }

    /// Lower-case the query and run every rule over the progressively
    /// rewritten text
    pub fn enhance(&self, query: &str) -> String {
        let enhanced = self
            .rules
            .iter()
            .fold(query.to_lowercase(), |text, (re, expansion)| {
                re.replace_all(&text, NoExpand(expansion)).into_owned()
            });

        tracing::info!("Enhanced query: '{}' -> '{}'", query, enhanced);
        enhanced
    }
}
