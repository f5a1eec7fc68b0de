use regex::{Captures, Regex, RegexBuilder};

/// Ordered list of `(matcher, effect)` pairs
///
/// Rules are evaluated in insertion order. Consumers decide whether every
/// rule applies (query rewriting) or the first match wins (filter
/// extraction); the chain itself only guarantees the order.
#[derive(Debug, Clone)]
pub struct RuleChain<E> {
    rules: Vec<(Regex, E)>,
}

impl<E> RuleChain<E> {
    pub fn builder() -> RuleChainBuilder<E> {
        RuleChainBuilder {
            rules: Vec::new(),
            case_insensitive: false,
            whole_word: false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Regex, &E)> {
        self.rules.iter().map(|(re, effect)| (re, effect))
    }

    /// First rule (in chain order) that matches anywhere in `text`
    pub fn first_match<'t>(&self, text: &'t str) -> Option<(Captures<'t>, &E)> {
        self.rules
            .iter()
            .find_map(|(re, effect)| re.captures(text).map(|caps| (caps, effect)))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Builder for [`RuleChain`]
///
/// Flags apply to every rule added to the chain.
pub struct RuleChainBuilder<E> {
    rules: Vec<(String, E)>,
    case_insensitive: bool,
    whole_word: bool,
}

impl<E> RuleChainBuilder<E> {
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// Wrap each pattern as `\b(?:pattern)\b`
    pub fn whole_word(mut self, yes: bool) -> Self {
        self.whole_word = yes;
        self
    }

    pub fn rule(mut self, pattern: &str, effect: E) -> Self {
        self.rules.push((pattern.to_string(), effect));
        self
    }

    pub fn build(self) -> Result<RuleChain<E>, regex::Error> {
        let case_insensitive = self.case_insensitive;
        let whole_word = self.whole_word;

        let rules = self
            .rules
            .into_iter()
            .map(|(pattern, effect)| {
                let pattern = if whole_word {
                    format!(r"\b(?:{})\b", pattern)
                } else {
                    pattern
                };
                RegexBuilder::new(&pattern)
                    .case_insensitive(case_insensitive)
                    .build()
                    .map(|re| (re, effect))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RuleChain { rules })
    }
}
