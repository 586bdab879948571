//! Known ordered response scales.

/// An ordered rating scale. Levels run from most positive to most negative;
/// each level lists the lowercase spellings that map onto it.
#[derive(Debug)]
pub struct LikertScale {
    pub name: &'static str,
    pub levels: &'static [&'static [&'static str]],
    /// Index of the neutral level; levels before it are positive.
    pub neutral: usize,
}

impl LikertScale {
    /// Level index for a value, matched case-insensitively.
    pub fn level_of(&self, value: &str) -> Option<usize> {
        let normalized = normalize(value);
        self.levels
            .iter()
            .position(|aliases| aliases.contains(&normalized.as_str()))
    }

    /// Whether a level sits on the favourable side of the scale.
    pub fn is_positive_level(&self, level: usize) -> bool {
        level < self.neutral
    }
}

pub static SCALES: &[LikertScale] = &[
    LikertScale {
        name: "agreement",
        levels: &[
            &["strongly agree", "completely agree", "totally agree"],
            &["agree"],
            &["somewhat agree", "slightly agree", "mostly agree", "tend to agree"],
            &["neutral", "neither agree nor disagree", "neither", "undecided"],
            &["somewhat disagree", "slightly disagree", "mostly disagree", "tend to disagree"],
            &["disagree"],
            &["strongly disagree", "completely disagree", "totally disagree"],
        ],
        neutral: 3,
    },
    LikertScale {
        name: "satisfaction",
        levels: &[
            &["very satisfied", "extremely satisfied", "completely satisfied"],
            &["satisfied"],
            &["somewhat satisfied", "slightly satisfied"],
            &["neutral", "neither satisfied nor dissatisfied", "neither"],
            &["somewhat dissatisfied", "slightly dissatisfied"],
            &["dissatisfied", "unsatisfied"],
            &["very dissatisfied", "extremely dissatisfied", "very unsatisfied"],
        ],
        neutral: 3,
    },
    LikertScale {
        name: "frequency",
        levels: &[
            &["always"],
            &["very often", "almost always"],
            &["often", "frequently", "usually"],
            &["sometimes", "occasionally"],
            &["rarely", "seldom"],
            &["very rarely", "almost never"],
            &["never"],
        ],
        neutral: 3,
    },
    LikertScale {
        name: "likelihood",
        levels: &[
            &["very likely", "extremely likely", "definitely"],
            &["likely", "probably"],
            &["somewhat likely"],
            &["neutral", "neither likely nor unlikely", "unsure", "not sure"],
            &["somewhat unlikely"],
            &["unlikely", "probably not"],
            &["very unlikely", "extremely unlikely", "definitely not"],
        ],
        neutral: 3,
    },
    LikertScale {
        name: "importance",
        levels: &[
            &["extremely important", "very important"],
            &["important"],
            &["moderately important", "somewhat important"],
            &["slightly important"],
            &["not important", "not at all important", "unimportant"],
        ],
        neutral: 2,
    },
    LikertScale {
        name: "quality",
        levels: &[
            &["excellent"],
            &["very good"],
            &["good"],
            &["fair", "average"],
            &["poor"],
            &["very poor", "terrible"],
        ],
        neutral: 3,
    },
];

/// A successful scale match for a set of distinct values.
#[derive(Debug, Clone, PartialEq)]
pub struct LikertMatch {
    pub scale: &'static str,
    /// The data's own spellings, most positive first.
    pub order: Vec<String>,
}

/// Look up a scale by name.
pub fn scale_by_name(name: &str) -> Option<&'static LikertScale> {
    SCALES.iter().find(|s| s.name == name)
}

/// Match distinct values (in first-seen order) against the known scales.
///
/// Every value must map into the same scale and at least `min_levels`
/// distinct levels must be present. The first matching scale wins.
pub fn match_scale(distinct: &[String], min_levels: usize) -> Option<LikertMatch> {
    if distinct.is_empty() {
        return None;
    }
    SCALES.iter().find_map(|scale| {
        let mut ranked: Vec<(usize, usize, &String)> = Vec::with_capacity(distinct.len());
        for (seen, value) in distinct.iter().enumerate() {
            ranked.push((scale.level_of(value)?, seen, value));
        }

        let mut levels: Vec<usize> = ranked.iter().map(|r| r.0).collect();
        levels.sort_unstable();
        levels.dedup();
        if levels.len() < min_levels.max(2) {
            return None;
        }

        ranked.sort_by_key(|r| (r.0, r.1));
        Some(LikertMatch {
            scale: scale.name,
            order: ranked.into_iter().map(|r| r.2.clone()).collect(),
        })
    })
}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_satisfaction_order_is_scale_driven() {
        let distinct = strings(&["Satisfied", "Very Satisfied", "Neutral", "Dissatisfied"]);
        let found = match_scale(&distinct, 2).unwrap();
        assert_eq!(found.scale, "satisfaction");
        assert_eq!(
            found.order,
            strings(&["Very Satisfied", "Satisfied", "Neutral", "Dissatisfied"])
        );
    }

    #[test]
    fn test_agreement_case_insensitive() {
        let distinct = strings(&["agree", "STRONGLY  DISAGREE", "Neutral"]);
        let found = match_scale(&distinct, 2).unwrap();
        assert_eq!(found.scale, "agreement");
        assert_eq!(found.order, strings(&["agree", "Neutral", "STRONGLY  DISAGREE"]));
    }

    #[test]
    fn test_partial_vocabulary_does_not_match() {
        assert!(match_scale(&strings(&["Agree", "Maybe"]), 2).is_none());
        assert!(match_scale(&strings(&["Red", "Blue"]), 2).is_none());
    }

    #[test]
    fn test_single_level_does_not_match() {
        assert!(match_scale(&strings(&["Agree"]), 2).is_none());
        assert!(match_scale(&strings(&["Neutral", "neutral"]), 2).is_none());
    }

    #[test]
    fn test_frequency_and_positive_levels() {
        let found = match_scale(&strings(&["Never", "Often", "Sometimes"]), 2).unwrap();
        assert_eq!(found.scale, "frequency");
        assert_eq!(found.order, strings(&["Often", "Sometimes", "Never"]));

        let scale = scale_by_name("frequency").unwrap();
        assert!(scale.is_positive_level(scale.level_of("often").unwrap()));
        assert!(!scale.is_positive_level(scale.level_of("Sometimes").unwrap()));
    }
}
