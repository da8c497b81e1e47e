//! Appearance attributes pulled out of free-text descriptions.
//!
//! Descriptions are split into comma/semicolon phrases. Each phrase can
//! contribute a stature, a build, and colours bound to a body part. Size
//! words only count toward stature or build when they describe the whole
//! figure: "tall man" and "stands tall" do, "short hair" and "a big
//! backpack" do not. Two
//! descriptions conflict when they put the same attribute in opposite
//! classes, e.g. "tall" and "short", or give a body part disjoint colours.

use std::collections::{BTreeMap, BTreeSet};

/// A comparable appearance dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    /// Height and overall size
    Stature,
    /// Body mass
    Build,
    /// Colour of a body part ("body" when no part is named)
    Colour(String),
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribute::Stature => write!(f, "stature"),
            Attribute::Build => write!(f, "build"),
            Attribute::Colour(part) => write!(f, "{} colour", part),
        }
    }
}

const TALL: &[&str] = &[
    "tall", "towering", "giant", "huge", "enormous", "massive", "large", "big", "hulking",
];
const SHORT: &[&str] = &["short", "small", "tiny", "little", "petite", "diminutive", "squat"];
const THIN: &[&str] = &["slim", "thin", "skinny", "lanky", "slender", "wiry", "lean", "scrawny"];
const HEAVY: &[&str] = &[
    "heavy", "stocky", "fat", "chubby", "burly", "bulky", "broad", "rotund", "plump", "barrel-chested",
];
const COLOURS: &[&str] = &[
    "brown", "white", "black", "grey", "gray", "red", "ginger", "blonde", "golden", "silver",
    "orange", "yellow", "green", "blue", "purple", "pink", "tan", "beige", "auburn", "spotted",
];
/// Nouns for the whole figure, or for the parts that carry its build.
const FIGURE: &[&str] = &[
    "man", "men", "woman", "person", "figure", "creature", "guy", "fellow", "beast", "monster",
    "being", "animal", "ape", "bear", "cryptid", "giant", "bigfoot", "yeti", "sasquatch", "boy",
    "girl", "kid", "child", "frame", "build", "body", "physique", "stature", "height",
    "shoulders", "chest", "torso",
];
/// Words that end the noun group a size word can modify.
const CONNECTIVES: &[&str] = &[
    "with", "and", "in", "on", "at", "for", "of", "from", "to", "who", "that", "but", "as",
    "than", "while", "wearing", "carrying", "holding",
];
const PARTS: &[(&str, &str)] = &[
    ("fur", "fur"),
    ("hair", "fur"),
    ("coat", "fur"),
    ("pelt", "fur"),
    ("skin", "skin"),
    ("eyes", "eyes"),
    ("eye", "eyes"),
    ("beard", "beard"),
    ("mane", "mane"),
    ("feathers", "feathers"),
    ("scales", "scales"),
    ("spines", "spines"),
    ("spikes", "spines"),
    ("fins", "fins"),
];

/// One attribute value found in a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValue {
    /// Opposition class, e.g. "tall" vs "short"; colour sets compare by overlap
    class: String,
    /// Words as written, for messages
    words: BTreeSet<String>,
}

impl AttributeValue {
    /// The words that produced this value, joined for display.
    pub fn describe(&self) -> String {
        self.words.iter().cloned().collect::<Vec<_>>().join(" and ")
    }

    fn conflicts_with(&self, other: &AttributeValue, attribute: &Attribute) -> bool {
        match attribute {
            Attribute::Colour(_) => self.words.is_disjoint(&other.words),
            _ => self.class != other.class,
        }
    }
}

fn size_class(word: &str) -> Option<(Attribute, &'static str)> {
    if TALL.contains(&word) {
        Some((Attribute::Stature, "tall"))
    } else if SHORT.contains(&word) {
        Some((Attribute::Stature, "short"))
    } else if THIN.contains(&word) {
        Some((Attribute::Build, "thin"))
    } else if HEAVY.contains(&word) {
        Some((Attribute::Build, "heavy"))
    } else {
        None
    }
}

fn is_part(word: &str) -> bool {
    PARTS.iter().any(|(noun, _)| *noun == word)
}

/// Whether the size word at `at` describes the figure rather than a body
/// part or an object.
///
/// The words after it, up to the next connective, decide: a figure noun
/// means yes, a body part or any other noun means no. With nothing after
/// it ("tall", "stands tall", "hair cut short") it describes the figure
/// unless the phrase already named a body part.
fn describes_figure(words: &[&str], at: usize) -> bool {
    let mut modifies_something = false;
    for &next in &words[at + 1..] {
        if CONNECTIVES.contains(&next) {
            break;
        }
        if FIGURE.contains(&next) {
            return true;
        }
        if is_part(next) {
            return false;
        }
        modifies_something = true;
    }
    !modifies_something && !words[..at].iter().any(|w| is_part(w))
}

/// Attributes extracted from one description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Appearance {
    attributes: BTreeMap<Attribute, AttributeValue>,
    phrases: Vec<String>,
}

/// An attribute two descriptions disagree on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contradiction {
    /// Which attribute
    pub attribute: Attribute,
    /// Value in the registered description
    pub registered: String,
    /// Value in the new description
    pub proposed: String,
}

impl Appearance {
    /// Parses a free-text description.
    ///
    /// # Examples
    ///
    /// ```
    /// use veoprompt_pipeline::Appearance;
    ///
    /// let registered = Appearance::parse("tall, brown fur, broad shoulders");
    /// let proposed = Appearance::parse("short, white fur");
    /// let conflict = registered.contradiction(&proposed).unwrap();
    /// assert_eq!(conflict.attribute.to_string(), "stature");
    /// assert_eq!(conflict.registered, "tall");
    /// assert_eq!(conflict.proposed, "short");
    /// ```
    pub fn parse(description: &str) -> Self {
        let mut appearance = Appearance::default();
        for phrase in description
            .split([',', ';', '.', '\n'])
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            appearance.phrases.push(phrase.to_string());
            appearance.read_phrase(&phrase.to_lowercase());
        }
        appearance
    }

    fn read_phrase(&mut self, phrase: &str) {
        let mut pending_colours: BTreeSet<String> = BTreeSet::new();
        let words: Vec<&str> = phrase
            .split(|c: char| !(c.is_alphabetic() || c == '-'))
            .filter(|w| !w.is_empty())
            .collect();
        for (at, &word) in words.iter().enumerate() {
            if let Some((attribute, class)) = size_class(word) {
                if describes_figure(&words, at) {
                    self.record(attribute, class, word);
                }
            } else if COLOURS.contains(&word) {
                let colour = if word == "gray" { "grey" } else { word };
                pending_colours.insert(colour.to_string());
            } else if let Some((_, part)) = PARTS.iter().find(|(noun, _)| *noun == word)
                && !pending_colours.is_empty()
            {
                for colour in std::mem::take(&mut pending_colours) {
                    self.record(Attribute::Colour((*part).to_string()), "colour", &colour);
                }
            }
        }
        for colour in pending_colours {
            self.record(Attribute::Colour("body".to_string()), "colour", &colour);
        }
    }

    fn record(&mut self, attribute: Attribute, class: &str, word: &str) {
        let entry = self.attributes.entry(attribute).or_insert_with(|| AttributeValue {
            class: class.to_string(),
            words: BTreeSet::new(),
        });
        // First class seen wins inside one description.
        if entry.class == class {
            entry.words.insert(word.to_string());
        }
    }

    /// The first attribute on which `proposed` contradicts `self`.
    pub fn contradiction(&self, proposed: &Appearance) -> Option<Contradiction> {
        self.attributes.iter().find_map(|(attribute, registered)| {
            let candidate = proposed.attributes.get(attribute)?;
            registered
                .conflicts_with(candidate, attribute)
                .then(|| Contradiction {
                    attribute: attribute.clone(),
                    registered: registered.describe(),
                    proposed: candidate.describe(),
                })
        })
    }

    /// Phrases of this description not already stated in `known`.
    ///
    /// Comparison is case-insensitive substring containment, so a phrase
    /// repeated verbatim or embedded in a longer known phrase is not new.
    pub fn new_phrases<'a>(&'a self, known: &[&str]) -> Vec<&'a str> {
        let known: Vec<String> = known.iter().map(|k| k.to_lowercase()).collect();
        self.phrases
            .iter()
            .filter(|phrase| {
                let lowered = phrase.to_lowercase();
                !known.iter().any(|k| k.contains(&lowered))
            })
            .map(String::as_str)
            .collect()
    }

    /// Whether nothing recognisable was found.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_binds_to_the_following_part() {
        let appearance = Appearance::parse("dark brown fur and piercing blue eyes");
        let fur = appearance
            .attributes
            .get(&Attribute::Colour("fur".to_string()))
            .unwrap();
        assert_eq!(fur.describe(), "brown");
        let eyes = appearance
            .attributes
            .get(&Attribute::Colour("eyes".to_string()))
            .unwrap();
        assert_eq!(eyes.describe(), "blue");
    }

    #[test]
    fn overlapping_colours_are_compatible() {
        let registered = Appearance::parse("brown fur");
        let proposed = Appearance::parse("brown and white fur");
        assert!(registered.contradiction(&proposed).is_none());
    }

    #[test]
    fn build_conflict_is_reported_with_words() {
        let registered = Appearance::parse("lanky, grey hair");
        let proposed = Appearance::parse("stocky, grey coat");
        let conflict = registered.contradiction(&proposed).unwrap();
        assert_eq!(conflict.attribute, Attribute::Build);
        assert_eq!(conflict.registered, "lanky");
        assert_eq!(conflict.proposed, "stocky");
    }

    #[test]
    fn size_words_on_parts_and_objects_are_not_stature() {
        let appearance =
            Appearance::parse("short grey hair, a big smile, grey hair cut short, a large backpack");
        assert!(!appearance.attributes.contains_key(&Attribute::Stature));
        assert!(appearance.attributes.contains_key(&Attribute::Colour("fur".to_string())));

        let figure = Appearance::parse("a tall shaggy man with short hair, broad shoulders");
        assert_eq!(figure.attributes[&Attribute::Stature].describe(), "tall");
        assert_eq!(figure.attributes[&Attribute::Build].describe(), "broad");
    }

    #[test]
    fn predicative_size_still_counts() {
        let appearance = Appearance::parse("stands tall with brown fur");
        assert_eq!(appearance.attributes[&Attribute::Stature].describe(), "tall");
    }

    #[test]
    fn restated_phrases_are_not_new() {
        let proposed = Appearance::parse("Tall, brown fur, carries a walking stick");
        let new = proposed.new_phrases(&["tall, brown fur, broad shoulders"]);
        assert_eq!(new, vec!["carries a walking stick"]);
    }
}
