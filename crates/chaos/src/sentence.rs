//! Filler sentences for chaos ticks.

use rand::{Rng, seq::IndexedRandom};

/// Produces the text of each numbered chaos message.
pub trait SentenceSource: Send + Sync {
    fn sentence(&self) -> String;
}

/// Grammatical sentences assembled from random words.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSentences;

impl SentenceSource for RandomSentences {
    fn sentence(&self) -> String {
        generate(&mut rand::rng())
    }
}

const NOUNS: &[&str] = &[
    "apple", "bridge", "cactus", "dolphin", "engine", "forest", "guitar", "harbor", "island",
    "jacket", "kettle", "lantern", "meadow", "notebook", "orchard", "pebble", "quilt", "river",
    "satellite", "teapot", "umbrella", "volcano", "window", "yacht", "zebra", "octopus", "mountain",
    "elephant", "onion", "owl",
];

const ADJECTIVES: &[&str] = &[
    "ancient", "brave", "curious", "dizzy", "eager", "fuzzy", "gentle", "hollow", "icy", "jolly",
    "lucky", "mighty", "noisy", "odd", "polite", "quiet", "rusty", "silly", "tiny", "vivid",
    "wobbly", "zealous", "amber", "elegant", "unusual",
];

const VERBS: &[&str] = &[
    "admires", "borrows", "chases", "discovers", "embraces", "follows", "greets", "hides",
    "ignores", "juggles", "knits", "launches", "measures", "notices", "outruns", "paints",
    "questions", "rescues", "sketches", "tickles", "visits", "whispers to",
];

const ADVERBS: &[&str] = &[
    "boldly", "calmly", "eagerly", "gracefully", "happily", "loudly", "nervously", "politely",
    "quickly", "rarely", "secretly", "slowly", "suddenly", "warmly",
];

const TEMPLATES: &[&str] = &[
    "{a_adjective} {noun} {verb} {a_noun}",
    "the {noun} {adverb} {verb} the {adjective} {noun}",
    "{a_noun} is {a_adjective} {noun}",
    "some say the {noun} is {adjective}, but the {noun} {verb} it {adverb}",
    "nobody {verb} {a_noun} like {a_adjective} {noun} does",
    "if {a_noun} {verb} {a_noun}, the {noun} becomes {adjective}",
    "every {adjective} {noun} {adverb} {verb} {a_noun}",
    "the {noun} of the {adjective} {noun} {verb} us all",
];

/// Build one sentence with the given random source.
pub fn generate<R: Rng>(rng: &mut R) -> String {
    let template = TEMPLATES.choose(rng).copied().unwrap_or(TEMPLATES[0]);
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let slot = &rest[start + 1..start + len];
        out.push_str(&fill(slot, rng));
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);

    let punctuation = if rng.random_bool(0.15) { '!' } else { '.' };
    out.push(punctuation);
    capitalize(&out)
}

fn fill<R: Rng>(slot: &str, rng: &mut R) -> String {
    let (article, kind) = match slot.strip_prefix("a_") {
        Some(kind) => (true, kind),
        None => (false, slot),
    };
    let words = match kind {
        "noun" => NOUNS,
        "adjective" => ADJECTIVES,
        "verb" => VERBS,
        "adverb" => ADVERBS,
        _ => return slot.to_string(),
    };
    let word = words.choose(rng).copied().unwrap_or(words[0]);
    if article {
        format!("{} {word}", indefinite_article(word))
    } else {
        word.to_string()
    }
}

fn indefinite_article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, rand::{SeedableRng, rngs::StdRng}};

    #[test]
    fn sentences_are_capitalized_and_terminated() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let s = generate(&mut rng);
            assert!(s.chars().next().is_some_and(char::is_uppercase), "{s}");
            assert!(s.ends_with('.') || s.ends_with('!'), "{s}");
            assert!(!s.contains('{') && !s.contains('}'), "{s}");
        }
    }

    #[test]
    fn same_seed_same_sentence() {
        let a = generate(&mut StdRng::seed_from_u64(42));
        let b = generate(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn articles() {
        assert_eq!(indefinite_article("owl"), "an");
        assert_eq!(indefinite_article("zebra"), "a");
    }

    #[test]
    fn random_source_produces_text() {
        assert!(!RandomSentences.sentence().is_empty());
    }
}
