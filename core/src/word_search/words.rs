use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Animals,
    Fruits,
    Space,
    Sports,
    Ocean,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Animals,
        Category::Fruits,
        Category::Space,
        Category::Sports,
        Category::Ocean,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Animals => "Animals",
            Self::Fruits => "Fruits",
            Self::Space => "Space",
            Self::Sports => "Sports",
            Self::Ocean => "Ocean",
        }
    }

    /// Pool the main words are drawn from.
    pub const fn words(self) -> &'static [&'static str] {
        match self {
            Self::Animals => &[
                "ELEPHANT", "GIRAFFE", "KANGAROO", "PENGUIN", "DOLPHIN", "CHEETAH", "GORILLA",
                "RABBIT", "TURTLE", "ZEBRA", "LION", "TIGER", "MONKEY", "BEAVER", "OTTER",
            ],
            Self::Fruits => &[
                "APPLE", "BANANA", "CHERRY", "MANGO", "ORANGE", "PAPAYA", "PEACH", "PEAR",
                "PLUM", "GRAPE", "LEMON", "LIME", "KIWI", "APRICOT", "COCONUT",
            ],
            Self::Space => &[
                "PLANET", "GALAXY", "COMET", "ORBIT", "NEBULA", "ROCKET", "SATURN", "JUPITER",
                "METEOR", "ASTEROID", "ECLIPSE", "GRAVITY", "MARS", "VENUS", "STAR",
            ],
            Self::Sports => &[
                "SOCCER", "TENNIS", "HOCKEY", "RUGBY", "GOLF", "BOXING", "CRICKET", "CYCLING",
                "ROWING", "SKIING", "SURFING", "ARCHERY", "FENCING", "KARATE", "POLO",
            ],
            Self::Ocean => &[
                "CORAL", "WHALE", "SHARK", "OCTOPUS", "SEAWEED", "LOBSTER", "JELLYFISH", "TIDE",
                "WAVE", "REEF", "ANCHOR", "HARBOR", "SQUID", "STARFISH", "CURRENT",
            ],
        }
    }

    /// Harder extra words hidden in every grid of this category.
    pub const fn bonus_words(self) -> [&'static str; 3] {
        match self {
            Self::Animals => ["CHAMELEON", "PLATYPUS", "AARDVARK"],
            Self::Fruits => ["POMEGRANATE", "DRAGONFRUIT", "PERSIMMON"],
            Self::Space => ["CONSTELLATION", "SUPERNOVA", "ASTRONAUT"],
            Self::Sports => ["GYMNASTICS", "BADMINTON", "MARATHON"],
            Self::Ocean => ["BARRACUDA", "SEAHORSE", "NARWHAL"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_lists_fit_the_grid() {
        for category in Category::ALL {
            assert!(category.words().len() >= usize::from(super::super::MAX_WORDS));
            for word in category.words().iter().chain(&category.bonus_words()) {
                assert!(word.len() <= usize::from(super::super::GRID_SIZE), "{word}");
                assert!(word.chars().all(|c| c.is_ascii_uppercase()), "{word}");
            }
        }
    }

    #[test]
    fn bonus_words_outgrow_the_main_words() {
        for category in Category::ALL {
            let mut lengths: Vec<usize> = category.words().iter().map(|w| w.len()).collect();
            lengths.sort_unstable();
            let median = lengths[lengths.len() / 2];
            for word in category.bonus_words() {
                assert!(word.len() > median, "{word} in {}", category.name());
                assert!(!category.words().contains(&word), "{word}");
            }
        }
    }
}
