//! Built-in avatars and quiz sets.
//!
//! Avatars are expanded from emoji packs using `<pack>_<index>` ids; the
//! default `smiley_0` is free and owned from the start. Startup population
//! goes through `merge_bundle`, so the built-in path and the import path are
//! the same code.

use crate::catalog::{Avatar, ContentBundle, ContentCatalog, Question, QuizSet};

/// Emoji packs: (pack id, shop cost per avatar, emoji).
///
/// Cost 0 marks the starter pack (granted, not sold).
const AVATAR_PACKS: &[(&str, u64, &[&str])] = &[
    ("smiley", 0, &["🙂", "😀", "😄", "😎", "🤓", "🥳", "😺", "🤠"]),
    ("animal", 40, &["🐶", "🐱", "🦊", "🐼", "🦁", "🐸", "🦉", "🐙"]),
    ("food", 60, &["🍕", "🍩", "🍓", "🌮", "🍣", "🥐", "🍫", "🥑"]),
    ("cosmic", 90, &["🌙", "⭐", "🪐", "🌈", "🔥", "❄️", "⚡", "☄️"]),
];

fn builtin_avatars() -> Vec<Avatar> {
    let mut avatars = Vec::new();
    for &(pack, cost, emojis) in AVATAR_PACKS {
        for (index, &emoji) in emojis.iter().enumerate() {
            avatars.push(Avatar {
                id: format!("{pack}_{index}"),
                emoji: emoji.to_string(),
                name: format!("{pack} {index}"),
                cost,
                pack: Some(pack.to_string()),
            });
        }
    }
    avatars
}

fn question(prompt: &str, choices: &[&str], answer: usize) -> Question {
    Question {
        prompt: prompt.to_string(),
        choices: choices.iter().map(|c| c.to_string()).collect(),
        answer,
    }
}

fn builtin_quiz_sets() -> Vec<QuizSet> {
    vec![
        QuizSet {
            id: "general_1".to_string(),
            title: "General Knowledge I".to_string(),
            questions: vec![
                question(
                    "Which planet is known as the Red Planet?",
                    &["Venus", "Mars", "Jupiter", "Mercury"],
                    1,
                ),
                question(
                    "How many continents are there?",
                    &["5", "6", "7", "8"],
                    2,
                ),
                question(
                    "What is the largest ocean on Earth?",
                    &["Atlantic", "Indian", "Arctic", "Pacific"],
                    3,
                ),
            ],
        },
        QuizSet {
            id: "science_1".to_string(),
            title: "Science Basics".to_string(),
            questions: vec![
                question(
                    "What gas do plants absorb from the atmosphere?",
                    &["Oxygen", "Nitrogen", "Carbon dioxide", "Helium"],
                    2,
                ),
                question(
                    "Water is made of hydrogen and which other element?",
                    &["Oxygen", "Carbon", "Sodium", "Chlorine"],
                    0,
                ),
                question(
                    "At what temperature does water freeze (°C)?",
                    &["-10", "0", "10", "32"],
                    1,
                ),
            ],
        },
        QuizSet {
            id: "geography_1".to_string(),
            title: "World Geography".to_string(),
            questions: vec![
                question(
                    "What is the capital of Japan?",
                    &["Kyoto", "Osaka", "Tokyo", "Nagoya"],
                    2,
                ),
                question(
                    "The Nile river flows into which sea?",
                    &["Red Sea", "Mediterranean Sea", "Black Sea", "Arabian Sea"],
                    1,
                ),
                question(
                    "Which country has the most people?",
                    &["India", "USA", "Indonesia", "Brazil"],
                    0,
                ),
            ],
        },
    ]
}

/// All built-in content in importable form.
pub fn builtin_bundle() -> ContentBundle {
    ContentBundle {
        avatars: builtin_avatars(),
        quiz_sets: builtin_quiz_sets(),
    }
}

/// The startup catalog: built-in content merged into an empty catalog.
pub fn builtin_catalog() -> ContentCatalog {
    let mut catalog = ContentCatalog::new();
    let report = catalog.merge_bundle(builtin_bundle());
    log::debug!(
        "Built-in catalog: {} avatars, {} quiz sets",
        report.avatars_added,
        report.quiz_sets_added
    );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEFAULT_AVATAR_ID;

    #[test]
    fn test_default_avatar_exists_and_is_free() {
        let catalog = builtin_catalog();
        let avatar = catalog.avatar(DEFAULT_AVATAR_ID).unwrap();
        assert_eq!(avatar.cost, 0);
        assert_eq!(avatar.emoji, "🙂");
        // And it is first in display order.
        assert_eq!(catalog.avatars()[0].id, DEFAULT_AVATAR_ID);
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let catalog = builtin_catalog();
        let bundle = builtin_bundle();
        // Nothing was skipped during the startup merge.
        assert_eq!(catalog.avatars().len(), bundle.avatars.len());
        assert_eq!(catalog.quiz_sets().len(), bundle.quiz_sets.len());
    }

    #[test]
    fn test_builtin_questions_have_valid_answer_indices() {
        for quiz_set in builtin_quiz_sets() {
            for q in &quiz_set.questions {
                assert!(q.answer < q.choices.len(), "{}: {}", quiz_set.id, q.prompt);
            }
        }
    }

    #[test]
    fn test_reimporting_builtin_bundle_is_noop() {
        let mut catalog = builtin_catalog();
        let report = catalog.merge_bundle(builtin_bundle());
        assert!(report.is_noop());
    }
}
