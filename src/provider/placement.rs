use rand::Rng;

use crate::models::{Question, RawQuestion};

/// Places the correct answer at a uniformly random slot among the distractors.
///
/// Every one of the `incorrect_answers.len() + 1` positions is equally likely.
/// No de-duplication happens here; providers reject such records beforehand.
pub fn place_options_with<R: Rng>(rng: &mut R, raw: RawQuestion) -> Question {
    let RawQuestion {
        question_text,
        correct_answer,
        incorrect_answers,
    } = raw;

    let mut options = incorrect_answers;
    let slot = rng.gen_range(0..=options.len());
    options.insert(slot, correct_answer.clone());

    Question::from_parts(question_text, options, correct_answer)
}

/// [`place_options_with`] using the thread-local generator.
pub fn place_options(raw: RawQuestion) -> Question {
    place_options_with(&mut rand::thread_rng(), raw)
}
