//! Answer letter resolution.

use crate::domain::assessment::ChoiceDraft;

/// Position of the correct option encoded by an answer cell.
///
/// Only the first character is consulted and it is case-sensitive:
/// `"A"` is position 0, `"B"` position 1, and so on. Returns `None` when the
/// cell is empty or starts with a character below `'A'`.
pub fn answer_position(answer: &str) -> Option<usize> {
    let letter = answer.chars().next()?;
    (letter as u32)
        .checked_sub('A' as u32)
        .map(|offset| offset as usize)
}

/// Turns option texts into choices, marking the one at `position` correct.
///
/// Orders are 1-based and follow the option order. Returns `None` if
/// `position` does not index into `options`.
pub fn resolve_choices(options: Vec<String>, position: usize) -> Option<Vec<ChoiceDraft>> {
    if position >= options.len() {
        return None;
    }

    Some(
        options
            .into_iter()
            .enumerate()
            .map(|(index, content)| ChoiceDraft {
                content,
                is_correct: index == position,
                order: index as i32 + 1,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn letters_map_to_zero_based_positions() {
        assert_eq!(answer_position("A"), Some(0));
        assert_eq!(answer_position("B"), Some(1));
        assert_eq!(answer_position("Z"), Some(25));
    }

    #[test]
    fn only_first_character_is_consulted() {
        assert_eq!(answer_position("CA"), Some(2));
    }

    #[test]
    fn characters_below_a_have_no_position() {
        assert_eq!(answer_position("1"), None);
        assert_eq!(answer_position(" "), None);
        assert_eq!(answer_position(""), None);
    }

    #[test]
    fn lowercase_letters_are_not_folded() {
        assert_eq!(answer_position("b"), Some(33));
    }

    #[test]
    fn marks_exactly_the_answer_position_correct() {
        let choices = resolve_choices(options(&["Paris", "London", "Rome"]), 1).unwrap();

        let flags: Vec<bool> = choices.iter().map(|c| c.is_correct).collect();
        assert_eq!(flags, vec![false, true, false]);
        let orders: Vec<i32> = choices.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn duplicate_option_texts_mark_only_the_position() {
        let choices = resolve_choices(options(&["Yes", "Yes"]), 1).unwrap();
        assert!(!choices[0].is_correct);
        assert!(choices[1].is_correct);
    }

    #[test]
    fn position_past_the_end_is_rejected() {
        assert_eq!(resolve_choices(options(&["Paris", "London"]), 25), None);
        assert_eq!(resolve_choices(options(&["Paris", "London"]), 2), None);
    }
}
