//! Quiz grading: positional answer comparison, no partial credit.

use crate::content::catalog::Question;
use crate::error::ProgressError;

/// Count the positions where the submitted answer equals the recorded one.
///
/// Answers align with questions by position, so the two sequences must have
/// the same length; a mismatch is an error, not a zero score.
pub fn grade(questions: &[Question], answers: &[String]) -> Result<u32, ProgressError> {
    if questions.len() != answers.len() {
        return Err(ProgressError::AnswerCount {
            expected: questions.len(),
            got: answers.len(),
        });
    }

    let score = questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| question.answer == **answer)
        .count();
    Ok(score as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, answer: &str) -> Question {
        Question {
            question: text.to_string(),
            options: vec![answer.to_string(), "wrong".to_string()],
            answer: answer.to_string(),
        }
    }

    #[test]
    fn test_empty_quiz_scores_zero() {
        assert_eq!(grade(&[], &[]).unwrap(), 0);
    }

    #[test]
    fn test_all_correct_scores_full() {
        let questions = vec![question("q1", "a"), question("q2", "b"), question("q3", "c")];
        let answers = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(grade(&questions, &answers).unwrap(), 3);
    }

    #[test]
    fn test_partial_credit_is_per_question_only() {
        let questions = vec![question("q1", "a"), question("q2", "b")];
        let answers = vec!["a".to_string(), "nope".to_string()];
        assert_eq!(grade(&questions, &answers).unwrap(), 1);
    }

    #[test]
    fn test_order_matters() {
        let questions = vec![question("q1", "a"), question("q2", "b")];
        // Right answers, wrong positions
        let answers = vec!["b".to_string(), "a".to_string()];
        assert_eq!(grade(&questions, &answers).unwrap(), 0);
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let questions = vec![question("q1", "a"), question("q2", "b")];
        let answers = vec!["a".to_string()];
        let err = grade(&questions, &answers).unwrap_err();
        assert!(matches!(
            err,
            ProgressError::AnswerCount {
                expected: 2,
                got: 1
            }
        ));
    }
}
